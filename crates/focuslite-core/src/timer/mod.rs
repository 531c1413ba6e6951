mod driver;
mod engine;
pub mod lease;
mod ticker;

pub use driver::{drive, DriveOutcome};
pub use engine::{
    parse_work_length, valid_work_minutes, Expiry, RunState, TimerEngine, TimerState,
};
pub use ticker::Ticker;
