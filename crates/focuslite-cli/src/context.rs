use focuslite_core::{Config, Database, FocusLite};

use crate::notifier::TerminalNotifier;

pub type App = FocusLite<Database, TerminalNotifier>;

/// Open the on-disk store with the user's configuration applied.
pub fn open_app(config: &Config) -> Result<App, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let notifier = TerminalNotifier::new(config.notifications.enabled);
    Ok(FocusLite::load(
        db,
        notifier,
        config.timer.default_work_minutes,
    )?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
