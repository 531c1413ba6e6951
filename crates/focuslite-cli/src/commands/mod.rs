pub mod config;
pub mod history;
pub mod project;
pub mod timer;
pub mod view;
