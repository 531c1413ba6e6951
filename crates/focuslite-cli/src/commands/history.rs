//! Session history commands for CLI.

use clap::Subcommand;
use focuslite_core::Config;
use std::io::{BufRead, Write};

use crate::context::{open_app, print_json};

const CLEAR_PROMPT: &str = "Are you sure you want to clear all session history? [y/N] ";

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Delete every recorded session. Cannot be undone.
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn confirm_on_stdin() -> bool {
    print!("{CLEAR_PROMPT}");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

pub fn run(action: HistoryAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;

    match action {
        HistoryAction::Clear { yes } => {
            if app.sessions().is_empty() {
                println!("No past sessions yet.");
                return Ok(());
            }
            match app.clear_history(|| yes || confirm_on_stdin())? {
                Some(event) => print_json(&event)?,
                None => println!("history unchanged"),
            }
        }
    }
    Ok(())
}
