use clap::Subcommand;
use focuslite_core::{drive, Config, DriveOutcome};
use std::future::Future;
use std::io::{IsTerminal, Write};

use crate::context::{open_app, print_json, App};
use crate::render::format_seconds;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown and follow it until it ends
    Start {
        /// Return immediately; attach later with `timer run`
        #[arg(long)]
        detach: bool,
    },
    /// Attach to a running countdown and tick it until it ends
    Run,
    /// Pause the countdown
    Pause,
    /// Stop and rewind without recording a session
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Show or change the work length in minutes
    Length {
        /// New length in minutes; an empty string blanks it
        minutes: Option<String>,
        /// Blank the work length, disabling the timer until set again
        #[arg(long, conflicts_with = "minutes")]
        blank: bool,
    },
}

fn disabled_reason(app: &App) -> &'static str {
    if app.active_project().is_none() {
        "no project selected"
    } else {
        "work length is not a positive number"
    }
}

/// Resolve once `signal` reports Ctrl-C.
///
/// If the handler could not be installed this never resolves, so the
/// countdown is followed to the end.
async fn detach_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C, following until the timer stops");
        std::future::pending::<()>().await;
    }
}

/// Tick the countdown on a single-threaded runtime until it stops.
///
/// Ctrl-C detaches without touching persisted state.
fn follow(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let show_progress = std::io::stderr().is_terminal();

    let outcome = runtime.block_on(drive(
        app,
        detach_on(tokio::signal::ctrl_c()),
        |app| {
            if show_progress {
                let mut stderr = std::io::stderr().lock();
                let _ = write!(
                    stderr,
                    "\r{} remaining ",
                    format_seconds(app.timer().remaining_secs())
                );
                let _ = stderr.flush();
            }
        },
    ))?;
    if show_progress {
        eprintln!();
    }

    match outcome {
        DriveOutcome::NotRunning => print_json(&app.snapshot())?,
        DriveOutcome::Completed(event) => print_json(&event)?,
        DriveOutcome::Stopped => {
            eprintln!("timer stopped elsewhere");
            print_json(&app.snapshot())?;
        }
        DriveOutcome::AlreadyDriven => {
            eprintln!("another focuslite process is already ticking this timer");
            print_json(&app.snapshot())?;
        }
        DriveOutcome::Detached => {
            eprintln!("detached; resume ticking with `focuslite timer run`");
            print_json(&app.snapshot())?;
        }
    }
    Ok(())
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;

    match action {
        TimerAction::Start { detach } => {
            if app.timer().is_running() {
                eprintln!("timer already running");
            } else {
                match app.start()? {
                    Some(event) => print_json(&event)?,
                    None => {
                        eprintln!("timer disabled: {}", disabled_reason(&app));
                        return Ok(());
                    }
                }
            }
            if !detach {
                follow(&mut app)?;
            }
        }
        TimerAction::Run => follow(&mut app)?,
        TimerAction::Pause => match app.pause()? {
            Some(event) => print_json(&event)?,
            None => print_json(&app.snapshot())?,
        },
        TimerAction::Reset => {
            let event = app.reset()?;
            print_json(&event)?;
        }
        TimerAction::Status => print_json(&app.snapshot())?,
        TimerAction::Length { minutes, blank } => {
            let input = if blank { Some(String::new()) } else { minutes };
            match input {
                Some(input) => match app.set_work_length_input(&input)? {
                    Some(event) => print_json(&event)?,
                    None => eprintln!("ignored: '{input}' is not a positive number of minutes"),
                },
                None => match app.timer().work_minutes() {
                    Some(minutes) => println!("{minutes}"),
                    None => println!("(blank)"),
                },
            }
        }
    }
    Ok(())
}
