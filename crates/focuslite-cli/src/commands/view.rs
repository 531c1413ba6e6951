//! Today / History views.

use clap::Args;
use focuslite_core::{today_key, Config, View};

use crate::context::{open_app, print_json};
use crate::render;

#[derive(Args)]
pub struct ViewArgs {
    /// Switch to this view (today or history) before showing it
    view: Option<View>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: ViewArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;
    if let Some(view) = args.view {
        app.set_view(view)?;
    }

    match app.view() {
        View::Today => {
            let summary = app.today_summary(&today_key());
            if args.json {
                print_json(&summary)?;
            } else {
                print!("{}", render::today(&summary, app.projects()));
            }
        }
        View::History => {
            let days = app.history();
            if args.json {
                print_json(&days)?;
            } else {
                print!("{}", render::history(&days, app.projects()));
            }
        }
    }
    Ok(())
}
