//! Project management commands for CLI.

use clap::Subcommand;
use focuslite_core::Config;

use crate::context::{open_app, print_json};
use crate::render;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project and make it active
    Add {
        /// Project name
        name: String,
    },
    /// List projects with their total focused minutes
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Make a project active
    Select {
        /// Project ID
        id: String,
    },
    /// Delete a project (the default project is kept)
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;

    match action {
        ProjectAction::Add { name } => match app.add_project(&name)? {
            Some(event) => print_json(&event)?,
            None => eprintln!("ignored: project name is blank"),
        },
        ProjectAction::List { json } => {
            let totals = app.project_totals();
            if json {
                print_json(&totals)?;
            } else {
                print!("{}", render::projects(&totals));
            }
        }
        ProjectAction::Select { id } => {
            let event = app.select_project(&id)?;
            if app.projects().get(&id).is_none() {
                eprintln!("note: no project '{id}'; using the first project");
            }
            print_json(&event)?;
        }
        ProjectAction::Delete { id } => match app.delete_project(&id)? {
            Some(event) => print_json(&event)?,
            None => eprintln!("ignored: project '{id}' cannot be deleted"),
        },
    }
    Ok(())
}
