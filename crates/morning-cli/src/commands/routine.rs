use clap::Subcommand;

use super::{CommandResult, Service};
use crate::render;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// A user's check-in history
    User {
        #[arg(long)]
        group: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        json: bool,
    },
    /// Today's counters for a group
    Group {
        #[arg(long)]
        group: String,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(service: &mut Service, action: RoutineAction) -> CommandResult {
    match action {
        RoutineAction::User { group, user, json } => {
            let summary = service.user_summary(&group, &user);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render::user_routine(summary.as_ref()));
            }
        }
        RoutineAction::Group { group, json } => {
            let summary = service.group_summary(&group);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", render::group_routine(&summary));
            }
        }
    }
    Ok(())
}
