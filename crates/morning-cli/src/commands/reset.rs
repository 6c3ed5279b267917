use clap::Subcommand;

use super::{CommandResult, Service};

#[derive(Subcommand)]
pub enum ResetAction {
    /// Zero today's wake/sleep counters in every group
    Daily,
    /// Clear weekly statistics and sleeping kings
    Weekly,
}

pub fn run(service: &mut Service, action: ResetAction) -> CommandResult {
    match action {
        ResetAction::Daily => {
            service.reset_daily()?;
            println!("daily counters reset");
        }
        ResetAction::Weekly => {
            service.reset_weekly()?;
            println!("weekly statistics reset");
        }
    }
    Ok(())
}
