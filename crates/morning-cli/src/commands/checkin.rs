use chrono::NaiveDateTime;
use clap::{Args, ValueEnum};
use morning_core::clock::parse_timestamp;
use morning_core::{Clock, SystemClock};

use super::{CommandResult, Service};
use crate::render;

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    fn title(self) -> &'static str {
        match self {
            Sex::Male => "男孩子",
            Sex::Female => "女孩子",
            Sex::Unknown => "群友",
        }
    }
}

#[derive(Args)]
pub struct CheckinArgs {
    /// Group ID
    #[arg(long)]
    pub group: String,
    /// User ID
    #[arg(long)]
    pub user: String,
    /// Check-in time as "YYYY-MM-DD HH:MM:SS" (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub at: Option<NaiveDateTime>,
    /// Used in the reply ("你是今天第N个起床的男孩子")
    #[arg(long, value_enum, default_value_t = Sex::Unknown)]
    pub sex: Sex,
    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckinArgs {
    fn now(&self) -> NaiveDateTime {
        self.at.unwrap_or_else(|| SystemClock.now())
    }
}

pub fn wake(service: &mut Service, args: CheckinArgs) -> CommandResult {
    let decision = service.good_morning(&args.group, &args.user, args.now())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{}", render::wake_reply(&decision, args.sex.title()));
    }
    Ok(())
}

pub fn sleep(service: &mut Service, args: CheckinArgs) -> CommandResult {
    let decision = service.good_night(&args.group, &args.user, args.now())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{}", render::sleep_reply(&decision, args.sex.title()));
    }
    Ok(())
}
