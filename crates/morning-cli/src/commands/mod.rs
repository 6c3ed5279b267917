pub mod checkin;
pub mod config;
pub mod reset;
pub mod routine;

use std::path::PathBuf;

use morning_core::{FileStore, MorningService};

pub type Service = MorningService<FileStore>;
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_service(data_dir: Option<PathBuf>) -> Result<Service, Box<dyn std::error::Error>> {
    let store = match data_dir {
        Some(dir) => FileStore::with_dir(dir)?,
        None => FileStore::open()?,
    };
    Ok(MorningService::open(store)?)
}
