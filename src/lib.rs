pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{SqliteEventStore, StaticMapClient};
pub use config::{AppConfig, MapsConfig};
pub use crate::core::{batch::BatchRunner, center::resolve_center, location::extract_location};
pub use utils::error::{MapError, Result};
