pub mod batch;
pub mod center;
pub mod location;

pub use crate::domain::model::{Event, EventOutcome, OutcomeStatus, RunReport, TextBlock};
pub use crate::domain::ports::{EventStore, MapFetcher};
pub use crate::utils::error::Result;
