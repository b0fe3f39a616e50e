use crate::domain::model::{Event, TextBlock};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Read side of the event catalog.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events with a non-empty slug, in the store's natural order.
    async fn events_with_slug(&self) -> Result<Vec<Event>>;

    /// Blocks with non-null content, ordered by `(ordering, id)`.
    async fn blocks_for_event(&self, event_id: i64) -> Result<Vec<TextBlock>>;
}

#[async_trait]
pub trait MapFetcher: Send + Sync {
    /// Fetches the map centered on `center` and writes it to `destination`.
    async fn fetch(&self, center: &str, destination: &Path) -> Result<()>;
}
