use crate::domain::model::{Event, TextBlock};
use crate::domain::ports::EventStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;

const EVENTS_WITH_SLUG: &str = "SELECT id, slug, name, country, description FROM events \
     WHERE slug IS NOT NULL AND slug != ''";

const BLOCKS_FOR_EVENT: &str = "SELECT id, event_id, content, ordering FROM event_blocks \
     WHERE event_id = ? AND content IS NOT NULL \
     ORDER BY ordering ASC, id ASC";

/// The catalog's SQLite database. Only ever queried, never written.
#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Opens an existing database file; a missing file is an error.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(false),
        )
        .await?;
        tracing::debug!("Opened event database at {}", db_path.display());
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn event_from_row(row: &SqliteRow) -> std::result::Result<Event, sqlx::Error> {
    Ok(Event {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        description: row.try_get("description")?,
    })
}

fn block_from_row(row: &SqliteRow) -> std::result::Result<TextBlock, sqlx::Error> {
    Ok(TextBlock {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        content: row.try_get("content")?,
        ordering: row.try_get("ordering")?,
    })
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn events_with_slug(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(EVENTS_WITH_SLUG).fetch_all(&self.pool).await?;
        let events = rows
            .iter()
            .map(event_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    async fn blocks_for_event(&self, event_id: i64) -> Result<Vec<TextBlock>> {
        let rows = sqlx::query(BLOCKS_FOR_EVENT)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        let blocks = rows
            .iter()
            .map(block_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MapError;
    use sqlx::Executor;
    use tempfile::TempDir;

    async fn seeded_pool(dir: &TempDir) -> SqlitePool {
        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(dir.path().join("data.sqlite3"))
                .create_if_missing(true),
        )
        .await
        .unwrap();

        pool.execute(
            "CREATE TABLE events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT, name TEXT, description TEXT, years TEXT,
                slug TEXT, country TEXT
            );
            CREATE TABLE event_blocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id INTEGER NOT NULL REFERENCES events(id),
                language TEXT DEFAULT 'en', title TEXT, content TEXT,
                ordering INTEGER NOT NULL DEFAULT 0
            );
            INSERT INTO events (id, name, description, slug, country) VALUES
                (1, 'Our Lady of Lourdes', 'In 1858 at the grotto.', 'our-lady-of-lourdes', 'France'),
                (2, 'Unnamed', NULL, NULL, NULL),
                (3, 'Blank slug', NULL, '', NULL),
                (4, NULL, NULL, 'nameless', NULL);
            INSERT INTO event_blocks (id, event_id, content, ordering) VALUES
                (10, 1, 'second by ordering', 2),
                (11, 1, NULL, 0),
                (12, 1, 'tie, higher id', 1),
                (13, 1, 'tie, lower id', 1),
                (14, 4, 'other event', 0);",
        )
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_events_with_slug_only() {
        let dir = TempDir::new().unwrap();
        let store = SqliteEventStore::from_pool(seeded_pool(&dir).await);

        let mut events = store.events_with_slug().await.unwrap();
        events.sort_by_key(|e| e.id);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].slug, "our-lady-of-lourdes");
        assert_eq!(events[0].country.as_deref(), Some("France"));
        assert_eq!(events[1].slug, "nameless");
        assert_eq!(events[1].name, None);
    }

    #[tokio::test]
    async fn test_blocks_ordered_and_non_null() {
        let dir = TempDir::new().unwrap();
        let store = SqliteEventStore::from_pool(seeded_pool(&dir).await);

        let blocks = store.blocks_for_event(1).await.unwrap();
        let ids: Vec<i64> = blocks.iter().map(|b| b.id).collect();

        assert_eq!(ids, vec![12, 13, 10]);
        assert!(blocks.iter().all(|b| b.event_id == 1));
    }

    #[tokio::test]
    async fn test_open_existing_database() {
        let dir = TempDir::new().unwrap();
        seeded_pool(&dir).await.close().await;

        let store = SqliteEventStore::open(&dir.path().join("data.sqlite3"))
            .await
            .unwrap();
        assert_eq!(store.events_with_slug().await.unwrap().len(), 2);
        store.close().await;
    }

    #[tokio::test]
    async fn test_open_missing_database_is_data_access_error() {
        let dir = TempDir::new().unwrap();
        let err = SqliteEventStore::open(&dir.path().join("missing.sqlite3"))
            .await
            .unwrap_err();
        assert!(matches!(err, MapError::DataAccessError(_)));
        assert!(err.is_fatal());
    }
}
