// Adapters layer: concrete implementations of the domain ports.

pub mod sqlite;
pub mod static_map;

pub use sqlite::SqliteEventStore;
pub use static_map::StaticMapClient;
