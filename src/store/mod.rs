use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Event;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

/// A record together with the version the store returned it at. Conditional
/// writes must quote this version back.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub record: T,
    pub version: i64,
}

/// Outcome of a conditional write. `Conflict` covers both "version moved on"
/// and "record gone" — callers re-fetch and decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Committed,
    Conflict,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An event with this logical id already exists.
    #[error("event id already present")]
    Duplicate,

    /// Backend failure; the reason is for logs, never for clients.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent collection of events, addressed by logical id.
///
/// The storage-internal key never crosses this boundary. Every mutation is
/// conditional on (logical id, version) and atomic in the backend, so
/// read-then-write callers cannot land on a record that was deleted or
/// replaced after their read: the write itself re-asserts the id and the
/// version it was decided against.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts a new event at version 0.
    async fn insert(&self, event: &Event) -> Result<(), StoreError>;

    /// Single indexed lookup by logical id.
    async fn find_by_event_id(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Versioned<Event>>, StoreError>;

    /// Replaces the record if it still exists at `expected_version`.
    async fn update_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
        event: &Event,
    ) -> Result<CasOutcome, StoreError>;

    /// Removes the record if it still exists at `expected_version`.
    async fn delete_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
    ) -> Result<CasOutcome, StoreError>;

    /// All events, newest first.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;

    /// Events owned by `email`, newest first.
    async fn list_by_owner(&self, email: &str) -> Result<Vec<Event>, StoreError>;
}
