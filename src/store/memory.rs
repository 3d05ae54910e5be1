use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::Event;
use crate::store::{CasOutcome, EventStore, StoreError, Versioned};

struct StoredEvent {
    event: Event,
    version: i64,
}

/// Store state. Records are keyed by an internal counter the way a real
/// backend keys rows; `index` maps the client-visible id onto it. Both live
/// under one lock so a lookup and the write it feeds are a single atomic
/// unit.
#[derive(Default)]
struct Inner {
    next_key: u64,
    records: HashMap<u64, StoredEvent>,
    index: HashMap<Uuid, u64>,
}

/// In-memory [`EventStore`]. Backs the test-suite and DB-less deployments.
#[derive(Default)]
pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: &Event) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.index.contains_key(&event.id) {
            return Err(StoreError::Duplicate);
        }
        let key = inner.next_key;
        inner.next_key += 1;
        inner.records.insert(
            key,
            StoredEvent {
                event: event.clone(),
                version: 0,
            },
        );
        inner.index.insert(event.id, key);
        Ok(())
    }

    async fn find_by_event_id(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Versioned<Event>>, StoreError> {
        let inner = self.inner.lock().await;
        let found = inner.index.get(&event_id).and_then(|key| {
            inner.records.get(key).map(|stored| Versioned {
                record: stored.event.clone(),
                version: stored.version,
            })
        });
        Ok(found)
    }

    async fn update_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
        event: &Event,
    ) -> Result<CasOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(key) = inner.index.get(&event_id).copied() else {
            return Ok(CasOutcome::Conflict);
        };
        match inner.records.get_mut(&key) {
            Some(stored) if stored.version == expected_version => {
                stored.event = event.clone();
                stored.version += 1;
                Ok(CasOutcome::Committed)
            }
            _ => Ok(CasOutcome::Conflict),
        }
    }

    async fn delete_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
    ) -> Result<CasOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(key) = inner.index.get(&event_id).copied() else {
            return Ok(CasOutcome::Conflict);
        };
        let version_matches = inner
            .records
            .get(&key)
            .map_or(false, |stored| stored.version == expected_version);
        if version_matches {
            inner.records.remove(&key);
            inner.index.remove(&event_id);
            Ok(CasOutcome::Committed)
        } else {
            Ok(CasOutcome::Conflict)
        }
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.lock().await;
        let mut events: Vec<Event> = inner
            .records
            .values()
            .map(|stored| stored.event.clone())
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Event>, StoreError> {
        let mut events = self.list().await?;
        events.retain(|event| event.is_owned_by(email));
        Ok(events)
    }
}
