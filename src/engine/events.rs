use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::engine::EngineError;
use crate::models::{event::normalize_link, Event, Identity, NewEvent};
use crate::store::EventStore;

/// Creation and read-only catalog queries.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Creates an event owned by `owner`. The id and creation timestamp are
    /// assigned here, never taken from the request; the interest list
    /// starts empty.
    pub async fn create(&self, owner: Identity, new: NewEvent) -> Result<Event, EngineError> {
        new.validate()
            .map_err(|reason| EngineError::Validation(reason.to_string()))?;

        let event = Event {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            location: new.location,
            postal_code: new.postal_code,
            category: new.category,
            scheduled_at: new.scheduled_at,
            external_link: normalize_link(new.external_link),
            owner,
            created_at: Utc::now(),
            interested: Vec::new(),
        };

        self.store.insert(&event).await?;
        tracing::info!(event_id = %event.id, category = %event.category, "event created");
        Ok(event)
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Event, EngineError> {
        match self.store.find_by_event_id(event_id).await? {
            Some(versioned) => Ok(versioned.record),
            None => Err(EngineError::NotFound),
        }
    }

    pub async fn list(&self) -> Result<Vec<Event>, EngineError> {
        Ok(self.store.list().await?)
    }

    pub async fn list_by_owner(&self, email: &str) -> Result<Vec<Event>, EngineError> {
        Ok(self.store.list_by_owner(email).await?)
    }
}
