use std::sync::Arc;

use uuid::Uuid;

use crate::engine::{contention_exhausted, EngineError, MAX_CAS_ATTEMPTS};
use crate::models::{Event, EventPatch};
use crate::store::{CasOutcome, EventStore, Versioned};

/// Owner-only edit and delete.
///
/// Ownership is checked against the record the conditional write is keyed
/// on, inside every retry — never against a value the client read earlier.
/// A caller whose view is stale either passes the re-check against the
/// fresh record or gets the verdict the fresh record dictates.
#[derive(Clone)]
pub struct OwnershipController {
    store: Arc<dyn EventStore>,
}

impl OwnershipController {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Applies `patch` to the event's mutable attributes and returns the
    /// updated record.
    pub async fn edit(
        &self,
        event_id: Uuid,
        caller_email: &str,
        patch: &EventPatch,
    ) -> Result<Event, EngineError> {
        patch
            .validate()
            .map_err(|reason| EngineError::Validation(reason.to_string()))?;

        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(Versioned { mut record, version }) =
                self.store.find_by_event_id(event_id).await?
            else {
                return Err(EngineError::NotFound);
            };

            if !record.is_owned_by(caller_email) {
                return Err(EngineError::Forbidden);
            }

            record.apply_patch(patch);

            match self
                .store
                .update_if_version(event_id, version, &record)
                .await?
            {
                CasOutcome::Committed => {
                    tracing::debug!(%event_id, "event updated");
                    return Ok(record);
                }
                CasOutcome::Conflict => continue,
            }
        }
        Err(contention_exhausted())
    }

    /// Permanently removes the event. No soft-delete: the record and its
    /// participant list are gone once this commits.
    pub async fn delete(&self, event_id: Uuid, caller_email: &str) -> Result<(), EngineError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(Versioned { record, version }) =
                self.store.find_by_event_id(event_id).await?
            else {
                return Err(EngineError::NotFound);
            };

            if !record.is_owned_by(caller_email) {
                return Err(EngineError::Forbidden);
            }

            match self.store.delete_if_version(event_id, version).await? {
                CasOutcome::Committed => {
                    tracing::info!(%event_id, "event deleted");
                    return Ok(());
                }
                // Someone registered or edited since our read; re-read and
                // decide against the richer record.
                CasOutcome::Conflict => continue,
            }
        }
        Err(contention_exhausted())
    }
}
