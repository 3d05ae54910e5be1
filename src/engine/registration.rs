use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::engine::{contention_exhausted, EngineError, MAX_CAS_ATTEMPTS};
use crate::models::{Identity, Participant};
use crate::store::{CasOutcome, EventStore, Versioned};

/// How a registration request ended. Both are successes: registering twice
/// is an expected race, not a fault, and the second caller must be able to
/// tell it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyRegistered,
}

/// Appends participants to an event's interest list with per-event,
/// per-email uniqueness under concurrent callers.
#[derive(Clone)]
pub struct RegistrationEngine {
    store: Arc<dyn EventStore>,
}

impl RegistrationEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Registers `identity` as interested in the event.
    ///
    /// The duplicate check and the append are decided against one versioned
    /// read and committed with a conditional write on (id, version); a
    /// conflict means another writer got in between, so the loop re-reads
    /// and re-decides. Of N concurrent calls for the same email exactly one
    /// commits an entry, the rest observe it and report `AlreadyRegistered`.
    pub async fn register(
        &self,
        event_id: Uuid,
        identity: &Identity,
    ) -> Result<RegisterOutcome, EngineError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(Versioned { mut record, version }) =
                self.store.find_by_event_id(event_id).await?
            else {
                return Err(EngineError::NotFound);
            };

            if record.has_participant(&identity.email) {
                return Ok(RegisterOutcome::AlreadyRegistered);
            }

            record
                .interested
                .push(Participant::joining(identity.clone(), Utc::now()));

            match self
                .store
                .update_if_version(event_id, version, &record)
                .await?
            {
                CasOutcome::Committed => {
                    tracing::debug!(%event_id, participants = record.interested.len(), "interest registered");
                    return Ok(RegisterOutcome::Registered);
                }
                CasOutcome::Conflict => continue,
            }
        }
        Err(contention_exhausted())
    }
}
