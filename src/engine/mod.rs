use thiserror::Error;

use crate::store::StoreError;

pub mod catalog;
pub mod events;
pub mod ownership;
pub mod registration;

pub use events::EventService;
pub use ownership::OwnershipController;
pub use registration::{RegisterOutcome, RegistrationEngine};

/// Typed outcomes the engine surfaces to callers. Raw storage errors never
/// leave the store layer; `StoreUnavailable` carries a reason for logs and
/// is the only transient variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("event not found")]
    NotFound,

    #[error("caller does not own this event")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            // Ids are generated server-side, so a duplicate is never the
            // caller's fault.
            StoreError::Duplicate => EngineError::StoreUnavailable("event id collision".into()),
            StoreError::Unavailable(reason) => EngineError::StoreUnavailable(reason),
        }
    }
}

/// Upper bound on optimistic-write retries. A conflict means another writer
/// committed between our read and our conditional write; re-deciding against
/// the fresh record almost always succeeds on the next pass, so hitting this
/// bound indicates pathological contention, reported as transient.
pub(crate) const MAX_CAS_ATTEMPTS: u32 = 16;

pub(crate) fn contention_exhausted() -> EngineError {
    EngineError::StoreUnavailable("write contention, retries exhausted".into())
}
