use std::sync::Arc;

use crate::engine::{EventService, OwnershipController, RegistrationEngine};
use crate::store::EventStore;

/// Shared handler state. The engines are stateless over the store handle, so
/// cloning this per-request is cheap and any number of server instances can
/// point at the same store.
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub registration: RegistrationEngine,
    pub ownership: OwnershipController,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            events: EventService::new(store.clone()),
            registration: RegistrationEngine::new(store.clone()),
            ownership: OwnershipController::new(store),
        }
    }
}
