use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::engine::catalog;
use crate::engine::RegisterOutcome;
use crate::models::{Category, EventPatch, NewEvent};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    search: String,
    category: Option<String>,
}

/// Board listing. Filtering is a pure function over the snapshot, applied
/// here in the presentation layer, not in the engine.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let category = match params.category.as_deref().filter(|c| !c.is_empty()) {
        Some(raw) => Some(Category::parse(raw).ok_or_else(|| {
            AppError::ValidationError(format!("Unknown category '{raw}'"))
        })?),
        None => None,
    };

    let events = state.events.list().await?;
    let events = catalog::filter(events, &params.search, category);
    Ok(success(events, "Events fetched successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(new): Json<NewEvent>,
) -> Result<Response, AppError> {
    let event = state.events.create(identity, new).await?;
    Ok(created(event, "Event has been created"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state.events.get(event_id).await?;
    Ok(success(event, "Event fetched successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, AppError> {
    let event = state
        .ownership
        .edit(event_id, &identity.email, &patch)
        .await?;
    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    state.ownership.delete(event_id, &identity.email).await?;
    Ok(empty_success("Event deleted successfully"))
}

pub async fn register_interest(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    match state.registration.register(event_id, &identity).await? {
        RegisterOutcome::Registered => {
            Ok(empty_success("You have been added to the participant list."))
        }
        // The engine treats this as a benign outcome; the board presents it
        // as a conflict, matching the product's behavior.
        RegisterOutcome::AlreadyRegistered => Err(AppError::AlreadyRegistered),
    }
}

pub async fn my_events(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Response, AppError> {
    let events = state.events.list_by_owner(&identity.email).await?;
    Ok(success(events, "Events fetched successfully"))
}
