use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{Category, Event, Identity, Participant};
use crate::store::{CasOutcome, EventStore, StoreError, Versioned};

/// Postgres-backed [`EventStore`].
///
/// Rows are keyed by an internal bigserial that never leaves this module;
/// the client-visible id lives in the `event_id` column under a unique
/// index, so lookup by logical id is one indexed query. Conditional writes
/// are single statements predicated on `event_id` and `version`, which makes
/// the lookup-then-mutate composition atomic without an explicit
/// transaction.
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "event_id, title, description, location, postal_code, category, \
     scheduled_at, external_link, owner_name, owner_email, owner_image_url, created_at, \
     interested, version";

#[derive(FromRow)]
struct EventRow {
    event_id: Uuid,
    title: String,
    description: String,
    location: String,
    postal_code: String,
    category: String,
    scheduled_at: Option<DateTime<Utc>>,
    external_link: String,
    owner_name: String,
    owner_email: String,
    owner_image_url: String,
    created_at: DateTime<Utc>,
    interested: serde_json::Value,
    version: i64,
}

impl EventRow {
    fn into_versioned(self) -> Result<Versioned<Event>, StoreError> {
        let category = Category::parse(&self.category).ok_or_else(|| {
            StoreError::Unavailable(format!("corrupt row: unknown category '{}'", self.category))
        })?;
        let interested: Vec<Participant> = serde_json::from_value(self.interested)
            .map_err(|e| StoreError::Unavailable(format!("corrupt row: {e}")))?;

        Ok(Versioned {
            record: Event {
                id: self.event_id,
                title: self.title,
                description: self.description,
                location: self.location,
                postal_code: self.postal_code,
                category,
                scheduled_at: self.scheduled_at,
                external_link: self.external_link,
                owner: Identity {
                    name: self.owner_name,
                    email: self.owner_email,
                    image_url: self.owner_image_url,
                },
                created_at: self.created_at,
                interested,
            },
            version: self.version,
        })
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn participants_json(event: &Event) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(&event.interested)
        .map_err(|e| StoreError::Unavailable(format!("encoding participants: {e}")))
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: &Event) -> Result<(), StoreError> {
        let interested = participants_json(event)?;
        let result = sqlx::query(
            "INSERT INTO events (event_id, title, description, location, postal_code, category, \
             scheduled_at, external_link, owner_name, owner_email, owner_image_url, created_at, \
             interested, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.postal_code)
        .bind(event.category.as_str())
        .bind(event.scheduled_at)
        .bind(&event.external_link)
        .bind(&event.owner.name)
        .bind(&event.owner.email)
        .bind(&event.owner.image_url)
        .bind(event.created_at)
        .bind(interested)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate)
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn find_by_event_id(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Versioned<Event>>, StoreError> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(EventRow::into_versioned).transpose()
    }

    async fn update_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
        event: &Event,
    ) -> Result<CasOutcome, StoreError> {
        let interested = participants_json(event)?;
        let result = sqlx::query(
            "UPDATE events SET title = $3, description = $4, location = $5, postal_code = $6, \
             category = $7, scheduled_at = $8, external_link = $9, interested = $10, \
             version = version + 1 \
             WHERE event_id = $1 AND version = $2",
        )
        .bind(event_id)
        .bind(expected_version)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.postal_code)
        .bind(event.category.as_str())
        .bind(event.scheduled_at)
        .bind(&event.external_link)
        .bind(interested)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 1 {
            Ok(CasOutcome::Committed)
        } else {
            Ok(CasOutcome::Conflict)
        }
    }

    async fn delete_if_version(
        &self,
        event_id: Uuid,
        expected_version: i64,
    ) -> Result<CasOutcome, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1 AND version = $2")
            .bind(event_id)
            .bind(expected_version)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 1 {
            Ok(CasOutcome::Committed)
        } else {
            Ok(CasOutcome::Conflict)
        }
    }

    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter()
            .map(|row| row.into_versioned().map(|v| v.record))
            .collect()
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Event>, StoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM events WHERE owner_email = $1 ORDER BY created_at DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter()
            .map(|row| row.into_versioned().map(|v| v.record))
            .collect()
    }
}
