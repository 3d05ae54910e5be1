use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identity::Identity;

/// Sentinel stored in `external_link` when the creator supplied no link.
pub const NO_LINK: &str = "Not provided";

/// Closed set of event categories. Anything outside this list is rejected at
/// the boundary as a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fitness,
    Yoga,
    Trekking,
    Sports,
    Dance,
    Music,
    Gaming,
    Comedy,
    Art,
    Food,
    Tech,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fitness => "fitness",
            Category::Yoga => "yoga",
            Category::Trekking => "trekking",
            Category::Sports => "sports",
            Category::Dance => "dance",
            Category::Music => "music",
            Category::Gaming => "gaming",
            Category::Comedy => "comedy",
            Category::Art => "art",
            Category::Food => "food",
            Category::Tech => "tech",
            Category::Others => "others",
        }
    }

    /// Case-insensitive parse, `None` for anything outside the enumeration.
    pub fn parse(value: &str) -> Option<Category> {
        match value.to_ascii_lowercase().as_str() {
            "fitness" => Some(Category::Fitness),
            "yoga" => Some(Category::Yoga),
            "trekking" => Some(Category::Trekking),
            "sports" => Some(Category::Sports),
            "dance" => Some(Category::Dance),
            "music" => Some(Category::Music),
            "gaming" => Some(Category::Gaming),
            "comedy" => Some(Category::Comedy),
            "art" => Some(Category::Art),
            "food" => Some(Category::Food),
            "tech" => Some(Category::Tech),
            "others" => Some(Category::Others),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user who registered interest in an event. `email` is the dedup key
/// within one event; `joined_at` is stamped by the engine and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn joining(identity: Identity, joined_at: DateTime<Utc>) -> Self {
        Self {
            name: identity.name,
            email: identity.email,
            image_url: identity.image_url,
            joined_at,
        }
    }
}

/// A posted event.
///
/// `id` is the client-visible identifier (distinct from any storage key) and
/// is immutable, as are `owner` and `created_at`. `interested` keeps
/// insertion order: first come, first shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub postal_code: String,
    pub category: Category,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub external_link: String,
    pub owner: Identity,
    pub created_at: DateTime<Utc>,
    pub interested: Vec<Participant>,
}

impl Event {
    /// The external link, with the stored sentinel read back as "no link".
    pub fn link(&self) -> Option<&str> {
        if self.external_link == NO_LINK {
            None
        } else {
            Some(&self.external_link)
        }
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner.email == email
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.interested.iter().any(|p| p.email == email)
    }

    /// Applies the mutable attributes of `patch`. `id`, `owner`,
    /// `created_at` and `interested` are not reachable from a patch.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(postal_code) = &patch.postal_code {
            self.postal_code = postal_code.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            self.scheduled_at = Some(scheduled_at);
        }
        if let Some(link) = &patch.external_link {
            self.external_link = normalize_link(Some(link.clone()));
        }
    }
}

/// Creation payload. `id`, `created_at` and the owner snapshot are assigned
/// server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub postal_code: String,
    pub category: Category,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_link: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title must not be blank");
        }
        if self.description.trim().is_empty() {
            return Err("description must not be blank");
        }
        if self.location.trim().is_empty() {
            return Err("location must not be blank");
        }
        if self.postal_code.trim().is_empty() {
            return Err("postal code must not be blank");
        }
        Ok(())
    }
}

/// Edit payload. Only the mutable attributes exist here; unknown keys in the
/// incoming JSON (including `id`, `owner`, `createdAt`, `interested`) are
/// dropped on deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub postal_code: Option<String>,
    pub category: Option<Category>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub external_link: Option<String>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), &'static str> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err("title must not be blank");
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err("description must not be blank");
        }
        if matches!(&self.location, Some(l) if l.trim().is_empty()) {
            return Err("location must not be blank");
        }
        if matches!(&self.postal_code, Some(p) if p.trim().is_empty()) {
            return Err("postal code must not be blank");
        }
        Ok(())
    }
}

/// Blank or absent links collapse to the stored sentinel.
pub fn normalize_link(link: Option<String>) -> String {
    match link {
        Some(l) if !l.trim().is_empty() => l,
        _ => NO_LINK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Identity {
        Identity {
            name: "Test User".to_string(),
            email: email.to_string(),
            image_url: String::new(),
        }
    }

    fn sample_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Morning run".to_string(),
            description: "Easy 5k around the lake".to_string(),
            location: "Berlin".to_string(),
            postal_code: "10115".to_string(),
            category: Category::Fitness,
            scheduled_at: None,
            external_link: NO_LINK.to_string(),
            owner: identity("owner@example.com"),
            created_at: Utc::now(),
            interested: vec![],
        }
    }

    #[test]
    fn category_parse_is_case_insensitive_and_closed() {
        assert_eq!(Category::parse("Fitness"), Some(Category::Fitness));
        assert_eq!(Category::parse("TECH"), Some(Category::Tech));
        assert_eq!(Category::parse("chess"), None);
    }

    #[test]
    fn category_serde_round_trips_lowercase() {
        let json = serde_json::to_string(&Category::Gaming).unwrap();
        assert_eq!(json, "\"gaming\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Gaming);
        assert!(serde_json::from_str::<Category>("\"chess\"").is_err());
    }

    #[test]
    fn blank_link_stores_sentinel_and_reads_back_as_none() {
        assert_eq!(normalize_link(None), NO_LINK);
        assert_eq!(normalize_link(Some("  ".to_string())), NO_LINK);
        assert_eq!(
            normalize_link(Some("https://t.me/run".to_string())),
            "https://t.me/run"
        );

        let mut event = sample_event();
        assert_eq!(event.link(), None);
        event.external_link = "https://t.me/run".to_string();
        assert_eq!(event.link(), Some("https://t.me/run"));
    }

    #[test]
    fn patch_json_cannot_reach_immutable_fields() {
        // A stale or hostile client may echo the whole record back.
        let raw = r#"{
            "id": "6a72a3a5-5a39-4e4f-9f37-3c3f89c66ec8",
            "owner": {"name": "Mallory", "email": "m@x.com", "image_url": ""},
            "createdAt": "2020-01-01T00:00:00Z",
            "interested": [{"name": "x", "email": "x@x.com", "image_url": "", "joined_at": "2020-01-01T00:00:00Z"}],
            "title": "New title"
        }"#;
        let patch: EventPatch = serde_json::from_str(raw).unwrap();

        let mut event = sample_event();
        let before = event.clone();
        event.apply_patch(&patch);

        assert_eq!(event.title, "New title");
        assert_eq!(event.id, before.id);
        assert_eq!(event.owner, before.owner);
        assert_eq!(event.created_at, before.created_at);
        assert_eq!(event.interested, before.interested);
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut event = sample_event();
        let before = event.clone();
        event.apply_patch(&EventPatch {
            location: Some("Hamburg".to_string()),
            category: Some(Category::Yoga),
            ..EventPatch::default()
        });
        assert_eq!(event.location, "Hamburg");
        assert_eq!(event.category, Category::Yoga);
        assert_eq!(event.title, before.title);
        assert_eq!(event.scheduled_at, before.scheduled_at);
    }

    #[test]
    fn blank_fields_fail_validation() {
        let new = NewEvent {
            title: "  ".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            postal_code: "p".to_string(),
            category: Category::Others,
            scheduled_at: None,
            external_link: None,
        };
        assert!(new.validate().is_err());

        let patch = EventPatch {
            location: Some("".to_string()),
            ..EventPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(EventPatch::default().validate().is_ok());
    }

    #[test]
    fn participant_lookup_matches_exact_email() {
        let mut event = sample_event();
        event
            .interested
            .push(Participant::joining(identity("bob@example.com"), Utc::now()));
        assert!(event.has_participant("bob@example.com"));
        assert!(!event.has_participant("alice@example.com"));
    }
}
