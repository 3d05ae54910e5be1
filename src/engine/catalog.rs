use crate::models::{Category, Event};

/// Stateless board filtering over an already-fetched listing.
///
/// The query is matched as a case-insensitive substring of `location` or
/// `postal_code`; the category, when given, must match exactly. An empty
/// query matches everything.
pub fn matches(event: &Event, search: &str, category: Option<Category>) -> bool {
    let text = search.to_lowercase();
    let location_match = event.location.to_lowercase().contains(&text);
    let postal_match = event.postal_code.to_lowercase().contains(&text);
    let category_match = category.map_or(true, |c| event.category == c);

    (location_match || postal_match) && category_match
}

pub fn filter(mut events: Vec<Event>, search: &str, category: Option<Category>) -> Vec<Event> {
    events.retain(|event| matches(event, search, category));
    events
}
