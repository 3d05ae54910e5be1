pub mod event;
pub mod identity;

pub use event::{Category, Event, EventPatch, NewEvent, Participant, NO_LINK};
pub use identity::Identity;
