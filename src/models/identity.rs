use serde::{Deserialize, Serialize};

/// Identity snapshot supplied by the auth gateway for the current session.
///
/// Events and participants embed a copy taken at write time; later profile
/// changes do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub image_url: String,
}
