use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::Identity;
use crate::utils::error::AppError;

/// Headers the auth gateway sets after the OAuth handshake. The service
/// trusts these as the caller's identity; nothing in a request body is ever
/// treated as identity.
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_IMAGE_HEADER: &str = "x-user-image";

/// Extracts the authenticated caller, rejecting the request with 401 when
/// the gateway forwarded no identity.
pub struct AuthUser(pub Identity);

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(email) = header_value(parts, USER_EMAIL_HEADER) else {
            return Err(AppError::AuthError(
                "You must be logged in to do this".to_string(),
            ));
        };

        Ok(AuthUser(Identity {
            name: header_value(parts, USER_NAME_HEADER).unwrap_or_else(|| "Anonymous".to_string()),
            email,
            image_url: header_value(parts, USER_IMAGE_HEADER).unwrap_or_default(),
        }))
    }
}
