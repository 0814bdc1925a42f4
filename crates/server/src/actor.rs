use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::errors::JsonApiError;

pub const ACTOR_HEADER: &str = "x-user-id";

/// Acting user taken from `X-User-Id`. Identity propagation only, nothing is verified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actor(pub Option<Uuid>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Actor(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| JsonApiError::bad_request("X-User-Id must be ASCII"))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| JsonApiError::bad_request("X-User-Id must be a UUID"))?;
        Ok(Actor(Some(id)))
    }
}
