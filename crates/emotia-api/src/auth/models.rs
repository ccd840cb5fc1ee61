use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use emotia_core::models::{Actor, Permission};
use emotia_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user id
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub exp: i64,
}

impl JwtClaims {
    pub fn into_actor(self) -> Actor {
        Actor::new(self.sub, self.name, self.permissions)
    }
}

/// The verified principal, stored in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub Actor);

// Extracted from parts so it can be combined with Multipart
impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedActor>()
            .cloned()
            .ok_or_else(|| HttpAppError(AppError::Unauthorized("Login required".to_string())))
    }
}
