//! Bearer-token authentication
//!
//! Protected routes run `auth_middleware`, which verifies the HS256 JWT and stores the
//! resulting `AuthenticatedActor` in request extensions for handlers to extract.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{AuthenticatedActor, JwtClaims};
