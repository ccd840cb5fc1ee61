use emotia_api::auth::JwtClaims;
use emotia_core::models::{Actor, Permission};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

/// HS256 secret the test state verifies against.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A principal and a bearer token for it.
pub struct TestUser {
    pub actor: Actor,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn sign(actor: &Actor) -> String {
    let claims = JwtClaims {
        sub: actor.id,
        name: actor.display_name.clone(),
        permissions: actor.permissions.clone(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("sign test token")
}

pub fn test_user(name: &str, permissions: Vec<Permission>) -> TestUser {
    let actor = Actor::new(Uuid::new_v4(), name, permissions);
    let token = sign(&actor);
    TestUser { actor, token }
}
