//! Helpers for minting tokens and wiring auth services in tests.

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use serde_json::json;

use super::{
    Authenticator, PrincipalResolver,
    token_codec::{TokenCodec, VerificationKey},
};
use crate::repos::memory::MemoryStore;

pub const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

pub fn codec() -> TokenCodec {
    TokenCodec::new(&VerificationKey::HmacSecret(SECRET.as_bytes().to_vec()), 0).unwrap()
}

pub fn mint_with<T: Serialize>(claims: &T, secret: &[u8]) -> String {
    jsonwebtoken::encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
}

pub fn mint(subject: &str, exp: i64) -> String {
    mint_with(&json!({ "sub": subject, "exp": exp }), SECRET.as_bytes())
}

/// Token for `subject` that stays valid for the next hour.
pub fn bearer(subject: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    format!("Bearer {}", mint(subject, exp))
}

pub fn authenticator(store: Arc<MemoryStore>) -> Authenticator {
    Authenticator::new(codec(), PrincipalResolver::new(store))
}
