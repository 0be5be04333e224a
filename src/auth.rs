use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims
///
/// Payload of a session token issued by the sign-in service. The signature and
/// `exp` are checked on every protected request; nothing here is trusted before that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the signed-in user's id.
    pub sub: Uuid,
    /// Raw role claim, e.g. "ADMIN" or "USER". Missing claims deserialize as empty.
    #[serde(default)]
    pub role: String,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

impl Claims {
    pub fn role(&self) -> Role {
        Role::from_claim(&self.role)
    }
}

/// Role
///
/// Authorization level asserted by a session's role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
    /// Any claim value that is not an exact, known role name.
    Unrecognized,
}

impl Role {
    /// Exact, case-sensitive match on the claim value.
    pub fn from_claim(raw: &str) -> Self {
        match raw {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            _ => Role::Unrecognized,
        }
    }
}

/// Reasons a request carries no usable session. All of them mean "unauthenticated".
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("no session token on request")]
    TokenMissing,
    #[error("session token expired")]
    TokenExpired,
    #[error("session token rejected: {0}")]
    TokenInvalid(String),
}

/// SessionVerifier
///
/// Reads and verifies the session token carried by a request. Implementations hold no
/// per-request state, so one instance is shared across all requests.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, headers: &HeaderMap) -> Result<Claims, AuthError>;
}

pub type VerifierState = Arc<dyn SessionVerifier>;

/// JwtSessionVerifier
///
/// HS256 verifier for tokens found in the session cookie or an `Authorization: Bearer` header.
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtSessionVerifier {
    pub fn new(secret: &str, cookie_name: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            cookie_name: cookie_name.to_string(),
        }
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = session_cookie(headers, &self.cookie_name)
            .or_else(|| bearer_token(headers))
            .ok_or(AuthError::TokenMissing)?;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }
}

/// Finds `name=value` across every `Cookie` header. Empty values count as absent.
fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Signs claims the way the sign-in service does. Used by tooling and tests.
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
