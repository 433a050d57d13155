//! Bearer-token verification for WebSocket handshakes.
//!
//! The hub never authenticates anything itself; it consumes this collaborator
//! to resolve a presented token to a user identity before any registration
//! happens. The production implementation validates HS256 JWTs issued by the
//! auth service.

use crate::config::Config;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt;

pub type UserId = String;

/// Top-level auth error type, holding a kind plus the originating error.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token is malformed, has a bad signature, or carries bad claims.
    InvalidToken,
    /// The token was valid once but its expiry has passed.
    ExpiredToken,
    /// The server has no signing secret configured; verification can never
    /// succeed.
    MissingSecret,
    Other,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { source: None, kind }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Auth Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let kind = match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ErrorKind::ExpiredToken,
            _ => ErrorKind::InvalidToken,
        };

        Error {
            source: Some(Box::new(err)),
            kind,
        }
    }
}

/// The external token-verification collaborator: resolves a bearer token to
/// a user identity or fails before any connection is created.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserId, Error>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    /// The authenticated user's id.
    sub: String,
    #[allow(dead_code)]
    exp: u64,
}

/// Verifies HS256 JWTs signed with the shared secret from [`Config`].
#[derive(Debug)]
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let secret = config
            .token_signing_secret()
            .ok_or_else(|| Error::new(ErrorKind::MissingSecret))?;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims.sub)
    }
}
