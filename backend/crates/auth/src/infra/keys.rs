//! Signing key sources
//!
//! Production verifies RS256 tokens against the provider's JWKS. Local
//! development and tests use a shared HS256 secret.

use jsonwebtoken::{Algorithm, DecodingKey};
use platform::jwks::JwksCache;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::KeySource;
use crate::error::{AuthError, AuthResult};

/// RS256 keys from the identity provider's JWKS endpoint
#[derive(Clone)]
pub struct JwksKeySource {
    cache: Arc<JwksCache>,
}

impl JwksKeySource {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            cache: Arc::new(JwksCache::with_ttl(
                config.jwks_url.clone(),
                config.jwks_cache_ttl,
            )),
        }
    }
}

impl KeySource for JwksKeySource {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RS256
    }

    async fn decoding_key(&self, kid: Option<&str>) -> AuthResult<DecodingKey> {
        let kid = kid.ok_or_else(|| AuthError::InvalidToken("token header has no kid".into()))?;
        Ok(self.cache.get(kid).await?)
    }
}

/// HS256 shared secret; `kid` is ignored
#[derive(Clone)]
pub struct StaticKeySource {
    key: DecodingKey,
}

impl StaticKeySource {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
        }
    }
}

impl KeySource for StaticKeySource {
    fn algorithm(&self) -> Algorithm {
        Algorithm::HS256
    }

    async fn decoding_key(&self, _kid: Option<&str>) -> AuthResult<DecodingKey> {
        Ok(self.key.clone())
    }
}

/// Key source selected at startup
#[derive(Clone)]
pub enum IdentityKeys {
    Jwks(JwksKeySource),
    Static(StaticKeySource),
}

impl KeySource for IdentityKeys {
    fn algorithm(&self) -> Algorithm {
        match self {
            IdentityKeys::Jwks(keys) => keys.algorithm(),
            IdentityKeys::Static(keys) => keys.algorithm(),
        }
    }

    async fn decoding_key(&self, kid: Option<&str>) -> AuthResult<DecodingKey> {
        match self {
            IdentityKeys::Jwks(keys) => keys.decoding_key(kid).await,
            IdentityKeys::Static(keys) => keys.decoding_key(kid).await,
        }
    }
}
