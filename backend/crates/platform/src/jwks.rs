//! JWKS retrieval and caching
//!
//! Identity providers publish their signing keys at
//! `https://<domain>/.well-known/jwks.json`. Keys are cached by `kid` for a
//! TTL. A token signed with an unknown `kid` triggers a refetch (key
//! rotation), rate-limited by `min_refresh_interval` so forged `kid`s cannot
//! hammer the provider. Failed fetches count against the same interval.

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default cache lifetime for fetched keys.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;

/// Minimum spacing between refetches caused by unknown `kid`s.
pub const DEFAULT_MIN_REFRESH_SECONDS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("JWKS contains no usable signing keys")]
    NoKeys,

    #[error("No signing key for kid {0}")]
    UnknownKid(String),

    /// The last fetch failed less than `min_refresh_interval` ago
    #[error("JWKS fetch failed recently; retrying later")]
    Backoff,
}

#[derive(Default)]
struct CacheState {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
    /// Last fetch attempt, successful or not
    attempted_at: Option<Instant>,
    last_failed: bool,
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }

    fn may_refetch(&self, min_interval: Duration) -> bool {
        self.attempted_at.is_none_or(|at| at.elapsed() >= min_interval)
    }

    /// Answer from the cache without fetching
    fn cached(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        match self.keys.get(kid) {
            Some(key) => Ok(key.clone()),
            None if self.last_failed => Err(JwksError::Backoff),
            None => Err(JwksError::UnknownKid(kid.to_string())),
        }
    }
}

pub struct JwksCache {
    client: reqwest::Client,
    jwks_url: String,
    ttl: Duration,
    min_refresh_interval: Duration,
    state: RwLock<CacheState>,
}

impl JwksCache {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self::with_ttl(jwks_url, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    pub fn with_ttl(jwks_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            jwks_url: jwks_url.into(),
            ttl,
            min_refresh_interval: Duration::from_secs(DEFAULT_MIN_REFRESH_SECONDS),
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Look up the decoding key for `kid`, fetching the key set when the
    /// cache is stale or the key is unknown and no attempt was made within
    /// `min_refresh_interval`.
    pub async fn get(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let state = self.state.read().await;
            if self.answer_from_cache(&state, kid) {
                return state.cached(kid);
            }
        }

        let mut state = self.state.write().await;
        // Another task may have refreshed, or tried to, while we waited for
        // the lock.
        if self.answer_from_cache(&state, kid) {
            return state.cached(kid);
        }

        state.attempted_at = Some(Instant::now());
        let keys = match self.fetch().await {
            Ok(set) => decoding_keys(&set),
            Err(e) => {
                state.last_failed = true;
                tracing::warn!(url = %self.jwks_url, error = %e, "JWKS fetch failed");
                return Err(e);
            }
        };
        if keys.is_empty() {
            state.last_failed = true;
            return Err(JwksError::NoKeys);
        }
        tracing::debug!(url = %self.jwks_url, count = keys.len(), "JWKS refreshed");
        state.keys = keys;
        state.fetched_at = state.attempted_at;
        state.last_failed = false;

        state
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| JwksError::UnknownKid(kid.to_string()))
    }

    /// Stale keys keep serving until the next attempt is due.
    fn answer_from_cache(&self, state: &CacheState, kid: &str) -> bool {
        (state.is_fresh(self.ttl) && state.keys.contains_key(kid))
            || !state.may_refetch(self.min_refresh_interval)
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let set = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(set)
    }
}

/// Convert a JWK set into decoding keys keyed by `kid`.
///
/// Keys without a `kid` or with parameters `jsonwebtoken` cannot use are
/// skipped.
pub fn decoding_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    set.keys
        .iter()
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    tracing::warn!(kid = %kid, error = %e, "Skipping unusable JWK");
                    None
                }
            }
        })
        .collect()
}
