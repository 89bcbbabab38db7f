//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::jwks::DEFAULT_CACHE_TTL_SECONDS;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://tenant.eu.auth0.com/`
    pub issuer: String,
    /// Expected `aud` claim (the API identifier)
    pub audience: String,
    /// Where the provider publishes its signing keys
    pub jwks_url: String,
    /// Claim holding the display nickname. Auth0 puts custom claims under a
    /// namespaced key such as `https://example.com/nickname`.
    pub nickname_claim: String,
    /// Cookie checked when no `Authorization` header is present
    pub token_cookie_name: Option<String>,
    /// Clock skew tolerated on `exp`/`nbf`
    pub leeway_secs: u64,
    pub jwks_cache_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            jwks_url: String::new(),
            nickname_claim: "nickname".to_string(),
            token_cookie_name: Some("auth_token".to_string()),
            leeway_secs: 60,
            jwks_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
        }
    }
}

impl AuthConfig {
    /// Config for an Auth0 tenant. Accepts `tenant.auth0.com`,
    /// `https://tenant.auth0.com` or `https://tenant.auth0.com/`.
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Self {
        let host = domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        Self {
            issuer: format!("https://{host}/"),
            audience: audience.into(),
            jwks_url: format!("https://{host}/.well-known/jwks.json"),
            ..Default::default()
        }
    }

    /// Local development: tokens are HS256-signed with a shared secret by a
    /// dev tool, so no JWKS endpoint is involved.
    pub fn development() -> Self {
        Self {
            issuer: "http://localhost/".to_string(),
            audience: "flashcards-dev".to_string(),
            ..Default::default()
        }
    }

    pub fn with_nickname_claim(mut self, claim: impl Into<String>) -> Self {
        self.nickname_claim = claim.into();
        self
    }

    pub fn with_token_cookie(mut self, name: Option<String>) -> Self {
        self.token_cookie_name = name.filter(|n| !n.is_empty());
        self
    }
}
