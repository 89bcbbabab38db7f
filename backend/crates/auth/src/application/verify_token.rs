//! Verify Token Use Case
//!
//! Validates an identity-provider JWT and extracts the caller's identity.

use std::sync::Arc;

use jsonwebtoken::{Validation, decode, decode_header};
use serde::Deserialize;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::VerifiedIdentity;
use crate::domain::repository::KeySource;
use crate::domain::value_object::{nickname::Nickname, subject::ExternalSubject};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

pub struct VerifyTokenUseCase<K>
where
    K: KeySource + Send + Sync + 'static,
{
    keys: Arc<K>,
    config: Arc<AuthConfig>,
}

impl<K> VerifyTokenUseCase<K>
where
    K: KeySource + Send + Sync + 'static,
{
    pub fn new(keys: Arc<K>, config: Arc<AuthConfig>) -> Self {
        Self { keys, config }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<VerifiedIdentity> {
        let header = decode_header(token)?;

        let algorithm = self.keys.algorithm();
        if header.alg != algorithm {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let key = self.keys.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = self.config.leeway_secs;

        let claims = decode::<Claims>(token, &key, &validation)?.claims;

        let subject = ExternalSubject::new(&claims.sub)?;
        let nickname = self.nickname_from(&claims);

        Ok(VerifiedIdentity { subject, nickname })
    }

    /// The configured claim first, then the plain `nickname` claim.
    fn nickname_from(&self, claims: &Claims) -> Option<Nickname> {
        [self.config.nickname_claim.as_str(), "nickname"]
            .into_iter()
            .filter_map(|name| claims.extra.get(name))
            .filter_map(|value| value.as_str())
            .find_map(Nickname::from_claim)
    }
}
