//! Unit tests for the auth crate

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use crate::application::config::AuthConfig;
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{nickname::Nickname, subject::ExternalSubject};
    use crate::error::{AuthError, AuthResult};

    pub const SECRET: &[u8] = b"test-secret-with-enough-entropy!";

    pub fn config() -> AuthConfig {
        AuthConfig::development()
    }

    pub fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    pub fn mint(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    pub fn token_for(sub: &str, nickname: Option<&str>) -> String {
        let cfg = config();
        let mut claims = serde_json::json!({
            "sub": sub,
            "iss": cfg.issuer,
            "aud": cfg.audience,
            "exp": now() + 3600,
        });
        if let Some(nickname) = nickname {
            claims["nickname"] = serde_json::Value::String(nickname.to_string());
        }
        mint(claims)
    }

    /// In-memory user store
    #[derive(Clone, Default)]
    pub struct MemoryUsers {
        pub users: Arc<Mutex<Vec<User>>>,
    }

    impl MemoryUsers {
        pub fn with(users: Vec<User>) -> Self {
            Self {
                users: Arc::new(Mutex::new(users)),
            }
        }

        pub fn snapshot(&self) -> Vec<User> {
            self.users.lock().unwrap().clone()
        }
    }

    impl UserRepository for MemoryUsers {
        async fn create(&self, user: &User) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            if let Some(existing) = users.iter().find(|u| u.auth0_id == user.auth0_id) {
                return Ok(existing.clone());
            }
            if users.iter().any(|u| u.nickname == user.nickname) {
                return Err(AuthError::NicknameTaken);
            }
            users.push(user.clone());
            Ok(user.clone())
        }

        async fn find_by_subject(&self, subject: &ExternalSubject) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.auth0_id == subject).cloned())
        }

        async fn find_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| &u.nickname == nickname).cloned())
        }

        async fn update_nickname(&self, user: &User) -> AuthResult<()> {
            let mut users = self.users.lock().unwrap();
            let stored = users
                .iter_mut()
                .find(|u| u.user_id == user.user_id)
                .ok_or(AuthError::UserNotFound)?;
            stored.nickname = user.nickname.clone();
            stored.updated_at = user.updated_at;
            Ok(())
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            let mut users = self.snapshot();
            users.sort_by(|a, b| a.nickname.as_str().cmp(b.nickname.as_str()));
            Ok(users)
        }
    }

    pub fn user(nickname: &str, sub: &str) -> User {
        User::new(
            Nickname::new(nickname).unwrap(),
            ExternalSubject::new(sub).unwrap(),
        )
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::AuthConfig;

    #[test]
    fn test_for_domain_normalizes_host() {
        for domain in [
            "tenant.eu.auth0.com",
            "https://tenant.eu.auth0.com",
            "https://tenant.eu.auth0.com/",
        ] {
            let config = AuthConfig::for_domain(domain, "https://api.example.com");
            assert_eq!(config.issuer, "https://tenant.eu.auth0.com/");
            assert_eq!(
                config.jwks_url,
                "https://tenant.eu.auth0.com/.well-known/jwks.json"
            );
            assert_eq!(config.audience, "https://api.example.com");
        }
    }

    #[test]
    fn test_builders() {
        let config = AuthConfig::default()
            .with_nickname_claim("https://example.com/nickname")
            .with_token_cookie(Some(String::new()));
        assert_eq!(config.nickname_claim, "https://example.com/nickname");
        assert_eq!(config.token_cookie_name, None);
        assert_eq!(AuthConfig::default().token_cookie_name.as_deref(), Some("auth_token"));
    }
}

#[cfg(test)]
mod verify_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::VerifyTokenUseCase;
    use crate::error::AuthError;
    use crate::infra::StaticKeySource;

    fn verifier() -> VerifyTokenUseCase<StaticKeySource> {
        VerifyTokenUseCase::new(
            Arc::new(StaticKeySource::from_secret(SECRET)),
            Arc::new(config()),
        )
    }

    #[tokio::test]
    async fn test_valid_token() {
        let identity = verifier()
            .execute(&token_for("auth0|ada", Some("ada")))
            .await
            .unwrap();

        assert_eq!(identity.subject.as_str(), "auth0|ada");
        assert_eq!(identity.nickname.unwrap().as_str(), "ada");
    }

    #[tokio::test]
    async fn test_configured_claim_wins_over_plain_nickname() {
        let mut cfg = config();
        cfg.nickname_claim = "https://example.com/nickname".to_string();
        let verifier =
            VerifyTokenUseCase::new(Arc::new(StaticKeySource::from_secret(SECRET)), Arc::new(cfg));

        let token = mint(serde_json::json!({
            "sub": "auth0|ada",
            "iss": config().issuer,
            "aud": config().audience,
            "exp": now() + 600,
            "nickname": "plain",
            "https://example.com/nickname": "namespaced",
        }));

        let identity = verifier.execute(&token).await.unwrap();
        assert_eq!(identity.nickname.unwrap().as_str(), "namespaced");
    }

    #[tokio::test]
    async fn test_missing_nickname_claim_is_none() {
        let identity = verifier()
            .execute(&token_for("auth0|anon", None))
            .await
            .unwrap();
        assert!(identity.nickname.is_none());
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = mint(serde_json::json!({
            "sub": "auth0|ada",
            "iss": config().issuer,
            "aud": config().audience,
            "exp": now() - 3600,
        }));

        let err = verifier().execute(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_wrong_audience_and_issuer() {
        let wrong_aud = mint(serde_json::json!({
            "sub": "auth0|ada",
            "iss": config().issuer,
            "aud": "someone-else",
            "exp": now() + 600,
        }));
        let wrong_iss = mint(serde_json::json!({
            "sub": "auth0|ada",
            "iss": "https://evil.example/",
            "aud": config().audience,
            "exp": now() + 600,
        }));

        for token in [wrong_aud, wrong_iss] {
            let err = verifier().execute(&token).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidToken(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_bad_signature_missing_sub_and_garbage() {
        let other_key = VerifyTokenUseCase::new(
            Arc::new(StaticKeySource::from_secret(b"another-secret")),
            Arc::new(config()),
        );
        let err = other_key
            .execute(&token_for("auth0|ada", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));

        let no_sub = mint(serde_json::json!({
            "iss": config().issuer,
            "aud": config().audience,
            "exp": now() + 600,
        }));
        assert!(matches!(
            verifier().execute(&no_sub).await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));

        assert!(matches!(
            verifier().execute("not-a-jwt").await.unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }
}

#[cfg(test)]
mod sync_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::SyncUserUseCase;
    use crate::domain::entity::identity::VerifiedIdentity;
    use crate::domain::value_object::{nickname::Nickname, subject::ExternalSubject};
    use crate::error::AuthError;

    fn identity(sub: &str, nickname: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject: ExternalSubject::new(sub).unwrap(),
            nickname: nickname.and_then(Nickname::from_claim),
        }
    }

    #[tokio::test]
    async fn test_creates_user_on_first_sight() {
        let repo = MemoryUsers::default();
        let use_case = SyncUserUseCase::new(Arc::new(repo.clone()));

        let user = use_case.execute(&identity("auth0|1", Some("ada"))).await.unwrap();
        assert_eq!(user.nickname.as_str(), "ada");

        let again = use_case.execute(&identity("auth0|1", Some("ada"))).await.unwrap();
        assert_eq!(again.user_id, user.user_id);
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_new_user_without_nickname_uses_subject() {
        let repo = MemoryUsers::default();
        let user = SyncUserUseCase::new(Arc::new(repo))
            .execute(&identity("auth0|7", None))
            .await
            .unwrap();
        assert_eq!(user.nickname.as_str(), "auth0|7");
    }

    #[tokio::test]
    async fn test_reconciles_changed_nickname() {
        let existing = user("ada", "auth0|1");
        let repo = MemoryUsers::with(vec![existing.clone()]);
        let use_case = SyncUserUseCase::new(Arc::new(repo.clone()));

        let synced = use_case
            .execute(&identity("auth0|1", Some("lovelace")))
            .await
            .unwrap();
        assert_eq!(synced.user_id, existing.user_id);
        assert_eq!(repo.snapshot()[0].nickname.as_str(), "lovelace");

        // A token without the claim leaves the stored nickname alone.
        let synced = use_case.execute(&identity("auth0|1", None)).await.unwrap();
        assert_eq!(synced.nickname.as_str(), "lovelace");
    }

    #[tokio::test]
    async fn test_nickname_owned_by_someone_else() {
        let repo = MemoryUsers::with(vec![user("ada", "auth0|1"), user("bob", "auth0|2")]);
        let use_case = SyncUserUseCase::new(Arc::new(repo.clone()));

        let err = use_case
            .execute(&identity("auth0|2", Some("ada")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NicknameTaken));

        let err = use_case
            .execute(&identity("auth0|3", Some("bob")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NicknameTaken));
        assert_eq!(repo.snapshot().len(), 2);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::AuthError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken("bad".into()), StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (
                AuthError::KeyUnavailable("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AuthError::InvalidNickname("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::NicknameTaken, StatusCode::CONFLICT),
            (AuthError::UserNotFound, StatusCode::NOT_FOUND),
            (
                AuthError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error:?}");
            assert_eq!(error.kind().status_code(), expected.as_u16());
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_credential_problems() {
        assert!(AuthError::MissingToken.is_credential_problem());
        assert!(AuthError::TokenExpired.is_credential_problem());
        assert!(!AuthError::KeyUnavailable("x".into()).is_credential_problem());
        assert!(!AuthError::NicknameTaken.is_credential_problem());
    }

    #[test]
    fn test_token_details_are_not_exposed() {
        let app = AuthError::InvalidToken("InvalidSignature at kid=abc".into()).to_app_error();
        assert_eq!(app.message(), "Invalid token");
    }

    #[test]
    fn test_unknown_kid_is_invalid_token() {
        let err: AuthError = platform::jwks::JwksError::UnknownKid("k9".into()).into();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        let err: AuthError = platform::jwks::JwksError::NoKeys.into();
        assert!(matches!(err, AuthError::KeyUnavailable(_)));
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::support::*;
    use crate::infra::StaticKeySource;
    use crate::presentation::{AuthState, user_router_generic};

    fn app(repo: MemoryUsers) -> axum::Router {
        user_router_generic(AuthState::new(
            repo,
            StaticKeySource::from_secret(SECRET),
            config(),
        ))
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_me_with_bearer_token_syncs_user() {
        let repo = MemoryUsers::default();
        let response = app(repo.clone())
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(
                        header::AUTHORIZATION,
                        format!("Bearer {}", token_for("auth0|ada", Some("ada"))),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["nickname"], "ada");
        assert_eq!(body["auth0Id"], "auth0|ada");
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_me_with_cookie_token() {
        let response = app(MemoryUsers::default())
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(
                        header::COOKIE,
                        format!("auth_token={}", token_for("auth0|bob", Some("bob"))),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_requires_token() {
        let response = app(MemoryUsers::default())
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json(response).await;
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_list_users_sorted() {
        let repo = MemoryUsers::with(vec![user("zoe", "auth0|z"), user("amy", "auth0|a")]);
        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(
                        header::AUTHORIZATION,
                        format!("Bearer {}", token_for("auth0|a", Some("amy"))),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["nickname"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["amy", "zoe"]);
    }
}
