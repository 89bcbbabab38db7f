//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::application::ListUsersUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::{KeySource, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{MeResponse, UserResponse};
use crate::presentation::extractor::AuthUser;

/// Shared state for auth handlers and middleware
#[derive(Clone)]
pub struct AuthState<R, K>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    pub users: Arc<R>,
    pub keys: Arc<K>,
    pub config: Arc<AuthConfig>,
}

impl<R, K> AuthState<R, K>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    pub fn new(users: R, keys: K, config: AuthConfig) -> Self {
        Self {
            users: Arc::new(users),
            keys: Arc::new(keys),
            config: Arc::new(config),
        }
    }
}

/// GET /api/users
pub async fn list_users<R, K>(
    State(state): State<AuthState<R, K>>,
    AuthUser(_caller): AuthUser,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.users.clone()).execute().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/me
pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(user))
}
