//! Auth Middleware
//!
//! Resolves the request's token to a synced [`CurrentUser`] and stores it in
//! the request extensions.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_client_ip;
use platform::cookie::extract_cookie;
use platform::token::extract_bearer_token;

use crate::application::config::AuthConfig;
use crate::application::{SyncUserUseCase, VerifyTokenUseCase};
use crate::domain::repository::{KeySource, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::extractor::CurrentUser;
use crate::presentation::handlers::AuthState;

/// Bearer header first, then the configured cookie.
pub fn request_token(headers: &HeaderMap, config: &AuthConfig) -> Option<String> {
    extract_bearer_token(headers).or_else(|| {
        config
            .token_cookie_name
            .as_deref()
            .and_then(|name| extract_cookie(headers, name))
    })
}

async fn authenticate<R, K>(state: &AuthState<R, K>, token: Option<String>) -> AuthResult<CurrentUser>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    let token = token.ok_or(AuthError::MissingToken)?;

    let identity = VerifyTokenUseCase::new(state.keys.clone(), state.config.clone())
        .execute(&token)
        .await?;

    let user = SyncUserUseCase::new(state.users.clone())
        .execute(&identity)
        .await?;

    Ok(CurrentUser::from(user))
}

fn client_ip(req: &Request) -> Option<std::net::IpAddr> {
    let direct = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    extract_client_ip(req.headers(), direct)
}

/// Middleware that requires a valid token
pub async fn require_user<R, K>(
    State(state): State<AuthState<R, K>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    let token = request_token(req.headers(), &state.config);

    match authenticate(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            if !matches!(e, AuthError::MissingToken) {
                tracing::info!(client_ip = ?client_ip(&req), path = %req.uri().path(), "Authentication failed");
            }
            e.into_response()
        }
    }
}

/// Middleware that resolves the caller when possible. Missing, invalid and
/// expired tokens continue anonymously; provider or database failures do
/// not.
pub async fn optional_user<R, K>(
    State(state): State<AuthState<R, K>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    let token = request_token(req.headers(), &state.config);

    match authenticate(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
        }
        Err(AuthError::MissingToken) => {}
        Err(e) if e.is_credential_problem() => {
            tracing::debug!(
                error = %e,
                client_ip = ?client_ip(&req),
                "Ignoring unusable token on optional-auth route"
            );
        }
        Err(e) => return e.into_response(),
    }

    next.run(req).await
}
