//! Request extractors for the authenticated caller
//!
//! The auth middleware stores a [`CurrentUser`] in the request extensions.
//! [`AuthUser`] demands one, [`Viewer`] accepts anonymous callers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;

/// The synced local user behind the request's token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub nickname: String,
    pub auth0_id: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            nickname: user.nickname.as_str().to_string(),
            auth0_id: user.auth0_id.as_str().to_string(),
        }
    }
}

/// Rejects with 401 when the request is anonymous
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthError::MissingToken)
    }
}

/// The caller if authenticated, `None` otherwise
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<CurrentUser>);

impl Viewer {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<CurrentUser>().cloned()))
    }
}
