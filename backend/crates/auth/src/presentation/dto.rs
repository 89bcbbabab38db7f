//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entity::user::User;
use crate::presentation::extractor::CurrentUser;

/// Entry of `GET /api/users`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.to_string(),
            nickname: user.nickname.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

/// `GET /api/users/me`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub nickname: String,
    pub auth0_id: String,
}

impl From<CurrentUser> for MeResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            nickname: user.nickname,
            auth0_id: user.auth0_id,
        }
    }
}
