//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    nickname::Nickname, subject::ExternalSubject, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = "user_id, nickname, auth0_id, created_at, updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }
}

/// The nickname unique constraint surfaces as a conflict, not a 500.
fn map_nickname_conflict(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_nickname_key") {
            return AuthError::NicknameTaken;
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (user_id, nickname, auth0_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (auth0_id) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );
        let inserted = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.user_id.as_uuid())
            .bind(user.nickname.as_str())
            .bind(user.auth0_id.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_nickname_conflict)?;

        match inserted {
            Some(row) => Ok(row.into_user()),
            None => {
                tracing::debug!(subject = %user.auth0_id, "User created concurrently, reusing row");
                self.find_by_subject(&user.auth0_id)
                    .await?
                    .ok_or(AuthError::UserNotFound)
            }
        }
    }

    async fn find_by_subject(&self, subject: &ExternalSubject) -> AuthResult<Option<User>> {
        self.fetch_one_by("auth0_id", subject.as_str()).await
    }

    async fn find_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>> {
        self.fetch_one_by("nickname", nickname.as_str()).await
    }

    async fn update_nickname(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                nickname = $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.nickname.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_nickname_conflict)?;

        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY nickname");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    nickname: String,
    auth0_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            nickname: Nickname::from_db(self.nickname),
            auth0_id: ExternalSubject::from_db(self.auth0_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
