//! PostgreSQL Repository Implementations
//!
//! One pool-backed store implements every study repository trait. Writes
//! touching more than one row run in a single transaction.

mod backfill;
mod flashcards;
mod mind_maps;
mod rows;
mod scores;
mod sets;

use sqlx::PgPool;

use crate::domain::repository::UserDirectory;
use crate::error::{StudyError, StudyResult};
use kernel::id::UserId;
use uuid::Uuid;

/// PostgreSQL-backed study repository
#[derive(Clone)]
pub struct PgStudyRepository {
    pool: PgPool,
}

impl PgStudyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The mind map title unique index surfaces as a conflict, not a 500.
pub(crate) fn map_title_conflict(err: sqlx::Error) -> StudyError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some("mind_maps_set_user_title_key")
        {
            return StudyError::DuplicateTitle;
        }
    }
    StudyError::Database(err)
}

impl UserDirectory for PgStudyRepository {
    async fn find_user_id_by_nickname(&self, nickname: &str) -> StudyResult<Option<UserId>> {
        let user_id: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE nickname = $1")
                .bind(nickname)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user_id.map(UserId::from_uuid))
    }
}
