//! Lazy public id assignment
//!
//! Rows written before public ids existed get one the first time they are
//! listed. Each id is generated here so it follows the same format as new
//! rows.

use uuid::Uuid;

use super::PgStudyRepository;
use crate::domain::repository::{BackfillScope, PublicIdBackfill};
use crate::domain::value_object::PublicId;
use crate::error::StudyResult;

struct Target {
    table: &'static str,
    key: &'static str,
    select_missing: &'static str,
}

/// Sets of the user, cards in those sets and the user's mind maps
const OWNER_TARGETS: &[Target] = &[
    Target {
        table: "flashcard_sets",
        key: "set_id",
        select_missing: "SELECT set_id FROM flashcard_sets \
             WHERE user_id = $1 AND public_id IS NULL",
    },
    Target {
        table: "flashcards",
        key: "flashcard_id",
        select_missing: "SELECT f.flashcard_id FROM flashcards f \
             JOIN flashcard_sets s ON s.set_id = f.set_id \
             WHERE s.user_id = $1 AND f.public_id IS NULL",
    },
    Target {
        table: "mind_maps",
        key: "mind_map_id",
        select_missing: "SELECT mind_map_id FROM mind_maps \
             WHERE user_id = $1 AND public_id IS NULL",
    },
];

/// Cards and mind maps of one set
const SET_TARGETS: &[Target] = &[
    Target {
        table: "flashcards",
        key: "flashcard_id",
        select_missing: "SELECT flashcard_id FROM flashcards \
             WHERE set_id = $1 AND public_id IS NULL",
    },
    Target {
        table: "mind_maps",
        key: "mind_map_id",
        select_missing: "SELECT mind_map_id FROM mind_maps \
             WHERE set_id = $1 AND public_id IS NULL",
    },
];

impl PgStudyRepository {
    async fn backfill(&self, target: &Target, scope_id: Uuid) -> StudyResult<u64> {
        let missing: Vec<Uuid> = sqlx::query_scalar(target.select_missing)
            .bind(scope_id)
            .fetch_all(&self.pool)
            .await?;
        if missing.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "UPDATE {} SET public_id = $2 WHERE {} = $1 AND public_id IS NULL",
            target.table, target.key
        );
        let mut updated = 0;
        for id in missing {
            // A concurrent request may have filled the row already.
            updated += sqlx::query(&sql)
                .bind(id)
                .bind(PublicId::new().to_string())
                .execute(&self.pool)
                .await?
                .rows_affected();
        }

        tracing::debug!(table = target.table, rows = updated, "Public ids backfilled");
        Ok(updated)
    }
}

impl PublicIdBackfill for PgStudyRepository {
    async fn backfill_public_ids(&self, scope: BackfillScope) -> StudyResult<u64> {
        let (targets, scope_id) = match scope {
            BackfillScope::Owner(user_id) => (OWNER_TARGETS, user_id.into_uuid()),
            BackfillScope::Set(set_id) => (SET_TARGETS, set_id.into_uuid()),
        };

        let mut total = 0;
        for target in targets {
            total += self.backfill(target, scope_id).await?;
        }
        Ok(total)
    }
}
