//! Flashcard persistence

use kernel::id::{FlashcardId, SetId};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::PgStudyRepository;
use super::rows::{FLASHCARD_COLUMNS, FlashcardRow};
use crate::domain::entity::Flashcard;
use crate::domain::repository::FlashcardRepository;
use crate::domain::value_object::PublicId;
use crate::error::StudyResult;

pub(super) async fn insert_flashcard<'e, E>(executor: E, card: &Flashcard) -> StudyResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO flashcards
            (flashcard_id, public_id, set_id, term, solution, concept,
             difficulty, times_reviewed, last_reviewed_at, mastered, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(card.flashcard_id.as_uuid())
    .bind(card.public_id.as_str())
    .bind(card.set_id.as_uuid())
    .bind(card.term.as_str())
    .bind(card.solution.as_str())
    .bind(card.concept.as_str())
    .bind(card.difficulty)
    .bind(card.times_reviewed)
    .bind(card.last_reviewed_at)
    .bind(card.mastered)
    .bind(card.created_at)
    .bind(card.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub(super) async fn update_flashcard<'e, E>(executor: E, card: &Flashcard) -> StudyResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE flashcards SET
            term = $3,
            solution = $4,
            concept = $5,
            updated_at = $6
        WHERE flashcard_id = $1 AND set_id = $2
        "#,
    )
    .bind(card.flashcard_id.as_uuid())
    .bind(card.set_id.as_uuid())
    .bind(card.term.as_str())
    .bind(card.solution.as_str())
    .bind(card.concept.as_str())
    .bind(card.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Cards of one set, read inside a mind map write
pub(super) async fn flashcards_of_set<'e, E>(executor: E, set_id: SetId) -> StudyResult<Vec<Flashcard>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT {FLASHCARD_COLUMNS} FROM flashcards WHERE set_id = $1 ORDER BY created_at, flashcard_id"
    );
    let rows = sqlx::query_as::<_, FlashcardRow>(&sql)
        .bind(set_id.as_uuid())
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(FlashcardRow::into_flashcard).collect()
}

impl FlashcardRepository for PgStudyRepository {
    async fn list_flashcards(&self, set_id: SetId) -> StudyResult<Vec<Flashcard>> {
        flashcards_of_set(&self.pool, set_id).await
    }

    async fn list_flashcards_for_sets(&self, set_ids: &[SetId]) -> StudyResult<Vec<Flashcard>> {
        if set_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = set_ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!(
            "SELECT {FLASHCARD_COLUMNS} FROM flashcards WHERE set_id = ANY($1) \
             ORDER BY created_at, flashcard_id"
        );
        let rows = sqlx::query_as::<_, FlashcardRow>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(FlashcardRow::into_flashcard).collect()
    }

    async fn find_flashcard(
        &self,
        set_id: SetId,
        public_id: &PublicId,
    ) -> StudyResult<Option<Flashcard>> {
        let sql = format!(
            "SELECT {FLASHCARD_COLUMNS} FROM flashcards WHERE set_id = $1 AND public_id = $2"
        );
        let row = sqlx::query_as::<_, FlashcardRow>(&sql)
            .bind(set_id.as_uuid())
            .bind(public_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(FlashcardRow::into_flashcard).transpose()
    }

    async fn create_flashcard(&self, card: &Flashcard) -> StudyResult<()> {
        insert_flashcard(&self.pool, card).await
    }

    async fn update_flashcard(&self, card: &Flashcard) -> StudyResult<()> {
        update_flashcard(&self.pool, card).await
    }

    async fn delete_flashcard(&self, flashcard_id: FlashcardId) -> StudyResult<bool> {
        let result = sqlx::query("DELETE FROM flashcards WHERE flashcard_id = $1")
            .bind(flashcard_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
