//! Flashcard set persistence

use kernel::id::{SetId, UserId};

use super::PgStudyRepository;
use super::flashcards::{insert_flashcard, update_flashcard};
use super::rows::{SET_COLUMNS, SetRow};
use crate::domain::entity::{CardChange, Flashcard, FlashcardSet};
use crate::domain::repository::SetRepository;
use crate::domain::value_object::PublicId;
use crate::error::StudyResult;

impl SetRepository for PgStudyRepository {
    async fn create_set(&self, set: &FlashcardSet, cards: &[Flashcard]) -> StudyResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO flashcard_sets
                (set_id, public_id, title, user_id, is_public, last_studied_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(set.set_id.as_uuid())
        .bind(set.public_id.as_str())
        .bind(set.title.as_str())
        .bind(set.user_id.as_uuid())
        .bind(set.is_public)
        .bind(set.last_studied_at)
        .bind(set.created_at)
        .bind(set.updated_at)
        .execute(&mut *tx)
        .await?;

        for card in cards {
            insert_flashcard(&mut *tx, card).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_set(&self, public_id: &PublicId) -> StudyResult<Option<FlashcardSet>> {
        let sql = format!("SELECT {SET_COLUMNS} FROM flashcard_sets WHERE public_id = $1");
        let row = sqlx::query_as::<_, SetRow>(&sql)
            .bind(public_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(SetRow::into_set).transpose()
    }

    async fn list_sets_by_owner(&self, owner: UserId) -> StudyResult<Vec<FlashcardSet>> {
        let sql = format!(
            "SELECT {SET_COLUMNS} FROM flashcard_sets WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, SetRow>(&sql)
            .bind(owner.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SetRow::into_set).collect()
    }

    async fn apply_set_changes(
        &self,
        set: &FlashcardSet,
        changes: &[CardChange],
    ) -> StudyResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE flashcard_sets SET
                title = $2,
                is_public = $3,
                updated_at = $4
            WHERE set_id = $1
            "#,
        )
        .bind(set.set_id.as_uuid())
        .bind(set.title.as_str())
        .bind(set.is_public)
        .bind(set.updated_at)
        .execute(&mut *tx)
        .await?;

        for change in changes {
            match change {
                CardChange::Create(card) => insert_flashcard(&mut *tx, card).await?,
                CardChange::Update(card) => update_flashcard(&mut *tx, card).await?,
                CardChange::Delete(flashcard_id) => {
                    sqlx::query("DELETE FROM flashcards WHERE flashcard_id = $1 AND set_id = $2")
                        .bind(flashcard_id.as_uuid())
                        .bind(set.set_id.as_uuid())
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_set(&self, set_id: SetId) -> StudyResult<()> {
        sqlx::query("DELETE FROM flashcard_sets WHERE set_id = $1")
            .bind(set_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
