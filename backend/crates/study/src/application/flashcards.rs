//! Flashcard Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::lookup::{backfill_set, load_flashcard, load_set};
use crate::application::sets::CardInput;
use crate::domain::entity::{CardPatch, Flashcard};
use crate::domain::repository::StudyStore;
use crate::domain::service::access::{ensure_set_owner, ensure_set_visible};
use crate::domain::value_object::{Concept, Solution, Term};
use crate::error::{StudyError, StudyResult};

/// Partial card edit; absent fields stay as they are
#[derive(Debug, Clone, Default)]
pub struct CardPatchInput {
    pub term: Option<String>,
    pub solution: Option<String>,
    pub concept: Option<String>,
}

impl CardPatchInput {
    fn validate(&self) -> StudyResult<CardPatch> {
        Ok(CardPatch {
            term: self.term.as_deref().map(Term::new).transpose()?,
            solution: self.solution.as_deref().map(Solution::new).transpose()?,
            concept: self.concept.as_deref().map(Concept::new).transpose()?,
        })
    }
}

/// Flashcard Use Case
pub struct FlashcardUseCase<S>
where
    S: StudyStore,
{
    store: Arc<S>,
}

impl<S> FlashcardUseCase<S>
where
    S: StudyStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        set_public_id: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<Vec<Flashcard>> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_visible(&set, viewer)?;

        backfill_set(&*self.store, &set).await?;

        self.store.list_flashcards(set.set_id).await
    }

    pub async fn get(
        &self,
        set_public_id: &str,
        card_public_id: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<Flashcard> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_visible(&set, viewer)?;
        load_flashcard(&*self.store, set.set_id, card_public_id).await
    }

    pub async fn create(
        &self,
        set_public_id: &str,
        user_id: UserId,
        input: CardInput,
    ) -> StudyResult<Flashcard> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;

        let card = Flashcard::new(set.set_id, input.validate()?);
        self.store.create_flashcard(&card).await?;

        tracing::info!(set = %set.public_id, card = %card.public_id, "Flashcard created");
        Ok(card)
    }

    pub async fn update(
        &self,
        set_public_id: &str,
        card_public_id: &str,
        user_id: UserId,
        input: CardPatchInput,
    ) -> StudyResult<Flashcard> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;
        let mut card = load_flashcard(&*self.store, set.set_id, card_public_id).await?;

        if card.edit(input.validate()?) {
            self.store.update_flashcard(&card).await?;
            tracing::info!(set = %set.public_id, card = %card.public_id, "Flashcard updated");
        }
        Ok(card)
    }

    pub async fn delete(
        &self,
        set_public_id: &str,
        card_public_id: &str,
        user_id: UserId,
    ) -> StudyResult<()> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;
        let card = load_flashcard(&*self.store, set.set_id, card_public_id).await?;

        if !self.store.delete_flashcard(card.flashcard_id).await? {
            return Err(StudyError::FlashcardNotFound);
        }

        tracing::info!(set = %set.public_id, card = %card.public_id, "Flashcard deleted");
        Ok(())
    }
}
