//! Flashcard Set Use Cases

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;

use crate::application::lookup::{backfill_set, load_set};
use crate::domain::entity::{CardChange, CardContent, CardPatch, Flashcard, FlashcardSet};
use crate::domain::repository::{BackfillScope, StudyStore};
use crate::domain::service::access::{ensure_set_owner, ensure_set_visible};
use crate::domain::value_object::Title;
use crate::error::{StudyError, StudyResult};

/// Text of a card as submitted
#[derive(Debug, Clone, Default)]
pub struct CardInput {
    pub term: String,
    pub solution: String,
    pub concept: Option<String>,
}

impl CardInput {
    pub(crate) fn validate(&self) -> StudyResult<CardContent> {
        CardContent::new(&self.term, &self.solution, self.concept.as_deref())
    }
}

/// One entry of the batch card edit sent with a set update
#[derive(Debug, Clone, Default)]
pub struct CardOperation {
    /// Public id of an existing card; absent for new cards
    pub id: Option<String>,
    pub card: CardInput,
    pub should_create: bool,
    pub should_update: bool,
    pub should_delete: bool,
}

pub struct CreateSetInput {
    pub title: String,
    pub is_public: bool,
    pub flashcards: Vec<CardInput>,
}

#[derive(Default)]
pub struct UpdateSetInput {
    pub title: Option<String>,
    pub is_public: Option<bool>,
    pub flashcards: Option<Vec<CardOperation>>,
}

/// A set with its cards, as seen by the caller
#[derive(Debug, Clone)]
pub struct SetDetails {
    pub set: FlashcardSet,
    pub flashcards: Vec<Flashcard>,
    pub is_owner: bool,
}

/// Flashcard Set Use Case
pub struct SetUseCase<S>
where
    S: StudyStore,
{
    store: Arc<S>,
}

impl<S> SetUseCase<S>
where
    S: StudyStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: UserId, input: CreateSetInput) -> StudyResult<SetDetails> {
        let title = Title::new(&input.title)?;
        let set = FlashcardSet::new(owner, title, input.is_public);

        let flashcards = input
            .flashcards
            .iter()
            .map(|card| card.validate().map(|content| Flashcard::new(set.set_id, content)))
            .collect::<StudyResult<Vec<_>>>()?;

        self.store.create_set(&set, &flashcards).await?;

        tracing::info!(
            set = %set.public_id,
            user_id = %owner,
            cards = flashcards.len(),
            "Flashcard set created"
        );

        Ok(SetDetails {
            set,
            flashcards,
            is_owner: true,
        })
    }

    pub async fn get(&self, set_public_id: &str, viewer: Option<UserId>) -> StudyResult<SetDetails> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_visible(&set, viewer)?;

        backfill_set(&*self.store, &set).await?;
        let flashcards = self.store.list_flashcards(set.set_id).await?;

        Ok(SetDetails {
            is_owner: set.is_owned_by(viewer),
            set,
            flashcards,
        })
    }

    /// Update title and visibility and apply the batch card edit atomically.
    ///
    /// Operations naming a card that is not in the set are skipped.
    pub async fn update(
        &self,
        set_public_id: &str,
        user_id: UserId,
        input: UpdateSetInput,
    ) -> StudyResult<SetDetails> {
        let mut set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;
        backfill_set(&*self.store, &set).await?;

        if let Some(title) = input.title.as_deref() {
            set.rename(Title::new(title)?);
        }
        if let Some(is_public) = input.is_public {
            set.set_visibility(is_public);
        }

        let changes = match input.flashcards {
            Some(operations) if !operations.is_empty() => {
                let existing = self.store.list_flashcards(set.set_id).await?;
                plan_card_changes(&set, existing, operations)?
            }
            _ => Vec::new(),
        };

        self.store.apply_set_changes(&set, &changes).await?;

        tracing::info!(
            set = %set.public_id,
            changes = changes.len(),
            "Flashcard set updated"
        );

        let flashcards = self.store.list_flashcards(set.set_id).await?;
        Ok(SetDetails {
            set,
            flashcards,
            is_owner: true,
        })
    }

    pub async fn delete(&self, set_public_id: &str, user_id: UserId) -> StudyResult<()> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;

        self.store.delete_set(set.set_id).await?;

        tracing::info!(set = %set.public_id, "Flashcard set deleted");
        Ok(())
    }

    /// Sets of the user with that nickname. Other callers see public sets only.
    pub async fn list_by_nickname(
        &self,
        nickname: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<Vec<SetDetails>> {
        let owner = self
            .store
            .find_user_id_by_nickname(nickname)
            .await?
            .ok_or(StudyError::UserNotFound)?;

        let backfilled = self
            .store
            .backfill_public_ids(BackfillScope::Owner(owner))
            .await?;
        if backfilled > 0 {
            tracing::info!(user_id = %owner, rows = backfilled, "Backfilled public ids");
        }

        let is_owner = viewer == Some(owner);
        let sets: Vec<FlashcardSet> = self
            .store
            .list_sets_by_owner(owner)
            .await?
            .into_iter()
            .filter(|set| is_owner || set.is_public)
            .collect();

        let set_ids: Vec<_> = sets.iter().map(|set| set.set_id).collect();
        let mut cards_by_set: HashMap<_, Vec<Flashcard>> = HashMap::new();
        for card in self.store.list_flashcards_for_sets(&set_ids).await? {
            cards_by_set.entry(card.set_id).or_default().push(card);
        }

        Ok(sets
            .into_iter()
            .map(|set| SetDetails {
                flashcards: cards_by_set.remove(&set.set_id).unwrap_or_default(),
                set,
                is_owner,
            })
            .collect())
    }
}

/// Turn batch operations into concrete changes.
///
/// With an id: delete wins over update, neither means no-op. Without an id:
/// only `should_create` does anything.
pub(crate) fn plan_card_changes(
    set: &FlashcardSet,
    existing: Vec<Flashcard>,
    operations: Vec<CardOperation>,
) -> StudyResult<Vec<CardChange>> {
    let mut by_public_id: HashMap<String, Flashcard> = existing
        .into_iter()
        .map(|card| (card.public_id.to_string(), card))
        .collect();
    let mut changes = Vec::new();

    for operation in operations {
        match operation.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                if !operation.should_delete && !operation.should_update {
                    continue;
                }
                let Some(card) = by_public_id.remove(id) else {
                    tracing::warn!(set = %set.public_id, card = %id, "Skipping edit of unknown card");
                    continue;
                };
                if operation.should_delete {
                    changes.push(CardChange::Delete(card.flashcard_id));
                } else {
                    let mut card = card;
                    card.edit(CardPatch::from(operation.card.validate()?));
                    changes.push(CardChange::Update(card));
                }
            }
            None if operation.should_create => {
                let content = operation.card.validate()?;
                changes.push(CardChange::Create(Flashcard::new(set.set_id, content)));
            }
            None => {}
        }
    }

    Ok(changes)
}
