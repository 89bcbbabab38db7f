//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{FlashcardId, MindMapId, SetId, UserId};

use crate::domain::entity::{
    BlocksScore, CardChange, Flashcard, FlashcardSet, LeaderboardEntry, MindMap, MindMapGraph,
    MindMapWrite,
};
use crate::domain::value_object::{PublicId, Title};
use crate::error::StudyResult;

/// Flashcard set repository trait
#[trait_variant::make(SetRepository: Send)]
pub trait LocalSetRepository {
    /// Insert a set and its initial cards in one transaction
    async fn create_set(&self, set: &FlashcardSet, cards: &[Flashcard]) -> StudyResult<()>;

    async fn find_set(&self, public_id: &PublicId) -> StudyResult<Option<FlashcardSet>>;

    /// Sets owned by `owner`, newest first
    async fn list_sets_by_owner(&self, owner: UserId) -> StudyResult<Vec<FlashcardSet>>;

    /// Update the set row and apply card changes in one transaction
    async fn apply_set_changes(
        &self,
        set: &FlashcardSet,
        changes: &[CardChange],
    ) -> StudyResult<()>;

    /// Delete a set. Cards, mind maps and scores go with it.
    async fn delete_set(&self, set_id: SetId) -> StudyResult<()>;
}

/// Flashcard repository trait
#[trait_variant::make(FlashcardRepository: Send)]
pub trait LocalFlashcardRepository {
    /// Cards of a set in creation order
    async fn list_flashcards(&self, set_id: SetId) -> StudyResult<Vec<Flashcard>>;

    /// Cards of several sets in creation order
    async fn list_flashcards_for_sets(&self, set_ids: &[SetId]) -> StudyResult<Vec<Flashcard>>;

    async fn find_flashcard(
        &self,
        set_id: SetId,
        public_id: &PublicId,
    ) -> StudyResult<Option<Flashcard>>;

    async fn create_flashcard(&self, card: &Flashcard) -> StudyResult<()>;

    async fn update_flashcard(&self, card: &Flashcard) -> StudyResult<()>;

    /// Returns `false` when nothing was deleted
    async fn delete_flashcard(&self, flashcard_id: FlashcardId) -> StudyResult<bool>;
}

/// Mind map repository trait
#[trait_variant::make(MindMapRepository: Send)]
pub trait LocalMindMapRepository {
    async fn find_mind_map(
        &self,
        set_id: SetId,
        public_id: &PublicId,
    ) -> StudyResult<Option<MindMap>>;

    /// Whether `user_id` already has a mind map titled `title` in the set.
    /// `except` skips the mind map being renamed.
    async fn title_taken(
        &self,
        set_id: SetId,
        user_id: UserId,
        title: &Title,
        except: Option<MindMapId>,
    ) -> StudyResult<bool>;

    async fn list_mind_maps_by_set(&self, set_id: SetId) -> StudyResult<Vec<MindMap>>;

    async fn list_mind_maps_by_owner(&self, user_id: UserId) -> StudyResult<Vec<MindMap>>;

    /// Attach connections and layouts
    async fn load_graphs(&self, mind_maps: Vec<MindMap>) -> StudyResult<Vec<MindMapGraph>>;

    /// Insert the mind map and its children in one transaction. Child
    /// references are checked against the set's flashcards inside it.
    async fn create_mind_map(&self, write: &MindMapWrite) -> StudyResult<MindMapGraph>;

    /// Update the mind map row and replace the child lists that are present,
    /// in one transaction with the same checks as `create_mind_map`.
    async fn update_mind_map(&self, write: &MindMapWrite) -> StudyResult<MindMapGraph>;

    async fn delete_mind_map(&self, mind_map_id: MindMapId) -> StudyResult<()>;
}

/// Blocks score repository trait
#[trait_variant::make(ScoreRepository: Send)]
pub trait LocalScoreRepository {
    async fn record_score(&self, score: &BlocksScore) -> StudyResult<()>;

    /// Fastest rounds first, ties broken by who played first
    async fn leaderboard(&self, set_id: SetId, limit: i64) -> StudyResult<Vec<LeaderboardEntry>>;
}

/// Read-only view of the user table
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    async fn find_user_id_by_nickname(&self, nickname: &str) -> StudyResult<Option<UserId>>;
}

/// Rows whose public ids should be filled in before listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackfillScope {
    /// Sets of the user, cards in those sets and the user's mind maps
    Owner(UserId),
    /// Cards and mind maps of one set
    Set(SetId),
}

/// Lazy public id assignment for rows created before public ids existed
#[trait_variant::make(PublicIdBackfill: Send)]
pub trait LocalPublicIdBackfill {
    /// Returns the number of rows that received an id
    async fn backfill_public_ids(&self, scope: BackfillScope) -> StudyResult<u64>;
}

/// Everything the study use cases need from storage
pub trait StudyStore:
    SetRepository
    + FlashcardRepository
    + MindMapRepository
    + ScoreRepository
    + UserDirectory
    + PublicIdBackfill
    + Send
    + Sync
    + 'static
{
}

impl<T> StudyStore for T where
    T: SetRepository
        + FlashcardRepository
        + MindMapRepository
        + ScoreRepository
        + UserDirectory
        + PublicIdBackfill
        + Send
        + Sync
        + 'static
{
}
