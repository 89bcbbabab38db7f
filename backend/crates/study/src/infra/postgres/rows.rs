//! Row Types
//!
//! `public_id` columns are nullable for rows that predate them. Listing paths
//! backfill first, so a NULL reaching a conversion is a storage fault.

use chrono::{DateTime, Utc};
use kernel::id::{
    ConnectionId, FlashcardId, MindMapId, NodeLayoutId, ScoreId, SetId, UserId,
};
use uuid::Uuid;

use crate::domain::entity::{
    BlocksScore, Flashcard, FlashcardRef, FlashcardSet, LeaderboardEntry, MindMap,
    MindMapConnection, MindMapNodeLayout,
};
use crate::domain::value_object::{
    Concept, LayoutData, PublicId, Relationship, Solution, Term, Title,
};
use crate::error::{StudyError, StudyResult};

pub(super) const SET_COLUMNS: &str =
    "set_id, public_id, title, user_id, is_public, last_studied_at, created_at, updated_at";

pub(super) const FLASHCARD_COLUMNS: &str = "flashcard_id, public_id, set_id, term, solution, \
     concept, difficulty, times_reviewed, last_reviewed_at, mastered, created_at, updated_at";

/// Mind map columns, selected from `mind_maps m JOIN flashcard_sets s`
pub(super) const MIND_MAP_COLUMNS: &str = "m.mind_map_id, m.public_id, m.set_id, \
     s.public_id AS set_public_id, m.user_id, m.title, m.is_public, m.created_at, m.updated_at";

fn stored_public_id(table: &str, id: Uuid, raw: Option<String>) -> StudyResult<PublicId> {
    let raw = raw.ok_or_else(|| {
        StudyError::Internal(format!("{table} row {id} has no public id"))
    })?;
    PublicId::parse_str(&raw)
        .map_err(|_| StudyError::Internal(format!("{table} row {id} has a malformed public id")))
}

#[derive(sqlx::FromRow)]
pub(super) struct SetRow {
    set_id: Uuid,
    public_id: Option<String>,
    title: String,
    user_id: Uuid,
    is_public: bool,
    last_studied_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SetRow {
    pub(super) fn into_set(self) -> StudyResult<FlashcardSet> {
        Ok(FlashcardSet {
            public_id: stored_public_id("flashcard_sets", self.set_id, self.public_id)?,
            set_id: SetId::from_uuid(self.set_id),
            title: Title::from_db(self.title),
            user_id: UserId::from_uuid(self.user_id),
            is_public: self.is_public,
            last_studied_at: self.last_studied_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct FlashcardRow {
    flashcard_id: Uuid,
    public_id: Option<String>,
    set_id: Uuid,
    term: String,
    solution: String,
    concept: String,
    difficulty: i32,
    times_reviewed: i32,
    last_reviewed_at: Option<DateTime<Utc>>,
    mastered: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FlashcardRow {
    pub(super) fn into_flashcard(self) -> StudyResult<Flashcard> {
        Ok(Flashcard {
            public_id: stored_public_id("flashcards", self.flashcard_id, self.public_id)?,
            flashcard_id: FlashcardId::from_uuid(self.flashcard_id),
            set_id: SetId::from_uuid(self.set_id),
            term: Term::from_db(self.term),
            solution: Solution::from_db(self.solution),
            concept: Concept::from_db(self.concept),
            difficulty: self.difficulty,
            times_reviewed: self.times_reviewed,
            last_reviewed_at: self.last_reviewed_at,
            mastered: self.mastered,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct MindMapRow {
    mind_map_id: Uuid,
    public_id: Option<String>,
    set_id: Uuid,
    set_public_id: Option<String>,
    user_id: Uuid,
    title: String,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MindMapRow {
    pub(super) fn into_mind_map(self) -> StudyResult<MindMap> {
        Ok(MindMap {
            public_id: stored_public_id("mind_maps", self.mind_map_id, self.public_id)?,
            mind_map_id: MindMapId::from_uuid(self.mind_map_id),
            set_public_id: stored_public_id("flashcard_sets", self.set_id, self.set_public_id)?,
            set_id: SetId::from_uuid(self.set_id),
            user_id: UserId::from_uuid(self.user_id),
            title: Title::from_db(self.title),
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn flashcard_ref(id: Uuid, public_id: Option<String>) -> StudyResult<FlashcardRef> {
    Ok(FlashcardRef {
        flashcard_id: FlashcardId::from_uuid(id),
        public_id: stored_public_id("flashcards", id, public_id)?,
    })
}

/// Connection joined with the public ids of both endpoints
#[derive(sqlx::FromRow)]
pub(super) struct ConnectionRow {
    connection_id: Uuid,
    mind_map_id: Uuid,
    source_id: Uuid,
    source_public_id: Option<String>,
    target_id: Uuid,
    target_public_id: Option<String>,
    relationship: String,
}

impl ConnectionRow {
    pub(super) fn mind_map_id(&self) -> MindMapId {
        MindMapId::from_uuid(self.mind_map_id)
    }

    pub(super) fn into_connection(self) -> StudyResult<MindMapConnection> {
        Ok(MindMapConnection {
            connection_id: ConnectionId::from_uuid(self.connection_id),
            mind_map_id: MindMapId::from_uuid(self.mind_map_id),
            source: flashcard_ref(self.source_id, self.source_public_id)?,
            target: flashcard_ref(self.target_id, self.target_public_id)?,
            relationship: Relationship::from_db(self.relationship),
        })
    }
}

/// Layout joined with the public id of its flashcard
#[derive(sqlx::FromRow)]
pub(super) struct LayoutRow {
    layout_id: Uuid,
    mind_map_id: Uuid,
    flashcard_id: Uuid,
    flashcard_public_id: Option<String>,
    x_position: f64,
    y_position: f64,
    data: String,
}

impl LayoutRow {
    pub(super) fn mind_map_id(&self) -> MindMapId {
        MindMapId::from_uuid(self.mind_map_id)
    }

    pub(super) fn into_layout(self) -> StudyResult<MindMapNodeLayout> {
        Ok(MindMapNodeLayout {
            layout_id: NodeLayoutId::from_uuid(self.layout_id),
            mind_map_id: MindMapId::from_uuid(self.mind_map_id),
            flashcard: flashcard_ref(self.flashcard_id, self.flashcard_public_id)?,
            x_position: self.x_position,
            y_position: self.y_position,
            data: LayoutData::from_db(self.data),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct LeaderboardRow {
    score_id: Uuid,
    user_id: Uuid,
    set_id: Uuid,
    time_seconds: i32,
    correct_attempts: i32,
    total_attempts: i32,
    played_at: DateTime<Utc>,
    nickname: String,
}

impl LeaderboardRow {
    pub(super) fn into_entry(self) -> LeaderboardEntry {
        LeaderboardEntry {
            score: BlocksScore {
                score_id: ScoreId::from_uuid(self.score_id),
                user_id: UserId::from_uuid(self.user_id),
                set_id: SetId::from_uuid(self.set_id),
                time_seconds: self.time_seconds,
                correct_attempts: self.correct_attempts,
                total_attempts: self.total_attempts,
                played_at: self.played_at,
            },
            nickname: self.nickname,
        }
    }
}
