//! MindMap aggregate
//!
//! A mind map belongs to one set and one user. Its connections and node
//! layouts point at flashcards of the same set and are always written as a
//! whole together with the mind map row.

use chrono::{DateTime, Utc};
use kernel::id::{ConnectionId, FlashcardId, MindMapId, NodeLayoutId, SetId, UserId};

use crate::domain::entity::set::FlashcardSet;
use crate::domain::value_object::{LayoutData, PublicId, Relationship, Title};
use crate::error::{StudyError, StudyResult};

#[derive(Debug, Clone)]
pub struct MindMap {
    pub mind_map_id: MindMapId,
    pub public_id: PublicId,
    pub set_id: SetId,
    /// Public id of the parent set, for links back to it
    pub set_public_id: PublicId,
    pub user_id: UserId,
    pub title: Title,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MindMap {
    pub fn new(set: &FlashcardSet, user_id: UserId, title: Title, is_public: bool) -> Self {
        let now = Utc::now();
        Self {
            mind_map_id: MindMapId::new(),
            public_id: PublicId::new(),
            set_id: set.set_id,
            set_public_id: set.public_id,
            user_id,
            title,
            is_public,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Option<UserId>) -> bool {
        user_id == Some(self.user_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A flashcard as seen from a mind map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashcardRef {
    pub flashcard_id: FlashcardId,
    pub public_id: PublicId,
}

#[derive(Debug, Clone)]
pub struct MindMapConnection {
    pub connection_id: ConnectionId,
    pub mind_map_id: MindMapId,
    pub source: FlashcardRef,
    pub target: FlashcardRef,
    pub relationship: Relationship,
}

#[derive(Debug, Clone)]
pub struct MindMapNodeLayout {
    pub layout_id: NodeLayoutId,
    pub mind_map_id: MindMapId,
    pub flashcard: FlashcardRef,
    pub x_position: f64,
    pub y_position: f64,
    pub data: LayoutData,
}

/// A mind map with its children
#[derive(Debug, Clone)]
pub struct MindMapGraph {
    pub mind_map: MindMap,
    pub connections: Vec<MindMapConnection>,
    pub layouts: Vec<MindMapNodeLayout>,
}

/// A requested edge, endpoints still given as flashcard public ids
#[derive(Debug, Clone)]
pub struct ConnectionDraft {
    pub source: String,
    pub target: String,
    pub relationship: Relationship,
}

impl ConnectionDraft {
    pub fn new(source: &str, target: &str, relationship: Option<&str>) -> StudyResult<Self> {
        Ok(Self {
            source: source.trim().to_string(),
            target: target.trim().to_string(),
            relationship: Relationship::new(relationship.unwrap_or_default())?,
        })
    }
}

/// A requested node position
#[derive(Debug, Clone)]
pub struct LayoutDraft {
    pub flashcard: String,
    pub x_position: f64,
    pub y_position: f64,
    pub data: LayoutData,
}

impl LayoutDraft {
    pub fn new(flashcard: &str, x: f64, y: f64, data: Option<&str>) -> StudyResult<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(StudyError::InvalidGraph(format!(
                "layout position of {flashcard} must be finite"
            )));
        }
        Ok(Self {
            flashcard: flashcard.trim().to_string(),
            x_position: x,
            y_position: y,
            data: LayoutData::new(data.unwrap_or_default())?,
        })
    }
}

/// Mind map row plus the child lists to replace. `None` keeps the existing
/// children untouched.
#[derive(Debug, Clone)]
pub struct MindMapWrite {
    pub mind_map: MindMap,
    pub connections: Option<Vec<ConnectionDraft>>,
    pub layouts: Option<Vec<LayoutDraft>>,
}
