//! Flashcard Entity
//!
//! Review tracking fields are stored and returned as-is; nothing here
//! schedules reviews.

use chrono::{DateTime, Utc};
use kernel::id::{FlashcardId, SetId};

use crate::domain::value_object::{Concept, PublicId, Solution, Term};

#[derive(Debug, Clone)]
pub struct Flashcard {
    pub flashcard_id: FlashcardId,
    pub public_id: PublicId,
    pub set_id: SetId,
    pub term: Term,
    pub solution: Solution,
    pub concept: Concept,
    pub difficulty: i32,
    pub times_reviewed: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub mastered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(set_id: SetId, content: CardContent) -> Self {
        let now = Utc::now();
        Self {
            flashcard_id: FlashcardId::new(),
            public_id: PublicId::new(),
            set_id,
            term: content.term,
            solution: content.solution,
            concept: content.concept,
            difficulty: 0,
            times_reviewed: 0,
            last_reviewed_at: None,
            mastered: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial edit. Returns `true` if anything changed.
    pub fn edit(&mut self, patch: CardPatch) -> bool {
        let mut changed = false;
        if let Some(term) = patch.term {
            changed |= term != self.term;
            self.term = term;
        }
        if let Some(solution) = patch.solution {
            changed |= solution != self.solution;
            self.solution = solution;
        }
        if let Some(concept) = patch.concept {
            changed |= concept != self.concept;
            self.concept = concept;
        }
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Validated text of a new card
#[derive(Debug, Clone)]
pub struct CardContent {
    pub term: Term,
    pub solution: Solution,
    pub concept: Concept,
}

impl CardContent {
    pub fn new(term: &str, solution: &str, concept: Option<&str>) -> crate::error::StudyResult<Self> {
        Ok(Self {
            term: Term::new(term)?,
            solution: Solution::new(solution)?,
            concept: Concept::new(concept.unwrap_or_default())?,
        })
    }
}

/// Validated partial edit of a card
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub term: Option<Term>,
    pub solution: Option<Solution>,
    pub concept: Option<Concept>,
}

impl From<CardContent> for CardPatch {
    fn from(content: CardContent) -> Self {
        Self {
            term: Some(content.term),
            solution: Some(content.solution),
            concept: Some(content.concept),
        }
    }
}

/// One step of a batch edit applied together with a set update
#[derive(Debug, Clone)]
pub enum CardChange {
    Create(Flashcard),
    Update(Flashcard),
    Delete(FlashcardId),
}
