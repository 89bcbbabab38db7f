//! Mind map graph consistency
//!
//! Requests address flashcards by public id. Before children are written,
//! every endpoint and layout node is resolved against the flashcards of the
//! mind map's own set. Any failure aborts the whole write.

use std::collections::{HashMap, HashSet};

use kernel::id::{ConnectionId, FlashcardId, MindMapId, NodeLayoutId};

use crate::domain::entity::{
    ConnectionDraft, Flashcard, FlashcardRef, LayoutDraft, MindMapConnection, MindMapNodeLayout,
};
use crate::error::{StudyError, StudyResult};

/// Flashcards of one set, looked up by public id
#[derive(Debug, Default)]
pub struct FlashcardIndex {
    by_public_id: HashMap<String, FlashcardRef>,
}

impl FlashcardIndex {
    pub fn new(cards: impl IntoIterator<Item = FlashcardRef>) -> Self {
        Self {
            by_public_id: cards
                .into_iter()
                .map(|card| (card.public_id.to_string(), card))
                .collect(),
        }
    }

    pub fn from_flashcards(cards: &[Flashcard]) -> Self {
        Self::new(cards.iter().map(|card| FlashcardRef {
            flashcard_id: card.flashcard_id,
            public_id: card.public_id,
        }))
    }

    pub fn len(&self) -> usize {
        self.by_public_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_public_id.is_empty()
    }

    fn resolve(&self, role: &str, public_id: &str) -> StudyResult<FlashcardRef> {
        if public_id.is_empty() {
            return Err(StudyError::InvalidGraph(format!("{role} flashcard is required")));
        }
        self.by_public_id.get(public_id).copied().ok_or_else(|| {
            StudyError::InvalidGraph(format!(
                "{role} flashcard {public_id} does not belong to this set"
            ))
        })
    }
}

pub fn resolve_connections(
    mind_map_id: MindMapId,
    index: &FlashcardIndex,
    drafts: &[ConnectionDraft],
) -> StudyResult<Vec<MindMapConnection>> {
    let mut seen: HashSet<(FlashcardId, FlashcardId)> = HashSet::with_capacity(drafts.len());
    let mut connections = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let source = index.resolve("source", &draft.source)?;
        let target = index.resolve("target", &draft.target)?;
        if source.flashcard_id == target.flashcard_id {
            return Err(StudyError::InvalidGraph(format!(
                "flashcard {} cannot connect to itself",
                draft.source
            )));
        }
        if !seen.insert((source.flashcard_id, target.flashcard_id)) {
            return Err(StudyError::GraphConflict(format!(
                "duplicate connection {} -> {}",
                draft.source, draft.target
            )));
        }

        connections.push(MindMapConnection {
            connection_id: ConnectionId::new(),
            mind_map_id,
            source,
            target,
            relationship: draft.relationship.clone(),
        });
    }

    Ok(connections)
}

pub fn resolve_layouts(
    mind_map_id: MindMapId,
    index: &FlashcardIndex,
    drafts: &[LayoutDraft],
) -> StudyResult<Vec<MindMapNodeLayout>> {
    let mut seen: HashSet<FlashcardId> = HashSet::with_capacity(drafts.len());
    let mut layouts = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let flashcard = index.resolve("layout", &draft.flashcard)?;
        if !seen.insert(flashcard.flashcard_id) {
            return Err(StudyError::GraphConflict(format!(
                "duplicate layout for flashcard {}",
                draft.flashcard
            )));
        }
        // Checked again here: drafts can be built without `LayoutDraft::new`.
        if !draft.x_position.is_finite() || !draft.y_position.is_finite() {
            return Err(StudyError::InvalidGraph(format!(
                "layout position of {} must be finite",
                draft.flashcard
            )));
        }

        layouts.push(MindMapNodeLayout {
            layout_id: NodeLayoutId::new(),
            mind_map_id,
            flashcard,
            x_position: draft.x_position,
            y_position: draft.y_position,
            data: draft.data.clone(),
        });
    }

    Ok(layouts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{LayoutData, PublicId};

    fn card() -> FlashcardRef {
        FlashcardRef {
            flashcard_id: FlashcardId::new(),
            public_id: PublicId::new(),
        }
    }

    fn edge(source: &FlashcardRef, target: &FlashcardRef) -> ConnectionDraft {
        ConnectionDraft::new(source.public_id.as_str(), target.public_id.as_str(), Some("causes"))
            .unwrap()
    }

    fn node(card: &FlashcardRef, x: f64) -> LayoutDraft {
        LayoutDraft::new(card.public_id.as_str(), x, 0.0, None).unwrap()
    }

    #[test]
    fn test_resolves_edges_within_set() {
        let (a, b, c) = (card(), card(), card());
        let index = FlashcardIndex::new([a, b, c]);
        let mind_map_id = MindMapId::new();

        let connections =
            resolve_connections(mind_map_id, &index, &[edge(&a, &b), edge(&b, &a), edge(&b, &c)])
                .unwrap();

        assert_eq!(connections.len(), 3);
        assert_eq!(connections[0].source, a);
        assert_eq!(connections[0].target, b);
        assert_eq!(connections[2].relationship.as_str(), "causes");
        assert!(connections.iter().all(|c| c.mind_map_id == mind_map_id));
    }

    #[test]
    fn test_rejects_foreign_and_missing_endpoints() {
        let (a, stranger) = (card(), card());
        let index = FlashcardIndex::new([a]);

        let err = resolve_connections(MindMapId::new(), &index, &[edge(&a, &stranger)]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidGraph(_)));

        let blank = ConnectionDraft::new("", a.public_id.as_str(), None).unwrap();
        let err = resolve_connections(MindMapId::new(), &index, &[blank]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid mind map graph: source flashcard is required");
    }

    #[test]
    fn test_rejects_self_loop_and_duplicates() {
        let (a, b) = (card(), card());
        let index = FlashcardIndex::new([a, b]);

        let err = resolve_connections(MindMapId::new(), &index, &[edge(&a, &a)]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidGraph(_)));

        let err = resolve_connections(MindMapId::new(), &index, &[edge(&a, &b), edge(&a, &b)])
            .unwrap_err();
        assert!(matches!(err, StudyError::GraphConflict(_)));
    }

    #[test]
    fn test_layouts() {
        let (a, b, stranger) = (card(), card(), card());
        let index = FlashcardIndex::new([a, b]);

        let layouts = resolve_layouts(MindMapId::new(), &index, &[node(&a, 1.0), node(&b, 2.0)])
            .unwrap();
        assert_eq!(layouts[1].flashcard, b);
        assert_eq!(layouts[1].x_position, 2.0);

        let err = resolve_layouts(MindMapId::new(), &index, &[node(&a, 1.0), node(&a, 5.0)])
            .unwrap_err();
        assert!(matches!(err, StudyError::GraphConflict(_)));

        let err = resolve_layouts(MindMapId::new(), &index, &[node(&stranger, 0.0)]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidGraph(_)));

        let nan = LayoutDraft {
            flashcard: a.public_id.to_string(),
            x_position: f64::NAN,
            y_position: 0.0,
            data: LayoutData::new("").unwrap(),
        };
        assert!(resolve_layouts(MindMapId::new(), &index, &[nan]).is_err());
    }

    #[test]
    fn test_empty_lists_resolve_to_nothing() {
        let index = FlashcardIndex::default();
        assert!(index.is_empty());
        assert!(resolve_connections(MindMapId::new(), &index, &[]).unwrap().is_empty());
        assert!(resolve_layouts(MindMapId::new(), &index, &[]).unwrap().is_empty());
    }
}
