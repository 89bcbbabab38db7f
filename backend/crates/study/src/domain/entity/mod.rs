//! Entity Module

pub mod flashcard;
pub mod mind_map;
pub mod score;
pub mod set;

pub use flashcard::{CardChange, CardContent, CardPatch, Flashcard};
pub use mind_map::{
    ConnectionDraft, FlashcardRef, LayoutDraft, MindMap, MindMapConnection, MindMapGraph,
    MindMapNodeLayout, MindMapWrite,
};
pub use score::{BlocksScore, LeaderboardEntry};
pub use set::FlashcardSet;
