//! Value Object Module

pub mod public_id;
pub mod text;

pub use public_id::PublicId;
pub use text::{Concept, LayoutData, Relationship, Solution, Term, Title};
