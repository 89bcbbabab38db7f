//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Entities (FlashcardSet, Flashcard, MindMap and its children, BlocksScore)
//! - Value objects (PublicId, bounded text fields)
//! - Domain services (visibility rules, graph consistency)
//! - Repository traits (interfaces)

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;
