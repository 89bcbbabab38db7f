//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod blocks;
pub mod config;
pub mod flashcards;
mod lookup;
pub mod mind_maps;
pub mod sets;
