//! Domain Services
//!
//! Pure rules with no I/O.

pub mod access;
pub mod graph;
