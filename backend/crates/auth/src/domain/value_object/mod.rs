//! Value Object Module

pub mod nickname;
pub mod subject;
pub mod user_id;
