//! Shared Kernel - Domain-crossing minimal core
//!
//! Holds the vocabulary every bounded context agrees on:
//! - the unified error type and result alias
//! - typed primary-key wrappers
//!
//! Only things with one meaning across `auth` and `study` belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
