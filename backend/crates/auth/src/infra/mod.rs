//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod keys;
pub mod postgres;

pub use keys::{IdentityKeys, JwksKeySource, StaticKeySource};
pub use postgres::PgUserRepository;
