//! Auth (Identity) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository and key-source traits
//! - `application/` - Token verification and user sync use cases
//! - `infra/` - PostgreSQL user store, JWKS / shared-secret key sources
//! - `presentation/` - Middleware, extractors, user endpoints
//!
//! ## Identity Model
//! - Tokens are issued by a third-party provider (Auth0); this service only
//!   verifies them (signature, `exp`, `iss`, `aud`, `sub`)
//! - The `sub` claim is the stable key of the local user row
//! - Users are created on first sight and their nickname follows the token

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{IdentityKeys, JwksKeySource, PgUserRepository, StaticKeySource};
pub use presentation::{AuthState, AuthUser, CurrentUser, Viewer, user_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
