//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod list_users;
pub mod sync_user;
pub mod verify_token;

// Re-exports
pub use config::AuthConfig;
pub use list_users::ListUsersUseCase;
pub use sync_user::SyncUserUseCase;
pub use verify_token::VerifyTokenUseCase;
