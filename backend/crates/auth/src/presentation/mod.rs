//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extractor::{AuthUser, CurrentUser, Viewer};
pub use handlers::AuthState;
pub use middleware::{optional_user, require_user};
pub use router::{user_router, user_router_generic};
