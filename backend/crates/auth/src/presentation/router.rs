//! Auth Router

use axum::{Router, middleware, routing::get};

use crate::domain::repository::{KeySource, UserRepository};
use crate::infra::{IdentityKeys, PgUserRepository};
use crate::presentation::handlers::{self, AuthState};
use crate::presentation::middleware::require_user;

/// Create the user router with the PostgreSQL repository
pub fn user_router(state: AuthState<PgUserRepository, IdentityKeys>) -> Router {
    user_router_generic(state)
}

/// Create a generic user router for any repository / key source
pub fn user_router_generic<R, K>(state: AuthState<R, K>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    K: KeySource + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/users", get(handlers::list_users::<R, K>))
        .route("/users/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user::<R, K>,
        ))
        .with_state(state)
}
