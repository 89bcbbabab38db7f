//! Study Router

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::domain::repository::StudyStore;
use crate::infra::PgStudyRepository;
use crate::presentation::handlers::{self, StudyState};

/// Create the study router with the PostgreSQL repository
pub fn study_router(state: StudyState<PgStudyRepository>) -> Router {
    study_router_generic(state)
}

/// Create a generic study router for any store.
///
/// Expects the auth layer (`auth::middleware::optional_user`) to run in
/// front of it so handlers can see the caller.
pub fn study_router_generic<S>(state: StudyState<S>) -> Router
where
    S: StudyStore + Clone,
{
    Router::new()
        .route("/sets", post(handlers::create_set::<S>))
        .route(
            "/sets/{set_id}",
            get(handlers::get_set::<S>)
                .put(handlers::update_set::<S>)
                .delete(handlers::delete_set::<S>),
        )
        .route(
            "/sets/{set_id}/flashcards",
            get(handlers::list_flashcards::<S>).post(handlers::create_flashcard::<S>),
        )
        .route(
            "/sets/{set_id}/flashcards/{flashcard_id}",
            get(handlers::get_flashcard::<S>)
                .put(handlers::update_flashcard::<S>)
                .delete(handlers::delete_flashcard::<S>),
        )
        .route(
            "/sets/{set_id}/mindmaps",
            get(handlers::list_mind_maps::<S>).post(handlers::create_mind_map::<S>),
        )
        .route(
            "/sets/{set_id}/mindmaps/check-title",
            post(handlers::check_title::<S>),
        )
        .route(
            "/sets/{set_id}/mindmaps/{mind_map_id}",
            get(handlers::get_mind_map::<S>)
                .put(handlers::update_mind_map::<S>)
                .delete(handlers::delete_mind_map::<S>),
        )
        .route(
            "/sets/{set_id}/mindmaps/{mind_map_id}/connections",
            put(handlers::replace_connections::<S>),
        )
        .route(
            "/sets/{set_id}/mindmaps/{mind_map_id}/layouts",
            put(handlers::replace_layouts::<S>),
        )
        .route(
            "/sets/{set_id}/blocks/leaderboard",
            get(handlers::leaderboard::<S>),
        )
        .route(
            "/sets/{set_id}/blocks/scores",
            post(handlers::record_score::<S>),
        )
        .route("/users/{nickname}/sets", get(handlers::list_user_sets::<S>))
        .route(
            "/users/{nickname}/mindmaps",
            get(handlers::list_user_mind_maps::<S>),
        )
        .with_state(state)
}
