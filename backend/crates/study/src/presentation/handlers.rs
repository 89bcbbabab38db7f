//! HTTP Handlers
//!
//! Reads take a [`Viewer`] and work anonymously; writes take an [`AuthUser`].

use std::sync::Arc;

use auth::{AuthUser, Viewer};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::blocks::BlocksUseCase;
use crate::application::config::StudyConfig;
use crate::application::flashcards::FlashcardUseCase;
use crate::application::mind_maps::{ConnectionInput, LayoutInput, MindMapUseCase};
use crate::application::sets::SetUseCase;
use crate::domain::repository::StudyStore;
use crate::error::StudyResult;
use crate::presentation::dto::{
    CardRequest, CheckTitleRequest, ConnectionRequest, CreateMindMapRequest, CreateSetRequest,
    FlashcardResponse, LayoutRequest, LeaderboardEntryResponse, MindMapResponse, ScoreRequest,
    ScoreResponse, SetResponse, TitleAvailableResponse, UpdateCardRequest, UpdateMindMapRequest,
    UpdateSetRequest,
};

/// Shared state for study handlers
#[derive(Clone)]
pub struct StudyState<S>
where
    S: StudyStore + Clone,
{
    pub store: Arc<S>,
    pub config: Arc<StudyConfig>,
}

impl<S> StudyState<S>
where
    S: StudyStore + Clone,
{
    pub fn new(store: S, config: StudyConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    fn sets(&self) -> SetUseCase<S> {
        SetUseCase::new(self.store.clone())
    }

    fn flashcards(&self) -> FlashcardUseCase<S> {
        FlashcardUseCase::new(self.store.clone())
    }

    fn mind_maps(&self) -> MindMapUseCase<S> {
        MindMapUseCase::new(self.store.clone())
    }

    fn blocks(&self) -> BlocksUseCase<S> {
        BlocksUseCase::new(self.store.clone(), self.config.clone())
    }
}

// ============================================================================
// Sets
// ============================================================================

/// POST /api/sets
pub async fn create_set<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateSetRequest>,
) -> StudyResult<impl IntoResponse>
where
    S: StudyStore + Clone,
{
    let details = state.sets().create(user.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(SetResponse::from(details))))
}

/// GET /api/sets/{setId}
pub async fn get_set<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path(set_id): Path<String>,
) -> StudyResult<Json<SetResponse>>
where
    S: StudyStore + Clone,
{
    let details = state.sets().get(&set_id, viewer.user_id()).await?;
    Ok(Json(SetResponse::from(details)))
}

/// PUT /api/sets/{setId}
pub async fn update_set<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
    Json(req): Json<UpdateSetRequest>,
) -> StudyResult<Json<SetResponse>>
where
    S: StudyStore + Clone,
{
    let details = state.sets().update(&set_id, user.user_id, req.into()).await?;
    Ok(Json(SetResponse::from(details)))
}

/// DELETE /api/sets/{setId}
pub async fn delete_set<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
) -> StudyResult<StatusCode>
where
    S: StudyStore + Clone,
{
    state.sets().delete(&set_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{nickname}/sets
pub async fn list_user_sets<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path(nickname): Path<String>,
) -> StudyResult<Json<Vec<SetResponse>>>
where
    S: StudyStore + Clone,
{
    let sets = state
        .sets()
        .list_by_nickname(&nickname, viewer.user_id())
        .await?;
    Ok(Json(sets.into_iter().map(SetResponse::from).collect()))
}

// ============================================================================
// Flashcards
// ============================================================================

/// GET /api/sets/{setId}/flashcards
pub async fn list_flashcards<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path(set_id): Path<String>,
) -> StudyResult<Json<Vec<FlashcardResponse>>>
where
    S: StudyStore + Clone,
{
    let cards = state.flashcards().list(&set_id, viewer.user_id()).await?;
    Ok(Json(cards.into_iter().map(FlashcardResponse::from).collect()))
}

/// GET /api/sets/{setId}/flashcards/{flashcardId}
pub async fn get_flashcard<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path((set_id, flashcard_id)): Path<(String, String)>,
) -> StudyResult<Json<FlashcardResponse>>
where
    S: StudyStore + Clone,
{
    let card = state
        .flashcards()
        .get(&set_id, &flashcard_id, viewer.user_id())
        .await?;
    Ok(Json(FlashcardResponse::from(card)))
}

/// POST /api/sets/{setId}/flashcards
pub async fn create_flashcard<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
    Json(req): Json<CardRequest>,
) -> StudyResult<impl IntoResponse>
where
    S: StudyStore + Clone,
{
    let card = state
        .flashcards()
        .create(&set_id, user.user_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(FlashcardResponse::from(card))))
}

/// PUT /api/sets/{setId}/flashcards/{flashcardId}
pub async fn update_flashcard<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, flashcard_id)): Path<(String, String)>,
    Json(req): Json<UpdateCardRequest>,
) -> StudyResult<Json<FlashcardResponse>>
where
    S: StudyStore + Clone,
{
    let card = state
        .flashcards()
        .update(&set_id, &flashcard_id, user.user_id, req.into())
        .await?;
    Ok(Json(FlashcardResponse::from(card)))
}

/// DELETE /api/sets/{setId}/flashcards/{flashcardId}
pub async fn delete_flashcard<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, flashcard_id)): Path<(String, String)>,
) -> StudyResult<StatusCode>
where
    S: StudyStore + Clone,
{
    state
        .flashcards()
        .delete(&set_id, &flashcard_id, user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Mind maps
// ============================================================================

/// GET /api/sets/{setId}/mindmaps
pub async fn list_mind_maps<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path(set_id): Path<String>,
) -> StudyResult<Json<Vec<MindMapResponse>>>
where
    S: StudyStore + Clone,
{
    let graphs = state
        .mind_maps()
        .list_for_set(&set_id, viewer.user_id())
        .await?;
    Ok(Json(graphs.into_iter().map(MindMapResponse::from).collect()))
}

/// GET /api/users/{nickname}/mindmaps
pub async fn list_user_mind_maps<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path(nickname): Path<String>,
) -> StudyResult<Json<Vec<MindMapResponse>>>
where
    S: StudyStore + Clone,
{
    let graphs = state
        .mind_maps()
        .list_for_user(&nickname, viewer.user_id())
        .await?;
    Ok(Json(graphs.into_iter().map(MindMapResponse::from).collect()))
}

/// GET /api/sets/{setId}/mindmaps/{mindMapId}
pub async fn get_mind_map<S>(
    State(state): State<StudyState<S>>,
    viewer: Viewer,
    Path((set_id, mind_map_id)): Path<(String, String)>,
) -> StudyResult<Json<MindMapResponse>>
where
    S: StudyStore + Clone,
{
    let graph = state
        .mind_maps()
        .get(&set_id, &mind_map_id, viewer.user_id())
        .await?;
    Ok(Json(MindMapResponse::from(graph)))
}

/// POST /api/sets/{setId}/mindmaps
pub async fn create_mind_map<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
    Json(req): Json<CreateMindMapRequest>,
) -> StudyResult<impl IntoResponse>
where
    S: StudyStore + Clone,
{
    let graph = state
        .mind_maps()
        .create(&set_id, user.user_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(MindMapResponse::from(graph))))
}

/// PUT /api/sets/{setId}/mindmaps/{mindMapId}
pub async fn update_mind_map<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, mind_map_id)): Path<(String, String)>,
    Json(req): Json<UpdateMindMapRequest>,
) -> StudyResult<Json<MindMapResponse>>
where
    S: StudyStore + Clone,
{
    let graph = state
        .mind_maps()
        .update(&set_id, &mind_map_id, user.user_id, req.into())
        .await?;
    Ok(Json(MindMapResponse::from(graph)))
}

/// PUT /api/sets/{setId}/mindmaps/{mindMapId}/connections
pub async fn replace_connections<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, mind_map_id)): Path<(String, String)>,
    Json(req): Json<Vec<ConnectionRequest>>,
) -> StudyResult<StatusCode>
where
    S: StudyStore + Clone,
{
    let connections = req.into_iter().map(ConnectionInput::from).collect();
    state
        .mind_maps()
        .replace_connections(&set_id, &mind_map_id, user.user_id, connections)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sets/{setId}/mindmaps/{mindMapId}/layouts
pub async fn replace_layouts<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, mind_map_id)): Path<(String, String)>,
    Json(req): Json<Vec<LayoutRequest>>,
) -> StudyResult<StatusCode>
where
    S: StudyStore + Clone,
{
    let layouts = req.into_iter().map(LayoutInput::from).collect();
    state
        .mind_maps()
        .replace_layouts(&set_id, &mind_map_id, user.user_id, layouts)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/sets/{setId}/mindmaps/{mindMapId}
pub async fn delete_mind_map<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path((set_id, mind_map_id)): Path<(String, String)>,
) -> StudyResult<StatusCode>
where
    S: StudyStore + Clone,
{
    state
        .mind_maps()
        .delete(&set_id, &mind_map_id, user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sets/{setId}/mindmaps/check-title
pub async fn check_title<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
    Json(req): Json<CheckTitleRequest>,
) -> StudyResult<Json<TitleAvailableResponse>>
where
    S: StudyStore + Clone,
{
    state
        .mind_maps()
        .check_title(&set_id, user.user_id, &req.title)
        .await?;
    Ok(Json(TitleAvailableResponse { available: true }))
}

// ============================================================================
// Blocks
// ============================================================================

/// GET /api/sets/{setId}/blocks/leaderboard
pub async fn leaderboard<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
) -> StudyResult<Json<Vec<LeaderboardEntryResponse>>>
where
    S: StudyStore + Clone,
{
    let entries = state.blocks().leaderboard(&set_id, user.user_id).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(LeaderboardEntryResponse::from)
            .collect(),
    ))
}

/// POST /api/sets/{setId}/blocks/scores
pub async fn record_score<S>(
    State(state): State<StudyState<S>>,
    AuthUser(user): AuthUser,
    Path(set_id): Path<String>,
    Json(req): Json<ScoreRequest>,
) -> StudyResult<impl IntoResponse>
where
    S: StudyStore + Clone,
{
    let score = state
        .blocks()
        .record(&set_id, user.user_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ScoreResponse::from(score))))
}
