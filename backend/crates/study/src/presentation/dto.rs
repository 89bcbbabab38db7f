//! API DTOs (Data Transfer Objects)
//!
//! Field names are camelCase on the wire. Entities are addressed by their
//! public ids; internal UUIDs never leave the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::blocks::ScoreInput;
use crate::application::flashcards::CardPatchInput;
use crate::application::mind_maps::{
    ConnectionInput, CreateMindMapInput, LayoutInput, UpdateMindMapInput,
};
use crate::application::sets::{CardInput, CardOperation, CreateSetInput, SetDetails, UpdateSetInput};
use crate::domain::entity::{
    BlocksScore, Flashcard, LeaderboardEntry, MindMapConnection, MindMapGraph, MindMapNodeLayout,
};

// ============================================================================
// Sets and flashcards
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub term: String,
    pub solution: String,
    #[serde(default)]
    pub concept: Option<String>,
}

impl From<CardRequest> for CardInput {
    fn from(req: CardRequest) -> Self {
        Self {
            term: req.term,
            solution: req.solution,
            concept: req.concept,
        }
    }
}

/// `POST /api/sets`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub flashcards: Vec<CardRequest>,
}

impl From<CreateSetRequest> for CreateSetInput {
    fn from(req: CreateSetRequest) -> Self {
        Self {
            title: req.title,
            is_public: req.is_public,
            flashcards: req.flashcards.into_iter().map(CardInput::from).collect(),
        }
    }
}

/// Entry of the batch edit in `PUT /api/sets/{setId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardOperationRequest {
    pub id: Option<String>,
    pub term: String,
    pub solution: String,
    pub concept: Option<String>,
    pub should_create: bool,
    pub should_update: bool,
    pub should_delete: bool,
}

impl From<CardOperationRequest> for CardOperation {
    fn from(req: CardOperationRequest) -> Self {
        Self {
            id: req.id,
            card: CardInput {
                term: req.term,
                solution: req.solution,
                concept: req.concept,
            },
            should_create: req.should_create,
            should_update: req.should_update,
            should_delete: req.should_delete,
        }
    }
}

/// `PUT /api/sets/{setId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSetRequest {
    pub title: Option<String>,
    pub is_public: Option<bool>,
    pub flashcards: Option<Vec<CardOperationRequest>>,
}

impl From<UpdateSetRequest> for UpdateSetInput {
    fn from(req: UpdateSetRequest) -> Self {
        Self {
            title: req.title,
            is_public: req.is_public,
            flashcards: req
                .flashcards
                .map(|ops| ops.into_iter().map(CardOperation::from).collect()),
        }
    }
}

/// `PUT /api/sets/{setId}/flashcards/{flashcardId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCardRequest {
    pub term: Option<String>,
    pub solution: Option<String>,
    pub concept: Option<String>,
}

impl From<UpdateCardRequest> for CardPatchInput {
    fn from(req: UpdateCardRequest) -> Self {
        Self {
            term: req.term,
            solution: req.solution,
            concept: req.concept,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardResponse {
    pub id: String,
    pub term: String,
    pub solution: String,
    pub concept: String,
    pub difficulty: i32,
    pub times_reviewed: i32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub mastered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Flashcard> for FlashcardResponse {
    fn from(card: Flashcard) -> Self {
        Self {
            id: card.public_id.to_string(),
            term: card.term.as_str().to_string(),
            solution: card.solution.as_str().to_string(),
            concept: card.concept.as_str().to_string(),
            difficulty: card.difficulty,
            times_reviewed: card.times_reviewed,
            last_reviewed_at: card.last_reviewed_at,
            mastered: card.mastered,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetResponse {
    pub id: String,
    pub title: String,
    pub is_public: bool,
    pub is_owner: bool,
    pub last_studied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub flashcards: Vec<FlashcardResponse>,
}

impl From<SetDetails> for SetResponse {
    fn from(details: SetDetails) -> Self {
        let set = details.set;
        Self {
            id: set.public_id.to_string(),
            title: set.title.as_str().to_string(),
            is_public: set.is_public,
            is_owner: details.is_owner,
            last_studied_at: set.last_studied_at,
            created_at: set.created_at,
            updated_at: set.updated_at,
            flashcards: details
                .flashcards
                .into_iter()
                .map(FlashcardResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Mind maps
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub source_id: String,
    pub target_id: String,
    #[serde(default)]
    pub relationship: Option<String>,
}

impl From<ConnectionRequest> for ConnectionInput {
    fn from(req: ConnectionRequest) -> Self {
        Self {
            source_id: req.source_id,
            target_id: req.target_id,
            relationship: req.relationship,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub flashcard_id: String,
    pub x_position: f64,
    pub y_position: f64,
    #[serde(default)]
    pub data: Option<String>,
}

impl From<LayoutRequest> for LayoutInput {
    fn from(req: LayoutRequest) -> Self {
        Self {
            flashcard_id: req.flashcard_id,
            x_position: req.x_position,
            y_position: req.y_position,
            data: req.data,
        }
    }
}

fn connection_inputs(list: Option<Vec<ConnectionRequest>>) -> Option<Vec<ConnectionInput>> {
    list.map(|list| list.into_iter().map(ConnectionInput::from).collect())
}

fn layout_inputs(list: Option<Vec<LayoutRequest>>) -> Option<Vec<LayoutInput>> {
    list.map(|list| list.into_iter().map(LayoutInput::from).collect())
}

/// `POST /api/sets/{setId}/mindmaps`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMindMapRequest {
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub connections: Option<Vec<ConnectionRequest>>,
    #[serde(default)]
    pub node_layouts: Option<Vec<LayoutRequest>>,
}

impl From<CreateMindMapRequest> for CreateMindMapInput {
    fn from(req: CreateMindMapRequest) -> Self {
        Self {
            title: req.title,
            is_public: req.is_public,
            connections: connection_inputs(req.connections),
            layouts: layout_inputs(req.node_layouts),
        }
    }
}

/// `PUT /api/sets/{setId}/mindmaps/{mindMapId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMindMapRequest {
    pub title: Option<String>,
    pub is_public: Option<bool>,
    pub connections: Option<Vec<ConnectionRequest>>,
    pub node_layouts: Option<Vec<LayoutRequest>>,
}

impl From<UpdateMindMapRequest> for UpdateMindMapInput {
    fn from(req: UpdateMindMapRequest) -> Self {
        Self {
            title: req.title,
            is_public: req.is_public,
            connections: connection_inputs(req.connections),
            layouts: layout_inputs(req.node_layouts),
        }
    }
}

/// `POST /api/sets/{setId}/mindmaps/check-title`
#[derive(Debug, Clone, Deserialize)]
pub struct CheckTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleAvailableResponse {
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionResponse {
    pub source_id: String,
    pub target_id: String,
    pub relationship: String,
}

impl From<MindMapConnection> for ConnectionResponse {
    fn from(connection: MindMapConnection) -> Self {
        Self {
            source_id: connection.source.public_id.to_string(),
            target_id: connection.target.public_id.to_string(),
            relationship: connection.relationship.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub flashcard_id: String,
    pub x_position: f64,
    pub y_position: f64,
    pub data: String,
}

impl From<MindMapNodeLayout> for LayoutResponse {
    fn from(layout: MindMapNodeLayout) -> Self {
        Self {
            flashcard_id: layout.flashcard.public_id.to_string(),
            x_position: layout.x_position,
            y_position: layout.y_position,
            data: layout.data.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapResponse {
    pub id: String,
    pub set_id: String,
    pub title: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub connections: Vec<ConnectionResponse>,
    pub node_layouts: Vec<LayoutResponse>,
}

impl From<MindMapGraph> for MindMapResponse {
    fn from(graph: MindMapGraph) -> Self {
        let mind_map = graph.mind_map;
        Self {
            id: mind_map.public_id.to_string(),
            set_id: mind_map.set_public_id.to_string(),
            title: mind_map.title.as_str().to_string(),
            is_public: mind_map.is_public,
            created_at: mind_map.created_at,
            updated_at: mind_map.updated_at,
            connections: graph
                .connections
                .into_iter()
                .map(ConnectionResponse::from)
                .collect(),
            node_layouts: graph.layouts.into_iter().map(LayoutResponse::from).collect(),
        }
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// `POST /api/sets/{setId}/blocks/scores`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub correct_attempts: i64,
    pub total_attempts: i64,
    /// Round duration in seconds
    pub time: i64,
}

impl From<ScoreRequest> for ScoreInput {
    fn from(req: ScoreRequest) -> Self {
        Self {
            correct_attempts: req.correct_attempts,
            total_attempts: req.total_attempts,
            time_seconds: req.time,
        }
    }
}

/// Scores have no public id and are never addressed individually
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub time_seconds: i32,
    pub correct_attempts: i32,
    pub total_attempts: i32,
    pub played_at: DateTime<Utc>,
}

impl From<BlocksScore> for ScoreResponse {
    fn from(score: BlocksScore) -> Self {
        Self {
            time_seconds: score.time_seconds,
            correct_attempts: score.correct_attempts,
            total_attempts: score.total_attempts,
            played_at: score.played_at,
        }
    }
}

/// Entry of `GET /api/sets/{setId}/blocks/leaderboard`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryResponse {
    pub nickname: String,
    #[serde(flatten)]
    pub score: ScoreResponse,
}

impl From<LeaderboardEntry> for LeaderboardEntryResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            nickname: entry.nickname,
            score: ScoreResponse::from(entry.score),
        }
    }
}
