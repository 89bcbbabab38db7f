//! Mind Map Use Cases
//!
//! Writes go through a single repository call that stores the mind map row
//! and its child lists in one transaction. The graph check against the
//! set's flashcards happens inside that transaction.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::lookup::{backfill_set, load_mind_map, load_set};
use crate::domain::entity::{
    ConnectionDraft, LayoutDraft, MindMap, MindMapGraph, MindMapWrite,
};
use crate::domain::repository::{BackfillScope, StudyStore};
use crate::domain::service::access::{
    can_view, ensure_mind_map_owner, ensure_mind_map_visible, ensure_set_owner,
};
use crate::domain::value_object::Title;
use crate::error::{StudyError, StudyResult};

/// Requested edge between two cards of the set, by public id
#[derive(Debug, Clone, Default)]
pub struct ConnectionInput {
    pub source_id: String,
    pub target_id: String,
    pub relationship: Option<String>,
}

/// Requested node position of a card
#[derive(Debug, Clone, Default)]
pub struct LayoutInput {
    pub flashcard_id: String,
    pub x_position: f64,
    pub y_position: f64,
    pub data: Option<String>,
}

pub struct CreateMindMapInput {
    pub title: String,
    pub is_public: bool,
    pub connections: Option<Vec<ConnectionInput>>,
    pub layouts: Option<Vec<LayoutInput>>,
}

#[derive(Default)]
pub struct UpdateMindMapInput {
    pub title: Option<String>,
    pub is_public: Option<bool>,
    pub connections: Option<Vec<ConnectionInput>>,
    pub layouts: Option<Vec<LayoutInput>>,
}

fn connection_drafts(inputs: Option<Vec<ConnectionInput>>) -> StudyResult<Option<Vec<ConnectionDraft>>> {
    inputs
        .map(|inputs| {
            inputs
                .iter()
                .map(|c| ConnectionDraft::new(&c.source_id, &c.target_id, c.relationship.as_deref()))
                .collect()
        })
        .transpose()
}

fn layout_drafts(inputs: Option<Vec<LayoutInput>>) -> StudyResult<Option<Vec<LayoutDraft>>> {
    inputs
        .map(|inputs| {
            inputs
                .iter()
                .map(|l| LayoutDraft::new(&l.flashcard_id, l.x_position, l.y_position, l.data.as_deref()))
                .collect()
        })
        .transpose()
}

/// Mind Map Use Case
pub struct MindMapUseCase<S>
where
    S: StudyStore,
{
    store: Arc<S>,
}

impl<S> MindMapUseCase<S>
where
    S: StudyStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Mind maps of a set the caller may see. The set's own visibility is
    /// not consulted; each mind map carries its own flag.
    pub async fn list_for_set(
        &self,
        set_public_id: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<Vec<MindMapGraph>> {
        let set = load_set(&*self.store, set_public_id).await?;
        backfill_set(&*self.store, &set).await?;

        let mind_maps = self.store.list_mind_maps_by_set(set.set_id).await?;
        self.visible_graphs(mind_maps, viewer).await
    }

    pub async fn list_for_user(
        &self,
        nickname: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<Vec<MindMapGraph>> {
        let owner = self
            .store
            .find_user_id_by_nickname(nickname)
            .await?
            .ok_or(StudyError::UserNotFound)?;

        let backfilled = self
            .store
            .backfill_public_ids(BackfillScope::Owner(owner))
            .await?;
        if backfilled > 0 {
            tracing::info!(user_id = %owner, rows = backfilled, "Backfilled public ids");
        }

        let mind_maps = self.store.list_mind_maps_by_owner(owner).await?;
        self.visible_graphs(mind_maps, viewer).await
    }

    async fn visible_graphs(
        &self,
        mind_maps: Vec<MindMap>,
        viewer: Option<UserId>,
    ) -> StudyResult<Vec<MindMapGraph>> {
        let visible = mind_maps
            .into_iter()
            .filter(|m| can_view(m.is_public, m.user_id, viewer))
            .collect();
        self.store.load_graphs(visible).await
    }

    pub async fn get(
        &self,
        set_public_id: &str,
        mind_map_public_id: &str,
        viewer: Option<UserId>,
    ) -> StudyResult<MindMapGraph> {
        let set = load_set(&*self.store, set_public_id).await?;
        let mind_map = load_mind_map(&*self.store, set.set_id, mind_map_public_id).await?;
        ensure_mind_map_visible(&mind_map, viewer)?;
        backfill_set(&*self.store, &set).await?;

        self.store
            .load_graphs(vec![mind_map])
            .await?
            .pop()
            .ok_or(StudyError::MindMapNotFound)
    }

    pub async fn create(
        &self,
        set_public_id: &str,
        user_id: UserId,
        input: CreateMindMapInput,
    ) -> StudyResult<MindMapGraph> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;
        backfill_set(&*self.store, &set).await?;

        let title = Title::new(&input.title)?;
        if self
            .store
            .title_taken(set.set_id, user_id, &title, None)
            .await?
        {
            return Err(StudyError::DuplicateTitle);
        }

        let write = MindMapWrite {
            mind_map: MindMap::new(&set, user_id, title, input.is_public),
            connections: connection_drafts(input.connections)?,
            layouts: layout_drafts(input.layouts)?,
        };
        let graph = self.store.create_mind_map(&write).await?;

        tracing::info!(
            set = %set.public_id,
            mind_map = %graph.mind_map.public_id,
            connections = graph.connections.len(),
            layouts = graph.layouts.len(),
            "Mind map created"
        );
        Ok(graph)
    }

    pub async fn update(
        &self,
        set_public_id: &str,
        mind_map_public_id: &str,
        user_id: UserId,
        input: UpdateMindMapInput,
    ) -> StudyResult<MindMapGraph> {
        let set = load_set(&*self.store, set_public_id).await?;
        let mut mind_map = load_mind_map(&*self.store, set.set_id, mind_map_public_id).await?;
        ensure_mind_map_owner(&mind_map, user_id)?;
        backfill_set(&*self.store, &set).await?;

        if let Some(raw) = input.title.as_deref() {
            let title = Title::new(raw)?;
            if title != mind_map.title
                && self
                    .store
                    .title_taken(set.set_id, user_id, &title, Some(mind_map.mind_map_id))
                    .await?
            {
                return Err(StudyError::DuplicateTitle);
            }
            mind_map.title = title;
        }
        if let Some(is_public) = input.is_public {
            mind_map.is_public = is_public;
        }
        mind_map.touch();

        let write = MindMapWrite {
            mind_map,
            connections: connection_drafts(input.connections)?,
            layouts: layout_drafts(input.layouts)?,
        };
        let graph = self.store.update_mind_map(&write).await?;

        tracing::info!(
            set = %set.public_id,
            mind_map = %graph.mind_map.public_id,
            "Mind map updated"
        );
        Ok(graph)
    }

    /// Replace all connections of the mind map
    pub async fn replace_connections(
        &self,
        set_public_id: &str,
        mind_map_public_id: &str,
        user_id: UserId,
        connections: Vec<ConnectionInput>,
    ) -> StudyResult<()> {
        let input = UpdateMindMapInput {
            connections: Some(connections),
            ..Default::default()
        };
        self.update(set_public_id, mind_map_public_id, user_id, input)
            .await
            .map(|_| ())
    }

    /// Replace all node layouts of the mind map
    pub async fn replace_layouts(
        &self,
        set_public_id: &str,
        mind_map_public_id: &str,
        user_id: UserId,
        layouts: Vec<LayoutInput>,
    ) -> StudyResult<()> {
        let input = UpdateMindMapInput {
            layouts: Some(layouts),
            ..Default::default()
        };
        self.update(set_public_id, mind_map_public_id, user_id, input)
            .await
            .map(|_| ())
    }

    pub async fn delete(
        &self,
        set_public_id: &str,
        mind_map_public_id: &str,
        user_id: UserId,
    ) -> StudyResult<()> {
        let set = load_set(&*self.store, set_public_id).await?;
        let mind_map = load_mind_map(&*self.store, set.set_id, mind_map_public_id).await?;
        ensure_mind_map_owner(&mind_map, user_id)?;

        self.store.delete_mind_map(mind_map.mind_map_id).await?;

        tracing::info!(set = %set.public_id, mind_map = %mind_map.public_id, "Mind map deleted");
        Ok(())
    }

    /// `Ok(())` when the caller can create a mind map with this title
    pub async fn check_title(
        &self,
        set_public_id: &str,
        user_id: UserId,
        title: &str,
    ) -> StudyResult<()> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_owner(&set, user_id)?;

        let title = Title::new(title)?;
        if self
            .store
            .title_taken(set.set_id, user_id, &title, None)
            .await?
        {
            return Err(StudyError::DuplicateTitle);
        }
        Ok(())
    }
}
