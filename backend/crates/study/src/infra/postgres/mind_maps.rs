//! Mind map persistence
//!
//! Creating or updating a mind map is one transaction: write the mind map
//! row, then, for every child list present in the request, resolve it
//! against the set's flashcards, delete the old rows and insert the new
//! ones. Any failure rolls everything back.

use std::collections::HashMap;

use kernel::id::{FlashcardId, MindMapId, SetId, UserId};
use sqlx::{PgConnection, Postgres, Transaction};
use uuid::Uuid;

use super::rows::{ConnectionRow, LayoutRow, MIND_MAP_COLUMNS, MindMapRow};
use super::{PgStudyRepository, map_title_conflict};
use crate::domain::entity::{
    FlashcardRef, MindMap, MindMapConnection, MindMapGraph, MindMapNodeLayout, MindMapWrite,
};
use crate::domain::repository::MindMapRepository;
use crate::domain::service::graph::{FlashcardIndex, resolve_connections, resolve_layouts};
use crate::domain::value_object::{PublicId, Title};
use crate::error::{StudyError, StudyResult};

const MIND_MAP_FROM: &str = "mind_maps m JOIN flashcard_sets s ON s.set_id = m.set_id";

/// Cards of the set that can be referenced, locked against concurrent
/// deletion until the transaction ends.
async fn flashcard_index(conn: &mut PgConnection, set_id: SetId) -> StudyResult<FlashcardIndex> {
    let rows: Vec<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT flashcard_id, public_id
        FROM flashcards
        WHERE set_id = $1 AND public_id IS NOT NULL
        FOR SHARE
        "#,
    )
    .bind(set_id.as_uuid())
    .fetch_all(conn)
    .await?;

    let cards = rows.into_iter().filter_map(|(id, public_id)| {
        let public_id = PublicId::parse_str(&public_id).ok()?;
        Some(FlashcardRef {
            flashcard_id: FlashcardId::from_uuid(id),
            public_id,
        })
    });
    Ok(FlashcardIndex::new(cards))
}

async fn replace_connections(
    tx: &mut Transaction<'_, Postgres>,
    connections: &[MindMapConnection],
    mind_map_id: MindMapId,
) -> StudyResult<()> {
    sqlx::query("DELETE FROM mind_map_connections WHERE mind_map_id = $1")
        .bind(mind_map_id.as_uuid())
        .execute(&mut **tx)
        .await?;

    for (position, connection) in connections.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO mind_map_connections
                (connection_id, mind_map_id, source_id, target_id, relationship, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(connection.connection_id.as_uuid())
        .bind(mind_map_id.as_uuid())
        .bind(connection.source.flashcard_id.as_uuid())
        .bind(connection.target.flashcard_id.as_uuid())
        .bind(connection.relationship.as_str())
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

async fn replace_layouts(
    tx: &mut Transaction<'_, Postgres>,
    layouts: &[MindMapNodeLayout],
    mind_map_id: MindMapId,
) -> StudyResult<()> {
    sqlx::query("DELETE FROM mind_map_node_layouts WHERE mind_map_id = $1")
        .bind(mind_map_id.as_uuid())
        .execute(&mut **tx)
        .await?;

    for (position, layout) in layouts.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO mind_map_node_layouts
                (layout_id, mind_map_id, flashcard_id, x_position, y_position, data, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(layout.layout_id.as_uuid())
        .bind(mind_map_id.as_uuid())
        .bind(layout.flashcard.flashcard_id.as_uuid())
        .bind(layout.x_position)
        .bind(layout.y_position)
        .bind(layout.data.as_str())
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Resolve and store the child lists present in `write`
async fn write_children(
    tx: &mut Transaction<'_, Postgres>,
    write: &MindMapWrite,
) -> StudyResult<()> {
    if write.connections.is_none() && write.layouts.is_none() {
        return Ok(());
    }

    let mind_map = &write.mind_map;
    let index = flashcard_index(&mut **tx, mind_map.set_id).await?;

    if let Some(drafts) = &write.connections {
        let connections = resolve_connections(mind_map.mind_map_id, &index, drafts)?;
        replace_connections(tx, &connections, mind_map.mind_map_id).await?;
    }
    if let Some(drafts) = &write.layouts {
        let layouts = resolve_layouts(mind_map.mind_map_id, &index, drafts)?;
        replace_layouts(tx, &layouts, mind_map.mind_map_id).await?;
    }

    Ok(())
}

impl PgStudyRepository {
    async fn graph_of(&self, mind_map: MindMap) -> StudyResult<MindMapGraph> {
        let mut graphs = self.load_graphs(vec![mind_map]).await?;
        graphs
            .pop()
            .ok_or_else(|| StudyError::Internal("mind map vanished after write".to_string()))
    }
}

impl MindMapRepository for PgStudyRepository {
    async fn find_mind_map(
        &self,
        set_id: SetId,
        public_id: &PublicId,
    ) -> StudyResult<Option<MindMap>> {
        let sql = format!(
            "SELECT {MIND_MAP_COLUMNS} FROM {MIND_MAP_FROM} WHERE m.set_id = $1 AND m.public_id = $2"
        );
        let row = sqlx::query_as::<_, MindMapRow>(&sql)
            .bind(set_id.as_uuid())
            .bind(public_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MindMapRow::into_mind_map).transpose()
    }

    async fn title_taken(
        &self,
        set_id: SetId,
        user_id: UserId,
        title: &Title,
        except: Option<MindMapId>,
    ) -> StudyResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM mind_maps
                WHERE set_id = $1 AND user_id = $2 AND title = $3
                  AND ($4::uuid IS NULL OR mind_map_id <> $4)
            )
            "#,
        )
        .bind(set_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(title.as_str())
        .bind(except.map(MindMapId::into_uuid))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn list_mind_maps_by_set(&self, set_id: SetId) -> StudyResult<Vec<MindMap>> {
        let sql = format!(
            "SELECT {MIND_MAP_COLUMNS} FROM {MIND_MAP_FROM} WHERE m.set_id = $1 ORDER BY m.created_at"
        );
        let rows = sqlx::query_as::<_, MindMapRow>(&sql)
            .bind(set_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MindMapRow::into_mind_map).collect()
    }

    async fn list_mind_maps_by_owner(&self, user_id: UserId) -> StudyResult<Vec<MindMap>> {
        let sql = format!(
            "SELECT {MIND_MAP_COLUMNS} FROM {MIND_MAP_FROM} WHERE m.user_id = $1 \
             ORDER BY m.created_at DESC"
        );
        let rows = sqlx::query_as::<_, MindMapRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MindMapRow::into_mind_map).collect()
    }

    async fn load_graphs(&self, mind_maps: Vec<MindMap>) -> StudyResult<Vec<MindMapGraph>> {
        if mind_maps.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = mind_maps.iter().map(|m| m.mind_map_id.into_uuid()).collect();

        let connection_rows = sqlx::query_as::<_, ConnectionRow>(
            r#"
            SELECT c.connection_id, c.mind_map_id,
                   c.source_id, src.public_id AS source_public_id,
                   c.target_id, tgt.public_id AS target_public_id,
                   c.relationship
            FROM mind_map_connections c
            JOIN flashcards src ON src.flashcard_id = c.source_id
            JOIN flashcards tgt ON tgt.flashcard_id = c.target_id
            WHERE c.mind_map_id = ANY($1)
            ORDER BY c.mind_map_id, c.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let layout_rows = sqlx::query_as::<_, LayoutRow>(
            r#"
            SELECT l.layout_id, l.mind_map_id,
                   l.flashcard_id, f.public_id AS flashcard_public_id,
                   l.x_position, l.y_position, l.data
            FROM mind_map_node_layouts l
            JOIN flashcards f ON f.flashcard_id = l.flashcard_id
            WHERE l.mind_map_id = ANY($1)
            ORDER BY l.mind_map_id, l.position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut connections: HashMap<MindMapId, Vec<MindMapConnection>> = HashMap::new();
        for row in connection_rows {
            let mind_map_id = row.mind_map_id();
            connections
                .entry(mind_map_id)
                .or_default()
                .push(row.into_connection()?);
        }

        let mut layouts: HashMap<MindMapId, Vec<MindMapNodeLayout>> = HashMap::new();
        for row in layout_rows {
            let mind_map_id = row.mind_map_id();
            layouts
                .entry(mind_map_id)
                .or_default()
                .push(row.into_layout()?);
        }

        Ok(mind_maps
            .into_iter()
            .map(|mind_map| MindMapGraph {
                connections: connections.remove(&mind_map.mind_map_id).unwrap_or_default(),
                layouts: layouts.remove(&mind_map.mind_map_id).unwrap_or_default(),
                mind_map,
            })
            .collect())
    }

    async fn create_mind_map(&self, write: &MindMapWrite) -> StudyResult<MindMapGraph> {
        let mind_map = &write.mind_map;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO mind_maps
                (mind_map_id, public_id, set_id, user_id, title, is_public, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(mind_map.mind_map_id.as_uuid())
        .bind(mind_map.public_id.as_str())
        .bind(mind_map.set_id.as_uuid())
        .bind(mind_map.user_id.as_uuid())
        .bind(mind_map.title.as_str())
        .bind(mind_map.is_public)
        .bind(mind_map.created_at)
        .bind(mind_map.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_title_conflict)?;

        write_children(&mut tx, write).await?;
        tx.commit().await?;

        self.graph_of(mind_map.clone()).await
    }

    async fn update_mind_map(&self, write: &MindMapWrite) -> StudyResult<MindMapGraph> {
        let mind_map = &write.mind_map;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE mind_maps SET
                title = $2,
                is_public = $3,
                updated_at = $4
            WHERE mind_map_id = $1
            "#,
        )
        .bind(mind_map.mind_map_id.as_uuid())
        .bind(mind_map.title.as_str())
        .bind(mind_map.is_public)
        .bind(mind_map.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_title_conflict)?;

        write_children(&mut tx, write).await?;
        tx.commit().await?;

        self.graph_of(mind_map.clone()).await
    }

    async fn delete_mind_map(&self, mind_map_id: MindMapId) -> StudyResult<()> {
        sqlx::query("DELETE FROM mind_maps WHERE mind_map_id = $1")
            .bind(mind_map_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
