//! Loading parents from path parameters
//!
//! A malformed public id can never match a row, so it reads as "not found".

use kernel::id::SetId;

use crate::domain::entity::{Flashcard, FlashcardSet, MindMap};
use crate::domain::repository::{
    BackfillScope, FlashcardRepository, MindMapRepository, PublicIdBackfill, SetRepository,
};
use crate::domain::value_object::PublicId;
use crate::error::{StudyError, StudyResult};

pub(crate) async fn load_set<S>(store: &S, raw: &str) -> StudyResult<FlashcardSet>
where
    S: SetRepository + Sync,
{
    let public_id = PublicId::parse_str(raw).map_err(|_| StudyError::SetNotFound)?;
    store
        .find_set(&public_id)
        .await?
        .ok_or(StudyError::SetNotFound)
}

pub(crate) async fn load_flashcard<S>(store: &S, set_id: SetId, raw: &str) -> StudyResult<Flashcard>
where
    S: FlashcardRepository + Sync,
{
    let public_id = PublicId::parse_str(raw).map_err(|_| StudyError::FlashcardNotFound)?;
    store
        .find_flashcard(set_id, &public_id)
        .await?
        .ok_or(StudyError::FlashcardNotFound)
}

pub(crate) async fn load_mind_map<S>(store: &S, set_id: SetId, raw: &str) -> StudyResult<MindMap>
where
    S: MindMapRepository + Sync,
{
    let public_id = PublicId::parse_str(raw).map_err(|_| StudyError::MindMapNotFound)?;
    store
        .find_mind_map(set_id, &public_id)
        .await?
        .ok_or(StudyError::MindMapNotFound)
}

/// Give the set's cards and mind maps public ids before anything reads
/// them back.
pub(crate) async fn backfill_set<S>(store: &S, set: &FlashcardSet) -> StudyResult<()>
where
    S: PublicIdBackfill + Sync,
{
    let backfilled = store
        .backfill_public_ids(BackfillScope::Set(set.set_id))
        .await?;
    if backfilled > 0 {
        tracing::info!(set = %set.public_id, rows = backfilled, "Backfilled public ids");
    }
    Ok(())
}
