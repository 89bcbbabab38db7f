//! Blocks Game Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::StudyConfig;
use crate::application::lookup::load_set;
use crate::domain::entity::{BlocksScore, LeaderboardEntry};
use crate::domain::repository::StudyStore;
use crate::domain::service::access::ensure_set_visible;
use crate::error::StudyResult;

/// Submitted round result. Kept signed so negative input is rejected with
/// a message rather than a deserialization failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInput {
    pub correct_attempts: i64,
    pub total_attempts: i64,
    pub time_seconds: i64,
}

/// Blocks Use Case
pub struct BlocksUseCase<S>
where
    S: StudyStore,
{
    store: Arc<S>,
    config: Arc<StudyConfig>,
}

impl<S> BlocksUseCase<S>
where
    S: StudyStore,
{
    pub fn new(store: Arc<S>, config: Arc<StudyConfig>) -> Self {
        Self { store, config }
    }

    pub async fn leaderboard(
        &self,
        set_public_id: &str,
        user_id: UserId,
    ) -> StudyResult<Vec<LeaderboardEntry>> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_visible(&set, Some(user_id))?;

        self.store
            .leaderboard(set.set_id, self.config.leaderboard_limit)
            .await
    }

    pub async fn record(
        &self,
        set_public_id: &str,
        user_id: UserId,
        input: ScoreInput,
    ) -> StudyResult<BlocksScore> {
        let set = load_set(&*self.store, set_public_id).await?;
        ensure_set_visible(&set, Some(user_id))?;

        let score = BlocksScore::new(
            user_id,
            set.set_id,
            input.correct_attempts,
            input.total_attempts,
            input.time_seconds,
        )?;
        self.store.record_score(&score).await?;

        tracing::info!(
            set = %set.public_id,
            user_id = %user_id,
            time_seconds = score.time_seconds,
            "Blocks score recorded"
        );
        Ok(score)
    }
}
