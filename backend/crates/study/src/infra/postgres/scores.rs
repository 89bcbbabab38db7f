//! Blocks score persistence

use kernel::id::SetId;

use super::PgStudyRepository;
use super::rows::LeaderboardRow;
use crate::domain::entity::{BlocksScore, LeaderboardEntry};
use crate::domain::repository::ScoreRepository;
use crate::error::StudyResult;

impl ScoreRepository for PgStudyRepository {
    async fn record_score(&self, score: &BlocksScore) -> StudyResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blocks_scores
                (score_id, user_id, set_id, time_seconds, correct_attempts, total_attempts, played_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(score.score_id.as_uuid())
        .bind(score.user_id.as_uuid())
        .bind(score.set_id.as_uuid())
        .bind(score.time_seconds)
        .bind(score.correct_attempts)
        .bind(score.total_attempts)
        .bind(score.played_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn leaderboard(&self, set_id: SetId, limit: i64) -> StudyResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT s.score_id, s.user_id, s.set_id, s.time_seconds,
                   s.correct_attempts, s.total_attempts, s.played_at, u.nickname
            FROM blocks_scores s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.set_id = $1
            ORDER BY s.time_seconds ASC, s.played_at ASC
            LIMIT $2
            "#,
        )
        .bind(set_id.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LeaderboardRow::into_entry).collect())
    }
}
