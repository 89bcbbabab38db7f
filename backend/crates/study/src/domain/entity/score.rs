//! BlocksScore Entity

use chrono::{DateTime, Utc};
use kernel::id::{ScoreId, SetId, UserId};

use crate::error::{StudyError, StudyResult};

/// One finished round of the blocks game
#[derive(Debug, Clone)]
pub struct BlocksScore {
    pub score_id: ScoreId,
    pub user_id: UserId,
    pub set_id: SetId,
    pub time_seconds: i32,
    pub correct_attempts: i32,
    pub total_attempts: i32,
    pub played_at: DateTime<Utc>,
}

impl BlocksScore {
    pub fn new(
        user_id: UserId,
        set_id: SetId,
        correct_attempts: i64,
        total_attempts: i64,
        time_seconds: i64,
    ) -> StudyResult<Self> {
        let correct_attempts = non_negative("correctAttempts", correct_attempts)?;
        let total_attempts = non_negative("totalAttempts", total_attempts)?;
        let time_seconds = non_negative("time", time_seconds)?;
        if correct_attempts > total_attempts {
            return Err(StudyError::Validation(
                "correctAttempts cannot exceed totalAttempts".to_string(),
            ));
        }

        Ok(Self {
            score_id: ScoreId::new(),
            user_id,
            set_id,
            time_seconds,
            correct_attempts,
            total_attempts,
            played_at: Utc::now(),
        })
    }
}

fn non_negative(field: &str, value: i64) -> StudyResult<i32> {
    if value < 0 {
        return Err(StudyError::Validation(format!("{field} must not be negative")));
    }
    i32::try_from(value).map_err(|_| StudyError::Validation(format!("{field} is too large")))
}

/// A score with the player's nickname
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub score: BlocksScore,
    pub nickname: String,
}
