//! Study Configuration

/// Tunables of the study context
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// Maximum rows returned by a blocks leaderboard
    pub leaderboard_limit: i64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            leaderboard_limit: 100,
        }
    }
}

impl StudyConfig {
    pub fn with_leaderboard_limit(mut self, limit: i64) -> Self {
        self.leaderboard_limit = limit.max(1);
        self
    }
}
