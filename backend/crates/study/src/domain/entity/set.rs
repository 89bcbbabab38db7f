//! FlashcardSet Entity

use chrono::{DateTime, Utc};
use kernel::id::{SetId, UserId};

use crate::domain::value_object::{PublicId, Title};

#[derive(Debug, Clone)]
pub struct FlashcardSet {
    pub set_id: SetId,
    pub public_id: PublicId,
    pub title: Title,
    pub user_id: UserId,
    pub is_public: bool,
    pub last_studied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FlashcardSet {
    pub fn new(user_id: UserId, title: Title, is_public: bool) -> Self {
        let now = Utc::now();
        Self {
            set_id: SetId::new(),
            public_id: PublicId::new(),
            title,
            user_id,
            is_public,
            last_studied_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Option<UserId>) -> bool {
        user_id == Some(self.user_id)
    }

    pub fn rename(&mut self, title: Title) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn set_visibility(&mut self, is_public: bool) {
        self.is_public = is_public;
        self.updated_at = Utc::now();
    }
}
