//! User Entity
//!
//! Local mirror of an identity-provider account. Rows are created lazily
//! the first time a subject presents a valid token.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    nickname::Nickname, subject::ExternalSubject, user_id::UserId,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique public handle
    pub nickname: Nickname,
    /// Unique `sub` claim of the identity provider
    pub auth0_id: ExternalSubject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(nickname: Nickname, auth0_id: ExternalSubject) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            nickname,
            auth0_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adopt the nickname currently asserted by the identity provider.
    ///
    /// Returns `true` when the nickname actually changed.
    pub fn reconcile_nickname(&mut self, nickname: Nickname) -> bool {
        if self.nickname == nickname {
            return false;
        }
        self.nickname = nickname;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            Nickname::new("ada").unwrap(),
            ExternalSubject::new("auth0|1").unwrap(),
        )
    }

    #[test]
    fn test_reconcile_nickname_changes_only_on_difference() {
        let mut user = user();
        let before = user.updated_at;

        assert!(!user.reconcile_nickname(Nickname::new("ada").unwrap()));
        assert_eq!(user.updated_at, before);

        assert!(user.reconcile_nickname(Nickname::new("lovelace").unwrap()));
        assert_eq!(user.nickname.as_str(), "lovelace");
        assert!(user.updated_at >= before);
    }
}
