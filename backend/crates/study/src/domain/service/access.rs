//! Visibility and ownership rules
//!
//! Anything public can be read by anyone. Private things can only be read by
//! their owner, and every write needs the owner.

use kernel::id::UserId;

use crate::domain::entity::{FlashcardSet, MindMap};
use crate::error::{StudyError, StudyResult};

pub fn can_view(is_public: bool, owner: UserId, viewer: Option<UserId>) -> bool {
    is_public || viewer == Some(owner)
}

pub fn ensure_set_visible(set: &FlashcardSet, viewer: Option<UserId>) -> StudyResult<()> {
    if can_view(set.is_public, set.user_id, viewer) {
        Ok(())
    } else {
        Err(StudyError::Forbidden("This set is private"))
    }
}

pub fn ensure_set_owner(set: &FlashcardSet, user_id: UserId) -> StudyResult<()> {
    if set.is_owned_by(Some(user_id)) {
        Ok(())
    } else {
        Err(StudyError::Forbidden("Only the owner can modify this set"))
    }
}

/// Private mind maps answer 401 to anonymous callers and 403 to other users.
pub fn ensure_mind_map_visible(mind_map: &MindMap, viewer: Option<UserId>) -> StudyResult<()> {
    match viewer {
        _ if mind_map.is_public => Ok(()),
        None => Err(StudyError::Unauthenticated),
        Some(user_id) if user_id == mind_map.user_id => Ok(()),
        Some(_) => Err(StudyError::Forbidden("This mind map is private")),
    }
}

pub fn ensure_mind_map_owner(mind_map: &MindMap, user_id: UserId) -> StudyResult<()> {
    if mind_map.is_owned_by(Some(user_id)) {
        Ok(())
    } else {
        Err(StudyError::Forbidden("Only the owner can modify this mind map"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::Title;

    #[test]
    fn test_can_view() {
        let owner = UserId::new();
        assert!(can_view(true, owner, None));
        assert!(can_view(false, owner, Some(owner)));
        assert!(!can_view(false, owner, None));
        assert!(!can_view(false, owner, Some(UserId::new())));
    }

    #[test]
    fn test_set_rules() {
        let owner = UserId::new();
        let set = FlashcardSet::new(owner, Title::new("Private").unwrap(), false);

        assert!(ensure_set_visible(&set, Some(owner)).is_ok());
        assert!(matches!(
            ensure_set_visible(&set, None),
            Err(StudyError::Forbidden(_))
        ));
        assert!(ensure_set_owner(&set, owner).is_ok());
        assert!(ensure_set_owner(&set, UserId::new()).is_err());
    }

    #[test]
    fn test_private_mind_map_distinguishes_anonymous() {
        let owner = UserId::new();
        let set = FlashcardSet::new(owner, Title::new("Set").unwrap(), true);
        let mut mind_map = MindMap::new(&set, owner, Title::new("Map").unwrap(), false);

        assert!(matches!(
            ensure_mind_map_visible(&mind_map, None),
            Err(StudyError::Unauthenticated)
        ));
        assert!(matches!(
            ensure_mind_map_visible(&mind_map, Some(UserId::new())),
            Err(StudyError::Forbidden(_))
        ));
        assert!(ensure_mind_map_visible(&mind_map, Some(owner)).is_ok());

        mind_map.is_public = true;
        assert!(ensure_mind_map_visible(&mind_map, None).is_ok());
        assert!(ensure_mind_map_owner(&mind_map, UserId::new()).is_err());
    }
}
