//! Verified Identity
//!
//! What a successfully verified token tells us about the caller.

use crate::domain::value_object::{nickname::Nickname, subject::ExternalSubject};

#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: ExternalSubject,
    /// `None` when the token carries no usable nickname claim
    pub nickname: Option<Nickname>,
}

impl VerifiedIdentity {
    /// Nickname for a newly created user: the claim, or the subject when the
    /// token has none.
    pub fn nickname_or_subject(&self) -> Nickname {
        self.nickname
            .clone()
            .or_else(|| Nickname::from_claim(self.subject.as_str()))
            .unwrap_or_else(|| Nickname::from_db(self.subject.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_falls_back_to_subject() {
        let identity = VerifiedIdentity {
            subject: ExternalSubject::new("auth0|42").unwrap(),
            nickname: None,
        };
        assert_eq!(identity.nickname_or_subject().as_str(), "auth0|42");

        let identity = VerifiedIdentity {
            nickname: Nickname::from_claim("ada"),
            ..identity
        };
        assert_eq!(identity.nickname_or_subject().as_str(), "ada");
    }
}
