//! Sync User Use Case
//!
//! Maps a verified identity onto a local user row: created on first sight,
//! nickname reconciled afterwards.

use std::sync::Arc;

use crate::domain::entity::{identity::VerifiedIdentity, user::User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct SyncUserUseCase<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<R>,
}

impl<R> SyncUserUseCase<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, identity: &VerifiedIdentity) -> AuthResult<User> {
        match self.user_repo.find_by_subject(&identity.subject).await? {
            None => self.create(identity).await,
            Some(mut user) => {
                // An absent claim never clears an existing nickname.
                let Some(claimed) = identity.nickname.clone() else {
                    return Ok(user);
                };
                if !user.reconcile_nickname(claimed) {
                    return Ok(user);
                }
                self.ensure_nickname_free(&user).await?;
                self.user_repo.update_nickname(&user).await?;

                tracing::info!(
                    user_id = %user.user_id,
                    nickname = %user.nickname,
                    "User nickname updated from identity provider"
                );
                Ok(user)
            }
        }
    }

    async fn create(&self, identity: &VerifiedIdentity) -> AuthResult<User> {
        let user = User::new(identity.nickname_or_subject(), identity.subject.clone());
        self.ensure_nickname_free(&user).await?;

        let stored = self.user_repo.create(&user).await?;

        if stored.user_id == user.user_id {
            tracing::info!(
                user_id = %stored.user_id,
                nickname = %stored.nickname,
                "User created on first sign-in"
            );
        }
        Ok(stored)
    }

    async fn ensure_nickname_free(&self, user: &User) -> AuthResult<()> {
        match self.user_repo.find_by_nickname(&user.nickname).await? {
            Some(other) if other.auth0_id != user.auth0_id => Err(AuthError::NicknameTaken),
            _ => Ok(()),
        }
    }
}
