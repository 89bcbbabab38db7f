//! Repository Traits
//!
//! Ports for persistence and key material. Implementations live in `infra`.

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::domain::entity::user::User;
use crate::domain::value_object::{nickname::Nickname, subject::ExternalSubject};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user. If a row for the same subject already exists (two
    /// first requests racing), the existing row is returned instead.
    async fn create(&self, user: &User) -> AuthResult<User>;

    async fn find_by_subject(&self, subject: &ExternalSubject) -> AuthResult<Option<User>>;

    async fn find_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>>;

    async fn update_nickname(&self, user: &User) -> AuthResult<()>;

    /// All users ordered by nickname
    async fn list(&self) -> AuthResult<Vec<User>>;
}

/// Source of token signature keys
#[trait_variant::make(KeySource: Send)]
pub trait LocalKeySource {
    /// Signature algorithm tokens must be signed with
    fn algorithm(&self) -> Algorithm;

    /// Key for the token header's `kid`
    async fn decoding_key(&self, kid: Option<&str>) -> AuthResult<DecodingKey>;
}
