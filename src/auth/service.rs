use std::sync::Arc;

use validator::Validate;

use super::password::{hash_password, hash_password_blocking, verify_password_blocking};
use super::token::TokenCodec;
use super::SignUpRequest;
use crate::error::AppError;
use crate::models::NewUser;
use crate::repository::{username_taken, UserRepository};

// Verified against on unknown usernames so both rejection paths do the same work.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// Sign-up and sign-in.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
    hash_cost: u32,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codec: Arc<TokenCodec>,
        hash_cost: u32,
    ) -> Result<Self, AppError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, hash_cost)?;
        Ok(Self {
            users,
            codec,
            hash_cost,
            dummy_hash,
        })
    }

    /// Registers a new user and returns its id.
    ///
    /// Fails with `Validation` for malformed input or a username that is already
    /// registered; nothing is written in either case.
    pub async fn create_user(&self, input: SignUpRequest) -> Result<i32, AppError> {
        input.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(username_taken());
        }

        let password_hash = hash_password_blocking(input.password, self.hash_cost).await?;
        let id = self
            .users
            .create_user(NewUser {
                name: input.name,
                username: input.username,
                password_hash,
            })
            .await?;

        log::info!("registered user {}", id);
        Ok(id)
    }

    /// Checks the credentials and issues a session token.
    ///
    /// An unknown username and a wrong password both yield `AppError::Auth`.
    pub async fn generate_token(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.users.find_by_username(username).await?;

        let (user_id, stored_hash) = match user {
            Some(user) => (Some(user.id), user.password_hash),
            None => (None, self.dummy_hash.clone()),
        };
        let matches = verify_password_blocking(password.to_string(), stored_hash).await?;

        match user_id {
            Some(id) if matches => self.codec.sign(id),
            _ => {
                log::warn!("rejected sign-in attempt");
                Err(AppError::Auth)
            }
        }
    }
}
