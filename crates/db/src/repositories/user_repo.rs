//! Repository for the `users` table.

use huecos_core::error::CoreError;
use huecos_core::roles::is_known_role;

use crate::models::user::{CreateUser, User};
use crate::{Store, StoreError};

/// Provides user lookup and creation.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        store: &dyn Store,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(store.find_user_by_username(username).await?)
    }

    /// Insert a new user, failing with `DuplicateKey` if the username is taken.
    pub async fn create(store: &dyn Store, input: &CreateUser) -> Result<User, StoreError> {
        if input.username.trim().is_empty() {
            return Err(CoreError::Validation("Username must not be empty".into()).into());
        }
        if !is_known_role(&input.role) {
            return Err(CoreError::Validation(format!("Unknown role '{}'", input.role)).into());
        }

        store
            .insert_user(input)
            .await?
            .ok_or_else(|| {
                CoreError::DuplicateKey {
                    entity: "User",
                    id: input.username.clone(),
                }
                .into()
            })
    }
}
