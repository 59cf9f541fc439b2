//! The login check.
//!
//! [`authenticate`] looks the user up in the active store and verifies the
//! password. A configured [`OfflineAdmin`] is consulted only when the store
//! cannot answer (lookup error) or is the in-memory substitute and does not
//! know the user, so the warehouse can still log in while Postgres is down.
//!
//! Every rejected username still costs one Argon2 verification, so response
//! time does not reveal which usernames exist.

use std::sync::LazyLock;

use huecos_core::error::CoreError;
use huecos_core::roles::ROLE_ADMIN;
use huecos_core::types::DbId;
use huecos_db::models::user::{CreateUser, UserSummary};
use huecos_db::repositories::UserRepo;
use huecos_db::{Store, StoreError};
use serde::Serialize;

use crate::auth::jwt::{generate_access_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// User id carried by tokens issued through the escape hatch.
pub const OFFLINE_ADMIN_ID: DbId = 0;

const DEFAULT_OFFLINE_ADMIN_NAME: &str = "Administrator";

/// Hash verified against when there is no real hash to check.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("huecos-unknown-user").ok());

/// Credential pair accepted even when the store cannot serve user lookups.
///
/// The password is hashed as soon as it is loaded and only the hash is kept.
#[derive(Debug, Clone)]
pub struct OfflineAdmin {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

impl OfflineAdmin {
    pub fn new(
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            name: name.to_string(),
            role: ROLE_ADMIN.to_string(),
        })
    }

    /// Load the escape hatch from the environment.
    ///
    /// | Env Var                  | Required            | Default         |
    /// |--------------------------|---------------------|-----------------|
    /// | `OFFLINE_ADMIN_USERNAME` | to enable the hatch | --              |
    /// | `OFFLINE_ADMIN_PASSWORD` | to enable the hatch | --              |
    /// | `OFFLINE_ADMIN_NAME`     | no                  | `Administrator` |
    ///
    /// Returns `None` unless both username and password are set.
    ///
    /// # Panics
    ///
    /// Panics if the password cannot be hashed.
    pub fn from_env() -> Option<Self> {
        let username = non_empty_var("OFFLINE_ADMIN_USERNAME")?;
        let password = non_empty_var("OFFLINE_ADMIN_PASSWORD")?;
        let name = non_empty_var("OFFLINE_ADMIN_NAME")
            .unwrap_or_else(|| DEFAULT_OFFLINE_ADMIN_NAME.to_string());

        Some(
            Self::new(&username, &password, &name)
                .unwrap_or_else(|e| panic!("OFFLINE_ADMIN_PASSWORD could not be hashed: {e}")),
        )
    }

    fn summary(&self) -> UserSummary {
        UserSummary {
            id: OFFLINE_ADMIN_ID,
            username: self.username.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }

    /// `true` when the pair matches this admin. The password is verified
    /// even when the username differs.
    fn accepts(&self, username: &str, password: &str) -> AppResult<bool> {
        let password_ok = check_password(password, &self.password_hash)?;
        Ok(password_ok && self.username == username)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct AuthOutcome {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserSummary,
}

/// Check a username/password pair and issue a token.
///
/// Unknown users and wrong passwords fail identically with
/// [`CoreError::InvalidCredentials`].
pub async fn authenticate(
    store: &dyn Store,
    jwt: &JwtConfig,
    offline: Option<&OfflineAdmin>,
    username: &str,
    password: &str,
) -> AppResult<AuthOutcome> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(CoreError::Validation("Username and password are required".into()).into());
    }

    let user = match UserRepo::find_by_username(store, username).await {
        Ok(Some(user)) => {
            if check_password(password, &user.password_hash)? {
                UserSummary::from(&user)
            } else {
                tracing::warn!(username, "Login failed: wrong password");
                return Err(CoreError::InvalidCredentials.into());
            }
        }
        Ok(None) if store.mode().is_degraded() => {
            offline_login(offline, username, password)?.ok_or_else(|| {
                tracing::warn!(username, "Login failed: unknown user");
                AppError::Core(CoreError::InvalidCredentials)
            })?
        }
        Ok(None) => {
            verify_dummy(password);
            tracing::warn!(username, "Login failed: unknown user");
            return Err(CoreError::InvalidCredentials.into());
        }
        Err(e) => {
            tracing::error!(error = %e, username, "User lookup failed");
            match offline_login(offline, username, password)? {
                Some(user) => user,
                None => return Err(e.into()),
            }
        }
    };

    let token = generate_access_token(user.id, &user.username, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Login succeeded");

    Ok(AuthOutcome {
        token,
        expires_in: jwt.expires_in_secs(),
        user,
    })
}

fn offline_login(
    offline: Option<&OfflineAdmin>,
    username: &str,
    password: &str,
) -> AppResult<Option<UserSummary>> {
    let Some(admin) = offline else {
        verify_dummy(password);
        return Ok(None);
    };
    if !admin.accepts(username, password)? {
        return Ok(None);
    }
    tracing::warn!(username, "Offline admin credentials used");
    Ok(Some(admin.summary()))
}

fn check_password(password: &str, hash: &str) -> AppResult<bool> {
    verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
}

fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Insert the offline admin as a regular user if the store does not know it.
pub async fn bootstrap_offline_admin(
    store: &dyn Store,
    admin: &OfflineAdmin,
) -> Result<(), StoreError> {
    if UserRepo::find_by_username(store, &admin.username)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let input = CreateUser {
        username: admin.username.clone(),
        password_hash: admin.password_hash.clone(),
        name: admin.name.clone(),
        role: admin.role.clone(),
    };
    match UserRepo::create(store, &input).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "Offline admin added to user store");
            Ok(())
        }
        // Another instance inserted it first.
        Err(StoreError::Core(CoreError::DuplicateKey { .. })) => Ok(()),
        Err(e) => Err(e),
    }
}
