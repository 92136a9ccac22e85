use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::stores::tabular::{ColumnRange, Row, TabularStore};
use crate::types::internal::auth::{Role, User};
use crate::types::list_query::{paginate, ListQuery, Page};

pub const USERS_TABLE: &str = "users";
pub const USER_COLUMNS: &[&str] = &["id", "name", "email", "password", "createdAt", "role"];

const ID: usize = 0;
const EMAIL: usize = 2;

fn user_from_row(row: &Row) -> User {
    let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
    User {
        id: cell(0),
        name: cell(1),
        email: cell(2),
        password_hash: cell(3),
        created_at: cell(4),
        role: Role::parse(&cell(5)).unwrap_or_default(),
    }
}

fn user_to_row(user: &User) -> Row {
    vec![
        user.id.clone(),
        user.name.clone(),
        user.email.clone(),
        user.password_hash.clone(),
        user.created_at.clone(),
        user.role.as_str().to_string(),
    ]
}

/// Repository for user accounts and their password hashes
///
/// Email uniqueness is checked by a full scan under the write lock, which
/// only covers writers inside this process.
pub struct CredentialStore {
    store: Arc<dyn TabularStore>,
    password_pepper: String,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    /// Create a new CredentialStore over the users table
    ///
    /// # Arguments
    /// * `store` - Tabular backend holding the `users` table
    /// * `password_pepper` - Secret mixed into every Argon2id hash (from SecretManager)
    pub fn new(store: Arc<dyn TabularStore>, password_pepper: String) -> Self {
        Self {
            store,
            password_pepper,
            write_lock: Mutex::new(()),
        }
    }

    fn range() -> ColumnRange {
        ColumnRange::leading(USER_COLUMNS.len())
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Constant-shape verification; malformed stored hashes never match
    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(password_hash) else {
            return false;
        };
        match self.argon2() {
            Ok(argon2) => argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// All rows including the header
    async fn raw_rows(&self) -> Result<Vec<Row>, InternalError> {
        Ok(self.store.fetch_range(USERS_TABLE, Self::range()).await?)
    }

    pub async fn all_users(&self) -> Result<Vec<User>, InternalError> {
        Ok(self.raw_rows().await?.iter().skip(1).map(user_from_row).collect())
    }

    /// Position (header included) and current value of the user with `id`
    async fn locate(&self, id: &str) -> Result<(usize, User), InternalError> {
        self.raw_rows()
            .await?
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.get(ID).map(String::as_str) == Some(id))
            .map(|(position, row)| (position, user_from_row(row)))
            .ok_or_else(|| CredentialError::UserNotFound(id.to_string()).into())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, InternalError> {
        Ok(self.all_users().await?.into_iter().find(|u| u.id == id))
    }

    /// Exact, case-sensitive match on the stored email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, InternalError> {
        Ok(self
            .raw_rows()
            .await?
            .iter()
            .skip(1)
            .find(|row| row.get(EMAIL).map(String::as_str) == Some(email))
            .map(user_from_row))
    }

    /// Page of users, optionally filtered by name or email
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, InternalError> {
        let users: Vec<User> = self
            .all_users()
            .await?
            .into_iter()
            .filter(|u| query.matches_search([u.name.as_str(), u.email.as_str()].into_iter()))
            .collect();
        Ok(paginate(users, query.page, query.limit))
    }

    /// Add a new user with a freshly hashed password
    ///
    /// # Returns
    /// * `Ok(User)` - The stored account
    /// * `Err(InternalError)` - DuplicateEmail if the email is already taken
    pub async fn add_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, InternalError> {
        let password_hash = self.hash_password(password)?;

        let _guard = self.write_lock.lock().await;
        if self.find_by_email(email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail(email.to_string()).into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            role,
        };
        self.store
            .append_row(USERS_TABLE, Self::range(), user_to_row(&user))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Verify credentials; unknown email and wrong password are indistinguishable
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, InternalError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash) {
            return Err(CredentialError::InvalidCredentials.into());
        }
        Ok(user)
    }

    /// Replace name, email and role; password and creation time are kept
    pub async fn update_profile(
        &self,
        id: &str,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<User, InternalError> {
        let _guard = self.write_lock.lock().await;
        let (position, current) = self.locate(id).await?;

        if let Some(owner) = self.find_by_email(email).await? {
            if owner.id != id {
                return Err(CredentialError::DuplicateEmail(email.to_string()).into());
            }
        }

        let updated = User {
            name: name.to_string(),
            email: email.to_string(),
            role,
            ..current
        };
        self.store
            .update_row(USERS_TABLE, position, Self::range(), user_to_row(&updated))
            .await?;

        tracing::info!(user_id = %id, "User profile updated");
        Ok(updated)
    }

    /// Check the current password, then store a hash of the new one
    pub async fn change_password(
        &self,
        id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), InternalError> {
        let _guard = self.write_lock.lock().await;
        let (position, user) = self.locate(id).await?;

        if !self.verify_password(current_password, &user.password_hash) {
            tracing::debug!(user_id = %id, "Current password mismatch");
            return Err(CredentialError::IncorrectPassword.into());
        }

        let updated = User {
            password_hash: self.hash_password(new_password)?,
            ..user
        };
        self.store
            .update_row(USERS_TABLE, position, Self::range(), user_to_row(&updated))
            .await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), InternalError> {
        let _guard = self.write_lock.lock().await;
        let (position, _) = self.locate(id).await?;
        self.store.delete_rows(USERS_TABLE, position, 1).await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("backend", &self.store.backend_tag())
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
