// seed-superadmin command implementation
// Creates the first superadmin account from environment variables

use crate::config::EnvironmentProvider;
use crate::stores::CredentialStore;
use crate::types::internal::auth::Role;

pub const SUPERADMIN_NAME: &str = "Super Admin";

#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { user_id: String },
    AlreadyExists,
}

/// Create the superadmin account unless its email is already registered
///
/// # Arguments
/// * `credential_store` - Users repository
/// * `env_provider` - Source of `SUPERADMIN_EMAIL` and `SUPERADMIN_PASSWORD`
///
/// # Returns
/// * `Ok(SeedOutcome)` - Whether a row was written
/// * `Err(...)` - Missing variables or a store failure
pub async fn seed_superadmin(
    credential_store: &CredentialStore,
    env_provider: &dyn EnvironmentProvider,
) -> Result<SeedOutcome, Box<dyn std::error::Error>> {
    let read = |name: &str| {
        env_provider
            .get_var(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| format!("{} must be set", name))
    };
    let email = read("SUPERADMIN_EMAIL")?;
    let password = read("SUPERADMIN_PASSWORD")?;

    if credential_store.find_by_email(&email).await?.is_some() {
        tracing::info!(email = %email, "Superadmin already exists, skipping");
        return Ok(SeedOutcome::AlreadyExists);
    }

    let user = credential_store
        .add_user(SUPERADMIN_NAME, &email, &password, Role::Superadmin)
        .await?;

    tracing::info!(user_id = %user.id, "Superadmin created");
    Ok(SeedOutcome::Created { user_id: user.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use crate::test::utils::memory_store;

    fn credential_store() -> CredentialStore {
        CredentialStore::new(memory_store(), "test-pepper-for-unit-tests".to_string())
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = credential_store();
        let env = MockEnvironment::empty()
            .with_var("SUPERADMIN_EMAIL", "root@pn.go.id")
            .with_var("SUPERADMIN_PASSWORD", "superadmin123");

        let first = seed_superadmin(&store, &env).await.unwrap();
        let second = seed_superadmin(&store, &env).await.unwrap();

        assert!(matches!(first, SeedOutcome::Created { .. }));
        assert_eq!(second, SeedOutcome::AlreadyExists);
        let users = store.all_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Superadmin);
        assert_eq!(users[0].name, SUPERADMIN_NAME);
    }

    #[tokio::test]
    async fn test_seed_requires_variables() {
        let store = credential_store();
        let env = MockEnvironment::empty().with_var("SUPERADMIN_EMAIL", "root@pn.go.id");

        let result = seed_superadmin(&store, &env).await;

        assert!(result.is_err());
        assert!(store.all_users().await.unwrap().is_empty());
    }
}
