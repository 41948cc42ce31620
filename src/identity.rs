//! Verified identities supplied by an external sign-in provider.
//!
//! The service trusts a resolved identity completely and never re-verifies
//! it; only the lookup from an opaque credential is modelled here.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::normalize_email;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns `Unauthorized` when the credential is not recognised.
    async fn resolve(&self, credential: &str) -> Result<Identity, AppError>;
}

/// Fixed credential table, for local runs and tests.
#[derive(Default)]
pub struct StaticIdentityResolver {
    credentials: DashMap<String, Identity>,
}

impl StaticIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, credential: impl Into<String>, mut identity: Identity) {
        identity.email = normalize_email(&identity.email);
        self.credentials.insert(credential.into(), identity);
    }

    /// Loads a JSON object mapping credential strings to identities.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            AppError::Internal(format!("failed to read {}: {err}", path.display()))
        })?;
        let table: HashMap<String, Identity> = serde_json::from_str(&raw).map_err(|err| {
            AppError::Internal(format!("invalid identity fixtures {}: {err}", path.display()))
        })?;

        let resolver = Self::new();
        for (credential, identity) in table {
            resolver.insert(credential, identity);
        }
        Ok(resolver)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, credential: &str) -> Result<Identity, AppError> {
        self.credentials
            .get(credential)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::Unauthorized("credential could not be verified".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_credential_with_normalized_email() {
        let resolver = StaticIdentityResolver::new();
        resolver.insert(
            "token-ana",
            Identity {
                email: "Ana@X.com".to_string(),
                name: "Ana".to_string(),
                picture: None,
            },
        );

        let identity = resolver.resolve("token-ana").await.unwrap();
        assert_eq!(identity.email, "ana@x.com");
        assert!(matches!(
            resolver.resolve("forged").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn loads_fixture_file() {
        let path = std::env::temp_dir().join(format!("identities-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{"t1": {"email": "b@x.com", "name": "Beto", "picture": "https://img/b.png"}}"#,
        )
        .unwrap();

        let resolver = StaticIdentityResolver::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(resolver.len(), 1);
    }
}
