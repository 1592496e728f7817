//! 账户存储抽象 Trait

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{Account, AccountCredentials, ApiCredentials};

/// Account Store Trait
///
/// Read-only view of the host's accounts and credential vault.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// List all accounts in display order.
    ///
    /// Returns an empty list when the store has not been initialized.
    async fn list_accounts(&self) -> CoreResult<Vec<Account>>;

    /// Get an account together with its secret.
    ///
    /// # Returns
    /// * `Ok(Some(bundle))` - account and credentials found
    /// * `Ok(None)` - account unknown, or its secret is missing
    async fn find_with_credentials(&self, account_id: &str)
        -> CoreResult<Option<AccountCredentials>>;
}

/// In-memory account store
///
/// Keeps insertion order for [`AccountStore::list_accounts`].
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
    credentials: RwLock<HashMap<String, ApiCredentials>>,
}

impl InMemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account. `None` credentials leave the account without a secret.
    pub async fn insert(&self, account: Account, credentials: Option<ApiCredentials>) {
        let id = account.id.clone();
        {
            let mut accounts = self.accounts.write().await;
            match accounts.iter_mut().find(|a| a.id == id) {
                Some(existing) => *existing = account,
                None => accounts.push(account),
            }
        }
        let mut store = self.credentials.write().await;
        match credentials {
            Some(credentials) => {
                store.insert(id, credentials);
            }
            None => {
                store.remove(&id);
            }
        }
    }

    /// Replace the secret of an existing account.
    pub async fn set_credentials(
        &self,
        account_id: &str,
        credentials: ApiCredentials,
    ) -> CoreResult<()> {
        if !self.accounts.read().await.iter().any(|a| a.id == account_id) {
            return Err(CoreError::AccountNotFound(account_id.to_string()));
        }
        self.credentials
            .write()
            .await
            .insert(account_id.to_string(), credentials);
        Ok(())
    }

    pub async fn remove(&self, account_id: &str) {
        self.accounts.write().await.retain(|a| a.id != account_id);
        self.credentials.write().await.remove(account_id);
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn list_accounts(&self) -> CoreResult<Vec<Account>> {
        Ok(self.accounts.read().await.clone())
    }

    async fn find_with_credentials(
        &self,
        account_id: &str,
    ) -> CoreResult<Option<AccountCredentials>> {
        let Some(account) = self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
        else {
            return Ok(None);
        };
        let credentials = self.credentials.read().await.get(account_id).cloned();
        Ok(credentials.map(|credentials| AccountCredentials {
            account,
            credentials,
        }))
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {id}"),
            provider_account_id: format!("cf-{id}"),
        }
    }

    #[tokio::test]
    async fn missing_secret_collapses_to_none() {
        let store = InMemoryAccountStore::new();
        store.insert(account("a1"), None).await;
        store
            .insert(account("a2"), Some(ApiCredentials::token("t")))
            .await;

        assert!(store.find_with_credentials("a1").await.unwrap().is_none());
        assert!(store.find_with_credentials("nope").await.unwrap().is_none());
        let bundle = store.find_with_credentials("a2").await.unwrap().unwrap();
        assert_eq!(bundle.account.provider_account_id, "cf-a2");
    }

    #[tokio::test]
    async fn insert_keeps_order_and_replaces_in_place() {
        let store = InMemoryAccountStore::new();
        store.insert(account("b"), None).await;
        store.insert(account("a"), None).await;
        let mut renamed = account("b");
        renamed.name = "Renamed".to_string();
        store.insert(renamed, None).await;

        let accounts = store.list_accounts().await.unwrap();
        let ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(accounts[0].name, "Renamed");
    }

    #[tokio::test]
    async fn set_credentials_requires_account() {
        let store = InMemoryAccountStore::new();
        let err = store
            .set_credentials("ghost", ApiCredentials::token("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AccountNotFound(_)));
    }
}
