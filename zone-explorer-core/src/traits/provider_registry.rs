//! Provider registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use zone_explorer_provider::DnsProvider;

use crate::types::Account;

/// A provider bound to the account it was built for.
#[derive(Clone)]
pub struct RegisteredAccount {
    /// Account as read from the store when the provider was built
    pub account: Account,
    pub provider: Arc<dyn DnsProvider>,
}

impl std::fmt::Debug for RegisteredAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAccount")
            .field("account", &self.account)
            .field("provider", &self.provider.id())
            .finish()
    }
}

/// Provider Registry Trait
///
/// Caches one provider per local account id so repeated loads reuse the same
/// HTTP client. Entries are evicted on refresh and on credential failures.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Register a provider for an account
    async fn register(&self, account_id: String, entry: RegisteredAccount);

    /// Drop the provider of an account
    async fn unregister(&self, account_id: &str);

    /// Get the provider of an account, if one was built
    async fn get(&self, account_id: &str) -> Option<RegisteredAccount>;

    /// List all registered `account_id`
    async fn list_account_ids(&self) -> Vec<String>;
}

/// In-memory Provider registry
#[derive(Clone, Default)]
pub struct InMemoryProviderRegistry {
    providers: Arc<RwLock<HashMap<String, RegisteredAccount>>>,
}

impl InMemoryProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn register(&self, account_id: String, entry: RegisteredAccount) {
        self.providers.write().await.insert(account_id, entry);
    }

    async fn unregister(&self, account_id: &str) {
        self.providers.write().await.remove(account_id);
    }

    async fn get(&self, account_id: &str) -> Option<RegisteredAccount> {
        self.providers.read().await.get(account_id).cloned()
    }

    async fn list_account_ids(&self) -> Vec<String> {
        self.providers.read().await.keys().cloned().collect()
    }
}
