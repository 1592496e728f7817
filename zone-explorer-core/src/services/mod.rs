//! 业务逻辑服务层

mod zone_action_service;

pub use zone_action_service::ZoneActionService;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use zone_explorer_provider::ProviderError;

use crate::cache::ExplorerCache;
use crate::config::ExplorerSettings;
use crate::error::{CoreError, CoreResult};
use crate::traits::{AccountStore, ProviderFactory, ProviderRegistry, RegisteredAccount};
use crate::tree::TreeChange;

/// 服务上下文 - 持有所有依赖
///
/// Built once per editor session; the cache and the notification channel live
/// exactly as long as this context.
pub struct ExplorerContext {
    /// 账户与凭证存储
    pub account_store: Arc<dyn AccountStore>,
    /// Provider 构造器
    pub provider_factory: Arc<dyn ProviderFactory>,
    /// Provider 注册表
    pub provider_registry: Arc<dyn ProviderRegistry>,
    /// 用户配置（每次读取最新值）
    pub settings: Arc<dyn ExplorerSettings>,
    cache: Mutex<ExplorerCache>,
    events: broadcast::Sender<TreeChange>,
}

impl ExplorerContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        account_store: Arc<dyn AccountStore>,
        provider_factory: Arc<dyn ProviderFactory>,
        provider_registry: Arc<dyn ProviderRegistry>,
        settings: Arc<dyn ExplorerSettings>,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            account_store,
            provider_factory,
            provider_registry,
            settings,
            cache: Mutex::new(ExplorerCache::new()),
            events,
        }
    }

    /// Lock the cache. The guard is never held across an `.await`, so a
    /// dropped load can release its key from `Drop`.
    pub fn cache(&self) -> MutexGuard<'_, ExplorerCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeChange> {
        self.events.subscribe()
    }

    /// Emit a change notification. Having no subscriber is not an error.
    pub fn notify(&self, change: TreeChange) {
        log::debug!("Tree changed: {change:?}");
        let _ = self.events.send(change);
    }

    /// 获取账户的 Provider，首次使用时根据存储的凭证创建并注册
    pub async fn resolve_account(&self, account_id: &str) -> CoreResult<RegisteredAccount> {
        if let Some(entry) = self.provider_registry.get(account_id).await {
            return Ok(entry);
        }

        let bundle = self
            .account_store
            .find_with_credentials(account_id)
            .await?
            .ok_or_else(|| CoreError::CredentialsNotFound(account_id.to_string()))?;
        let provider = self.provider_factory.create(&bundle.credentials)?;
        let entry = RegisteredAccount {
            account: bundle.account,
            provider,
        };
        self.provider_registry
            .register(account_id.to_string(), entry.clone())
            .await;
        log::debug!("Registered provider for account {account_id}");
        Ok(entry)
    }

    /// Drop the cached provider so the next use re-reads the credentials.
    pub async fn evict_provider(&self, account_id: &str) {
        self.provider_registry.unregister(account_id).await;
    }

    /// Drop every cached provider.
    pub async fn evict_all_providers(&self) {
        for account_id in self.provider_registry.list_account_ids().await {
            self.provider_registry.unregister(&account_id).await;
        }
    }

    /// 处理 Provider 错误，如果是凭证失效则丢弃该账户的 Provider
    pub async fn handle_provider_error(&self, account_id: &str, err: ProviderError) -> CoreError {
        if let ProviderError::InvalidCredentials { .. } = &err {
            log::warn!("Credentials of account {account_id} rejected, dropping provider");
            self.evict_provider(account_id).await;
        }
        CoreError::Provider(err)
    }

    /// Records of a zone changed remotely: drop them and the account's zone
    /// list (record counts), then tell the tree.
    pub fn records_changed(&self, account_id: &str, zone_id: &str) {
        {
            let mut cache = self.cache();
            cache.invalidate_records(account_id, zone_id);
            cache.invalidate_zones(account_id);
        }
        self.notify(TreeChange::zone(account_id, zone_id));
        self.notify(TreeChange::account(account_id));
    }

    /// Membership of an account changed remotely.
    pub fn members_changed(&self, account_id: &str) {
        self.cache().invalidate_members(account_id);
        self.notify(TreeChange::team_members(account_id));
        self.notify(TreeChange::account(account_id));
    }
}
