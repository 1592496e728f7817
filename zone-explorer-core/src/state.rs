//! Explorer bootstrap
//!
//! Provides `ExplorerState` (service container) and `ExplorerStateBuilder`
//! (adapter injection). A host constructs the state once per session.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::{ExplorerSettings, SharedSettings};
use crate::error::{CoreError, CoreResult};
use crate::services::{ExplorerContext, ZoneActionService};
use crate::traits::{
    AccountStore, CloudflareProviderFactory, InMemoryProviderRegistry, ProviderFactory,
    ProviderRegistry,
};
use crate::tree::{TreeChange, TreeResolver, DEFAULT_EVENT_CAPACITY};

/// Holds the shared context and the services built on it.
pub struct ExplorerState {
    pub ctx: Arc<ExplorerContext>,
    pub resolver: TreeResolver,
    pub zone_actions: ZoneActionService,
}

impl ExplorerState {
    /// Receive tree change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TreeChange> {
        self.ctx.subscribe()
    }
}

/// Builder for constructing `ExplorerState` with host-specific adapters.
///
/// # Required adapters
/// - `account_store`: where accounts and their secrets live
///
/// # Optional
/// - `provider_factory`: defaults to `CloudflareProviderFactory`
/// - `provider_registry`: defaults to `InMemoryProviderRegistry`
/// - `settings`: defaults to `SharedSettings::default()`
/// - `event_capacity`: defaults to [`DEFAULT_EVENT_CAPACITY`]
pub struct ExplorerStateBuilder {
    account_store: Option<Arc<dyn AccountStore>>,
    provider_factory: Option<Arc<dyn ProviderFactory>>,
    provider_registry: Option<Arc<dyn ProviderRegistry>>,
    settings: Option<Arc<dyn ExplorerSettings>>,
    event_capacity: usize,
}

impl ExplorerStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            account_store: None,
            provider_factory: None,
            provider_registry: None,
            settings: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    #[must_use]
    pub fn account_store(mut self, store: Arc<dyn AccountStore>) -> Self {
        self.account_store = Some(store);
        self
    }

    #[must_use]
    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.provider_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn provider_registry(mut self, registry: Arc<dyn ProviderRegistry>) -> Self {
        self.provider_registry = Some(registry);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Arc<dyn ExplorerSettings>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Notifications a slow subscriber may lag behind before it starts
    /// missing them.
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the `ExplorerState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if the account store is missing.
    pub fn build(self) -> CoreResult<ExplorerState> {
        let account_store = self.account_store.ok_or_else(|| {
            CoreError::ValidationError("account_store is required".to_string())
        })?;
        let provider_factory = self
            .provider_factory
            .unwrap_or_else(|| Arc::new(CloudflareProviderFactory));
        let provider_registry = self
            .provider_registry
            .unwrap_or_else(|| Arc::new(InMemoryProviderRegistry::new()));
        let settings = self
            .settings
            .unwrap_or_else(|| Arc::new(SharedSettings::default()));

        let ctx = Arc::new(ExplorerContext::new(
            account_store,
            provider_factory,
            provider_registry,
            settings,
            self.event_capacity,
        ));

        Ok(ExplorerState {
            resolver: TreeResolver::new(Arc::clone(&ctx)),
            zone_actions: ZoneActionService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for ExplorerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
