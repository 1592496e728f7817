//! Provider construction seam

use std::sync::Arc;

use zone_explorer_provider::{create_provider, DnsProvider};

use crate::error::CoreResult;
use crate::types::ApiCredentials;

/// Builds a [`DnsProvider`] from an account's credentials.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, credentials: &ApiCredentials) -> CoreResult<Arc<dyn DnsProvider>>;
}

/// Factory for the Cloudflare management API over HTTPS.
#[derive(Debug, Default, Clone, Copy)]
pub struct CloudflareProviderFactory;

impl ProviderFactory for CloudflareProviderFactory {
    fn create(&self, credentials: &ApiCredentials) -> CoreResult<Arc<dyn DnsProvider>> {
        Ok(create_provider(credentials.clone())?)
    }
}
