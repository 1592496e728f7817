//! Provider factory.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::CloudflareProvider;
use crate::traits::DnsProvider;
use crate::types::ApiCredentials;

/// Creates a [`DnsProvider`] from stored credentials.
///
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` so it can be
/// shared across async tasks and cached by the caller.
///
/// # Examples
///
/// ```rust,no_run
/// use zone_explorer_provider::{ApiCredentials, create_provider};
///
/// let provider = create_provider(ApiCredentials::token("your-token")).unwrap();
/// assert_eq!(provider.id(), "cloudflare");
/// ```
///
/// # Errors
///
/// Fails only when the HTTP client cannot be constructed.
pub fn create_provider(credentials: ApiCredentials) -> Result<Arc<dyn DnsProvider>> {
    Ok(Arc::new(CloudflareProvider::new(credentials)?))
}
