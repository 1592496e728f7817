//! Cloudflare DNS Provider

mod error;
mod http;
mod pagination;
mod provider;
mod types;

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::{ApiTransport, ReqwestTransport};
use crate::types::ApiCredentials;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{
    CloudflareDnsRecord, CloudflareMember, CloudflareRecordBody, CloudflareResponse,
    CloudflareSetting, CloudflareZone,
};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API 单页记录数
pub(crate) const PAGE_SIZE_ZONES: u32 = 50;
/// Cloudflare DNS Records API 单页记录数
pub(crate) const PAGE_SIZE_RECORDS: u32 = 100;
/// Cloudflare Account Members API 单页记录数
pub(crate) const PAGE_SIZE_MEMBERS: u32 = 50;
/// 统计记录数时使用的页大小（API 允许的最小值）
pub(crate) const PAGE_SIZE_COUNT: u32 = 5;

/// Cloudflare DNS Provider
pub struct CloudflareProvider {
    pub(crate) transport: Arc<dyn ApiTransport>,
    pub(crate) credentials: ApiCredentials,
    pub(crate) base_url: String,
}

impl CloudflareProvider {
    /// Provider backed by the default `reqwest` transport.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        Ok(Self::with_transport(
            credentials,
            Arc::new(ReqwestTransport::new()?),
        ))
    }

    /// Provider using a caller-supplied transport.
    pub fn with_transport(credentials: ApiCredentials, transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            credentials,
            base_url: CF_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (e.g. for a local mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = match &self.credentials {
            ApiCredentials::ApiToken { api_token } => mask_secret(api_token),
            ApiCredentials::GlobalKey { api_key, .. } => mask_secret(api_key),
        };
        f.debug_struct("CloudflareProvider")
            .field("base_url", &self.base_url)
            .field("secret", &secret)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! Scripted transport replaying canned responses in order.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::CloudflareProvider;
    use crate::error::{ProviderError, Result};
    use crate::http_client::{ApiRequest, ApiTransport, HttpMethod};
    use crate::types::ApiCredentials;

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<(u16, String)>>>,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push_json(&self, body: serde_json::Value) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok((200, body.to_string())));
        }

        pub fn push_raw(&self, status: u16, body: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok((status, body.to_string())));
        }

        pub fn push_error(&self, error: ProviderError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        pub fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ApiTransport for ScriptedTransport {
        async fn send(&self, request: ApiRequest<'_>) -> Result<(u16, String)> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method: request.method,
                url: request.url.to_string(),
                body: request.body.cloned(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ProviderError::NetworkError {
                        provider: "cloudflare".to_string(),
                        detail: format!("no scripted response for {}", request.url),
                    })
                })
        }
    }

    pub fn provider(transport: &Arc<ScriptedTransport>) -> CloudflareProvider {
        CloudflareProvider::with_transport(
            ApiCredentials::token("test-token-12345"),
            transport.clone(),
        )
        .with_base_url("https://api.test/client/v4")
    }
}
