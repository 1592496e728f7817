//! Cloudflare HTTP 请求方法与响应信封处理

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::{ApiRequest, HttpMethod, HttpUtils};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::ResultInfo;

use super::types::CloudflareError;
use super::{CloudflareProvider, CloudflareResponse};

/// Append query parameters to a path that may already carry some.
pub(crate) fn with_query(path: &str, params: &[(&str, String)]) -> String {
    let mut url = path.to_string();
    for (name, value) in params {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(name);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

impl CloudflareProvider {
    /// Send a request and unwrap the response envelope.
    ///
    /// `success: false` is an error regardless of the HTTP status.
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        let url = format!("{}{path}", self.base_url);
        let (status, response_text) = self
            .transport
            .send(ApiRequest {
                method,
                url: &url,
                credentials: &self.credentials,
                body,
            })
            .await?;

        let cf_response: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;

        if !cf_response.success {
            let error = self.envelope_error(
                cf_response.errors.unwrap_or_default(),
                status,
                context,
            );
            if error.is_expected() {
                log::warn!("{} {url} rejected: {error}", method.as_str());
            } else {
                log::error!("{} {url} failed: {error}", method.as_str());
            }
            return Err(error);
        }

        Ok(cf_response)
    }

    /// Map a failed envelope: classification follows the first error code,
    /// the message joins every error message.
    fn envelope_error(
        &self,
        errors: Vec<CloudflareError>,
        status: u16,
        context: ErrorContext,
    ) -> ProviderError {
        let Some(first) = errors.first() else {
            let message = format!("Request failed (HTTP {status})");
            return match status {
                401 => ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(message),
                },
                403 => ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(message),
                },
                _ => self.map_error(RawApiError::new(message), context),
            };
        };
        let code = first.code.to_string();
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.map_error(RawApiError::with_code(code, message), context)
    }

    fn to_body<B: Serialize>(&self, body: &B) -> Result<serde_json::Value> {
        serde_json::to_value(body).map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.send_envelope::<T>(HttpMethod::Get, path, None, context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行单页 GET 请求，返回本页条目与分页信息
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        context: ErrorContext,
    ) -> Result<(Vec<T>, Option<ResultInfo>)> {
        let url = with_query(
            path,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        );
        let response = self
            .send_envelope::<Vec<T>>(HttpMethod::Get, &url, None, context)
            .await?;
        Ok((response.result.unwrap_or_default(), response.result_info))
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let body = self.to_body(body)?;
        self.send_envelope::<T>(HttpMethod::Post, path, Some(&body), context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 PATCH 请求
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let body = self.to_body(body)?;
        self.send_envelope::<T>(HttpMethod::Patch, path, Some(&body), context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.send_envelope::<serde_json::Value>(HttpMethod::Delete, path, None, context)
            .await?;
        Ok(())
    }
}
