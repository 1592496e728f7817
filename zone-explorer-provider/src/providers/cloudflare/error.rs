//! Cloudflare error code mapping
//!
//! Only the first code of a failed envelope decides the variant; the message
//! carried along is already the joined text of every envelope error.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

const UNKNOWN: &str = "<unknown>";

/// Reference: <https://developers.cloudflare.com/fundamentals/api/troubleshooting/>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        self.transport.provider_name()
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // 6003/6103/6111: malformed auth headers
            // 9109: unauthorized to access requested resource
            // 10000: authentication error
            Some("6003" | "6103" | "6111" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // 1004: DNS validation error
            // 9000: invalid or missing name
            // 9005/9006/9009: content does not match the record kind
            // 9021: invalid TTL
            // 9041: record cannot be proxied
            // 1007/1016: invalid zone setting value
            Some(
                code @ ("1004" | "1007" | "1016" | "9000" | "9005" | "9006" | "9009" | "9021"
                | "9041"),
            ) => {
                let param = match code {
                    "9000" => "name",
                    "9005" | "9006" | "9009" => "content",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    "1007" | "1016" => "value",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider,
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053..=81058: a record with that host / settings already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider,
                    record_name: context.record_name.unwrap_or_else(|| UNKNOWN.to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81044: record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider,
                record_id: context.record_id.unwrap_or_else(|| UNKNOWN.to_string()),
                raw_message: Some(raw.message),
            },

            // 81045: record quota exceeded
            // 1015: member seat limit reached
            Some("81045" | "1015") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            // 7000/7003: no route, usually an invalid zone identifier
            Some("7000" | "7003") => ProviderError::ZoneNotFound {
                provider,
                zone: context.zone.unwrap_or_else(|| UNKNOWN.to_string()),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}
