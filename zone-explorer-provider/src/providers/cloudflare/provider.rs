//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    ApiCredentials, CreateDnsRecordRequest, DnsRecord, InviteMemberRequest, Member, PurgeRequest,
    SslMode, UpdateDnsRecordRequest, Zone,
};

use super::http::with_query;
use super::{
    CloudflareDnsRecord, CloudflareMember, CloudflareProvider, CloudflareRecordBody,
    CloudflareSetting, CloudflareZone, PAGE_SIZE_COUNT, PAGE_SIZE_MEMBERS, PAGE_SIZE_RECORDS,
    PAGE_SIZE_ZONES,
};

impl CloudflareProvider {
    fn record_body(req: &CreateDnsRecordRequest) -> CloudflareRecordBody {
        CloudflareRecordBody {
            record_type: req.record_type.as_str().to_string(),
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            // Cloudflare rejects `proxied` on kinds that cannot be proxied.
            proxied: req.proxied.filter(|_| req.record_type.is_proxiable()),
            priority: req.priority.filter(|_| req.record_type.has_priority()),
            comment: req.comment.clone(),
        }
    }

    /// Convert a single-record response; an unsupported kind here means the
    /// API answered with something we cannot represent.
    fn single_record(&self, raw: CloudflareDnsRecord, zone_id: &str) -> Result<DnsRecord> {
        let record_type = raw.record_type.clone();
        raw.into_record(zone_id)
            .ok_or_else(|| self.parse_error(format!("unsupported record type {record_type}")))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        let result = match &self.credentials {
            ApiCredentials::ApiToken { .. } => self
                .get::<VerifyResponse>("/user/tokens/verify", ErrorContext::default())
                .await
                .map(|resp| resp.status == "active"),
            ApiCredentials::GlobalKey { .. } => self
                .get::<serde_json::Value>("/user", ErrorContext::default())
                .await
                .map(|_| true),
        };

        match result {
            Ok(valid) => Ok(valid),
            Err(ProviderError::InvalidCredentials { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn list_zones(&self, provider_account_id: Option<&str>) -> Result<Vec<Zone>> {
        let endpoint = match provider_account_id.filter(|id| !id.is_empty()) {
            Some(account_id) => with_query("/zones", &[("account.id", account_id.to_string())]),
            None => "/zones".to_string(),
        };
        let zones: Vec<CloudflareZone> = self
            .fetch_all_pages(&endpoint, PAGE_SIZE_ZONES, ErrorContext::default())
            .await?;
        Ok(zones.into_iter().map(CloudflareZone::into_zone).collect())
    }

    async fn count_records(&self, zone_id: &str) -> Result<u32> {
        let (items, result_info) = self
            .get_page::<serde_json::Value>(
                &format!("/zones/{zone_id}/dns_records"),
                1,
                PAGE_SIZE_COUNT,
                ErrorContext::zone(zone_id),
            )
            .await?;
        let count = result_info
            .and_then(|info| info.total_count)
            .unwrap_or_else(|| u32::try_from(items.len()).unwrap_or(u32::MAX));
        Ok(count)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let raw: Vec<CloudflareDnsRecord> = self
            .fetch_all_pages(
                &format!("/zones/{zone_id}/dns_records"),
                PAGE_SIZE_RECORDS,
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(raw
            .into_iter()
            .filter_map(|r| r.into_record(zone_id))
            .collect())
    }

    async fn list_members(&self, provider_account_id: &str) -> Result<Vec<Member>> {
        let raw: Vec<CloudflareMember> = self
            .fetch_all_pages(
                &format!("/accounts/{provider_account_id}/members"),
                PAGE_SIZE_MEMBERS,
                ErrorContext::default(),
            )
            .await?;
        Ok(raw.into_iter().map(CloudflareMember::into_member).collect())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        req: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        let context = ErrorContext {
            record_name: Some(req.name.clone()),
            ..ErrorContext::zone(zone_id)
        };
        let raw: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{zone_id}/dns_records"),
                &Self::record_body(req),
                context,
            )
            .await?;
        self.single_record(raw, zone_id)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        let context = ErrorContext {
            record_name: Some(req.name.clone()),
            ..ErrorContext::record(zone_id, record_id)
        };
        let raw: CloudflareDnsRecord = self
            .patch(
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &Self::record_body(req),
                context,
            )
            .await?;
        self.single_record(raw, zone_id)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            ErrorContext::record(zone_id, record_id),
        )
        .await
    }

    async fn set_proxied(
        &self,
        zone_id: &str,
        record_id: &str,
        proxied: bool,
    ) -> Result<DnsRecord> {
        #[derive(Serialize)]
        struct ProxiedBody {
            proxied: bool,
        }

        let path = format!("/zones/{zone_id}/dns_records/{record_id}");
        let current: CloudflareDnsRecord = self
            .get(&path, ErrorContext::record(zone_id, record_id))
            .await?;
        let current = self.single_record(current, zone_id)?;
        if !current.record_type.is_proxiable() {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "proxied".to_string(),
                detail: format!("{} records cannot be proxied", current.record_type),
            });
        }

        let raw: CloudflareDnsRecord = self
            .patch(
                &path,
                &ProxiedBody { proxied },
                ErrorContext::record(zone_id, record_id),
            )
            .await?;
        self.single_record(raw, zone_id)
    }

    async fn get_ssl_mode(&self, zone_id: &str) -> Result<SslMode> {
        let setting: CloudflareSetting = self
            .get(
                &format!("/zones/{zone_id}/settings/ssl"),
                ErrorContext::zone(zone_id),
            )
            .await?;
        parse_ssl_mode(&setting.value).ok_or_else(|| {
            self.parse_error(format!("unexpected ssl mode '{}'", setting.value))
        })
    }

    async fn set_ssl_mode(&self, zone_id: &str, mode: SslMode) -> Result<SslMode> {
        #[derive(Serialize)]
        struct SettingBody {
            value: &'static str,
        }

        let setting: CloudflareSetting = self
            .patch(
                &format!("/zones/{zone_id}/settings/ssl"),
                &SettingBody {
                    value: mode.as_str(),
                },
                ErrorContext::zone(zone_id),
            )
            .await?;
        parse_ssl_mode(&setting.value).ok_or_else(|| {
            self.parse_error(format!("unexpected ssl mode '{}'", setting.value))
        })
    }

    async fn purge_cache(&self, zone_id: &str, req: &PurgeRequest) -> Result<()> {
        let body = match req {
            PurgeRequest::Everything => serde_json::json!({ "purge_everything": true }),
            PurgeRequest::Urls(urls) => {
                if urls.is_empty() {
                    return Err(ProviderError::InvalidParameter {
                        provider: self.provider_name().to_string(),
                        param: "files".to_string(),
                        detail: "at least one URL is required".to_string(),
                    });
                }
                serde_json::json!({ "files": urls })
            }
        };
        let _: serde_json::Value = self
            .post(
                &format!("/zones/{zone_id}/purge_cache"),
                &body,
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(())
    }

    async fn invite_member(
        &self,
        provider_account_id: &str,
        req: &InviteMemberRequest,
    ) -> Result<Member> {
        #[derive(Serialize)]
        struct InviteBody<'a> {
            email: &'a str,
            roles: &'a [String],
            status: &'static str,
        }

        let raw: CloudflareMember = self
            .post(
                &format!("/accounts/{provider_account_id}/members"),
                &InviteBody {
                    email: &req.email,
                    roles: &req.role_ids,
                    status: "pending",
                },
                ErrorContext::default(),
            )
            .await?;
        Ok(raw.into_member())
    }

    async fn remove_member(&self, provider_account_id: &str, member_id: &str) -> Result<()> {
        self.delete(
            &format!("/accounts/{provider_account_id}/members/{member_id}"),
            ErrorContext::default(),
        )
        .await
    }
}

/// `strict` is what the dashboard calls "Full (strict)".
fn parse_ssl_mode(value: &str) -> Option<SslMode> {
    match value {
        "off" => Some(SslMode::Off),
        "flexible" => Some(SslMode::Flexible),
        "full" => Some(SslMode::Full),
        "strict" => Some(SslMode::Strict),
        _ => None,
    }
}
