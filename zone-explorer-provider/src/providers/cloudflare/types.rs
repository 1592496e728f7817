//! Cloudflare API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    DnsRecord, DnsRecordType, Member, MemberPolicy, MemberRole, MemberStatus, PermissionGroup,
    ResourceGroup, ResultInfo, Zone, ZoneStatus,
};

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CloudflareError>>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i64,
    pub message: String,
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub paused: bool,
    pub account: Option<CloudflareAccountRef>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareAccountRef {
    pub id: String,
}

impl CloudflareZone {
    /// Unknown wire statuses are reported as `pending`: the zone exists but is not serving yet.
    pub fn into_zone(self) -> Zone {
        let status = ZoneStatus::parse(&self.status).unwrap_or_else(|| {
            log::warn!("Unknown zone status '{}' for zone {}", self.status, self.id);
            ZoneStatus::Pending
        });
        Zone {
            id: self.id,
            name: self.name,
            status,
            paused: self.paused,
            provider_account_id: self.account.map(|a| a.id),
        }
    }
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    pub zone_id: Option<String>,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: Option<bool>,
    pub priority: Option<u16>,
    pub comment: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub modified_on: Option<DateTime<Utc>>,
}

impl CloudflareDnsRecord {
    /// `None` when the record kind is not one this crate models.
    pub fn into_record(self, zone_id: &str) -> Option<DnsRecord> {
        let Some(record_type) = DnsRecordType::parse(&self.record_type) else {
            log::warn!(
                "Skipping record {} with unsupported type {}",
                self.id,
                self.record_type
            );
            return None;
        };
        Some(DnsRecord {
            id: self.id,
            zone_id: self.zone_id.unwrap_or_else(|| zone_id.to_string()),
            record_type,
            name: self.name,
            content: self.content,
            ttl: self.ttl,
            proxied: self.proxied.unwrap_or(false),
            priority: self.priority,
            comment: self.comment.filter(|c| !c.is_empty()),
            created_at: self.created_on,
            updated_at: self.modified_on,
        })
    }
}

/// Cloudflare DNS Record 请求体
#[derive(Debug, Serialize)]
pub struct CloudflareRecordBody {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Cloudflare 账户成员结构
#[derive(Debug, Deserialize)]
pub struct CloudflareMember {
    pub id: String,
    pub user: CloudflareMemberUser,
    pub status: String,
    #[serde(default)]
    pub roles: Vec<CloudflareRole>,
    #[serde(default)]
    pub policies: Vec<CloudflarePolicy>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareMemberUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub two_factor_authentication_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareRole {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflarePolicy {
    pub id: String,
    pub access: String,
    #[serde(default)]
    pub permission_groups: Vec<CloudflarePermissionGroup>,
    #[serde(default)]
    pub resource_groups: Vec<CloudflareResourceGroup>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflarePermissionGroup {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResourceGroup {
    pub id: String,
    pub name: Option<String>,
    pub scope: Option<CloudflareScope>,
}

/// 资源组作用域：`objects` 非空时以其为准，否则使用 `key`
#[derive(Debug, Deserialize)]
pub struct CloudflareScope {
    pub key: String,
    #[serde(default)]
    pub objects: Vec<CloudflareScopeObject>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareScopeObject {
    pub key: String,
}

impl CloudflareMember {
    pub fn into_member(self) -> Member {
        let status = match self.status.as_str() {
            "accepted" => MemberStatus::Accepted,
            "rejected" => MemberStatus::Rejected,
            _ => MemberStatus::Pending,
        };
        Member {
            id: self.id,
            email: self.user.email,
            first_name: self.user.first_name,
            last_name: self.user.last_name,
            status,
            two_factor_enabled: self.user.two_factor_authentication_enabled,
            roles: self
                .roles
                .into_iter()
                .map(|r| MemberRole {
                    id: r.id,
                    name: r.name,
                    description: r.description,
                })
                .collect(),
            policies: self
                .policies
                .into_iter()
                .map(CloudflarePolicy::into_policy)
                .collect(),
        }
    }
}

impl CloudflarePolicy {
    fn into_policy(self) -> MemberPolicy {
        MemberPolicy {
            id: self.id,
            access: self.access,
            permission_groups: self
                .permission_groups
                .into_iter()
                .map(|g| PermissionGroup {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            resource_groups: self
                .resource_groups
                .into_iter()
                .map(|g| {
                    let scope_keys = match g.scope {
                        Some(scope) if scope.objects.is_empty() => vec![scope.key],
                        Some(scope) => scope.objects.into_iter().map(|o| o.key).collect(),
                        None => Vec::new(),
                    };
                    ResourceGroup {
                        id: g.id,
                        name: g.name,
                        scope_keys,
                    }
                })
                .collect(),
        }
    }
}

/// Zone 设置项（如 `ssl`）
#[derive(Debug, Deserialize)]
pub struct CloudflareSetting {
    pub value: String,
}
