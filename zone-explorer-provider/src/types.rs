use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Credentials ============

/// Credentials used to authenticate against the management API.
///
/// The variant decides which authentication headers are sent:
/// `ApiToken` uses `Authorization: Bearer`, `GlobalKey` uses the
/// `X-Auth-Email` / `X-Auth-Key` pair.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ApiCredentials {
    /// Scoped API token.
    #[serde(rename_all = "camelCase")]
    ApiToken {
        /// Token secret.
        api_token: String,
    },
    /// Legacy global API key.
    #[serde(rename_all = "camelCase")]
    GlobalKey {
        /// Login email of the key owner.
        email: String,
        /// Global API key secret.
        api_key: String,
    },
}

impl ApiCredentials {
    /// Shorthand for an API token credential.
    pub fn token(api_token: impl Into<String>) -> Self {
        Self::ApiToken {
            api_token: api_token.into(),
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken { .. } => f
                .debug_struct("ApiToken")
                .field("api_token", &"<REDACTED>")
                .finish(),
            Self::GlobalKey { email, .. } => f
                .debug_struct("GlobalKey")
                .field("email", email)
                .field("api_key", &"<REDACTED>")
                .finish(),
        }
    }
}

// ============ Pagination ============

/// Pagination block returned alongside list results.
///
/// Every field is optional on the wire; single-page collections may omit
/// the block entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultInfo {
    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size used for this request.
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Number of items in this page.
    #[serde(default)]
    pub count: Option<u32>,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_count: Option<u32>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl ResultInfo {
    /// Total number of pages reported (or derivable) by the server.
    ///
    /// Falls back to `total_count / per_page` when `total_pages` is missing,
    /// and to a single page when neither is available.
    pub fn page_total(&self) -> u32 {
        if let Some(total_pages) = self.total_pages {
            return total_pages;
        }
        match (self.total_count, self.per_page) {
            (Some(total), Some(per_page)) if per_page > 0 => total.div_ceil(per_page),
            _ => 1,
        }
    }
}

// ============ Zone Types ============

/// Status of a zone within the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Zone is active and resolving.
    Active,
    /// Zone is waiting for nameserver delegation.
    Pending,
    /// Zone is being set up.
    Initializing,
    /// Zone has been moved to another provider.
    Moved,
    /// Zone has been deleted.
    Deleted,
    /// Zone has been deactivated.
    Deactivated,
}

impl ZoneStatus {
    /// Parse the wire status string.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "initializing" => Some(Self::Initializing),
            "moved" => Some(Self::Moved),
            "deleted" => Some(Self::Deleted),
            "deactivated" => Some(Self::Deactivated),
            _ => None,
        }
    }

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Initializing => "initializing",
            Self::Moved => "moved",
            Self::Deleted => "deleted",
            Self::Deactivated => "deactivated",
        }
    }
}

/// A zone (domain) managed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Provider zone identifier.
    pub id: String,
    /// Zone apex name (e.g., `"example.com"`).
    pub name: String,
    /// Current zone status.
    pub status: ZoneStatus,
    /// Whether the zone is paused (DNS only, no proxying).
    pub paused: bool,
    /// Provider account that owns the zone, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_account_id: Option<String>,
}

// ============ DNS Record Types ============

/// DNS record kinds supported by the management API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Caa,
    Cert,
    Cname,
    Dnskey,
    Ds,
    Https,
    Loc,
    Mx,
    Naptr,
    Ns,
    Openpgpkey,
    Ptr,
    Smimea,
    Srv,
    Sshfp,
    Svcb,
    Tlsa,
    Txt,
    Uri,
}

impl DnsRecordType {
    /// Every supported record kind, in wire-name order.
    pub const ALL: [Self; 21] = [
        Self::A,
        Self::Aaaa,
        Self::Caa,
        Self::Cert,
        Self::Cname,
        Self::Dnskey,
        Self::Ds,
        Self::Https,
        Self::Loc,
        Self::Mx,
        Self::Naptr,
        Self::Ns,
        Self::Openpgpkey,
        Self::Ptr,
        Self::Smimea,
        Self::Srv,
        Self::Sshfp,
        Self::Svcb,
        Self::Tlsa,
        Self::Txt,
        Self::Uri,
    ];

    /// Wire name (upper case).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cert => "CERT",
            Self::Cname => "CNAME",
            Self::Dnskey => "DNSKEY",
            Self::Ds => "DS",
            Self::Https => "HTTPS",
            Self::Loc => "LOC",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Ns => "NS",
            Self::Openpgpkey => "OPENPGPKEY",
            Self::Ptr => "PTR",
            Self::Smimea => "SMIMEA",
            Self::Srv => "SRV",
            Self::Sshfp => "SSHFP",
            Self::Svcb => "SVCB",
            Self::Tlsa => "TLSA",
            Self::Txt => "TXT",
            Self::Uri => "URI",
        }
    }

    /// Parse a record kind, ignoring ASCII case.
    pub fn parse(record_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(record_type))
    }

    /// Only address and alias records can be served through the proxy.
    pub fn is_proxiable(self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }

    /// Record kinds that carry a priority field.
    pub fn has_priority(self) -> bool {
        matches!(self, Self::Mx | Self::Srv | Self::Uri)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TTL value that means "automatic".
pub const AUTO_TTL: u32 = 1;

/// A DNS record within a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider record identifier.
    pub id: String,
    /// Zone the record belongs to.
    pub zone_id: String,
    /// Record kind.
    pub record_type: DnsRecordType,
    /// Fully-qualified record name.
    pub name: String,
    /// Record content (address, target, text...).
    pub content: String,
    /// TTL in seconds; [`AUTO_TTL`] means automatic.
    pub ttl: u32,
    /// Whether traffic is proxied. Only meaningful for proxiable kinds.
    pub proxied: bool,
    /// Priority (MX/SRV/URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DnsRecord {
    /// Whether the TTL is the "automatic" sentinel.
    pub fn is_auto_ttl(&self) -> bool {
        self.ttl == AUTO_TTL
    }
}

/// Create DNS record request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnsRecordRequest {
    /// Record kind.
    pub record_type: DnsRecordType,
    /// Record name (relative or fully qualified).
    pub name: String,
    /// Record content.
    pub content: String,
    /// TTL in seconds; [`AUTO_TTL`] means automatic.
    pub ttl: u32,
    /// Proxy flag (ignored for non-proxiable kinds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Priority (MX/SRV/URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Update DNS record request.
///
/// Same shape as [`CreateDnsRecordRequest`]; the record is replaced field by field.
pub type UpdateDnsRecordRequest = CreateDnsRecordRequest;

// ============ Member Types ============

/// Membership status of an account member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Accepted,
    Pending,
    Rejected,
}

/// A direct account-level role grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRole {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A permission group referenced by a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A resource group referenced by a policy.
///
/// `scope_keys` lists every scope key the group covers, e.g.
/// `com.cloudflare.api.account.zone.<zone_id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub scope_keys: Vec<String>,
}

/// A domain-scoped grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPolicy {
    pub id: String,
    /// `allow` or `deny`.
    pub access: String,
    pub permission_groups: Vec<PermissionGroup>,
    pub resource_groups: Vec<ResourceGroup>,
}

/// A member of a provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub status: MemberStatus,
    pub two_factor_enabled: bool,
    pub roles: Vec<MemberRole>,
    pub policies: Vec<MemberPolicy>,
}

impl Member {
    /// Full name when known, otherwise the email.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() || !last.is_empty() => {
                format!("{first} {last}").trim().to_string()
            }
            (Some(first), None) if !first.is_empty() => first.to_string(),
            (None, Some(last)) if !last.is_empty() => last.to_string(),
            _ => self.email.clone(),
        }
    }
}

/// Invite member request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    /// Email address to invite.
    pub email: String,
    /// Role identifiers to grant.
    pub role_ids: Vec<String>,
}

// ============ Zone Settings ============

/// SSL/TLS encryption mode of a zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Off,
    Flexible,
    Full,
    Strict,
}

impl SslMode {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Flexible => "flexible",
            Self::Full => "full",
            Self::Strict => "strict",
        }
    }
}

/// Cache purge request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "urls", rename_all = "camelCase")]
pub enum PurgeRequest {
    /// Purge every cached asset of the zone.
    Everything,
    /// Purge the listed URLs only.
    Urls(Vec<String>),
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_parse_is_case_insensitive() {
        assert_eq!(DnsRecordType::parse("aaaa"), Some(DnsRecordType::Aaaa));
        assert_eq!(DnsRecordType::parse("OPENPGPKEY"), Some(DnsRecordType::Openpgpkey));
        assert_eq!(DnsRecordType::parse("SPF"), None);
    }

    #[test]
    fn record_type_wire_names_round_trip() {
        for t in DnsRecordType::ALL {
            assert_eq!(DnsRecordType::parse(t.as_str()), Some(t));
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn only_address_and_alias_records_are_proxiable() {
        let proxiable: Vec<_> = DnsRecordType::ALL
            .into_iter()
            .filter(|t| t.is_proxiable())
            .collect();
        assert_eq!(
            proxiable,
            vec![DnsRecordType::A, DnsRecordType::Aaaa, DnsRecordType::Cname]
        );
    }

    #[test]
    fn page_total_prefers_total_pages() {
        let info = ResultInfo {
            total_pages: Some(3),
            total_count: Some(100),
            per_page: Some(5),
            ..ResultInfo::default()
        };
        assert_eq!(info.page_total(), 3);
    }

    #[test]
    fn page_total_derived_from_count() {
        let info = ResultInfo {
            total_count: Some(101),
            per_page: Some(50),
            ..ResultInfo::default()
        };
        assert_eq!(info.page_total(), 3);
        assert_eq!(ResultInfo::default().page_total(), 1);
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds = ApiCredentials::GlobalKey {
            email: "ops@example.com".to_string(),
            api_key: "super-secret".to_string(),
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("ops@example.com"));
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn member_display_name_falls_back_to_email() {
        let mut member = Member {
            id: "m1".to_string(),
            email: "jo@example.com".to_string(),
            first_name: None,
            last_name: None,
            status: MemberStatus::Accepted,
            two_factor_enabled: false,
            roles: vec![],
            policies: vec![],
        };
        assert_eq!(member.display_name(), "jo@example.com");
        member.first_name = Some("Jo".to_string());
        member.last_name = Some("Doe".to_string());
        assert_eq!(member.display_name(), "Jo Doe");
    }
}
