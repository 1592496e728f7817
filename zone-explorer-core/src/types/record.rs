//! DNS record type as held by the explorer cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zone_explorer_provider::{DnsRecord, DnsRecordType, AUTO_TTL};

/// Application layer DNS record (including `account_id`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: String,
    pub zone_id: String,
    pub account_id: String,
    pub record_type: DnsRecordType,
    pub name: String,
    pub content: String,
    /// Seconds; [`AUTO_TTL`] means automatic
    pub ttl: u32,
    /// Only meaningful for proxiable kinds (A, AAAA, CNAME)
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AppRecord {
    #[must_use]
    pub fn from_provider(record: DnsRecord, account_id: String) -> Self {
        Self {
            id: record.id,
            zone_id: record.zone_id,
            account_id,
            record_type: record.record_type,
            name: record.name,
            content: record.content,
            ttl: record.ttl,
            proxied: record.proxied,
            priority: record.priority,
            comment: record.comment,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// TTL for display: `Auto` or seconds.
    #[must_use]
    pub fn ttl_label(&self) -> String {
        if self.ttl == AUTO_TTL {
            "Auto".to_string()
        } else {
            format!("{}s", self.ttl)
        }
    }

    /// Whether the proxy flag is relevant for this record.
    #[must_use]
    pub fn is_proxiable(&self) -> bool {
        self.record_type.is_proxiable()
    }
}
