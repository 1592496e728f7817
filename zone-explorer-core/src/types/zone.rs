//! Zone type as held by the explorer cache

use serde::{Deserialize, Serialize};

use zone_explorer_provider::{Zone, ZoneStatus};

/// Number of DNS records in a zone, as far as the explorer knows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RecordCount {
    Known(u32),
    /// The count fetch failed; the zone itself loaded fine.
    Unknown,
}

/// Application layer zone type (including `account_id`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppZone {
    /// Zone ID
    pub id: String,
    /// Zone (domain) name
    pub name: String,
    /// Local account ID
    pub account_id: String,
    /// Zone status
    pub status: ZoneStatus,
    /// Whether the zone is paused (DNS only, no proxying)
    pub paused: bool,
    /// Record count; `None` when counting is turned off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<RecordCount>,
}

impl AppZone {
    /// Construct application layer zone from provider layer zone
    #[must_use]
    pub fn from_provider(zone: Zone, account_id: String) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            account_id,
            status: zone.status,
            paused: zone.paused,
            record_count: None,
        }
    }

    #[must_use]
    pub fn with_record_count(mut self, count: RecordCount) -> Self {
        self.record_count = Some(count);
        self
    }
}
