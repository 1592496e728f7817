//! Change notifications for the tree view

use serde::Serialize;

/// Default capacity of the notification channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Which part of the tree must be re-pulled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeChange {
    /// The whole tree
    All,
    /// An account node and its subtree
    #[serde(rename_all = "camelCase")]
    Account { account_id: String },
    /// A zone node and its records
    #[serde(rename_all = "camelCase")]
    Zone { account_id: String, zone_id: String },
    /// The Team Members container of an account
    #[serde(rename_all = "camelCase")]
    TeamMembers { account_id: String },
}

impl TreeChange {
    pub fn account(account_id: &str) -> Self {
        Self::Account {
            account_id: account_id.to_string(),
        }
    }

    pub fn zone(account_id: &str, zone_id: &str) -> Self {
        Self::Zone {
            account_id: account_id.to_string(),
            zone_id: zone_id.to_string(),
        }
    }

    pub fn team_members(account_id: &str) -> Self {
        Self::TeamMembers {
            account_id: account_id.to_string(),
        }
    }
}
