//! Tree node variants

use std::collections::HashMap;
use std::sync::Arc;

use zone_explorer_provider::{Member, MemberStatus};

use crate::types::{Account, AppRecord, AppZone, RecordCount};
use crate::xref::member_scope_names;

pub const TEAM_MEMBERS_LABEL: &str = "Team Members";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone)]
pub struct AccountNode {
    pub account: Account,
}

#[derive(Debug, Clone)]
pub struct ZoneNode {
    pub zone: AppZone,
}

#[derive(Debug, Clone)]
pub struct RecordNode {
    pub record: AppRecord,
}

/// Container for an account's members.
#[derive(Debug, Clone)]
pub struct TeamMembersNode {
    pub account_id: String,
    /// Cached member count at the time the node was built; 0 when unknown
    pub member_count: usize,
}

#[derive(Debug, Clone)]
pub struct MemberNode {
    pub account_id: String,
    pub member: Member,
    /// Shared zone-id→name lookup of the account
    pub zone_names: Arc<HashMap<String, String>>,
}

impl MemberNode {
    /// Zone names the member's policies are scoped to.
    pub fn domain_scopes(&self) -> Vec<String> {
        member_scope_names(&self.member, &self.zone_names)
    }
}

/// One node of the explorer tree.
#[derive(Debug, Clone)]
pub enum TreeNode {
    Account(AccountNode),
    Zone(ZoneNode),
    Record(RecordNode),
    TeamMembers(TeamMembersNode),
    Member(MemberNode),
    /// Children are being fetched by another request.
    Loading,
    /// The load failed; carries the message to show.
    Error(String),
    /// The load succeeded with nothing to show.
    Empty(String),
}

impl TreeNode {
    pub fn label(&self) -> String {
        match self {
            Self::Account(n) => n.account.name.clone(),
            Self::Zone(n) => n.zone.name.clone(),
            Self::Record(n) => format!("{} {}", n.record.record_type, n.record.name),
            Self::TeamMembers(_) => TEAM_MEMBERS_LABEL.to_string(),
            Self::Member(n) => n.member.display_name(),
            Self::Loading => LOADING_LABEL.to_string(),
            Self::Error(message) | Self::Empty(message) => message.clone(),
        }
    }

    /// Secondary text shown next to the label.
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Zone(n) => {
                let status = if n.zone.paused {
                    "paused"
                } else {
                    n.zone.status.as_str()
                };
                Some(match n.zone.record_count {
                    Some(RecordCount::Known(count)) => format!("{status} · {count} records"),
                    Some(RecordCount::Unknown) => format!("{status} · ? records"),
                    None => status.to_string(),
                })
            }
            Self::Record(n) => {
                let proxy = if n.record.is_proxiable() && n.record.proxied {
                    " (proxied)"
                } else {
                    ""
                };
                Some(format!("{} · {}{proxy}", n.record.content, n.record.ttl_label()))
            }
            Self::TeamMembers(n) => Some(format!("{} members", n.member_count)),
            Self::Member(n) => Some(match n.member.status {
                MemberStatus::Accepted => n.member.email.clone(),
                MemberStatus::Pending => format!("{} (pending)", n.member.email),
                MemberStatus::Rejected => format!("{} (rejected)", n.member.email),
            }),
            _ => None,
        }
    }

    /// Whether the node can have children.
    pub fn is_expandable(&self) -> bool {
        matches!(
            self,
            Self::Account(_) | Self::Zone(_) | Self::TeamMembers(_)
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Loading | Self::Error(_) | Self::Empty(_))
    }
}
