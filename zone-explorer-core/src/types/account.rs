//! 账户相关类型定义

use serde::{Deserialize, Serialize};

use zone_explorer_provider::ApiCredentials;

/// 账户信息
///
/// Owned by the account store; the explorer only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Local account identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Identifier of the account on the provider side; may be empty when unknown
    #[serde(default)]
    pub provider_account_id: String,
}

impl Account {
    /// Provider account id, `None` when not configured.
    #[must_use]
    pub fn provider_account_id(&self) -> Option<&str> {
        Some(self.provider_account_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// An account together with its secret, as handed out by the account store.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub credentials: ApiCredentials,
}
