//! Record cache key

use std::fmt;

/// Key of the records table: the zone id scoped by its local account id.
///
/// Kept as two fields so that ids containing the `:` separator can never
/// collide; the `a:z` form is only used for display and logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub account_id: String,
    pub zone_id: String,
}

impl RecordKey {
    pub fn new(account_id: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            zone_id: zone_id.into(),
        }
    }

    pub fn belongs_to(&self, account_id: &str) -> bool {
        self.account_id == account_id
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.account_id, self.zone_id)
    }
}
