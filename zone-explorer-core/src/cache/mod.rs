//! Multi-level explorer cache
//!
//! Three independent tables: zones by account, records by (account, zone),
//! members by account. Each key carries its own load state (see [`slot`]).
//!
//! All operations are plain in-memory map operations. The cache is owned by
//! [`ExplorerContext`](crate::services::ExplorerContext) behind a mutex that
//! is never held across an `.await`. There is no eviction: cardinality is
//! bounded by what the user has expanded during the session.

mod key;
mod slot;

use std::sync::Arc;

use zone_explorer_provider::Member;

use crate::types::{AppRecord, AppZone};

pub use key::RecordKey;
pub use slot::{CacheTable, Claim, SlotState};

#[derive(Debug, Default)]
pub struct ExplorerCache {
    zones: CacheTable<String, AppZone>,
    records: CacheTable<RecordKey, AppRecord>,
    members: CacheTable<String, Member>,
}

impl ExplorerCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Zones =====

    pub fn get_zones(&self, account_id: &str) -> Option<Arc<Vec<AppZone>>> {
        self.zones.get(&account_id.to_string())
    }

    pub fn set_zones(&mut self, account_id: &str, zones: Vec<AppZone>) {
        self.zones.set(account_id.to_string(), zones);
    }

    pub fn invalidate_zones(&mut self, account_id: &str) {
        self.zones.invalidate(&account_id.to_string());
    }

    pub fn zones_state(&self, account_id: &str) -> SlotState {
        self.zones.state(&account_id.to_string())
    }

    pub(crate) fn claim_zones(&mut self, account_id: &str) -> Claim<AppZone> {
        self.zones.claim(&account_id.to_string())
    }

    pub(crate) fn complete_zones(
        &mut self,
        account_id: &str,
        zones: Vec<AppZone>,
    ) -> (Arc<Vec<AppZone>>, bool) {
        self.zones.complete(account_id.to_string(), zones)
    }

    pub(crate) fn abort_zones(&mut self, account_id: &str) -> bool {
        self.zones.abort(&account_id.to_string())
    }

    // ===== Records =====

    pub fn get_records(&self, account_id: &str, zone_id: &str) -> Option<Arc<Vec<AppRecord>>> {
        self.records.get(&RecordKey::new(account_id, zone_id))
    }

    pub fn set_records(&mut self, account_id: &str, zone_id: &str, records: Vec<AppRecord>) {
        self.records.set(RecordKey::new(account_id, zone_id), records);
    }

    pub fn invalidate_records(&mut self, account_id: &str, zone_id: &str) {
        self.records.invalidate(&RecordKey::new(account_id, zone_id));
    }

    pub fn records_state(&self, account_id: &str, zone_id: &str) -> SlotState {
        self.records.state(&RecordKey::new(account_id, zone_id))
    }

    pub(crate) fn claim_records(&mut self, key: &RecordKey) -> Claim<AppRecord> {
        self.records.claim(key)
    }

    pub(crate) fn complete_records(
        &mut self,
        key: RecordKey,
        records: Vec<AppRecord>,
    ) -> (Arc<Vec<AppRecord>>, bool) {
        self.records.complete(key, records)
    }

    pub(crate) fn abort_records(&mut self, key: &RecordKey) -> bool {
        self.records.abort(key)
    }

    // ===== Members =====

    pub fn get_members(&self, account_id: &str) -> Option<Arc<Vec<Member>>> {
        self.members.get(&account_id.to_string())
    }

    pub fn set_members(&mut self, account_id: &str, members: Vec<Member>) {
        self.members.set(account_id.to_string(), members);
    }

    pub fn invalidate_members(&mut self, account_id: &str) {
        self.members.invalidate(&account_id.to_string());
    }

    pub fn members_state(&self, account_id: &str) -> SlotState {
        self.members.state(&account_id.to_string())
    }

    /// Cached member count, 0 when absent.
    pub fn member_count(&self, account_id: &str) -> usize {
        self.get_members(account_id).map_or(0, |m| m.len())
    }

    pub(crate) fn claim_members(&mut self, account_id: &str) -> Claim<Member> {
        self.members.claim(&account_id.to_string())
    }

    pub(crate) fn complete_members(
        &mut self,
        account_id: &str,
        members: Vec<Member>,
    ) -> (Arc<Vec<Member>>, bool) {
        self.members.complete(account_id.to_string(), members)
    }

    pub(crate) fn abort_members(&mut self, account_id: &str) -> bool {
        self.members.abort(&account_id.to_string())
    }

    // ===== Bulk invalidation =====

    /// Clear the account's zones, members and every record entry it owns.
    pub fn invalidate_account(&mut self, account_id: &str) {
        self.invalidate_zones(account_id);
        self.invalidate_members(account_id);
        self.records.invalidate_where(|key| key.belongs_to(account_id));
    }

    pub fn invalidate_all(&mut self) {
        self.zones.invalidate_all();
        self.records.invalidate_all();
        self.members.invalidate_all();
    }

    /// Number of populated entries across all tables.
    pub fn len(&self) -> usize {
        self.zones.present_len() + self.records.present_len() + self.members.present_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
