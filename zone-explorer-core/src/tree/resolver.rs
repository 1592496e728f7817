//! Hierarchy resolver
//!
//! Answers "what are the children of this node" for the tree view. Each
//! expandable node maps to one cache key; a request either reads the cached
//! entry, reports that someone else is loading it, or claims the key and
//! loads it.
//!
//! `get_children` never fails: every error becomes a placeholder node.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use zone_explorer_provider::{DnsProvider, Member, ProviderError, Zone};

use crate::cache::{Claim, ExplorerCache, RecordKey};
use crate::error::{CoreError, CoreResult};
use crate::filter::filter_and_sort;
use crate::services::ExplorerContext;
use crate::types::{Account, AppRecord, AppZone, RecordCount};
use crate::xref::zone_name_lookup;

use super::events::TreeChange;
use super::node::{
    AccountNode, MemberNode, RecordNode, TeamMembersNode, TreeNode, ZoneNode,
};

pub const EMPTY_ACCOUNTS_MESSAGE: &str = "No accounts configured";
pub const EMPTY_RECORDS_MESSAGE: &str = "No DNS records";
pub const EMPTY_MEMBERS_MESSAGE: &str = "No team members";
pub const MISSING_CREDENTIALS_MESSAGE: &str = "No credentials found for this account";

#[derive(Clone)]
pub struct TreeResolver {
    ctx: Arc<ExplorerContext>,
}

impl TreeResolver {
    #[must_use]
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    /// Children of `node`; `None` is the root.
    pub async fn get_children(&self, node: Option<&TreeNode>) -> Vec<TreeNode> {
        match node {
            None => self.root_children().await,
            Some(TreeNode::Account(n)) => self.account_children(&n.account).await,
            Some(TreeNode::Zone(n)) => self.zone_children(&n.zone).await,
            Some(TreeNode::TeamMembers(n)) => self.member_children(&n.account_id).await,
            Some(_) => Vec::new(),
        }
    }

    /// Drop every cached entry and provider, then redraw the whole tree.
    pub async fn refresh_all(&self) {
        self.ctx.cache().invalidate_all();
        self.ctx.evict_all_providers().await;
        self.ctx.notify(TreeChange::All);
    }

    /// Drop everything cached for one account, including its provider.
    pub async fn refresh_account(&self, account_id: &str) {
        self.ctx.cache().invalidate_account(account_id);
        self.ctx.evict_provider(account_id).await;
        self.ctx.notify(TreeChange::account(account_id));
    }

    pub fn refresh_zone(&self, account_id: &str, zone_id: &str) {
        self.ctx.cache().invalidate_records(account_id, zone_id);
        self.ctx.notify(TreeChange::zone(account_id, zone_id));
    }

    // ===== Root =====

    async fn root_children(&self) -> Vec<TreeNode> {
        match self.ctx.account_store.list_accounts().await {
            Ok(accounts) if accounts.is_empty() => {
                vec![TreeNode::Empty(EMPTY_ACCOUNTS_MESSAGE.to_string())]
            }
            Ok(accounts) => accounts
                .into_iter()
                .map(|account| TreeNode::Account(AccountNode { account }))
                .collect(),
            Err(e) => {
                e.log("Failed to list accounts");
                vec![error_node(&e)]
            }
        }
    }

    // ===== Account → zones + Team Members =====

    async fn account_children(&self, account: &Account) -> Vec<TreeNode> {
        let (claim, member_count) = {
            let mut cache = self.ctx.cache();
            (cache.claim_zones(&account.id), cache.member_count(&account.id))
        };
        match claim {
            Claim::Cached(zones) => account_nodes(&account.id, &zones, member_count),
            Claim::InFlight => vec![TreeNode::Loading],
            Claim::Acquired => {
                let load = LoadGuard::new(&self.ctx, LoadSlot::Zones(account.id.clone()));
                match self.load_account(&account.id).await {
                    Ok((zones, member_count)) => {
                        let (zones, observed) =
                            load.finish(|cache| cache.complete_zones(&account.id, zones));
                        if observed {
                            self.ctx.notify(TreeChange::account(&account.id));
                        }
                        account_nodes(&account.id, &zones, member_count)
                    }
                    Err(e) => {
                        let observed = load.abort();
                        e.log(&format!("Failed to load zones of account {}", account.id));
                        if observed {
                            self.ctx.notify(TreeChange::account(&account.id));
                        }
                        vec![error_node(&e)]
                    }
                }
            }
        }
    }

    /// Zones of `account_id` with their counts, plus the member count.
    async fn load_account(&self, account_id: &str) -> CoreResult<(Vec<AppZone>, usize)> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let provider = entry.provider;
        let provider_account_id = entry.account.provider_account_id().map(str::to_string);

        let zones = match provider.list_zones(provider_account_id.as_deref()).await {
            Ok(zones) => zones,
            Err(e) => return Err(self.ctx.handle_provider_error(account_id, e).await),
        };
        log::debug!("Loaded {} zones for account {account_id}", zones.len());

        let show_count = self.ctx.settings.show_record_count().await;
        Ok(futures::join!(
            self.with_record_counts(provider.as_ref(), account_id, zones, show_count),
            self.load_member_count(provider.as_ref(), account_id, provider_account_id.as_deref()),
        ))
    }

    /// Count fan-out: every zone is counted concurrently and each result is
    /// judged on its own. A failed count degrades to `Unknown`.
    async fn with_record_counts(
        &self,
        provider: &dyn DnsProvider,
        account_id: &str,
        zones: Vec<Zone>,
        show_count: bool,
    ) -> Vec<AppZone> {
        if !show_count {
            return zones
                .into_iter()
                .map(|z| AppZone::from_provider(z, account_id.to_string()))
                .collect();
        }

        let counts: Vec<Result<u32, ProviderError>> =
            join_all(zones.iter().map(|z| provider.count_records(&z.id))).await;

        zones
            .into_iter()
            .zip(counts)
            .map(|(zone, count)| {
                let count = match count {
                    Ok(n) => RecordCount::Known(n),
                    Err(e) => {
                        log::warn!("Record count of zone {} unavailable: {e}", zone.name);
                        RecordCount::Unknown
                    }
                };
                AppZone::from_provider(zone, account_id.to_string()).with_record_count(count)
            })
            .collect()
    }

    /// Best-effort member fetch for the Team Members annotation. Any failure
    /// yields 0 and leaves the members key absent.
    async fn load_member_count(
        &self,
        provider: &dyn DnsProvider,
        account_id: &str,
        provider_account_id: Option<&str>,
    ) -> usize {
        let Some(provider_account_id) = provider_account_id else {
            log::debug!("Account {account_id} has no provider account id, skipping members");
            return 0;
        };

        let claim = self.ctx.cache().claim_members(account_id);
        match claim {
            Claim::Cached(members) => return members.len(),
            Claim::InFlight => return 0,
            Claim::Acquired => {}
        }
        let load = LoadGuard::new(&self.ctx, LoadSlot::Members(account_id.to_string()));

        match provider.list_members(provider_account_id).await {
            Ok(members) => {
                let (members, observed) =
                    load.finish(|cache| cache.complete_members(account_id, members));
                if observed {
                    self.ctx.notify(TreeChange::team_members(account_id));
                }
                members.len()
            }
            Err(e) => {
                let observed = load.abort();
                log::warn!("Members of account {account_id} unavailable: {e}");
                // Rejected credentials still drop the provider; the count just degrades.
                let _ = self.ctx.handle_provider_error(account_id, e).await;
                if observed {
                    self.ctx.notify(TreeChange::team_members(account_id));
                }
                0
            }
        }
    }

    // ===== Zone → records =====

    async fn zone_children(&self, zone: &AppZone) -> Vec<TreeNode> {
        let key = RecordKey::new(zone.account_id.as_str(), zone.id.as_str());
        let claim = self.ctx.cache().claim_records(&key);
        let records = match claim {
            Claim::Cached(records) => records,
            Claim::InFlight => return vec![TreeNode::Loading],
            Claim::Acquired => {
                let load = LoadGuard::new(&self.ctx, LoadSlot::Records(key.clone()));
                match self.load_records(&key).await {
                    Ok(records) => {
                        let (records, observed) =
                            load.finish(|cache| cache.complete_records(key.clone(), records));
                        if observed {
                            self.ctx.notify(TreeChange::zone(&key.account_id, &key.zone_id));
                        }
                        records
                    }
                    Err(e) => {
                        let observed = load.abort();
                        e.log(&format!("Failed to load records of {key}"));
                        if observed {
                            self.ctx.notify(TreeChange::zone(&key.account_id, &key.zone_id));
                        }
                        return vec![error_node(&e)];
                    }
                }
            }
        };

        let allowed = self.ctx.settings.record_types().await;
        let visible = filter_and_sort(&records, &allowed);
        if visible.is_empty() {
            return vec![TreeNode::Empty(EMPTY_RECORDS_MESSAGE.to_string())];
        }
        visible
            .into_iter()
            .map(|record| TreeNode::Record(RecordNode { record }))
            .collect()
    }

    async fn load_records(&self, key: &RecordKey) -> CoreResult<Vec<AppRecord>> {
        let entry = self.ctx.resolve_account(&key.account_id).await?;
        let records = match entry.provider.list_records(&key.zone_id).await {
            Ok(records) => records,
            Err(e) => return Err(self.ctx.handle_provider_error(&key.account_id, e).await),
        };
        log::debug!("Loaded {} records for {key}", records.len());

        Ok(records
            .into_iter()
            .map(|r| AppRecord::from_provider(r, key.account_id.clone()))
            .collect())
    }

    // ===== Team Members → members =====

    async fn member_children(&self, account_id: &str) -> Vec<TreeNode> {
        let claim = self.ctx.cache().claim_members(account_id);
        let members = match claim {
            Claim::Cached(members) => members,
            Claim::InFlight => return vec![TreeNode::Loading],
            Claim::Acquired => {
                let load = LoadGuard::new(&self.ctx, LoadSlot::Members(account_id.to_string()));
                match self.load_members(account_id).await {
                    Ok(members) => {
                        let (members, observed) =
                            load.finish(|cache| cache.complete_members(account_id, members));
                        if observed {
                            self.ctx.notify(TreeChange::team_members(account_id));
                        }
                        members
                    }
                    Err(e) => {
                        let observed = load.abort();
                        e.log(&format!("Failed to load members of account {account_id}"));
                        if observed {
                            self.ctx.notify(TreeChange::team_members(account_id));
                        }
                        return vec![error_node(&e)];
                    }
                }
            }
        };

        if members.is_empty() {
            return vec![TreeNode::Empty(EMPTY_MEMBERS_MESSAGE.to_string())];
        }

        // Names come from whatever zones are cached; no fetch for this.
        let zone_names: Arc<HashMap<String, String>> = {
            let cache = self.ctx.cache();
            let zones = cache.get_zones(account_id);
            Arc::new(zone_name_lookup(zones.as_ref().map(|z| z.as_slice())))
        };
        members
            .iter()
            .map(|member| {
                TreeNode::Member(MemberNode {
                    account_id: account_id.to_string(),
                    member: member.clone(),
                    zone_names: Arc::clone(&zone_names),
                })
            })
            .collect()
    }

    async fn load_members(&self, account_id: &str) -> CoreResult<Vec<Member>> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let Some(provider_account_id) = entry.account.provider_account_id() else {
            return Err(CoreError::ConfigError(format!(
                "account {account_id} has no provider account id"
            )));
        };
        match entry.provider.list_members(provider_account_id).await {
            Ok(members) => Ok(members),
            Err(e) => Err(self.ctx.handle_provider_error(account_id, e).await),
        }
    }
}

/// The cache key a load holds in `Loading`.
enum LoadSlot {
    Zones(String),
    Records(RecordKey),
    Members(String),
}

impl LoadSlot {
    fn abort(&self, cache: &mut ExplorerCache) -> bool {
        match self {
            Self::Zones(account_id) => cache.abort_zones(account_id),
            Self::Records(key) => cache.abort_records(key),
            Self::Members(account_id) => cache.abort_members(account_id),
        }
    }

    fn change(&self) -> TreeChange {
        match self {
            Self::Zones(account_id) => TreeChange::account(account_id),
            Self::Records(key) => TreeChange::zone(&key.account_id, &key.zone_id),
            Self::Members(account_id) => TreeChange::team_members(account_id),
        }
    }
}

/// Ownership of an acquired claim for the duration of a load.
///
/// A load future can be dropped at any `.await` (a timeout, a closed view).
/// If that happens before [`finish`](Self::finish) or [`abort`](Self::abort),
/// the key goes back to absent so the next request fetches again.
struct LoadGuard<'a> {
    ctx: &'a ExplorerContext,
    slot: LoadSlot,
    armed: bool,
}

impl<'a> LoadGuard<'a> {
    fn new(ctx: &'a ExplorerContext, slot: LoadSlot) -> Self {
        Self {
            ctx,
            slot,
            armed: true,
        }
    }

    /// Store the loaded value through `complete`.
    fn finish<R>(mut self, complete: impl FnOnce(&mut ExplorerCache) -> R) -> R {
        self.armed = false;
        let mut cache = self.ctx.cache();
        complete(&mut cache)
    }

    /// Release the key after a failed load. Returns whether anyone saw it loading.
    fn abort(mut self) -> bool {
        self.armed = false;
        let mut cache = self.ctx.cache();
        self.slot.abort(&mut cache)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let change = self.slot.change();
        log::debug!("Load dropped before completion, releasing {change:?}");
        let observed = self.slot.abort(&mut self.ctx.cache());
        if observed {
            self.ctx.notify(change);
        }
    }
}

fn account_nodes(account_id: &str, zones: &[AppZone], member_count: usize) -> Vec<TreeNode> {
    zones
        .iter()
        .map(|zone| TreeNode::Zone(ZoneNode { zone: zone.clone() }))
        .chain(std::iter::once(TreeNode::TeamMembers(TeamMembersNode {
            account_id: account_id.to_string(),
            member_count,
        })))
        .collect()
}

fn error_node(err: &CoreError) -> TreeNode {
    match err {
        CoreError::CredentialsNotFound(_) => TreeNode::Error(MISSING_CREDENTIALS_MESSAGE.to_string()),
        other => TreeNode::Error(other.to_string()),
    }
}
