//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use zone_explorer_provider::{
    DnsProvider, DnsRecord, MemberPolicy, MemberRole, ProviderError, ResourceGroup, Result,
    Zone,
};

use crate::config::SharedSettings;
use crate::error::{CoreError, CoreResult};
use crate::services::ExplorerContext;
use crate::traits::{AccountStore, InMemoryAccountStore, InMemoryProviderRegistry, ProviderFactory};
use crate::tree::DEFAULT_EVENT_CAPACITY;
use crate::types::{
    Account, AccountCredentials, ApiCredentials, AppRecord, AppZone, CreateDnsRecordRequest,
    DnsRecordType, InviteMemberRequest, Member, MemberStatus, PurgeRequest, SslMode,
    UpdateDnsRecordRequest, ZoneStatus,
};
use crate::xref::ZONE_SCOPE_PREFIX;

// ===== Builders =====

pub fn account(id: &str, provider_account_id: &str) -> Account {
    Account {
        id: id.to_string(),
        name: id.to_string(),
        provider_account_id: provider_account_id.to_string(),
    }
}

pub fn provider_zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
        status: ZoneStatus::Active,
        paused: false,
        provider_account_id: None,
    }
}

pub fn provider_record(id: &str, zone_id: &str, record_type: &str, name: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: zone_id.to_string(),
        record_type: DnsRecordType::parse(record_type).unwrap(),
        name: name.to_string(),
        content: "192.0.2.1".to_string(),
        ttl: 1,
        proxied: false,
        priority: None,
        comment: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn app_zone(account_id: &str, id: &str, name: &str) -> AppZone {
    AppZone::from_provider(provider_zone(id, name), account_id.to_string())
}

pub fn app_record(
    account_id: &str,
    zone_id: &str,
    id: &str,
    record_type: &str,
    name: &str,
) -> AppRecord {
    AppRecord::from_provider(
        provider_record(id, zone_id, record_type, name),
        account_id.to_string(),
    )
}

/// Accepted member with one zone-scoped policy per entry of `zone_ids`.
pub fn member(id: &str, email: &str, zone_ids: &[&str]) -> Member {
    let policies = zone_ids
        .iter()
        .enumerate()
        .map(|(i, zone_id)| MemberPolicy {
            id: format!("{id}-policy-{i}"),
            access: "allow".to_string(),
            permission_groups: Vec::new(),
            resource_groups: vec![ResourceGroup {
                id: format!("{id}-group-{i}"),
                name: None,
                scope_keys: vec![format!("{ZONE_SCOPE_PREFIX}{zone_id}")],
            }],
        })
        .collect();
    Member {
        id: id.to_string(),
        email: email.to_string(),
        first_name: None,
        last_name: None,
        status: MemberStatus::Accepted,
        two_factor_enabled: false,
        roles: vec![MemberRole {
            id: "role-admin".to_string(),
            name: "Administrator".to_string(),
            description: None,
        }],
        policies,
    }
}

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: "connection reset".to_string(),
    }
}

// ===== MockProvider =====

/// Pauses a single fetch until the test releases it.
#[derive(Default)]
pub struct Gate {
    /// Signalled once the fetch has started
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct MockState {
    zones: Vec<Zone>,
    records: HashMap<String, Vec<DnsRecord>>,
    counts: HashMap<String, u32>,
    members: Vec<Member>,
    zones_error: Option<ProviderError>,
    records_error: Option<ProviderError>,
    members_error: Option<ProviderError>,
    mutation_error: Option<ProviderError>,
    count_failures: HashSet<String>,
    credentials_invalid: bool,
    ssl_mode: Option<SslMode>,
    last_zone_filter: Option<String>,
    last_member_account: Option<String>,
    zone_gate: Option<Arc<Gate>>,
    calls: HashMap<&'static str, usize>,
}

/// Scriptable in-memory provider with per-operation call counters.
#[derive(Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_zones(&self, zones: Vec<Zone>) {
        self.state.lock().unwrap().zones = zones;
    }

    pub fn set_records(&self, zone_id: &str, records: Vec<DnsRecord>) {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(zone_id.to_string(), records);
    }

    /// Reported record count of a zone; defaults to the number of records set.
    pub fn set_count(&self, zone_id: &str, count: u32) {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(zone_id.to_string(), count);
    }

    pub fn set_members(&self, members: Vec<Member>) {
        self.state.lock().unwrap().members = members;
    }

    pub fn fail_zones(&self, err: ProviderError) {
        self.state.lock().unwrap().zones_error = Some(err);
    }

    pub fn fail_records(&self, err: ProviderError) {
        self.state.lock().unwrap().records_error = Some(err);
    }

    pub fn fail_members(&self, err: ProviderError) {
        self.state.lock().unwrap().members_error = Some(err);
    }

    /// Every write operation fails with `err`.
    pub fn fail_mutations(&self, err: ProviderError) {
        self.state.lock().unwrap().mutation_error = Some(err);
    }

    pub fn fail_count(&self, zone_id: &str) {
        self.state
            .lock()
            .unwrap()
            .count_failures
            .insert(zone_id.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.zones_error = None;
        state.records_error = None;
        state.members_error = None;
        state.mutation_error = None;
        state.count_failures.clear();
    }

    pub fn set_credentials_valid(&self, valid: bool) {
        self.state.lock().unwrap().credentials_invalid = !valid;
    }

    /// The next `list_zones` call waits on the returned gate.
    pub fn gate_next_zone_fetch(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.state.lock().unwrap().zone_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn last_zone_filter(&self) -> Option<String> {
        self.state.lock().unwrap().last_zone_filter.clone()
    }

    pub fn last_member_account(&self) -> Option<String> {
        self.state.lock().unwrap().last_member_account.clone()
    }

    fn record_call(&self, operation: &'static str) {
        *self
            .state
            .lock()
            .unwrap()
            .calls
            .entry(operation)
            .or_default() += 1;
    }

    fn mutation(&self, operation: &'static str) -> Result<()> {
        self.record_call(operation);
        match self.state.lock().unwrap().mutation_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn record_from_request(id: &str, zone_id: &str, req: &CreateDnsRecordRequest) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: zone_id.to_string(),
        record_type: req.record_type,
        name: req.name.clone(),
        content: req.content.clone(),
        ttl: req.ttl,
        proxied: req.proxied.unwrap_or(false),
        priority: req.priority,
        comment: req.comment.clone(),
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        self.record_call("validate_credentials");
        Ok(!self.state.lock().unwrap().credentials_invalid)
    }

    async fn list_zones(&self, provider_account_id: Option<&str>) -> Result<Vec<Zone>> {
        self.record_call("list_zones");
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.last_zone_filter = provider_account_id.map(str::to_string);
            state.zone_gate.take()
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let state = self.state.lock().unwrap();
        match &state.zones_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.zones.clone()),
        }
    }

    async fn count_records(&self, zone_id: &str) -> Result<u32> {
        self.record_call("count_records");
        let state = self.state.lock().unwrap();
        if state.count_failures.contains(zone_id) {
            return Err(network_error());
        }
        let fallback = state
            .records
            .get(zone_id)
            .map_or(0, |r| u32::try_from(r.len()).unwrap());
        Ok(state.counts.get(zone_id).copied().unwrap_or(fallback))
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.record_call("list_records");
        let state = self.state.lock().unwrap();
        match &state.records_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.records.get(zone_id).cloned().unwrap_or_default()),
        }
    }

    async fn list_members(&self, provider_account_id: &str) -> Result<Vec<Member>> {
        self.record_call("list_members");
        let mut state = self.state.lock().unwrap();
        state.last_member_account = Some(provider_account_id.to_string());
        match &state.members_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.members.clone()),
        }
    }

    async fn create_record(
        &self,
        zone_id: &str,
        req: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        self.mutation("create_record")?;
        Ok(record_from_request("new-record", zone_id, req))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        self.mutation("update_record")?;
        Ok(record_from_request(record_id, zone_id, req))
    }

    async fn delete_record(&self, _zone_id: &str, _record_id: &str) -> Result<()> {
        self.mutation("delete_record")
    }

    async fn set_proxied(&self, zone_id: &str, record_id: &str, proxied: bool) -> Result<DnsRecord> {
        self.mutation("set_proxied")?;
        let mut record = provider_record(record_id, zone_id, "A", record_id);
        record.proxied = proxied;
        Ok(record)
    }

    async fn get_ssl_mode(&self, _zone_id: &str) -> Result<SslMode> {
        self.record_call("get_ssl_mode");
        Ok(self.state.lock().unwrap().ssl_mode.unwrap_or(SslMode::Full))
    }

    async fn set_ssl_mode(&self, _zone_id: &str, mode: SslMode) -> Result<SslMode> {
        self.mutation("set_ssl_mode")?;
        self.state.lock().unwrap().ssl_mode = Some(mode);
        Ok(mode)
    }

    async fn purge_cache(&self, _zone_id: &str, _req: &PurgeRequest) -> Result<()> {
        self.mutation("purge_cache")
    }

    async fn invite_member(
        &self,
        provider_account_id: &str,
        req: &InviteMemberRequest,
    ) -> Result<Member> {
        self.mutation("invite_member")?;
        self.state.lock().unwrap().last_member_account = Some(provider_account_id.to_string());
        let mut invited = member("invited", &req.email, &[]);
        invited.status = MemberStatus::Pending;
        Ok(invited)
    }

    async fn remove_member(&self, provider_account_id: &str, _member_id: &str) -> Result<()> {
        self.mutation("remove_member")?;
        self.state.lock().unwrap().last_member_account = Some(provider_account_id.to_string());
        Ok(())
    }
}

// ===== MockProviderFactory =====

/// Hands out the same mock provider for every account and counts builds.
pub struct MockProviderFactory {
    provider: Arc<MockProvider>,
    created: AtomicUsize,
}

impl MockProviderFactory {
    pub fn new(provider: Arc<MockProvider>) -> Self {
        Self {
            provider,
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ProviderFactory for MockProviderFactory {
    fn create(&self, _credentials: &ApiCredentials) -> CoreResult<Arc<dyn DnsProvider>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.provider.clone())
    }
}

// ===== FailingAccountStore =====

pub struct FailingAccountStore;

#[async_trait]
impl AccountStore for FailingAccountStore {
    async fn list_accounts(&self) -> CoreResult<Vec<Account>> {
        Err(CoreError::StorageError("vault locked".to_string()))
    }

    async fn find_with_credentials(
        &self,
        _account_id: &str,
    ) -> CoreResult<Option<AccountCredentials>> {
        Err(CoreError::StorageError("vault locked".to_string()))
    }
}

// ===== Context fixtures =====

pub struct Fixture {
    pub ctx: Arc<ExplorerContext>,
    pub provider: Arc<MockProvider>,
    pub factory: Arc<MockProviderFactory>,
    pub store: Arc<InMemoryAccountStore>,
    pub settings: Arc<SharedSettings>,
}

/// Context with three accounts:
/// - `acc-1` "Production", provider account `cf-1`
/// - `acc-2` "Staging", provider account `cf-2`
/// - `no-secret` "Orphan", no credentials stored
pub async fn fixture(provider: MockProvider) -> Fixture {
    let provider = Arc::new(provider);
    let factory = Arc::new(MockProviderFactory::new(Arc::clone(&provider)));
    let store = Arc::new(InMemoryAccountStore::new());
    let settings = Arc::new(SharedSettings::default());

    for (id, name, provider_account_id, secret) in [
        ("acc-1", "Production", "cf-1", Some("token-1")),
        ("acc-2", "Staging", "cf-2", Some("token-2")),
        ("no-secret", "Orphan", "", None),
    ] {
        store
            .insert(
                Account {
                    id: id.to_string(),
                    name: name.to_string(),
                    provider_account_id: provider_account_id.to_string(),
                },
                secret.map(ApiCredentials::token),
            )
            .await;
    }

    let ctx = Arc::new(ExplorerContext::new(
        store.clone(),
        factory.clone(),
        Arc::new(InMemoryProviderRegistry::new()),
        settings.clone(),
        DEFAULT_EVENT_CAPACITY,
    ));
    Fixture {
        ctx,
        provider,
        factory,
        store,
        settings,
    }
}

pub async fn setup(
    provider: MockProvider,
) -> (Arc<ExplorerContext>, Arc<MockProvider>, Arc<MockProviderFactory>) {
    let fx = fixture(provider).await;
    (fx.ctx, fx.provider, fx.factory)
}

/// Context whose account store always fails.
pub fn failing_context() -> Arc<ExplorerContext> {
    Arc::new(ExplorerContext::new(
        Arc::new(FailingAccountStore),
        Arc::new(MockProviderFactory::new(Arc::new(MockProvider::new()))),
        Arc::new(InMemoryProviderRegistry::new()),
        Arc::new(SharedSettings::default()),
        DEFAULT_EVENT_CAPACITY,
    ))
}
