//! Zone and account mutations
//!
//! Every successful mutation drops the cache entries it made stale and
//! emits the matching change notifications.

use std::sync::Arc;

use zone_explorer_provider::ProviderError;

use crate::error::{CoreError, CoreResult};
use crate::services::ExplorerContext;
use crate::traits::RegisteredAccount;
use crate::types::{
    AppRecord, CreateDnsRecordRequest, InviteMemberRequest, Member, PurgeRequest, SslMode,
    UpdateDnsRecordRequest,
};

/// 记录与成员变更服务
pub struct ZoneActionService {
    ctx: Arc<ExplorerContext>,
}

impl ZoneActionService {
    #[must_use]
    pub fn new(ctx: Arc<ExplorerContext>) -> Self {
        Self { ctx }
    }

    /// 验证账户凭证
    pub async fn validate_credentials(&self, account_id: &str) -> CoreResult<bool> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let valid = self.call(account_id, entry.provider.validate_credentials().await).await?;
        if !valid {
            log::warn!("Credentials of account {account_id} are no longer valid");
            self.ctx.evict_provider(account_id).await;
        }
        Ok(valid)
    }

    /// 创建 DNS 记录
    pub async fn create_record(
        &self,
        account_id: &str,
        zone_id: &str,
        request: CreateDnsRecordRequest,
    ) -> CoreResult<AppRecord> {
        validate_record_request(&request)?;
        let entry = self.ctx.resolve_account(account_id).await?;
        let record = self
            .call(account_id, entry.provider.create_record(zone_id, &request).await)
            .await?;
        log::info!("Created {} record {} in zone {zone_id}", record.record_type, record.name);
        self.ctx.records_changed(account_id, zone_id);
        Ok(AppRecord::from_provider(record, account_id.to_string()))
    }

    /// 更新 DNS 记录
    pub async fn update_record(
        &self,
        account_id: &str,
        zone_id: &str,
        record_id: &str,
        request: UpdateDnsRecordRequest,
    ) -> CoreResult<AppRecord> {
        validate_record_request(&request)?;
        let entry = self.ctx.resolve_account(account_id).await?;
        let record = self
            .call(
                account_id,
                entry.provider.update_record(zone_id, record_id, &request).await,
            )
            .await?;
        log::info!("Updated record {record_id} in zone {zone_id}");
        self.ctx.records_changed(account_id, zone_id);
        Ok(AppRecord::from_provider(record, account_id.to_string()))
    }

    /// 删除 DNS 记录
    pub async fn delete_record(
        &self,
        account_id: &str,
        zone_id: &str,
        record_id: &str,
    ) -> CoreResult<()> {
        let entry = self.ctx.resolve_account(account_id).await?;
        self.call(account_id, entry.provider.delete_record(zone_id, record_id).await)
            .await?;
        log::info!("Deleted record {record_id} in zone {zone_id}");
        self.ctx.records_changed(account_id, zone_id);
        Ok(())
    }

    /// 切换记录代理状态
    pub async fn set_proxied(
        &self,
        account_id: &str,
        zone_id: &str,
        record_id: &str,
        proxied: bool,
    ) -> CoreResult<AppRecord> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let record = self
            .call(
                account_id,
                entry.provider.set_proxied(zone_id, record_id, proxied).await,
            )
            .await?;
        self.ctx.records_changed(account_id, zone_id);
        Ok(AppRecord::from_provider(record, account_id.to_string()))
    }

    pub async fn get_ssl_mode(&self, account_id: &str, zone_id: &str) -> CoreResult<SslMode> {
        let entry = self.ctx.resolve_account(account_id).await?;
        self.call(account_id, entry.provider.get_ssl_mode(zone_id).await)
            .await
    }

    /// Zone settings are not cached; nothing to invalidate.
    pub async fn set_ssl_mode(
        &self,
        account_id: &str,
        zone_id: &str,
        mode: SslMode,
    ) -> CoreResult<SslMode> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let mode = self
            .call(account_id, entry.provider.set_ssl_mode(zone_id, mode).await)
            .await?;
        log::info!("SSL mode of zone {zone_id} set to {}", mode.as_str());
        Ok(mode)
    }

    pub async fn purge_cache(
        &self,
        account_id: &str,
        zone_id: &str,
        request: PurgeRequest,
    ) -> CoreResult<()> {
        if matches!(&request, PurgeRequest::Urls(urls) if urls.is_empty()) {
            return Err(CoreError::ValidationError(
                "at least one URL is required".to_string(),
            ));
        }
        let entry = self.ctx.resolve_account(account_id).await?;
        self.call(account_id, entry.provider.purge_cache(zone_id, &request).await)
            .await?;
        log::info!("Purged cache of zone {zone_id}");
        Ok(())
    }

    /// 邀请成员
    pub async fn invite_member(
        &self,
        account_id: &str,
        request: InviteMemberRequest,
    ) -> CoreResult<Member> {
        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::ValidationError(format!(
                "invalid email address: '{}'",
                request.email
            )));
        }
        let entry = self.ctx.resolve_account(account_id).await?;
        let provider_account_id = require_provider_account(&entry)?;
        let member = self
            .call(
                account_id,
                entry
                    .provider
                    .invite_member(provider_account_id, &request)
                    .await,
            )
            .await?;
        log::info!("Invited {} to account {account_id}", member.email);
        self.ctx.members_changed(account_id);
        Ok(member)
    }

    /// 移除成员
    pub async fn remove_member(&self, account_id: &str, member_id: &str) -> CoreResult<()> {
        let entry = self.ctx.resolve_account(account_id).await?;
        let provider_account_id = require_provider_account(&entry)?;
        self.call(
            account_id,
            entry
                .provider
                .remove_member(provider_account_id, member_id)
                .await,
        )
        .await?;
        log::info!("Removed member {member_id} from account {account_id}");
        self.ctx.members_changed(account_id);
        Ok(())
    }

    async fn call<T>(
        &self,
        account_id: &str,
        result: Result<T, ProviderError>,
    ) -> CoreResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.ctx.handle_provider_error(account_id, e).await),
        }
    }
}

fn validate_record_request(request: &CreateDnsRecordRequest) -> CoreResult<()> {
    if request.name.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "record name must not be empty".to_string(),
        ));
    }
    if request.content.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "record content must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_provider_account(entry: &RegisteredAccount) -> CoreResult<&str> {
    entry.account.provider_account_id().ok_or_else(|| {
        CoreError::ConfigError(format!(
            "account {} has no provider account id",
            entry.account.id
        ))
    })
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlotState;
    use crate::test_utils::{app_record, app_zone, fixture, member, setup, MockProvider};
    use crate::tree::TreeChange;
    use crate::types::{Account, ApiCredentials, DnsRecordType};

    fn a_record(name: &str) -> CreateDnsRecordRequest {
        CreateDnsRecordRequest {
            record_type: DnsRecordType::A,
            name: name.to_string(),
            content: "192.0.2.10".to_string(),
            ttl: 300,
            proxied: Some(false),
            priority: None,
            comment: None,
        }
    }

    fn seeded(ctx: &ExplorerContext) {
        let mut cache = ctx.cache();
        cache.set_zones("acc-1", vec![app_zone("acc-1", "z1", "example.com")]);
        cache.set_records("acc-1", "z1", vec![app_record("acc-1", "z1", "r1", "A", "www")]);
        cache.set_records("acc-1", "z2", vec![]);
        cache.set_members("acc-1", vec![member("m1", "ops@example.com", &[])]);
    }

    #[tokio::test]
    async fn create_invalidates_zone_and_counts() {
        let (ctx, provider, _factory) = setup(MockProvider::new()).await;
        seeded(&ctx);
        let mut rx = ctx.subscribe();
        let service = ZoneActionService::new(Arc::clone(&ctx));

        let record = service.create_record("acc-1", "z1", a_record("api")).await.unwrap();

        assert_eq!(record.account_id, "acc-1");
        assert_eq!(record.name, "api");
        assert_eq!(provider.calls("create_record"), 1);
        {
            let cache = ctx.cache();
            assert_eq!(cache.records_state("acc-1", "z1"), SlotState::Absent);
            assert_eq!(cache.zones_state("acc-1"), SlotState::Absent);
            assert_eq!(cache.records_state("acc-1", "z2"), SlotState::Present);
            assert_eq!(cache.members_state("acc-1"), SlotState::Present);
        }
        assert_eq!(rx.recv().await.unwrap(), TreeChange::zone("acc-1", "z1"));
        assert_eq!(rx.recv().await.unwrap(), TreeChange::account("acc-1"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected_before_any_call() {
        let (ctx, provider, factory) = setup(MockProvider::new()).await;
        let service = ZoneActionService::new(ctx);

        let err = service
            .create_record("acc-1", "z1", a_record("  "))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(provider.calls("create_record"), 0);
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn failed_delete_keeps_cache() {
        let provider = MockProvider::new();
        provider.fail_mutations(ProviderError::RecordNotFound {
            provider: "mock".to_string(),
            record_id: "r9".to_string(),
            raw_message: None,
        });
        let (ctx, _provider, _factory) = setup(provider).await;
        seeded(&ctx);
        let service = ZoneActionService::new(Arc::clone(&ctx));

        let err = service.delete_record("acc-1", "z1", "r9").await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Provider(ProviderError::RecordNotFound { .. })
        ));
        assert_eq!(ctx.cache().records_state("acc-1", "z1"), SlotState::Present);
    }

    #[tokio::test]
    async fn set_proxied_returns_updated_record() {
        let (ctx, _provider, _factory) = setup(MockProvider::new()).await;
        seeded(&ctx);
        let service = ZoneActionService::new(Arc::clone(&ctx));

        let record = service.set_proxied("acc-1", "z1", "r1", true).await.unwrap();

        assert!(record.proxied);
        assert_eq!(ctx.cache().records_state("acc-1", "z1"), SlotState::Absent);
    }

    #[tokio::test]
    async fn ssl_and_purge_leave_cache_alone() {
        let (ctx, _provider, _factory) = setup(MockProvider::new()).await;
        seeded(&ctx);
        let service = ZoneActionService::new(Arc::clone(&ctx));

        let mode = service.set_ssl_mode("acc-1", "z1", SslMode::Strict).await.unwrap();
        assert_eq!(mode, SslMode::Strict);
        assert_eq!(service.get_ssl_mode("acc-1", "z1").await.unwrap(), SslMode::Strict);
        service
            .purge_cache("acc-1", "z1", PurgeRequest::Everything)
            .await
            .unwrap();

        let cache = ctx.cache();
        assert_eq!(cache.records_state("acc-1", "z1"), SlotState::Present);
        assert_eq!(cache.zones_state("acc-1"), SlotState::Present);
    }

    #[tokio::test]
    async fn empty_url_purge_is_rejected() {
        let (ctx, provider, _factory) = setup(MockProvider::new()).await;
        let service = ZoneActionService::new(ctx);

        let err = service
            .purge_cache("acc-1", "z1", PurgeRequest::Urls(Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(provider.calls("purge_cache"), 0);
    }

    #[tokio::test]
    async fn invite_invalidates_members_only() {
        let (ctx, provider, _factory) = setup(MockProvider::new()).await;
        seeded(&ctx);
        let mut rx = ctx.subscribe();
        let service = ZoneActionService::new(Arc::clone(&ctx));

        let invited = service
            .invite_member(
                "acc-1",
                InviteMemberRequest {
                    email: "new@example.com".to_string(),
                    role_ids: vec!["role-admin".to_string()],
                },
            )
            .await
            .unwrap();

        assert_eq!(invited.email, "new@example.com");
        assert_eq!(provider.last_member_account().as_deref(), Some("cf-1"));
        {
            let cache = ctx.cache();
            assert_eq!(cache.members_state("acc-1"), SlotState::Absent);
            assert_eq!(cache.zones_state("acc-1"), SlotState::Present);
        }
        assert_eq!(rx.recv().await.unwrap(), TreeChange::team_members("acc-1"));
        assert_eq!(rx.recv().await.unwrap(), TreeChange::account("acc-1"));
    }

    #[tokio::test]
    async fn invite_rejects_malformed_email() {
        let (ctx, provider, _factory) = setup(MockProvider::new()).await;
        let service = ZoneActionService::new(ctx);

        let err = service
            .invite_member(
                "acc-1",
                InviteMemberRequest {
                    email: "not-an-address".to_string(),
                    role_ids: Vec::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(provider.calls("invite_member"), 0);
    }

    #[tokio::test]
    async fn member_actions_need_provider_account_id() {
        let fx = fixture(MockProvider::new()).await;
        fx.store
            .insert(
                Account {
                    id: "bare".to_string(),
                    name: "Bare".to_string(),
                    provider_account_id: String::new(),
                },
                Some(ApiCredentials::token("t")),
            )
            .await;
        let service = ZoneActionService::new(fx.ctx);

        let err = service.remove_member("bare", "m1").await.unwrap_err();

        assert!(matches!(err, CoreError::ConfigError(_)));
        assert_eq!(fx.provider.calls("remove_member"), 0);
    }

    #[tokio::test]
    async fn rejected_credentials_drop_provider() {
        let provider = MockProvider::new();
        provider.fail_mutations(ProviderError::InvalidCredentials {
            provider: "mock".to_string(),
            raw_message: Some("Invalid API Token".to_string()),
        });
        let (ctx, _provider, factory) = setup(provider).await;
        let service = ZoneActionService::new(Arc::clone(&ctx));

        assert!(service.remove_member("acc-1", "m1").await.is_err());
        assert!(ctx.provider_registry.get("acc-1").await.is_none());

        let _ = service.remove_member("acc-1", "m1").await;
        assert_eq!(factory.created(), 2);
    }

    #[tokio::test]
    async fn validate_credentials_reports_result() {
        let (ctx, provider, _factory) = setup(MockProvider::new()).await;
        let service = ZoneActionService::new(Arc::clone(&ctx));

        assert!(service.validate_credentials("acc-1").await.unwrap());

        provider.set_credentials_valid(false);
        assert!(!service.validate_credentials("acc-1").await.unwrap());
        assert!(ctx.provider_registry.get("acc-1").await.is_none());
    }

    #[tokio::test]
    async fn missing_credentials_surface_typed_error() {
        let (ctx, _provider, _factory) = setup(MockProvider::new()).await;
        let service = ZoneActionService::new(ctx);

        let err = service.delete_record("no-secret", "z1", "r1").await.unwrap_err();

        assert!(matches!(err, CoreError::CredentialsNotFound(_)));
    }
}
