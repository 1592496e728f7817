use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    CreateDnsRecordRequest, DnsRecord, InviteMemberRequest, Member, PurgeRequest, SslMode,
    UpdateDnsRecordRequest, Zone,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（取错误信封中的第一个）
    pub code: Option<String>,
    /// 错误信封中所有消息，逗号拼接
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// Zone ID（用于 `ZoneNotFound` 等错误）
    pub zone: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            zone: Some(zone_id.to_string()),
            ..Self::default()
        }
    }

    pub fn record(zone_id: &str, record_id: &str) -> Self {
        Self {
            zone: Some(zone_id.to_string()),
            record_id: Some(record_id.to_string()),
            ..Self::default()
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Management API operations consumed by the explorer core.
///
/// List operations return the complete collection: implementations walk
/// every page before returning, and a failing page fails the whole call.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 验证凭证是否有效
    async fn validate_credentials(&self) -> Result<bool>;

    /// 获取全部 Zone（可按 provider 账户过滤）
    async fn list_zones(&self, provider_account_id: Option<&str>) -> Result<Vec<Zone>>;

    /// 获取 Zone 下 DNS 记录总数（不拉取记录本身）
    async fn count_records(&self, zone_id: &str) -> Result<u32>;

    /// 获取 Zone 下全部 DNS 记录
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>>;

    /// 获取账户全部成员
    async fn list_members(&self, provider_account_id: &str) -> Result<Vec<Member>>;

    /// 创建 DNS 记录
    async fn create_record(&self, zone_id: &str, req: &CreateDnsRecordRequest)
    -> Result<DnsRecord>;

    /// 更新 DNS 记录
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// 删除 DNS 记录
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// 切换代理状态
    async fn set_proxied(&self, zone_id: &str, record_id: &str, proxied: bool)
    -> Result<DnsRecord>;

    /// 获取 SSL 模式
    async fn get_ssl_mode(&self, zone_id: &str) -> Result<SslMode>;

    /// 设置 SSL 模式
    async fn set_ssl_mode(&self, zone_id: &str, mode: SslMode) -> Result<SslMode>;

    /// 清除缓存
    async fn purge_cache(&self, zone_id: &str, req: &PurgeRequest) -> Result<()>;

    /// 邀请成员
    async fn invite_member(
        &self,
        provider_account_id: &str,
        req: &InviteMemberRequest,
    ) -> Result<Member>;

    /// 移除成员
    async fn remove_member(&self, provider_account_id: &str, member_id: &str) -> Result<()>;
}
