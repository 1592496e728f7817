//! 类型定义模块

mod account;
mod record;
mod zone;

pub use account::{Account, AccountCredentials};
pub use record::AppRecord;
pub use zone::{AppZone, RecordCount};

// Re-export provider 库的公共类型
pub use zone_explorer_provider::{
    ApiCredentials, CreateDnsRecordRequest, DnsRecordType, InviteMemberRequest, Member,
    MemberStatus, PurgeRequest, SslMode, UpdateDnsRecordRequest, ZoneStatus,
};
