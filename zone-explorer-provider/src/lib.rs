//! # zone-explorer-provider
//!
//! Typed binding for the Cloudflare management API, limited to what a zone
//! explorer needs: zones, DNS records, account members, the SSL mode setting
//! and cache purge.
//!
//! ## TLS Backend
//!
//! - **`rustls`** *(default)*: use rustls.
//! - **`native-tls`**: use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zone_explorer_provider::{ApiCredentials, DnsProvider, create_provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ApiCredentials::token("your-token"))?;
//!
//!     if !provider.validate_credentials().await? {
//!         return Err("token rejected".into());
//!     }
//!
//!     for zone in provider.list_zones(None).await? {
//!         let count = provider.count_records(&zone.id).await?;
//!         println!("{} ({}) {count} records", zone.name, zone.status.as_str());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Listing semantics
//!
//! List operations (`list_zones`, `list_records`, `list_members`) walk every
//! page before returning. A failing page fails the whole call; no partial
//! collection is ever returned.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). When the
//! API answers with `success: false`, the variant is chosen from the first
//! error code and the message joins every error message with `", "`.
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are reported,
//! never retried; see [`ProviderError::is_transient`].

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::create_provider;

pub use http_client::{ApiRequest, ApiTransport, HttpMethod, ReqwestTransport};

// Internal traits (error mapping) are not exported.
pub use traits::DnsProvider;

pub use types::{
    AUTO_TTL, ApiCredentials, CreateDnsRecordRequest, DnsRecord, DnsRecordType,
    InviteMemberRequest, Member, MemberPolicy, MemberRole, MemberStatus, PermissionGroup,
    PurgeRequest, ResourceGroup, ResultInfo, SslMode, UpdateDnsRecordRequest, Zone, ZoneStatus,
};

pub use utils::log_sanitizer::{mask_secret, truncate_for_log};

pub use providers::CloudflareProvider;
