//! Zone Explorer Core Library
//!
//! Tree-shaped, lazily loaded view over a Cloudflare account hierarchy:
//! accounts, their zones and DNS records, and their team members.
//!
//! - [`tree::TreeResolver`] answers child queries from a per-key cache and
//!   loads on demand
//! - [`services::ZoneActionService`] performs mutations and invalidates what
//!   they make stale
//! - change notifications go out on a broadcast channel so a view can redraw
//!
//! Storage of accounts and secrets is abstracted behind [`traits::AccountStore`].

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod services;
pub mod state;
pub mod traits;
pub mod tree;
pub mod types;
pub mod xref;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_utils;

// Re-export common types
pub use config::{ExplorerConfig, ExplorerSettings, SharedSettings};
pub use error::{CoreError, CoreResult};
pub use services::{ExplorerContext, ZoneActionService};
pub use state::{ExplorerState, ExplorerStateBuilder};
pub use traits::{AccountStore, ProviderFactory, ProviderRegistry};
pub use tree::{TreeChange, TreeNode, TreeResolver};
