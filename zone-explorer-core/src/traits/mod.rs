//! Storage and construction seams

mod account_store;
mod provider_factory;
mod provider_registry;

pub use account_store::{AccountStore, InMemoryAccountStore};
pub use provider_factory::{CloudflareProviderFactory, ProviderFactory};
pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry, RegisteredAccount};
