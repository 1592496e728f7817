//! Provider implementations

mod cloudflare;

pub use cloudflare::CloudflareProvider;
