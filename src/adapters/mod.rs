//! Edge adapters: the disk cache and the appliance HTTP client.

pub mod appliance;
pub mod cache;

pub use appliance::ApplianceClient;
pub use cache::{CacheStats, PayloadKind, ResultCache};
