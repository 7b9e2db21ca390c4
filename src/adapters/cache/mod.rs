//! Result cache adapter.

pub mod store;

pub use store::{CacheStats, PayloadKind, ResultCache};
