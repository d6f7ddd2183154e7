//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! Logical request (endpoint + params)
//!     → key.rs (canonical JSON → SHA-256 hex key)
//!     → store.rs (TtlCache lookup)
//!         hit  → value returned, access tick refreshed
//!         miss → caller fetches, then TtlCache::set
//! ```
//!
//! # Design Decisions
//! - Expiry is lazy: checked on read, no background sweeper
//! - Capacity bounded; eviction removes the least recently accessed entry
//! - Entry map and access map live under one mutex so they never diverge
//! - Absence covers both "never stored" and "expired"

pub mod entry;
pub mod key;
pub mod store;

pub use entry::CacheEntry;
pub use key::request_key;
pub use store::TtlCache;
