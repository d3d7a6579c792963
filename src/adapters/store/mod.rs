//! Local pending store adapters
//!
//! Durable persistence for batches awaiting delivery. The SQLite store is
//! the production implementation; the memory store backs tests.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryPendingStore;
pub use sqlite::SqlitePendingStore;
pub use traits::PendingStore;
