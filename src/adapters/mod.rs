//! External system adapters
//!
//! Each adapter isolates one boundary: the hospital backend over HTTP and
//! the local durable store. Adapters expose traits so the core queue can
//! be tested against stubs.

pub mod backend;
pub mod store;
