//! Transport-side connection tracking: handles and the reachability pool.

pub mod handle;
pub mod pool;

pub use handle::ConnectionHandle;
pub use pool::{BroadcastReport, ConnectionPool};
