//! Connection pool management.
//!
//! [`ConnectionManager`] owns a `deadpool` pool of driver connections opened
//! through a [`Connector`]. Construction probes the database once and fails
//! fast; [`ConnectionManager::acquire`] retries checkout plus liveness check up
//! to the configured budget.
//!
//! ```ignore
//! use sqlkit::pool::{ConnectionManager, Context};
//!
//! let manager = ConnectionManager::connect(&config.database, MySql).await?;
//! let conn = manager.acquire(&Context::background()).await?;
//! // ...
//! manager.release(Some(conn)).await?;
//! manager.shutdown();
//! ```

mod connector;
mod context;
mod dsn;
mod manager;

pub use connector::Connector;
pub use context::Context;
pub use dsn::Dsn;
pub use manager::{ConnectionManager, Lease, PoolStatus};
