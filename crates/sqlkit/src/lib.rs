//! # sqlkit
//!
//! Data-access plumbing for a MySQL-backed service.
//!
//! ## Features
//!
//! - **Query builder**: SELECT statements with `?` placeholders; unset optional
//!   filters drop out instead of binding empty values
//! - **Connection manager**: `deadpool`-backed pool with an eager connectivity
//!   probe and bounded-retry, liveness-checked acquisition
//! - **Configuration**: YAML service config with environment overrides for
//!   secrets and hosts
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlkit::qb::{self, Op};
//!
//! let query = qb::select(&["u.id", "u.email"])
//!     .from("users u")
//!     .inner_join("tokens t", "t.user_id = u.id")
//!     .filter("u.status", Op::Eq, "active")
//!     .filter("t.kind", Op::Eq, filter.kind) // Option<String>
//!     .in_list("u.id", ids)
//!     .limit(50, 0)
//!     .build();
//!
//! assert_eq!(query.placeholder_count(), query.args().len());
//! ```
//!
//! ## Connection Manager (pool)
//!
//! ```ignore
//! use sqlkit::{AppConfig, ConnectionManager, Context};
//!
//! let config = AppConfig::load_env(std::env::current_dir()?, "local")?;
//! let manager = ConnectionManager::connect(&config.database, MySql).await?;
//! let conn = manager.acquire(&Context::with_timeout(Duration::from_secs(3))).await?;
//! // run `query.sql()` with `query.args()` on `conn`
//! manager.release(Some(conn)).await?;
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod qb;

pub use config::{AppConfig, DatabaseConfig, DEFAULT_MAX_CONNECTION_RETRIES};
pub use error::{BoxError, DbError, DbResult};
pub use qb::{Arg, JoinKind, Op, Query, QueryBuilder, QuerySpec, WhereValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{ConnectionManager, Connector, Context, Dsn, Lease, PoolStatus};
