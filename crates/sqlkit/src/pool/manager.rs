//! Pooled connection manager with bounded-retry acquisition.

use super::connector::Connector;
use super::context::Context;
use super::dsn::Dsn;
use crate::config::DatabaseConfig;
use crate::error::{DbError, DbResult};
use deadpool::managed::{self, Metrics, Object, Pool, PoolError, RecycleError, RecycleResult};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// `deadpool` manager that opens connections through a [`Connector`] and
/// retires them once they outlive the configured maximum lifetime.
pub(crate) struct DsnManager<C: Connector> {
    connector: Arc<C>,
    dsn: Dsn,
    max_lifetime: Option<Duration>,
}

impl<C: Connector> managed::Manager for DsnManager<C> {
    type Type = C::Connection;
    type Error = C::Error;

    async fn create(&self) -> Result<C::Connection, C::Error> {
        self.connector.connect(&self.dsn).await
    }

    async fn recycle(&self, _conn: &mut C::Connection, metrics: &Metrics) -> RecycleResult<C::Error> {
        match self.max_lifetime {
            Some(max) if metrics.age() >= max => Err(RecycleError::Message(
                "connection exceeded its maximum lifetime".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// A checked-out connection that passed its liveness check.
///
/// Hand it back with [`ConnectionManager::release`]. Dropping it also returns
/// it to the pool, but skips the idle-connection limit.
pub struct Lease<C: Connector> {
    conn: Object<DsnManager<C>>,
}

impl<C: Connector> Deref for Lease<C> {
    type Target = C::Connection;

    fn deref(&self) -> &C::Connection {
        &self.conn
    }
}

impl<C: Connector> DerefMut for Lease<C> {
    fn deref_mut(&mut self) -> &mut C::Connection {
        &mut self.conn
    }
}

impl<C: Connector> fmt::Debug for Lease<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease").finish_non_exhaustive()
    }
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: usize,
    /// Connections currently open (idle or leased)
    pub size: usize,
    /// Idle connections
    pub available: usize,
    /// Tasks waiting for a connection
    pub waiting: usize,
}

/// Owns the connection pool and hands out verified connections.
///
/// # Example
///
/// ```ignore
/// let manager = ConnectionManager::connect(&config.database, MySql).await?;
///
/// let mut conn = manager.acquire(&Context::with_timeout(Duration::from_secs(2))).await?;
/// let query = qb::select(&["id"]).from("users").eq("status", "active").build();
/// conn.exec(query.sql(), query.args()).await?;
/// manager.release(Some(conn)).await?;
/// ```
pub struct ConnectionManager<C: Connector> {
    pool: Pool<DsnManager<C>>,
    connector: Arc<C>,
    dsn: Dsn,
    max_retries: u32,
    max_idle: usize,
}

impl<C: Connector> Clone for ConnectionManager<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            connector: Arc::clone(&self.connector),
            dsn: self.dsn.clone(),
            max_retries: self.max_retries,
            max_idle: self.max_idle,
        }
    }
}

impl<C: Connector> fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("dsn", &self.dsn)
            .field("max_retries", &self.max_retries)
            .field("max_idle", &self.max_idle)
            .field("status", &self.status())
            .finish()
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Build the pool from configuration and probe it once.
    ///
    /// Fails with [`DbError::Connection`] when the probe fails; there is no
    /// retry at construction time.
    pub async fn connect(config: &DatabaseConfig, connector: C) -> DbResult<Self> {
        let dsn = Dsn::from_config(config);
        let connector = Arc::new(connector);

        let manager = DsnManager {
            connector: Arc::clone(&connector),
            dsn: dsn.clone(),
            max_lifetime: config.conn_max_lifetime(),
        };
        let mut builder = Pool::builder(manager);
        if config.max_open_conns > 0 {
            builder = builder.max_size(config.max_open_conns);
        }
        let pool = builder.build().map_err(|e| DbError::Pool(e.to_string()))?;

        let this = Self {
            pool,
            connector,
            dsn,
            max_retries: config.retry_budget(),
            max_idle: config.max_idle_conns,
        };

        this.ping(&Context::background())
            .await
            .map_err(|e| DbError::Connection(format!("initial probe failed: {e}")))?;

        info!(
            target: "sqlkit.pool",
            driver = %config.driver,
            dsn = %this.dsn.masked(),
            max_retries = this.max_retries,
            max_idle = this.max_idle,
            max_open = this.pool.status().max_size,
            "connection pool ready"
        );
        Ok(this)
    }

    /// Check out a connection and verify it, retrying up to the retry budget.
    ///
    /// The context deadline applies to each checkout and ping separately. On
    /// exhaustion the error is [`DbError::RetriesExhausted`] carrying the final
    /// attempt's error.
    pub async fn acquire(&self, ctx: &Context) -> DbResult<Lease<C>> {
        let mut last_err = None;
        for attempt in 1..=self.max_retries {
            match self.checkout_verified(ctx).await {
                Ok(conn) => {
                    if attempt > 1 {
                        debug!(target: "sqlkit.pool", attempt, "connection acquired after retry");
                    }
                    return Ok(Lease { conn });
                }
                Err(err) => {
                    debug!(
                        target: "sqlkit.pool",
                        attempt,
                        max_retries = self.max_retries,
                        error = %err,
                        "connection attempt failed"
                    );
                    last_err = Some(err);
                }
            }
        }

        let source = last_err.unwrap_or_else(|| DbError::Pool("retry budget is zero".to_string()));
        warn!(
            target: "sqlkit.pool",
            attempts = self.max_retries,
            error = %source,
            "giving up on connection acquisition"
        );
        Err(DbError::RetriesExhausted {
            attempts: self.max_retries,
            source: Box::new(source),
        })
    }

    /// Return a lease to the pool.
    ///
    /// `None` is rejected with [`DbError::MissingConnection`]. When the pool
    /// already holds the configured number of idle connections the lease is
    /// closed instead of pooled.
    pub async fn release(&self, lease: Option<Lease<C>>) -> DbResult<()> {
        let Some(lease) = lease else {
            return Err(DbError::MissingConnection);
        };

        if self.pool.status().available >= self.max_idle {
            let conn = Object::take(lease.conn);
            self.connector.close(conn).await.map_err(DbError::driver)?;
            debug!(target: "sqlkit.pool", max_idle = self.max_idle, "closed connection above idle limit");
        } else {
            drop(lease);
        }
        Ok(())
    }

    /// Check out one connection and ping it, without retrying.
    pub async fn ping(&self, ctx: &Context) -> DbResult<()> {
        self.checkout_verified(ctx).await.map(drop)
    }

    /// Current pool occupancy.
    pub fn status(&self) -> PoolStatus {
        let status = self.pool.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Effective retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Connection string the pool was built with.
    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    /// Close the pool. Leases still held by callers are closed when dropped.
    pub fn shutdown(self) {
        self.pool.close();
        info!(target: "sqlkit.pool", "connection pool closed");
    }

    async fn checkout_verified(&self, ctx: &Context) -> DbResult<Object<DsnManager<C>>> {
        let mut conn = ctx.run(self.pool.get()).await?.map_err(pool_error)?;

        let verified = match ctx.run(self.connector.ping(&mut *conn)).await {
            Ok(res) => res.map_err(DbError::driver),
            Err(deadline) => Err(deadline),
        };

        match verified {
            Ok(()) => Ok(conn),
            Err(err) => {
                // A connection that failed its check must not go back to the pool.
                let _ = self.connector.close(Object::take(conn)).await;
                Err(err)
            }
        }
    }
}

fn pool_error<E>(err: PoolError<E>) -> DbError
where
    E: std::error::Error + Send + Sync + 'static,
{
    match err {
        PoolError::Backend(e) => DbError::driver(e),
        other => DbError::Pool(other.to_string()),
    }
}
