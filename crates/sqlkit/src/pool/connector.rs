//! Driver seam for the connection manager.

use super::dsn::Dsn;
use std::future::Future;

/// Opens and checks individual database connections.
///
/// The pool itself is provided by `deadpool`; a `Connector` only knows how to
/// talk to one connection. Implement it over the MySQL driver of your choice:
///
/// ```ignore
/// struct MySql;
///
/// impl Connector for MySql {
///     type Connection = mysql_async::Conn;
///     type Error = mysql_async::Error;
///
///     async fn connect(&self, dsn: &Dsn) -> Result<Self::Connection, Self::Error> {
///         mysql_async::Conn::new(opts_from(dsn)).await
///     }
///
///     async fn ping(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
///         conn.ping().await
///     }
/// }
/// ```
pub trait Connector: Send + Sync + 'static {
    /// A single driver connection.
    type Connection: Send + 'static;
    /// Driver error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a new connection.
    fn connect(
        &self,
        dsn: &Dsn,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Verify that a connection is alive.
    fn ping(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close a connection that will not go back to the pool.
    ///
    /// The default implementation drops it.
    fn close(
        &self,
        conn: Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        drop(conn);
        std::future::ready(Ok(()))
    }
}
