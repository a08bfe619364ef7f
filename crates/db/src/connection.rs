//! Scoped, single-use database connections.
//!
//! A [`Connector`] opens exactly one connection per call. The returned
//! [`CaseStore`] owns that connection: [`CaseStore::close`] consumes it and
//! shuts it down gracefully, and dropping it releases the socket. Either way
//! the connection cannot outlive its owner. There is no pool.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::{models::NewBusinessCase, repository::business_cases, ConnectionConfig, DbError};

/// An open connection that can persist business cases.
#[async_trait]
pub trait CaseStore: Send + Sized {
    /// Insert one row and return its database id.
    async fn insert_business_case(&mut self, row: &NewBusinessCase) -> Result<i64, DbError>;

    /// Gracefully close the connection.
    async fn close(self) -> Result<(), DbError>;
}

/// Opens connections from a [`ConnectionConfig`].
#[async_trait]
pub trait Connector: Send + Sync {
    type Store: CaseStore;

    async fn connect(&self, config: &ConnectionConfig) -> Result<Self::Store, DbError>;
}

/// A SQL Server session over a tokio socket.
pub type TdsClient = tiberius::Client<Compat<TcpStream>>;

/// Opens a fresh SQL Server connection per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TdsConnector;

#[async_trait]
impl Connector for TdsConnector {
    type Store = TdsClient;

    async fn connect(&self, config: &ConnectionConfig) -> Result<TdsClient, DbError> {
        debug!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            driver = %config.driver,
            "opening database connection"
        );
        let tds = config.tds_config();
        let tcp = TcpStream::connect(tds.get_addr())
            .await
            .map_err(|e| DbError::Connect(e.into()))?;
        tcp.set_nodelay(true).map_err(|e| DbError::Connect(e.into()))?;

        tiberius::Client::connect(tds, tcp.compat_write())
            .await
            .map_err(|e| DbError::Connect(e.into()))
    }
}

#[async_trait]
impl CaseStore for TdsClient {
    async fn insert_business_case(&mut self, row: &NewBusinessCase) -> Result<i64, DbError> {
        business_cases::insert_business_case_tds(self, row).await
    }

    async fn close(self) -> Result<(), DbError> {
        tiberius::Client::close(self).await?;
        Ok(())
    }
}

/// Opens a fresh Postgres connection per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    type Store = PgConnection;

    async fn connect(&self, config: &ConnectionConfig) -> Result<PgConnection, DbError> {
        debug!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            driver = %config.driver,
            "opening database connection"
        );
        PgConnection::connect_with(&config.pg_options())
            .await
            .map_err(|e| DbError::Connect(e.into()))
    }
}

#[async_trait]
impl CaseStore for PgConnection {
    async fn insert_business_case(&mut self, row: &NewBusinessCase) -> Result<i64, DbError> {
        business_cases::insert_business_case(self, row).await
    }

    async fn close(self) -> Result<(), DbError> {
        <PgConnection as Connection>::close(self).await?;
        Ok(())
    }
}
