//! Persistence gateway — the single write behind a form submission.
//!
//! `save` opens one connection, runs one insert, and releases the connection
//! before returning, whatever the outcome. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use db::models::NewBusinessCase;
use db::{CaseStore, ConnectionConfig, Connector, Driver, PgConnector, TdsConnector};

use crate::{BusinessCaseRecord, CaseId, PersistenceError};

/// Writes one business case per call.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn save(
        &self,
        record: &BusinessCaseRecord,
        config: &ConnectionConfig,
    ) -> Result<CaseId, PersistenceError>;
}

/// Gateway backed by a real [`Connector`].
#[derive(Debug, Clone, Default)]
pub struct SqlGateway<C = TdsConnector> {
    connector: C,
}

impl SqlGateway<TdsConnector> {
    pub fn sql_server() -> Self {
        Self::new(TdsConnector)
    }
}

impl SqlGateway<PgConnector> {
    pub fn postgres() -> Self {
        Self::new(PgConnector)
    }
}

/// The gateway for the configured wire driver.
pub fn for_driver(driver: Driver) -> Arc<dyn PersistenceGateway> {
    match driver {
        Driver::SqlServer => Arc::new(SqlGateway::sql_server()),
        Driver::Postgres  => Arc::new(SqlGateway::postgres()),
    }
}

impl<C: Connector> SqlGateway<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

#[async_trait]
impl<C: Connector> PersistenceGateway for SqlGateway<C> {
    #[instrument(skip_all, fields(host = %config.host, database = %config.database))]
    async fn save(
        &self,
        record: &BusinessCaseRecord,
        config: &ConnectionConfig,
    ) -> Result<CaseId, PersistenceError> {
        let row = NewBusinessCase::from(record);

        let mut store = self.connector.connect(config).await?;
        let inserted = store.insert_business_case(&row).await;

        // The store is consumed here on both paths.
        if let Err(e) = store.close().await {
            warn!("connection did not close cleanly: {e}");
        }

        let id = CaseId(inserted?);
        info!(case_id = %id, "business case saved");
        Ok(id)
    }
}
