//! Request handlers.

pub mod form;

use std::sync::Arc;

use cases::PersistenceGateway;
use db::ConnectionConfig;

/// Shared, read-only state. Each request gets its own connection from the
/// gateway; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PersistenceGateway>,
    pub config: Arc<ConnectionConfig>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: ConnectionConfig) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }
}
