//! `MockGateway` — a test double for `PersistenceGateway`.
//!
//! Records every record it is asked to save so tests can assert how many
//! writes a code path attempted, including zero.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use db::{ConnectionConfig, DbError};

use crate::{BusinessCaseRecord, CaseId, PersistenceError, PersistenceGateway};

/// Result injected into `MockGateway` at construction time.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed with this id.
    Saved(i64),
    /// Fail as if the database could not be reached.
    Unreachable,
    /// Fail as if the database refused the row.
    Rejected(String),
}

/// A mock gateway that records every call and returns a fixed outcome.
#[derive(Debug, Clone)]
pub struct MockGateway {
    pub outcome: MockOutcome,
    /// All records seen by this gateway (in call order).
    pub calls: Arc<Mutex<Vec<BusinessCaseRecord>>>,
}

impl MockGateway {
    fn with(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always saves with the given id.
    pub fn returning(id: i64) -> Self {
        Self::with(MockOutcome::Saved(id))
    }

    /// Create a mock that always fails with a connection error.
    pub fn unreachable() -> Self {
        Self::with(MockOutcome::Unreachable)
    }

    /// Create a mock that always fails with a constraint error.
    pub fn rejecting(msg: impl Into<String>) -> Self {
        Self::with(MockOutcome::Rejected(msg.into()))
    }

    /// Number of times `save` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The records passed to `save`, in call order.
    pub fn saved(&self) -> Vec<BusinessCaseRecord> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceGateway for MockGateway {
    async fn save(
        &self,
        record: &BusinessCaseRecord,
        _config: &ConnectionConfig,
    ) -> Result<CaseId, PersistenceError> {
        self.calls.lock().unwrap().push(record.clone());

        match &self.outcome {
            MockOutcome::Saved(id) => Ok(CaseId(*id)),
            MockOutcome::Unreachable => Err(PersistenceError::Connection(DbError::Connect(
                Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")),
            ))),
            MockOutcome::Rejected(msg) => Err(PersistenceError::Constraint(DbError::Rejected {
                message: msg.clone(),
                constraint: None,
            })),
        }
    }
}
