//! `MockConnector` — a test double for `Connector`.
//!
//! Counts every connection it opens and every connection that is released,
//! so tests can assert that opens == closes on every outcome. Release is
//! counted in `Drop`, which covers both [`CaseStore::close`] and abandoned
//! connections.

use std::io;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{models::NewBusinessCase, CaseStore, ConnectionConfig, Connector, DbError};

/// Behaviour injected into `MockConnector` at construction time.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Connect and insert normally.
    Succeed,
    /// Refuse the connection.
    FailConnect,
    /// Connect, then have the server reject the insert.
    RejectInsert(String),
    /// Connect, then lose the connection while the insert is in flight.
    DropMidInsert,
}

#[derive(Debug)]
struct Ledger {
    opens: AtomicUsize,
    closes: AtomicUsize,
    graceful_closes: AtomicUsize,
    next_id: AtomicI64,
    rows: Mutex<Vec<NewBusinessCase>>,
}

/// A mock connector whose clones share one ledger.
#[derive(Debug, Clone)]
pub struct MockConnector {
    pub behaviour: MockBehaviour,
    ledger: Arc<Ledger>,
}

impl MockConnector {
    fn with(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            ledger: Arc::new(Ledger {
                opens: AtomicUsize::new(0),
                closes: AtomicUsize::new(0),
                graceful_closes: AtomicUsize::new(0),
                next_id: AtomicI64::new(1),
                rows: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a mock that always connects and inserts.
    pub fn succeeding() -> Self {
        Self::with(MockBehaviour::Succeed)
    }

    /// Create a mock whose database is unreachable.
    pub fn unreachable() -> Self {
        Self::with(MockBehaviour::FailConnect)
    }

    /// Create a mock whose server rejects every insert with `msg`.
    pub fn rejecting(msg: impl Into<String>) -> Self {
        Self::with(MockBehaviour::RejectInsert(msg.into()))
    }

    /// Create a mock that drops the connection during the insert.
    pub fn dropping_mid_insert() -> Self {
        Self::with(MockBehaviour::DropMidInsert)
    }

    /// Number of connections opened.
    pub fn opens(&self) -> usize {
        self.ledger.opens.load(Ordering::SeqCst)
    }

    /// Number of connections released, gracefully or by drop.
    pub fn closes(&self) -> usize {
        self.ledger.closes.load(Ordering::SeqCst)
    }

    /// Number of connections released through [`CaseStore::close`].
    pub fn graceful_closes(&self) -> usize {
        self.ledger.graceful_closes.load(Ordering::SeqCst)
    }

    /// Rows successfully inserted, in insert order.
    pub fn rows(&self) -> Vec<NewBusinessCase> {
        self.ledger.rows.lock().unwrap().clone()
    }
}

/// The connection handed out by [`MockConnector`].
#[derive(Debug)]
pub struct MockStore {
    behaviour: MockBehaviour,
    ledger: Arc<Ledger>,
}

impl Drop for MockStore {
    fn drop(&mut self) {
        self.ledger.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Store = MockStore;

    async fn connect(&self, _config: &ConnectionConfig) -> Result<MockStore, DbError> {
        if let MockBehaviour::FailConnect = self.behaviour {
            return Err(DbError::Connect(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))));
        }

        self.ledger.opens.fetch_add(1, Ordering::SeqCst);
        Ok(MockStore {
            behaviour: self.behaviour.clone(),
            ledger: Arc::clone(&self.ledger),
        })
    }
}

#[async_trait]
impl CaseStore for MockStore {
    async fn insert_business_case(&mut self, row: &NewBusinessCase) -> Result<i64, DbError> {
        match &self.behaviour {
            MockBehaviour::Succeed => {
                self.ledger.rows.lock().unwrap().push(row.clone());
                Ok(self.ledger.next_id.fetch_add(1, Ordering::SeqCst))
            }
            MockBehaviour::FailConnect => unreachable!("FailConnect never hands out a store"),
            MockBehaviour::RejectInsert(msg) => Err(DbError::Rejected {
                message: msg.clone(),
                constraint: None,
            }),
            MockBehaviour::DropMidInsert => Err(DbError::Sqlx(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))),
        }
    }

    async fn close(self) -> Result<(), DbError> {
        self.ledger.graceful_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
