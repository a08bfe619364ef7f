//! `db` crate — pure persistence layer.
//!
//! Provides the environment-sourced connection settings, a scoped
//! single-connection abstraction, the `business_cases` row struct, and the
//! repository insert. No business logic lives here.

pub mod config;
pub mod connection;
pub mod error;
pub mod mock;
pub mod models;
pub mod repository;

pub use config::{ConfigError, ConnectionConfig, Driver, DEFAULT_DRIVER};
pub use connection::{CaseStore, Connector, PgConnector, TdsClient, TdsConnector};
pub use error::DbError;
