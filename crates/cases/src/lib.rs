//! `cases` crate — business case domain model and persistence gateway.
//!
//! Turns raw form input into a validated [`BusinessCaseRecord`] and hands it
//! to a [`PersistenceGateway`] for the single database write.

pub mod error;
pub mod form;
pub mod gateway;
pub mod mock;
pub mod models;

pub use error::{PersistenceError, ValidationError};
pub use form::{BusinessCaseForm, Field};
pub use gateway::{for_driver, PersistenceGateway, SqlGateway};
pub use models::{BenefitUnit, BusinessCaseRecord, CaseId, Department};
