//! Repository functions — one function per database operation.
//!
//! Every function takes a live connection and returns a `Result<T, DbError>`.
//! No business logic, no domain types — pure SQL.

pub mod business_cases;
