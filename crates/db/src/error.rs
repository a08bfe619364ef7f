//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The connection could not be opened or authenticated.
    #[error("could not connect to database: {0}")]
    Connect(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server refused the statement (constraint, type, or permission).
    #[error("database rejected the statement: {message}")]
    Rejected {
        message: String,
        constraint: Option<String>,
    },

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("tds error: {0}")]
    Tds(#[from] tiberius::error::Error),

    #[error("insert did not return an id")]
    MissingId,
}

impl DbError {
    /// Classify an error raised while a Postgres statement was running.
    ///
    /// Server-side refusals become [`DbError::Rejected`]; everything else
    /// (lost socket, protocol trouble) stays a driver error.
    pub fn from_statement(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self::Rejected {
                message: db_err.message().to_owned(),
                constraint: db_err.constraint().map(str::to_owned),
            },
            other => Self::Sqlx(other),
        }
    }

    /// Same classification for SQL Server. TDS error tokens carry no
    /// constraint name, only the message.
    pub fn from_tds_statement(err: tiberius::error::Error) -> Self {
        match err {
            tiberius::error::Error::Server(token) => Self::Rejected {
                message: token.message().to_owned(),
                constraint: None,
            },
            other => Self::Tds(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failure_during_statement_stays_a_driver_error() {
        let err = DbError::from_statement(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        )));
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::Io(_))));
    }

    #[test]
    fn tds_protocol_failure_stays_a_driver_error() {
        let err = DbError::from_tds_statement(tiberius::error::Error::Protocol(
            "unexpected token".into(),
        ));
        assert!(matches!(err, DbError::Tds(tiberius::error::Error::Protocol(_))));
    }

    #[test]
    fn connect_error_keeps_its_source() {
        let err = DbError::Connect(Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )));
        assert_eq!(err.to_string(), "could not connect to database: connection refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn rejected_display_carries_server_message() {
        let err = DbError::Rejected {
            message: "value too long for type character varying(200)".into(),
            constraint: None,
        };
        assert_eq!(
            err.to_string(),
            "database rejected the statement: value too long for type character varying(200)"
        );
    }
}
