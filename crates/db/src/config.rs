//! Database connection settings sourced from the process environment.
//!
//! | variable   | required | default    |
//! |------------|----------|------------|
//! | `HOST`     | yes      |            |
//! | `PORT`     | no       | `1433`     |
//! | `DATABASE` | yes      |            |
//! | `USER`     | yes      |            |
//! | `PASSWORD` | yes      |            |
//! | `DRIVER`   | no       | `ODBC Driver 18 for SQL Server` |
//!
//! Empty values count as unset.

use std::fmt;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 1433;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variable {var} is not set")]
    Missing { var: &'static str },

    #[error("PORT must be a port number between 1 and 65535, got '{value}'")]
    InvalidPort { value: String },

    #[error("unsupported database driver '{driver}' (expected a SQL Server ODBC driver or 'postgres')")]
    UnsupportedDriver { driver: String },
}

/// Wire driver used to reach the database.
///
/// `DRIVER` accepts ODBC driver names such as `ODBC Driver 18 for SQL Server`
/// (anything naming SQL Server), `mssql`/`sqlserver`, or
/// `postgres`/`postgresql`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Driver {
    #[default]
    SqlServer,
    Postgres,
}

/// ODBC identifier used when `DRIVER` is unset.
pub const DEFAULT_DRIVER: &str = "ODBC Driver 18 for SQL Server";

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SqlServer => write!(f, "sqlserver"),
            Self::Postgres  => write!(f, "postgres"),
        }
    }
}

impl FromStr for Driver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mssql" | "sqlserver" => Ok(Self::SqlServer),
            _ if name.contains("sql server") => Ok(Self::SqlServer),
            _ => Err(ConfigError::UnsupportedDriver {
                driver: s.to_owned(),
            }),
        }
    }
}

/// Everything needed to open one connection.
///
/// Built once at startup and handed to the gateway on every save. `Debug`
/// never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    password: String,
    pub driver: Driver,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        driver: Driver,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            driver,
        }
    }

    /// Read the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let required = |var: &'static str| {
            present(var)
                .map(|v| v.trim().to_owned())
                .ok_or(ConfigError::Missing { var })
        };

        let host = required("HOST")?;
        let database = required("DATABASE")?;
        let user = required("USER")?;
        // Whitespace is significant in a password.
        let password = present("PASSWORD").ok_or(ConfigError::Missing { var: "PASSWORD" })?;

        let port = match present("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(ConfigError::InvalidPort { value: raw }),
            },
            None => DEFAULT_PORT,
        };

        let driver = match present("DRIVER") {
            Some(raw) => raw.parse()?,
            None => DEFAULT_DRIVER.parse()?,
        };

        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            driver,
        })
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Driver-level options for a SQL Server connection.
    ///
    /// The server certificate is trusted as presented.
    pub fn tds_config(&self) -> tiberius::Config {
        let mut tds = tiberius::Config::new();
        tds.host(&self.host);
        tds.port(self.port);
        tds.database(&self.database);
        tds.authentication(tiberius::AuthMethod::sql_server(&self.user, &self.password));
        tds.trust_cert();
        tds
    }

    /// Driver-level options for a Postgres connection.
    pub fn pg_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("driver", &self.driver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("HOST", "db.internal"),
        ("DATABASE", "cases"),
        ("USER", "intake"),
        ("PASSWORD", "s3cret"),
    ];

    #[test]
    fn defaults_apply_for_optional_values() {
        let config = ConnectionConfig::from_lookup(lookup_from(FULL)).expect("valid config");
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database, "cases");
        assert_eq!(config.user, "intake");
        assert_eq!(config.password(), "s3cret");
        assert_eq!(config.driver, Driver::SqlServer);
    }

    #[test]
    fn default_driver_and_port_agree_on_sql_server() {
        let config = ConnectionConfig::from_lookup(lookup_from(FULL)).expect("valid config");
        assert_eq!(DEFAULT_DRIVER.parse::<Driver>(), Ok(Driver::SqlServer));
        assert_eq!((config.driver, config.port), (Driver::SqlServer, 1433));
    }

    #[test]
    fn odbc_driver_names_select_sql_server() {
        for name in [DEFAULT_DRIVER, "ODBC Driver 17 for SQL Server", "SQL Server", "mssql"] {
            let mut pairs = FULL.to_vec();
            pairs.push(("DRIVER", name));
            let config = ConnectionConfig::from_lookup(lookup_from(&pairs)).expect("valid config");
            assert_eq!(config.driver, Driver::SqlServer, "{name}");
        }
    }

    #[test]
    fn explicit_port_and_driver_are_used() {
        let mut pairs = FULL.to_vec();
        pairs.push(("PORT", "5432"));
        pairs.push(("DRIVER", "PostgreSQL"));
        let config = ConnectionConfig::from_lookup(lookup_from(&pairs)).expect("valid config");
        assert_eq!(config.port, 5432);
        assert_eq!(config.driver, Driver::Postgres);
    }

    #[test]
    fn missing_host_is_reported_by_name() {
        let pairs: Vec<_> = FULL.iter().copied().filter(|(k, _)| *k != "HOST").collect();
        assert_eq!(
            ConnectionConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Missing { var: "HOST" })
        );
    }

    #[test]
    fn blank_password_counts_as_missing() {
        let mut pairs: Vec<_> = FULL.iter().copied().filter(|(k, _)| *k != "PASSWORD").collect();
        pairs.push(("PASSWORD", "   "));
        assert_eq!(
            ConnectionConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Missing { var: "PASSWORD" })
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        for bad in ["abc", "0", "70000"] {
            let mut pairs = FULL.to_vec();
            pairs.push(("PORT", bad));
            assert_eq!(
                ConnectionConfig::from_lookup(lookup_from(&pairs)),
                Err(ConfigError::InvalidPort { value: bad.into() })
            );
        }
    }

    #[test]
    fn unknown_driver_is_rejected() {
        let mut pairs = FULL.to_vec();
        pairs.push(("DRIVER", "SQLite3 ODBC Driver"));
        assert!(matches!(
            ConnectionConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::UnsupportedDriver { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = ConnectionConfig::from_lookup(lookup_from(FULL)).expect("valid config");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
