// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed [`ServerConfig`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret for session tokens | Required |
//! | `DATA_DIR` | Root directory for the user database | `./data` |
//! | `USERS_DB_PATH` | User database file | `$DATA_DIR/users.redb` |
//! | `TOKEN_TTL_SECS` | Session token lifetime in seconds | `604800` (7 days) |
//! | `LEDGER_RPC_URL` | Ledger JSON-RPC endpoint | Required for role grants |
//! | `LEDGER_CHAIN_ID` | Expected chain ID of the ledger | Optional |
//! | `CONTRACT_ADDRESS` | Deployed access-control contract | Required for role grants |
//! | `ADMIN_SECRET_SEED` | Hex private key of the admin signer | Required for role grants |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use chrono::Duration;

use crate::blockchain::LedgerConfig;

/// Environment variable name for the token signing secret.
///
/// The server refuses to start without it.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the user database file.
pub const USERS_DB_PATH_ENV: &str = "USERS_DB_PATH";

pub const TOKEN_TTL_SECS_ENV: &str = "TOKEN_TTL_SECS";

pub const LEDGER_RPC_URL_ENV: &str = "LEDGER_RPC_URL";
pub const LEDGER_CHAIN_ID_ENV: &str = "LEDGER_CHAIN_ID";
pub const CONTRACT_ADDRESS_ENV: &str = "CONTRACT_ADDRESS";

/// Environment variable name for the administrative signing key.
///
/// Never exposed to clients. Absence only fails the role-grant endpoint.
pub const ADMIN_SECRET_SEED_ENV: &str = "ADMIN_SECRET_SEED";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default session token lifetime (7 days).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration. All of them are startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Anything other than `json` (case-insensitive) selects the human format.
    pub fn parse(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Certificate and key locations for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub users_db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub ledger: LedgerConfig,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let data_dir = PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.into()));
        let users_db_path = get(USERS_DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("users.redb"));

        let ttl_secs = match get(TOKEN_TTL_SECS_ENV) {
            Some(raw) => parse_number::<i64>(TOKEN_TTL_SECS_ENV, &raw)?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: TOKEN_TTL_SECS_ENV,
                reason: "must be positive".to_string(),
            });
        }

        let chain_id = get(LEDGER_CHAIN_ID_ENV)
            .map(|raw| parse_number::<u64>(LEDGER_CHAIN_ID_ENV, &raw))
            .transpose()?;

        let ledger = LedgerConfig {
            rpc_url: get(LEDGER_RPC_URL_ENV),
            chain_id,
            contract_address: get(CONTRACT_ADDRESS_ENV),
            admin_secret_seed: get(ADMIN_SECRET_SEED_ENV),
        };

        let port = match get(PORT_ENV) {
            Some(raw) => parse_number::<u16>(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            users_db_path,
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            ledger,
            tls,
            log_format: LogFormat::parse(get(LOG_FORMAT_ENV)),
        })
    }

    /// Bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn missing_jwt_secret_is_fatal() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JWT_SECRET_ENV)));

        let err = load(&[(JWT_SECRET_ENV, "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JWT_SECRET_ENV)));
    }

    #[test]
    fn defaults_applied() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.users_db_path, PathBuf::from("./data/users.redb"));
        assert_eq!(config.token_ttl, Duration::days(7));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.tls.is_none());
        assert!(config.ledger.rpc_url.is_none());
        assert!(config.ledger.admin_secret_seed.is_none());
    }

    #[test]
    fn ledger_settings_are_read() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cret"),
            (LEDGER_RPC_URL_ENV, "http://localhost:8545"),
            (LEDGER_CHAIN_ID_ENV, "31337"),
            (CONTRACT_ADDRESS_ENV, "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            (ADMIN_SECRET_SEED_ENV, "ab"),
        ])
        .unwrap();
        assert_eq!(config.ledger.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(config.ledger.chain_id, Some(31337));
        assert!(config.ledger.contract_address.is_some());
        assert!(config.ledger.admin_secret_seed.is_some());
    }

    #[test]
    fn data_dir_drives_default_db_path() {
        let config = load(&[(JWT_SECRET_ENV, "s"), (DATA_DIR_ENV, "/var/lib/fermento")]).unwrap();
        assert_eq!(
            config.users_db_path,
            PathBuf::from("/var/lib/fermento/users.redb")
        );

        let config = load(&[
            (JWT_SECRET_ENV, "s"),
            (DATA_DIR_ENV, "/var/lib/fermento"),
            (USERS_DB_PATH_ENV, "/tmp/u.redb"),
        ])
        .unwrap();
        assert_eq!(config.users_db_path, PathBuf::from("/tmp/u.redb"));
    }

    #[test]
    fn invalid_numbers_rejected() {
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "eighty")]),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (TOKEN_TTL_SECS_ENV, "0")]),
            Err(ConfigError::Invalid { name: TOKEN_TTL_SECS_ENV, .. })
        ));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "s"), (LEDGER_CHAIN_ID_ENV, "-1")]),
            Err(ConfigError::Invalid { name: LEDGER_CHAIN_ID_ENV, .. })
        ));
    }

    #[test]
    fn tls_requires_both_paths() {
        assert!(load(&[(JWT_SECRET_ENV, "s"), (TLS_CERT_PATH_ENV, "cert.pem")]).is_err());

        let config = load(&[
            (JWT_SECRET_ENV, "s"),
            (TLS_CERT_PATH_ENV, "cert.pem"),
            (TLS_KEY_PATH_ENV, "key.pem"),
        ])
        .unwrap();
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "cert.pem".into(),
                key: "key.pem".into()
            })
        );
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::parse(Some("JSON".into())), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty".into())), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
    }
}
