//! Runtime configuration loaded via OrthoConfig.
//!
//! Each concern has its own prefix so deployments can keep the conventional
//! `DATABASE_URL`, `BASIC_USER` and `BASIC_PASS` variables.

use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::middleware::BasicCredentials;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 4100;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Failure while assembling settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A source could not be read or parsed.
    #[error("failed to load {section} settings: {message}")]
    Load {
        section: &'static str,
        message: String,
    },
    /// A required value is absent.
    #[error("{variable} must be set")]
    Missing { variable: &'static str },
    /// A value is present but unusable.
    #[error("{variable} is invalid: {message}")]
    Invalid {
        variable: &'static str,
        message: String,
    },
}

/// PostgreSQL connection settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DATABASE")]
pub struct DatabaseSettings {
    /// Connection URL, e.g. `postgres://stock@localhost/stock`.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing the request.
    #[ortho_config(default = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,
}

impl DatabaseSettings {
    /// Return the connection URL or fail when it is unset or blank.
    pub fn url(&self) -> Result<&str, SettingsError> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::Missing {
                variable: "DATABASE_URL",
            })
    }

    /// Pool checkout timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Credentials for the HTTP Basic gate.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BASIC")]
pub struct BasicAuthSettings {
    /// Expected user name; empty leaves the gate open.
    #[ortho_config(default = String::new())]
    pub user: String,
    /// Expected password; empty leaves the gate open.
    #[ortho_config(default = String::new())]
    pub pass: String,
}

impl BasicAuthSettings {
    /// Credentials to enforce, or `None` when either half is missing.
    pub fn credentials(&self) -> Option<BasicCredentials> {
        BasicCredentials::from_optional(Some(self.user.clone()), Some(self.pass.clone()))
    }
}

/// Listener and filesystem settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOCKROOM")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind. The plain `PORT` variable is honoured when unset.
    pub port: Option<u16>,
    /// Directory receiving uploaded ID images.
    #[ortho_config(default = PathBuf::from(DEFAULT_UPLOAD_DIR))]
    pub upload_dir: PathBuf,
}

impl ServerSettings {
    /// Resolve the bind address from host, port and the `PORT` fallback.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = match self.host.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_HOST,
            Some(raw) => raw.parse().map_err(|err| SettingsError::Invalid {
                variable: "STOCKROOM_HOST",
                message: format!("{err}"),
            })?,
        };
        Ok(SocketAddr::new(host, self.port_or(std::env::var("PORT").ok())?))
    }

    fn port_or(&self, fallback: Option<String>) -> Result<u16, SettingsError> {
        if let Some(port) = self.port {
            return Ok(port);
        }
        match fallback.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_PORT),
            Some(raw) => raw.parse().map_err(|err| SettingsError::Invalid {
                variable: "PORT",
                message: format!("{err}"),
            }),
        }
    }
}

/// Every settings section the server needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub basic_auth: BasicAuthSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load every section from the environment and configuration files.
    ///
    /// Command-line arguments are not consulted; each section would otherwise
    /// reject the others' flags.
    pub fn load() -> Result<Self, SettingsError> {
        let args = || [OsString::from("stockroom")];
        Ok(Self {
            database: DatabaseSettings::load_from_iter(args()).map_err(|err| {
                SettingsError::Load {
                    section: "database",
                    message: err.to_string(),
                }
            })?,
            basic_auth: BasicAuthSettings::load_from_iter(args()).map_err(|err| {
                SettingsError::Load {
                    section: "basic auth",
                    message: err.to_string(),
                }
            })?,
            server: ServerSettings::load_from_iter(args()).map_err(|err| SettingsError::Load {
                section: "server",
                message: err.to_string(),
            })?,
        })
    }
}
