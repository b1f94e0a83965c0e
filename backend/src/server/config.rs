//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use stockroom::middleware::BasicCredentials;
use stockroom::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) upload_dir: PathBuf,
    pub(crate) credentials: Option<BasicCredentials>,
}

impl ServerConfig {
    /// Construct a configuration with uploads under `uploads` and the
    /// basic-auth gate disabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            upload_dir: PathBuf::from("uploads"),
            credentials: None,
        }
    }

    /// Directory receiving uploaded ID images.
    #[must_use]
    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    /// Require these credentials on every non-health route.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<BasicCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
