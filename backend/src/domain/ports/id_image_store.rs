//! Port for storing trade-in ID images.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum IdImageStoreError {
        /// The file could not be written.
        Io { message: String } => "id image could not be stored: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdImageStore: Send + Sync {
    /// Persist `bytes` and return the path to record, relative to the
    /// upload root.
    async fn store(
        &self,
        original_name: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<String, IdImageStoreError>;

    /// Delete a previously stored image. A missing file is not an error.
    async fn remove(&self, path: &str) -> Result<(), IdImageStoreError>;
}
