//! Stores uploaded customer ID images under the configured upload directory.
//!
//! Writes go through a capability handle on the upload root, so a crafted
//! file name cannot escape it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{IdImageStore, IdImageStoreError};

const FALLBACK_NAME: &str = "id-image";
const MAX_NAME_LEN: usize = 80;

/// `IdImageStore` backed by a directory on local disk.
#[derive(Debug, Clone)]
pub struct CapStdIdImageStore {
    root: PathBuf,
}

impl CapStdIdImageStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory uploads are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduce an uploaded name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`.
fn sanitize_file_name(original: Option<&str>) -> String {
    let base = original
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn write_file(root: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<()> {
    Dir::create_ambient_dir_all(root, ambient_authority())?;
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    dir.write(file_name, bytes)
}

fn remove_file(root: &Path, file_name: &str) -> std::io::Result<()> {
    let dir = match Dir::open_ambient_dir(root, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    match dir.remove_file(file_name) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl IdImageStore for CapStdIdImageStore {
    async fn store(
        &self,
        original_name: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<String, IdImageStoreError> {
        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name.as_deref())
        );
        let root = self.root.clone();
        let target = file_name.clone();
        tokio::task::spawn_blocking(move || write_file(&root, &target, &bytes))
            .await
            .map_err(|err| IdImageStoreError::io(err.to_string()))?
            .map_err(|err| IdImageStoreError::io(err.to_string()))?;

        debug!(file = %file_name, "stored id image");
        Ok(file_name)
    }

    async fn remove(&self, path: &str) -> Result<(), IdImageStoreError> {
        let root = self.root.clone();
        let target = path.to_owned();
        tokio::task::spawn_blocking(move || remove_file(&root, &target))
            .await
            .map_err(|err| IdImageStoreError::io(err.to_string()))?
            .map_err(|err| IdImageStoreError::io(err.to_string()))?;

        debug!(file = %path, "removed id image");
        Ok(())
    }
}
