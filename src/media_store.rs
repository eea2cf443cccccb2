// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

//! Blob storage for uploaded media. The store hands out stable storage
//! paths of the form `media/{owner_id}/{file_name}`, which double as the
//! public fetch path; the database only ever holds these paths.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Namespace prefix shared by storage paths and fetch URLs.
pub const STORAGE_PREFIX: &str = "media";

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist a blob under the owner's namespace. The returned storage
    /// path is unique within that namespace.
    async fn store(
        &self,
        owner_id: i32,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, ApiError>;

    /// Read a blob back by owner and server-assigned file name.
    async fn open(&self, owner_id: i32, file_name: &str) -> Result<Vec<u8>, ApiError>;

    /// Remove the blob behind a storage path. A missing file is not an
    /// error; callers treat removal as best-effort cleanup.
    async fn remove(&self, storage_path: &str) -> Result<(), ApiError>;
}

/// Filesystem-backed store with one subdirectory per owning user.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a storage path onto the local root. Anything that does not match
    /// the `media/{owner}/{file}` layout, or tries to escape it, is None.
    fn locate(&self, storage_path: &str) -> Option<PathBuf> {
        let rest = storage_path.strip_prefix(STORAGE_PREFIX)?.strip_prefix('/')?;
        let (owner, file_name) = rest.split_once('/')?;
        if owner.parse::<i32>().is_err() || !is_safe_file_name(file_name) {
            return None;
        }
        Some(self.root.join(owner).join(file_name))
    }
}

#[async_trait]
impl BlobStore for LocalMediaStore {
    async fn store(
        &self,
        owner_id: i32,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, ApiError> {
        let dir = self.root.join(owner_id.to_string());
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create media directory {}", dir.display()))?;

        // Server-assigned name: upload-time millis plus the sanitized
        // original name. create_new gives the collision check and the
        // claim in one step, so concurrent uploads in the same
        // millisecond still end up with distinct names.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let base = sanitize_file_name(original_name);
        let mut file_name = format!("{millis}_{base}");
        let mut attempt: u32 = 0;
        let mut file = loop {
            let candidate = dir.join(&file_name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                    file_name = format!("{millis}-{attempt}_{base}");
                }
                Err(e) => {
                    return Err(ApiError::Internal(anyhow!(
                        "failed to save file {}: {e}",
                        candidate.display()
                    )))
                }
            }
        };
        file.write_all(bytes)
            .await
            .with_context(|| format!("failed to write media file {file_name}"))?;

        debug!("stored media blob {file_name} for user {owner_id}");
        Ok(format!("{STORAGE_PREFIX}/{owner_id}/{file_name}"))
    }

    async fn open(&self, owner_id: i32, file_name: &str) -> Result<Vec<u8>, ApiError> {
        if !is_safe_file_name(file_name) {
            return Err(ApiError::not_found("File not found"));
        }
        let path = self.root.join(owner_id.to_string()).join(file_name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ApiError::not_found("File not found")),
            Err(e) => Err(ApiError::Internal(anyhow!(
                "failed to read media file {}: {e}",
                path.display()
            ))),
        }
    }

    async fn remove(&self, storage_path: &str) -> Result<(), ApiError> {
        let Some(path) = self.locate(storage_path) else {
            warn!("refusing to remove blob outside the media namespace: {storage_path}");
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("media file already gone: {storage_path}");
                Ok(())
            }
            Err(e) => Err(ApiError::Internal(anyhow!(
                "failed to remove media file {}: {e}",
                path.display()
            ))),
        }
    }
}

fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Strip any path components and unprintable characters from a
/// client-supplied file name.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "upload".to_string()
    } else {
        cleaned
    }
}
