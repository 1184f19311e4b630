use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::persist::{atomic_write, PersistError};

/// Fixed name of the persisted state file, relative to the project root.
pub const STATE_FILENAME: &str = ".published_posts.json";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("state file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write state file: {0}")]
    Write(#[from] PersistError),
}

/// What was last published for a post file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub hash: String,
    pub remote_id: String,
    pub published_at: String,
    pub title: String,
}

/// Persisted map from post path (relative to the project root) to its last
/// successful publish.
///
/// The stored hash always reflects the content that produced the associated
/// remote id; entries are written only after a successful publish call.
#[derive(Debug)]
pub struct PublishState {
    path: PathBuf,
    records: BTreeMap<String, PublishRecord>,
}

impl PublishState {
    /// Load the persisted mapping from `path`.
    ///
    /// A missing file yields an empty store. A file that exists but cannot
    /// be read or parsed is an error; resuming with forgotten records would
    /// republish every post.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path: path.to_path_buf(),
                    records: BTreeMap::new(),
                });
            }
            Err(err) => {
                return Err(StateError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let records: BTreeMap<String, PublishRecord> =
            serde_json::from_str(&content).map_err(|err| StateError::Corrupt {
                path: path.to_path_buf(),
                source: err,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Persist the full mapping, creating the containing directory if
    /// absent. Safe to call repeatedly.
    pub fn save(&self) -> Result<(), StateError> {
        let content =
            serde_json::to_string_pretty(&self.records).map_err(StateError::Serialize)?;
        atomic_write(&self.path, &content)?;
        Ok(())
    }

    /// True when `key` has no record, or its stored hash differs from the
    /// hash of `content`. This is the sole gate for skip-vs-publish.
    pub fn should_publish(&self, key: &str, content: &[u8]) -> bool {
        match self.records.get(key) {
            Some(record) => record.hash != content_hash(content),
            None => true,
        }
    }

    /// Insert or overwrite the record for `key`.
    pub fn record(
        &mut self,
        key: &str,
        content: &[u8],
        remote_id: &str,
        title: &str,
        published_at: &str,
    ) {
        self.records.insert(
            key.to_string(),
            PublishRecord {
                hash: content_hash(content),
                remote_id: remote_id.to_string(),
                published_at: published_at.to_string(),
                title: title.to_string(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&PublishRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Hex-encoded SHA-256 digest of raw file bytes, used to detect change.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// State-store key for a post file: its path relative to the project root,
/// slash-joined. Falls back to the full path when the file is not under
/// the root.
pub fn state_key(project_root: &Path, path: &Path) -> String {
    match path.strip_prefix(project_root) {
        Ok(relative) => {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            parts.join("/")
        }
        Err(_) => path.display().to_string(),
    }
}
