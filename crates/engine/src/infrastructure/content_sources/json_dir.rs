//! Compendium packs stored as JSON files on disk.
//!
//! Each pack is one file, `<root>/<pack>.json`, holding an array of
//! documents. Documents that carry a `uuid` can also be resolved by
//! reference; the reference index is built on first lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::OnceCell;

use levelwright_domain::DocumentRef;

use crate::infrastructure::ports::{ContentResolver, ContentSource, RepoError};

pub struct JsonDirContentSource {
    root: PathBuf,
    index: OnceCell<HashMap<DocumentRef, Value>>,
}

impl JsonDirContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The pack name must not contain path separators or traversal sequences.
    fn pack_path(&self, pack: &str) -> Result<PathBuf, RepoError> {
        if pack.is_empty() || pack.contains("..") || pack.contains('/') || pack.contains('\\') {
            return Err(RepoError::constraint(format!(
                "invalid pack name (path traversal attempt): {pack}"
            )));
        }
        Ok(self.root.join(format!("{pack}.json")))
    }

    async fn read_pack_file(path: &Path) -> Result<Vec<Value>, RepoError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::database("read_pack", e))?;
        let documents: Vec<Value> = serde_json::from_str(&content)?;
        Ok(documents)
    }

    async fn build_index(&self) -> Result<HashMap<DocumentRef, Value>, RepoError> {
        let mut index = HashMap::new();
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| RepoError::database("index_packs", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::database("index_packs", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_pack_file(&path).await {
                Ok(documents) => {
                    for doc in documents {
                        if let Some(uuid) = doc.get("uuid").and_then(Value::as_str) {
                            index.insert(DocumentRef::new(uuid), doc.clone());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable pack file");
                }
            }
        }

        tracing::info!(documents = index.len(), root = %self.root.display(), "Indexed compendium documents");
        Ok(index)
    }
}

#[async_trait]
impl ContentSource for JsonDirContentSource {
    async fn get_documents(&self, pack: &str) -> Result<Vec<Value>, RepoError> {
        let path = self.pack_path(pack)?;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(RepoError::not_found("ContentPack", pack));
        }
        Self::read_pack_file(&path).await
    }
}

#[async_trait]
impl ContentResolver for JsonDirContentSource {
    async fn resolve(&self, reference: &DocumentRef) -> Result<Option<Value>, RepoError> {
        let index = self.index.get_or_try_init(|| self.build_index()).await?;
        Ok(index.get(reference).cloned())
    }
}
