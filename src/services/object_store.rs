use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Bucket/key blob storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Copy an object within a bucket
    async fn copy(&self, bucket: &str, from: &str, to: &str) -> Result<(), StoreError>;

    /// Delete an object; deleting a missing object succeeds
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError>;

    /// Keys under `prefix`, sorted
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Reject keys that could escape the bucket directory
fn validate_key(key: &str) -> Result<(), StoreError> {
    let path = Path::new(key);
    let clean = !key.is_empty()
        && !key.contains('\\')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if clean {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Object store backed by a directory per bucket under `root`
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(bucket)?;
        validate_key(key)?;
        Ok(self.root.join(bucket).join(key))
    }

    fn not_found(bucket: &str, key: &str) -> StoreError {
        StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, key))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.path_for(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &body).await?;
        tracing::debug!(bucket, key, content_type, bytes = body.len(), "Stored object");
        Ok(())
    }

    async fn copy(&self, bucket: &str, from: &str, to: &str) -> Result<(), StoreError> {
        let source = self.path_for(bucket, from)?;
        let target = self.path_for(bucket, to)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        match tokio::fs::copy(&source, &target).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, from))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(bucket, key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        validate_key(bucket)?;
        let bucket_dir = self.root.join(bucket);
        let mut keys = Vec::new();
        let mut pending = vec![bucket_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if let Ok(relative) = path.strip_prefix(&bucket_dir) {
                    let key = relative.to_string_lossy().replace('\\', "/");
                    if key.starts_with(prefix) {
                        keys.push(key);
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    content_type: String,
}

/// Object store held in memory
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<(String, String), StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded at `put` time
    pub async fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.body.clone())
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut objects = self.objects.write().await;
        objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn copy(&self, bucket: &str, from: &str, to: &str) -> Result<(), StoreError> {
        validate_key(to)?;
        let mut objects = self.objects.write().await;
        let source = objects
            .get(&(bucket.to_string(), from.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: from.to_string(),
            })?;
        objects.insert((bucket.to_string(), to.to_string()), source);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects.contains_key(&(bucket.to_string(), key.to_string())))
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect())
    }
}
