use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{ContentFingerprint, ImageId, ImageRecord};

/// Storage for image records
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Whether a record with this content fingerprint exists
    async fn exists_by_fingerprint(
        &self,
        fingerprint: &ContentFingerprint,
    ) -> Result<bool, StoreError>;

    /// Insert or replace a record
    async fn put_record(&self, record: ImageRecord) -> Result<(), StoreError>;

    /// Insert `record` unless one with the same content hash exists.
    ///
    /// Returns whether the record was written. The check and the write are
    /// one atomic step.
    async fn put_record_if_new(&self, record: ImageRecord) -> Result<bool, StoreError>;

    async fn get(&self, image_id: &ImageId) -> Result<Option<ImageRecord>, StoreError>;

    /// Up to `limit` records ordered by `random_sort`, starting at the first
    /// key `>= start_key` and wrapping around to the lowest keys
    async fn query_candidates(
        &self,
        start_key: f64,
        limit: usize,
    ) -> Result<Vec<ImageRecord>, StoreError>;

    /// Record one showing; returns the updated record
    async fn increment_show_count(
        &self,
        image_id: &ImageId,
        shown_at: DateTime<Utc>,
    ) -> Result<ImageRecord, StoreError>;
}

/// Metadata store held in memory, optionally mirrored to a JSON file
pub struct InMemoryMetadataStore {
    records: RwLock<HashMap<ImageId, ImageRecord>>,
    file: Option<PathBuf>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            file: None,
        }
    }

    /// Load records from `path` (empty if it does not exist yet); every
    /// write rewrites the file
    pub async fn with_file(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let list: Vec<ImageRecord> = serde_json::from_slice(&bytes)?;
                tracing::info!(path = %path.display(), count = list.len(), "Loaded image records");
                list.into_iter()
                    .map(|r| (r.image_id.clone(), r))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            records: RwLock::new(records),
            file: Some(path),
        })
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Write all records to the backing file via a temp file and rename.
    /// Called with the write lock held so snapshots land in order.
    async fn persist(&self, records: &HashMap<ImageId, ImageRecord>) -> Result<(), StoreError> {
        let Some(path) = &self.file else {
            return Ok(());
        };

        let mut list: Vec<&ImageRecord> = records.values().collect();
        list.sort_by(|a, b| a.image_id.as_str().cmp(b.image_id.as_str()));
        let json = serde_json::to_vec_pretty(&list)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn exists_by_fingerprint(
        &self,
        fingerprint: &ContentFingerprint,
    ) -> Result<bool, StoreError> {
        let records = self.records.read().await;
        Ok(records.values().any(|r| &r.content_hash == fingerprint))
    }

    async fn put_record(&self, record: ImageRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(record.image_id.clone(), record);
        self.persist(&records).await
    }

    async fn put_record_if_new(&self, record: ImageRecord) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.content_hash == record.content_hash)
        {
            return Ok(false);
        }
        records.insert(record.image_id.clone(), record);
        self.persist(&records).await?;
        Ok(true)
    }

    async fn get(&self, image_id: &ImageId) -> Result<Option<ImageRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(image_id).cloned())
    }

    async fn query_candidates(
        &self,
        start_key: f64,
        limit: usize,
    ) -> Result<Vec<ImageRecord>, StoreError> {
        let records = self.records.read().await;
        let mut sorted: Vec<&ImageRecord> = records.values().collect();
        sorted.sort_by(|a, b| a.random_sort.total_cmp(&b.random_sort));

        let split = sorted.partition_point(|r| r.random_sort < start_key);
        let (below, at_or_above) = sorted.split_at(split);

        Ok(at_or_above
            .iter()
            .chain(below.iter())
            .take(limit)
            .map(|r| (*r).clone())
            .collect())
    }

    async fn increment_show_count(
        &self,
        image_id: &ImageId,
        shown_at: DateTime<Utc>,
    ) -> Result<ImageRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(image_id)
            .ok_or_else(|| StoreError::RecordNotFound(image_id.to_string()))?;
        record.show_count += 1;
        record.last_shown_at = Some(shown_at);
        let updated = record.clone();
        self.persist(&records).await?;
        Ok(updated)
    }
}
