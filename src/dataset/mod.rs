//! Fixture datasets and seeding.
//!
//! A dataset is an ordered sequence of JSON records loaded by name through
//! the [`DatasetLoader`] seam. [`DatasetSeeder`] stamps every record with a
//! caller-chosen partition label and writes each one individually through
//! the storage collaborator, keyed `"<label><index>"`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::client::CollectionHandle;
use crate::errors::DatasetError;
use crate::errors::SeedError;


/// One record of a named fixture.
///
/// The `partition` field is reserved for the seeder; whatever the fixture
/// file carries there is overwritten with the caller's label. All other
/// fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(default)]
    pub partition: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Fixture-loader collaborator boundary.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    async fn load(&self, name: &str) -> Result<Vec<FixtureRecord>, DatasetError>;
}

/// Loads `<root>/<name>.json` fixture files.
pub struct JsonDatasetLoader {
    root: PathBuf,
}

impl JsonDatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DatasetLoader for JsonDatasetLoader {
    async fn load(&self, name: &str) -> Result<Vec<FixtureRecord>, DatasetError> {
        let path = self.root.join(format!("{name}.json"));

        let raw = tokio::fs::read(&path).await.map_err(|source| DatasetError::Io {
            name: name.to_string(),
            source,
        })?;

        serde_json::from_slice(&raw).map_err(|source| DatasetError::Parse {
            name: name.to_string(),
            source,
        })
    }
}

/// Writes fixture datasets into the run's working collection.
///
/// Writes are sequential, one in flight; concurrent seed calls must use
/// disjoint partition labels or their keys collide.
pub struct DatasetSeeder {
    loader: Arc<dyn DatasetLoader>,
    collection: Arc<dyn CollectionHandle>,
}

impl DatasetSeeder {
    pub fn new(loader: Arc<dyn DatasetLoader>, collection: Arc<dyn CollectionHandle>) -> Self {
        Self { loader, collection }
    }

    /// Load `dataset_name`, stamp each record with `partition_label`, and
    /// upsert every record as `"<label><index>"` (0-based, no padding).
    ///
    /// Returns the number of records written on full success.
    ///
    /// # Errors
    /// The first failure aborts the pass. Records written before the failure
    /// stay in place; fixtures are idempotent by key, so re-seeding the
    /// same label overwrites any partial state.
    pub async fn seed(
        &self,
        dataset_name: &str,
        partition_label: &str,
    ) -> Result<usize, SeedError> {
        let mut records = self.loader.load(dataset_name).await?;

        debug!(
            dataset = dataset_name,
            partition = partition_label,
            records = records.len(),
            "seeding dataset"
        );

        for (index, record) in records.iter_mut().enumerate() {
            record.partition = partition_label.to_string();

            let key = format!("{partition_label}{index}");
            let document = serde_json::to_value(&*record).map_err(SeedError::Encode)?;

            if let Err(source) = self.collection.upsert(&key, &document).await {
                return Err(SeedError::Write { key, source });
            }
        }

        Ok(records.len())
    }
}
