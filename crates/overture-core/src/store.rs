//! Connection to the Overture Maps release bucket.
//!
//! Overture distributes releases as GeoParquet in a public, anonymously
//! readable S3 bucket. This module resolves an [`ObjectStore`] for that
//! bucket once, from an explicit immutable configuration value, and lists
//! the data files of a feature type's dataset. No environment probing
//! happens at call time; tests inject their own store.

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use object_store::ClientOptions;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};

use crate::catalog::FeatureType;
use crate::error::{Result, StateError};

/// S3 bucket holding Overture Maps releases.
pub const OVERTURE_BUCKET: &str = "overturemaps-us-west-2";

/// AWS region of [`OVERTURE_BUCKET`].
pub const OVERTURE_REGION: &str = "us-west-2";

/// Release pinned by default when none is supplied.
pub const DEFAULT_RELEASE: &str = "2025-06-25.0";

/// Timeout configuration passed through to the object store client.
///
/// Both timeouts are independently optional and default to "no timeout".
/// They are pass-through only; no retry or backoff is layered on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectOptions {
    /// Timeout for establishing a connection to the remote source.
    pub connect_timeout: Option<Duration>,
    /// Timeout for a complete request against the remote source.
    pub request_timeout: Option<Duration>,
}

impl ConnectOptions {
    /// Creates options with no timeouts set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection-establishment timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn client_options(&self) -> ClientOptions {
        let options = match self.connect_timeout {
            Some(timeout) => ClientOptions::new().with_connect_timeout(timeout),
            None => ClientOptions::new().with_connect_timeout_disabled(),
        };
        match self.request_timeout {
            Some(timeout) => options.with_timeout(timeout),
            None => options.with_timeout_disabled(),
        }
    }
}

/// Handle on one Overture release within an object store.
#[derive(Debug, Clone)]
pub struct ReleaseStore {
    store: Arc<dyn ObjectStore>,
    release: String,
}

impl ReleaseStore {
    /// Connects anonymously to the public Overture release bucket.
    ///
    /// # Errors
    ///
    /// Returns an error when the S3 client cannot be constructed.
    pub fn connect(release: impl Into<String>, options: ConnectOptions) -> Result<Self> {
        let store = AmazonS3Builder::new()
            .with_bucket_name(OVERTURE_BUCKET)
            .with_region(OVERTURE_REGION)
            .with_skip_signature(true)
            .with_client_options(options.client_options())
            .build()?;

        Ok(Self {
            store: Arc::new(store),
            release: release.into(),
        })
    }

    /// Wraps an existing object store, for tests and alternative mirrors.
    pub fn with_store(store: Arc<dyn ObjectStore>, release: impl Into<String>) -> Self {
        Self {
            store,
            release: release.into(),
        }
    }

    /// The underlying object store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }

    /// The pinned release identifier.
    #[must_use]
    pub fn release(&self) -> &str {
        &self.release
    }

    /// Lists the parquet files of one feature type's dataset.
    ///
    /// Results are sorted by location so reads are deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoDatasetFiles`] when the prefix holds no
    /// parquet objects, or the underlying listing error unchanged.
    pub async fn list_dataset_files(&self, feature_type: &FeatureType) -> Result<Vec<ObjectMeta>> {
        let prefix = feature_type.dataset_prefix(&self.release);
        let prefix_path = Path::from(prefix.as_str());

        let mut files: Vec<ObjectMeta> = self
            .store
            .list(Some(&prefix_path))
            .try_filter(|meta| {
                futures::future::ready(meta.location.as_ref().ends_with(".parquet"))
            })
            .try_collect()
            .await?;

        if files.is_empty() {
            return Err(StateError::NoDatasetFiles { prefix }.into());
        }

        files.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(files)
    }
}
