//! Fetch operation against an Overture Maps release.
//!
//! This module provides the [`OvertureClient`] and its single operation:
//! validate inputs, stream the matching GeoParquet records, and return a
//! [`SpatialTable`]. Control flow is strictly linear; each call is stateless
//! with respect to other calls, and failures surface synchronously with no
//! retries and no partial results.

use std::sync::Arc;

use log::{debug, warn};
use object_store::ObjectStore;

use crate::bbox::BoundingBox;
use crate::catalog::{FeatureType, resolve_feature_type};
use crate::error::Result;
use crate::geo::GeoMetadata;
use crate::reader::scan_dataset;
use crate::store::{ConnectOptions, DEFAULT_RELEASE, ReleaseStore};
use crate::table::SpatialTable;

/// Client for fetching feature data from an Overture Maps release.
///
/// Construction resolves the remote store once from explicit configuration;
/// the client holds no mutable state and individual fetches do not interact.
#[derive(Debug, Clone)]
pub struct OvertureClient {
    release: ReleaseStore,
}

impl OvertureClient {
    /// Connects to the default pinned release with no timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error when the S3 client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::connect(DEFAULT_RELEASE, ConnectOptions::default())
    }

    /// Connects to a specific release with explicit timeout configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the S3 client cannot be constructed.
    pub fn connect(release: impl Into<String>, options: ConnectOptions) -> Result<Self> {
        Ok(Self {
            release: ReleaseStore::connect(release, options)?,
        })
    }

    /// Wraps an existing object store, for tests and alternative mirrors.
    pub fn with_store(store: Arc<dyn ObjectStore>, release: impl Into<String>) -> Self {
        Self {
            release: ReleaseStore::with_store(store, release),
        }
    }

    /// The release this client reads from.
    #[must_use]
    pub fn release(&self) -> &str {
        self.release.release()
    }

    /// Fetches all features of one type intersecting a bounding box.
    ///
    /// `bbox` is `(minx, miny, maxx, maxy)` in geographic coordinates.
    /// Validation runs before any network activity; the matching records are
    /// then streamed, drained into memory, converted from WKB to the native
    /// `GeoArrow` geometry encoding, and tagged with EPSG:4326.
    ///
    /// A query matching zero rows logs a warning and still returns an empty
    /// table successfully.
    ///
    /// # Errors
    ///
    /// * [`OvertureError::InvalidArgument`](crate::error::OvertureError::InvalidArgument)
    ///   for an unknown feature type or a malformed bounding box.
    /// * [`OvertureError::InvalidState`](crate::error::OvertureError::InvalidState)
    ///   when the dataset violates its metadata contract.
    /// * Transport and decode errors propagate unchanged.
    pub async fn fetch(&self, overture_type: &str, bbox: &[f64]) -> Result<SpatialTable> {
        let feature_type = resolve_feature_type(overture_type)?;
        let bbox = BoundingBox::from_slice(bbox)?;
        self.fetch_validated(feature_type, bbox).await
    }

    /// Like [`fetch`](Self::fetch), for callers that already hold a
    /// validated [`BoundingBox`].
    pub async fn fetch_bbox(&self, overture_type: &str, bbox: BoundingBox) -> Result<SpatialTable> {
        let feature_type = resolve_feature_type(overture_type)?;
        self.fetch_validated(feature_type, bbox).await
    }

    async fn fetch_validated(
        &self,
        feature_type: FeatureType,
        bbox: BoundingBox,
    ) -> Result<SpatialTable> {
        let type_name = feature_type.name;
        let files = self.release.list_dataset_files(&feature_type).await?;
        debug!(
            "Dataset '{}' in release '{}' has {} file(s)",
            type_name,
            self.release.release(),
            files.len()
        );

        let scan = scan_dataset(&self.release.store(), &files, &bbox).await?;

        let row_count = scan.num_rows();
        debug!("Fetched {row_count} rows of '{type_name}' data from Overture Maps");
        if row_count == 0 {
            warn!("No '{type_name}' data found for the specified bounding box: {bbox}");
        }

        let geo = GeoMetadata::from_schema(&scan.schema)?;
        SpatialTable::try_new(scan.schema, scan.batches, &geo)
    }
}
