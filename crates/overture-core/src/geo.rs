//! GeoParquet `geo` metadata descriptor.
//!
//! GeoParquet files carry a JSON document under the `geo` key of the file's
//! key-value metadata describing the geometry columns. The only field this
//! crate requires is `primary_column`, naming the column holding primary
//! geometry; the rest is retained for inspection.

use std::collections::HashMap;

use arrow_schema::Schema;
use serde::Deserialize;

use crate::error::{Result, StateError};

/// Schema metadata key holding the GeoParquet descriptor.
pub const GEO_METADATA_KEY: &str = "geo";

/// Parsed GeoParquet file-level metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoMetadata {
    /// GeoParquet specification version the file claims.
    #[serde(default)]
    pub version: Option<String>,
    /// Name of the column holding primary geometry.
    #[serde(default)]
    pub primary_column: Option<String>,
    /// Per-column geometry descriptors, keyed by column name.
    #[serde(default)]
    pub columns: HashMap<String, GeoColumnMetadata>,
}

/// Descriptor for one geometry column.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoColumnMetadata {
    /// Geometry encoding, `"WKB"` for Overture releases.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Geometry types present in the column, when declared.
    #[serde(default)]
    pub geometry_types: Vec<String>,
    /// Declared bounds of the column, `(minx, miny, maxx, maxy)`.
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

impl GeoMetadata {
    /// Reads and parses the `geo` descriptor from an Arrow schema.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingGeoMetadata`] when the schema carries no
    /// `geo` key, or a JSON error when the descriptor fails to parse.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let raw = schema
            .metadata()
            .get(GEO_METADATA_KEY)
            .ok_or(StateError::MissingGeoMetadata)?;
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolves the primary geometry column against a schema.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingPrimaryGeometryColumn`] when the
    /// descriptor names no primary column or names one that is absent from
    /// the schema.
    pub fn primary_column_index(&self, schema: &Schema) -> Result<usize> {
        let name = self
            .primary_column
            .as_deref()
            .ok_or(StateError::MissingPrimaryGeometryColumn)?;
        schema
            .index_of(name)
            .map_err(|_| StateError::MissingPrimaryGeometryColumn.into())
    }
}
