//! Spatially enabled tables.
//!
//! A [`SpatialTable`] is a set of record batches with one designated
//! geometry column, translated from its WKB wire encoding to the native
//! `GeoArrow` geometry encoding and tagged with a coordinate reference
//! system. Overture publishes everything in geographic WGS84, so the tag is
//! fixed to EPSG:4326. The translation is a pure per-row conversion: exact
//! coordinate values and geometry types pass through unchanged, and no data
//! value outside the geometry column is touched.

use std::sync::Arc;

use arrow::compute::cast;
use arrow_array::{ArrayRef, BinaryArray, RecordBatch};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use geoarrow_array::array::WkbArray;
use geoarrow_array::cast::from_wkb;
use geoarrow_schema::{CoordType, Crs, GeoArrowType, GeometryType, Metadata, WkbType};

use crate::error::{Result, StateError};
use crate::geo::GeoMetadata;

/// Authority code of the geographic WGS84 coordinate reference system.
pub const WGS84_AUTHORITY_CODE: &str = "EPSG:4326";

/// Record batches with a designated, CRS-tagged geometry column.
#[derive(Debug, Clone)]
pub struct SpatialTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    geometry_column: usize,
    metadata: Arc<Metadata>,
}

impl SpatialTable {
    /// Builds a spatial table from raw batches and their GeoParquet descriptor.
    ///
    /// The primary geometry column named by `geo` is converted from WKB to
    /// the native `GeoArrow` geometry encoding, and its schema field is
    /// replaced with the `GeoArrow` extension field carrying the EPSG:4326
    /// tag.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::MissingPrimaryGeometryColumn`] when the
    /// descriptor names no column present in the schema,
    /// [`StateError::UnexpectedGeometryEncoding`] when that column is not
    /// binary, and a `GeoArrow` error when WKB decoding fails.
    pub fn try_new(
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
        geo: &GeoMetadata,
    ) -> Result<Self> {
        let geometry_column = geo.primary_column_index(&schema)?;
        let geometry_field = schema.field(geometry_column);

        let metadata = wgs84_metadata();
        let geometry_type = GeometryType::new(Arc::clone(&metadata))
            .with_coord_type(CoordType::Interleaved);

        let new_field = geometry_type.to_field(
            geometry_field.name().clone(),
            geometry_field.is_nullable(),
        );
        let new_schema = Arc::new(replace_field(&schema, geometry_column, new_field));

        let new_batches = batches
            .into_iter()
            .map(|batch| {
                convert_batch(
                    &batch,
                    geometry_column,
                    &geometry_type,
                    Arc::clone(&new_schema),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            schema: new_schema,
            batches: new_batches,
            geometry_column,
            metadata,
        })
    }

    /// The table schema, geometry extension field included.
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }

    /// The record batches making up the table.
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total number of rows across all batches.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Returns `true` when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Index of the designated geometry column.
    #[must_use]
    pub fn geometry_column_index(&self) -> usize {
        self.geometry_column
    }

    /// Name of the designated geometry column.
    #[must_use]
    pub fn geometry_column_name(&self) -> &str {
        self.schema.field(self.geometry_column).name()
    }

    /// Coordinate reference system of the geometry column.
    #[must_use]
    pub fn crs(&self) -> &Crs {
        self.metadata.crs()
    }
}

/// `GeoArrow` metadata carrying the fixed EPSG:4326 tag.
fn wgs84_metadata() -> Arc<Metadata> {
    Arc::new(Metadata::new(
        Crs::from_authority_code(WGS84_AUTHORITY_CODE.to_string()),
        None,
    ))
}

/// Rebuilds a schema with one field swapped, keeping schema-level metadata.
fn replace_field(schema: &Schema, index: usize, field: Field) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, existing)| {
            if idx == index {
                field.clone()
            } else {
                existing.as_ref().clone()
            }
        })
        .collect();
    Schema::new(fields).with_metadata(schema.metadata().clone())
}

/// Converts one batch's geometry column from WKB to native `GeoArrow`.
fn convert_batch(
    batch: &RecordBatch,
    geometry_column: usize,
    geometry_type: &GeometryType,
    schema: SchemaRef,
) -> Result<RecordBatch> {
    let wkb_column = batch.column(geometry_column);
    let converted = convert_wkb_column(wkb_column, geometry_type, schema.field(geometry_column))?;

    let columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            if idx == geometry_column {
                Arc::clone(&converted)
            } else {
                Arc::clone(column)
            }
        })
        .collect();

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Decodes a WKB binary column into the target `GeoArrow` geometry array.
fn convert_wkb_column(
    column: &ArrayRef,
    geometry_type: &GeometryType,
    field: &Field,
) -> Result<ArrayRef> {
    if !matches!(
        column.data_type(),
        DataType::Binary | DataType::LargeBinary | DataType::BinaryView
    ) {
        return Err(StateError::UnexpectedGeometryEncoding {
            column: field.name().clone(),
            data_type: column.data_type().to_string(),
        }
        .into());
    }

    // Normalize large/view encodings so one decode path suffices.
    let binary = cast(column, &DataType::Binary)?;
    let binary: &BinaryArray = binary.as_any().downcast_ref().ok_or_else(|| {
        StateError::UnexpectedGeometryEncoding {
            column: field.name().clone(),
            data_type: binary.data_type().to_string(),
        }
    })?;

    let wkb_type = WkbType::new(Arc::default());
    let wkb_array = WkbArray::from((binary.clone(), wkb_type));

    let geometry_array = from_wkb(&wkb_array, GeoArrowType::Geometry(geometry_type.clone()))?;
    Ok(geometry_array.to_array_ref())
}
