//! Streaming reads of Overture GeoParquet datasets.
//!
//! Overture datasets carry a `bbox` covering column (a struct of
//! `xmin`/`xmax`/`ymin`/`ymax`) alongside the WKB geometry. The scan uses it
//! twice: row groups are pruned from parquet column statistics before any
//! data pages are fetched, and surviving rows pass through a [`RowFilter`]
//! evaluating the same intersection test. The result is a fully drained,
//! in-memory set of record batches scoped to the query bounding box.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, StructArray};
use arrow::compute::kernels::cmp::{gt_eq, lt_eq};
use arrow::compute::{and, cast};
use arrow_schema::{ArrowError, DataType, SchemaRef};
use futures::TryStreamExt;
use log::debug;
use object_store::{ObjectMeta, ObjectStore};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::{ArrowPredicateFn, RowFilter};
use parquet::arrow::async_reader::{ParquetObjectReader, ParquetRecordBatchStreamBuilder};
use parquet::file::metadata::{ParquetMetaData, RowGroupMetaData};
use parquet::file::statistics::Statistics;

use crate::bbox::BoundingBox;
use crate::error::{Result, StateError};

/// Name of the covering column in Overture distributions.
pub const BBOX_COLUMN: &str = "bbox";

/// Result of draining one dataset scan into memory.
#[derive(Debug, Clone)]
pub struct DatasetScan {
    /// Dataset schema, including the GeoParquet key-value metadata.
    pub schema: SchemaRef,
    /// All record batches whose rows intersect the query bounding box.
    pub batches: Vec<RecordBatch>,
}

impl DatasetScan {
    /// Total number of rows across all batches.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// Reads every file of a dataset, scoped to `bbox`, into memory.
///
/// Files are read sequentially and drained fully; nothing is retried and
/// nothing is cached. The schema is taken from the first file.
///
/// # Errors
///
/// Returns [`StateError::MissingBboxColumn`] when the dataset lacks the
/// covering column, and propagates object store, parquet, and arrow errors
/// unchanged.
pub async fn scan_dataset(
    store: &Arc<dyn ObjectStore>,
    files: &[ObjectMeta],
    bbox: &BoundingBox,
) -> Result<DatasetScan> {
    let mut schema: Option<SchemaRef> = None;
    let mut batches = Vec::new();

    for meta in files {
        let reader = ParquetObjectReader::new(Arc::clone(store), meta.location.clone())
            .with_file_size(meta.size);
        let builder = ParquetRecordBatchStreamBuilder::new(reader).await?;

        let file_schema = Arc::clone(builder.schema());
        ensure_bbox_column(&file_schema)?;
        if schema.is_none() {
            schema = Some(Arc::clone(&file_schema));
        }

        let row_groups = intersecting_row_groups(builder.metadata(), bbox);
        debug!(
            "Scanning '{}': {} of {} row group(s) intersect the bounding box",
            meta.location,
            row_groups.len(),
            builder.metadata().num_row_groups()
        );
        if row_groups.is_empty() {
            continue;
        }

        let mask = ProjectionMask::columns(builder.parquet_schema(), [BBOX_COLUMN]);
        let query = *bbox;
        let predicate = ArrowPredicateFn::new(mask, move |batch: RecordBatch| {
            bbox_intersection_mask(&batch, &query)
        });

        let stream = builder
            .with_row_groups(row_groups)
            .with_row_filter(RowFilter::new(vec![Box::new(predicate)]))
            .build()?;

        let file_batches: Vec<RecordBatch> = stream.try_collect().await?;
        batches.extend(file_batches);
    }

    // list_dataset_files guarantees at least one file, so the schema is set.
    let schema = schema.ok_or_else(|| StateError::NoDatasetFiles {
        prefix: "(empty file list)".to_string(),
    })?;

    Ok(DatasetScan { schema, batches })
}

/// Validates that the dataset schema carries the covering column.
fn ensure_bbox_column(schema: &SchemaRef) -> Result<()> {
    let missing = || StateError::MissingBboxColumn {
        column: BBOX_COLUMN.to_string(),
    };

    let field = schema.field_with_name(BBOX_COLUMN).map_err(|_| missing())?;
    let DataType::Struct(children) = field.data_type() else {
        return Err(missing().into());
    };

    for name in ["xmin", "xmax", "ymin", "ymax"] {
        if !children.iter().any(|child| child.name() == name) {
            return Err(missing().into());
        }
    }
    Ok(())
}

/// Selects the row groups whose covering statistics intersect `bbox`.
///
/// Row groups without usable statistics are kept; the row filter still
/// applies the exact predicate afterwards.
fn intersecting_row_groups(metadata: &ParquetMetaData, bbox: &BoundingBox) -> Vec<usize> {
    (0..metadata.num_row_groups())
        .filter(|&idx| row_group_may_intersect(metadata.row_group(idx), bbox))
        .collect()
}

fn row_group_may_intersect(row_group: &RowGroupMetaData, bbox: &BoundingBox) -> bool {
    let bounds = (
        column_stat(row_group, "bbox.xmin", StatBound::Min),
        column_stat(row_group, "bbox.ymin", StatBound::Min),
        column_stat(row_group, "bbox.xmax", StatBound::Max),
        column_stat(row_group, "bbox.ymax", StatBound::Max),
    );

    match bounds {
        (Some(xmin), Some(ymin), Some(xmax), Some(ymax)) => {
            bbox.intersects(xmin, ymin, xmax, ymax)
        },
        _ => true,
    }
}

#[derive(Clone, Copy)]
enum StatBound {
    Min,
    Max,
}

/// Reads one typed column-chunk statistic, widened to f64.
fn column_stat(row_group: &RowGroupMetaData, path: &str, bound: StatBound) -> Option<f64> {
    let column = row_group
        .columns()
        .iter()
        .find(|c| c.column_path().string() == path)?;

    match column.statistics()? {
        Statistics::Float(stats) => match bound {
            StatBound::Min => stats.min_opt().map(|v| f64::from(*v)),
            StatBound::Max => stats.max_opt().map(|v| f64::from(*v)),
        },
        Statistics::Double(stats) => match bound {
            StatBound::Min => stats.min_opt().copied(),
            StatBound::Max => stats.max_opt().copied(),
        },
        _ => None,
    }
}

/// Evaluates the bbox intersection predicate over one projected batch.
///
/// The batch holds only the covering struct column. Children are widened to
/// f64 before comparison so float32 coverings compare exactly against the
/// f64 query bounds.
fn bbox_intersection_mask(
    batch: &RecordBatch,
    bbox: &BoundingBox,
) -> std::result::Result<BooleanArray, ArrowError> {
    let column = batch
        .column_by_name(BBOX_COLUMN)
        .ok_or_else(|| ArrowError::SchemaError(format!("missing '{BBOX_COLUMN}' column")))?;
    let covering = column
        .as_any()
        .downcast_ref::<StructArray>()
        .ok_or_else(|| {
            ArrowError::SchemaError(format!("'{BBOX_COLUMN}' column is not a struct"))
        })?;

    let child = |name: &str| -> std::result::Result<ArrayRef, ArrowError> {
        let array = covering.column_by_name(name).ok_or_else(|| {
            ArrowError::SchemaError(format!("missing '{BBOX_COLUMN}.{name}' column"))
        })?;
        cast(array, &DataType::Float64)
    };

    let west_of_query_east = lt_eq(&child("xmin")?, &Float64Array::new_scalar(bbox.xmax()))?;
    let east_of_query_west = gt_eq(&child("xmax")?, &Float64Array::new_scalar(bbox.xmin()))?;
    let south_of_query_north = lt_eq(&child("ymin")?, &Float64Array::new_scalar(bbox.ymax()))?;
    let north_of_query_south = gt_eq(&child("ymax")?, &Float64Array::new_scalar(bbox.ymin()))?;

    and(
        &and(&west_of_query_east, &east_of_query_west)?,
        &and(&south_of_query_north, &north_of_query_south)?,
    )
}
