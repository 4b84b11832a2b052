//! End-to-end fetch pipeline tests against an in-memory object store.
//!
//! These tests write real GeoParquet bytes (WKB geometry column, `bbox`
//! covering column, `geo` schema metadata) into an `InMemory` store laid out
//! like an Overture release, then run the full fetch pipeline against it.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryBuilder, Float32Array, RecordBatch, StringArray, StructArray};
use arrow_schema::{DataType, Field, Fields, Schema};
use bytes::Bytes;
use geo_traits::to_geo::ToGeoGeometry;
use geo_types::{Geometry, Point};
use geoarrow_array::{GeoArrowArray, GeoArrowArrayAccessor};
use geoarrow_array::array::GeometryArray;
use geozero::{CoordDimensions, ToWkb};
use object_store::ObjectStore;
use object_store::memory::InMemory;
use object_store::path::Path;
use overture_core::error::OvertureError;
use overture_core::{OvertureClient, SpatialTable};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

const RELEASE: &str = "2025-06-25.0";
const SEGMENT_PREFIX: &str = "release/2025-06-25.0/theme=transportation/type=segment/";

/// Loup Loup Pass, WA.
const EXTENT: [f64; 4] = [-119.911, 48.3852, -119.8784, 48.4028];

const GEO_METADATA: &str = r#"{
    "version": "1.1.0",
    "primary_column": "geometry",
    "columns": {"geometry": {"encoding": "WKB", "geometry_types": ["Point"]}}
}"#;

fn covering_fields() -> Fields {
    vec![
        Field::new("xmin", DataType::Float32, true),
        Field::new("xmax", DataType::Float32, true),
        Field::new("ymin", DataType::Float32, true),
        Field::new("ymax", DataType::Float32, true),
    ]
    .into()
}

fn dataset_schema(geo_metadata: Option<&str>) -> Arc<Schema> {
    let mut metadata = HashMap::new();
    if let Some(geo) = geo_metadata {
        metadata.insert("geo".to_string(), geo.to_string());
    }
    Arc::new(
        Schema::new(vec![
            Field::new("id", DataType::Utf8, true),
            Field::new("geometry", DataType::Binary, true),
            Field::new("bbox", DataType::Struct(covering_fields()), true),
        ])
        .with_metadata(metadata),
    )
}

/// Builds one GeoParquet file holding point features at the given positions.
///
/// The row-group size is capped at two rows so files span several row
/// groups and statistics-based pruning actually engages.
fn geoparquet_bytes(points: &[(f64, f64)], geo_metadata: Option<&str>) -> Bytes {
    let schema = dataset_schema(geo_metadata);

    let ids: StringArray = (0..points.len()).map(|i| Some(format!("seg-{i}"))).collect();

    let mut wkb = BinaryBuilder::new();
    for (x, y) in points {
        let geometry = Geometry::Point(Point::new(*x, *y));
        wkb.append_value(geometry.to_wkb(CoordDimensions::xy()).unwrap());
    }

    let xs: Vec<f32> = points.iter().map(|(x, _)| *x as f32).collect();
    let ys: Vec<f32> = points.iter().map(|(_, y)| *y as f32).collect();
    let covering_arrays: Vec<ArrayRef> = vec![
        Arc::new(Float32Array::from(xs.clone())),
        Arc::new(Float32Array::from(xs)),
        Arc::new(Float32Array::from(ys.clone())),
        Arc::new(Float32Array::from(ys)),
    ];
    let covering = StructArray::new(covering_fields(), covering_arrays, None);

    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        vec![Arc::new(ids), Arc::new(wkb.finish()), Arc::new(covering)],
    )
    .unwrap();

    let properties = WriterProperties::builder()
        .set_max_row_group_size(2)
        .build();
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(properties)).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    Bytes::from(buffer)
}

async fn client_with_segment_file(bytes: Bytes) -> OvertureClient {
    let store = Arc::new(InMemory::new());
    store
        .put(
            &Path::from(format!("{SEGMENT_PREFIX}part-00000.parquet")),
            bytes.into(),
        )
        .await
        .unwrap();
    OvertureClient::with_store(store, RELEASE)
}

fn decoded_points(table: &SpatialTable) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for batch in table.batches() {
        let idx = table.geometry_column_index();
        let field = batch.schema_ref().field(idx).clone();
        let column = batch.column(idx).clone();
        let array = GeometryArray::try_from((column.as_ref(), &field)).unwrap();
        for row in 0..array.len() {
            let Geometry::Point(point) = array.value(row).unwrap().to_geometry() else {
                panic!("expected point geometry in row {row}");
            };
            points.push((point.x(), point.y()));
        }
    }
    points
}

#[tokio::test]
async fn fetch_returns_only_rows_inside_the_bounding_box() {
    // Two features inside the Loup Loup Pass extent, four spread far away
    // so at least one whole row group falls outside and gets pruned.
    let inside = [(-119.9, 48.39), (-119.88, 48.40)];
    let outside = [(2.35, 48.85), (2.36, 48.86), (139.69, 35.68), (139.70, 35.69)];
    let all: Vec<(f64, f64)> = outside[..2]
        .iter()
        .chain(inside.iter())
        .chain(outside[2..].iter())
        .copied()
        .collect();

    let client = client_with_segment_file(geoparquet_bytes(&all, Some(GEO_METADATA))).await;
    let table = client.fetch("segment", &EXTENT).await.unwrap();

    assert_eq!(table.num_rows(), 2);
    assert!(!table.is_empty());
    assert_eq!(table.geometry_column_name(), "geometry");

    let points = decoded_points(&table);
    assert_eq!(points, inside.to_vec());
}

#[tokio::test]
async fn fetch_with_no_matching_rows_returns_an_empty_table() {
    let far_away = [(2.35, 48.85), (2.36, 48.86)];
    let client = client_with_segment_file(geoparquet_bytes(&far_away, Some(GEO_METADATA))).await;

    let table = client.fetch("segment", &EXTENT).await.unwrap();

    assert!(table.is_empty());
    assert_eq!(table.num_rows(), 0);
    // The schema is still fully formed, geometry tagging included.
    assert_eq!(table.geometry_column_name(), "geometry");
    assert_eq!(table.schema().field(0).name(), "id");
}

#[tokio::test]
async fn fetch_preserves_exact_coordinates_through_wkb_translation() {
    // Comfortably inside the extent; the f32 covering column rounds, so
    // edge-of-bbox coordinates would be a covering artifact, not a
    // translation one.
    let coords = [(-119.90000000000015, 48.39000000000002)];
    let client = client_with_segment_file(geoparquet_bytes(&coords, Some(GEO_METADATA))).await;

    let table = client.fetch("segment", &EXTENT).await.unwrap();
    let points = decoded_points(&table);

    assert_eq!(points.len(), 1);
    // Bit-exact: the translation must not perturb coordinate values.
    assert_eq!(points[0].0, coords[0].0);
    assert_eq!(points[0].1, coords[0].1);
}

#[tokio::test]
async fn missing_geo_metadata_is_an_invalid_state_error() {
    let client = client_with_segment_file(geoparquet_bytes(&[(-119.9, 48.39)], None)).await;

    let err = client.fetch("segment", &EXTENT).await.unwrap_err();
    assert!(matches!(err, OvertureError::InvalidState(_)), "{err:?}");
    assert!(err.to_string().contains("No geometry metadata"));
}

#[tokio::test]
async fn unknown_primary_column_is_an_invalid_state_error() {
    let bad_geo = r#"{"primary_column": "geom_elsewhere", "columns": {}}"#;
    let client = client_with_segment_file(geoparquet_bytes(&[(-119.9, 48.39)], Some(bad_geo))).await;

    let err = client.fetch("segment", &EXTENT).await.unwrap_err();
    assert!(matches!(err, OvertureError::InvalidState(_)), "{err:?}");
    assert!(err.to_string().contains("No valid primary geometry column"));
}

#[tokio::test]
async fn missing_dataset_prefix_is_an_invalid_state_error() {
    let client = OvertureClient::with_store(Arc::new(InMemory::new()), RELEASE);

    let err = client.fetch("segment", &EXTENT).await.unwrap_err();
    assert!(matches!(err, OvertureError::InvalidState(_)), "{err:?}");
    assert!(err.to_string().contains("No parquet files found"));
}

#[tokio::test]
async fn fetch_merges_rows_across_multiple_files() {
    let store = Arc::new(InMemory::new());
    for (name, point) in [
        ("part-00000.parquet", (-119.9, 48.39)),
        ("part-00001.parquet", (-119.89, 48.395)),
    ] {
        store
            .put(
                &Path::from(format!("{SEGMENT_PREFIX}{name}")),
                geoparquet_bytes(&[point], Some(GEO_METADATA)).into(),
            )
            .await
            .unwrap();
    }

    let client = OvertureClient::with_store(store, RELEASE);
    let table = client.fetch("segment", &EXTENT).await.unwrap();

    assert_eq!(table.num_rows(), 2);
    let points = decoded_points(&table);
    assert!(points.contains(&(-119.9, 48.39)));
    assert!(points.contains(&(-119.89, 48.395)));
}
