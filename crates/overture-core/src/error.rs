//! Custom error types for Overture Maps fetch operations.
//!
//! This module provides structured error handling using `thiserror`. Errors
//! split into two domain categories plus transparent transport variants:
//! argument errors are deterministic and raised before any I/O, state errors
//! indicate that the remote dataset violated its metadata contract.

use thiserror::Error;

/// Main error type for Overture Maps operations.
///
/// This is the root error type that encompasses all domain-specific errors.
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum OvertureError {
    /// Caller-supplied input was rejected during validation.
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),

    /// The remote dataset violated its metadata contract.
    #[error(transparent)]
    InvalidState(#[from] StateError),

    /// Object storage failures (listing, reads, timeouts).
    ///
    /// Propagated unchanged; this layer adds no retry or backoff.
    #[error(transparent)]
    ObjectStore(#[from] object_store::Error),

    /// Parquet decoding failures.
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow compute or schema failures.
    #[error(transparent)]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Geometry translation failures from the `GeoArrow` layer.
    #[error(transparent)]
    GeoArrow(#[from] geoarrow_schema::error::GeoArrowError),

    /// Malformed JSON in dataset metadata.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Validation errors for caller-supplied input.
///
/// All of these are raised before any network activity and are
/// deterministic for a given input.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// The requested feature type is not in the Overture catalog.
    #[error("Invalid overture type: {name}. Valid types are: {available}")]
    InvalidOvertureType {
        /// The requested feature type name
        name: String,
        /// Comma-separated list of valid feature types
        available: String,
    },

    /// A bounding box was supplied with the wrong number of elements.
    #[error("Bounding box must be a tuple of four values: (minx, miny, maxx, maxy); got {len}")]
    BboxLength {
        /// Number of elements actually supplied
        len: usize,
    },

    /// A bounding box element could not be interpreted as a number.
    #[error("All coordinates in the bounding box must be numeric (int or float); got '{value}'")]
    BboxNotNumeric {
        /// The offending element, as supplied
        value: String,
    },

    /// Bounding box elements are ordered incorrectly.
    #[error(
        "Invalid bounding box coordinates: ensure that minx < maxx and miny < maxy; \
         got ({xmin}, {ymin}, {xmax}, {ymax})"
    )]
    BboxOrdering {
        /// Supplied minimum x
        xmin: f64,
        /// Supplied minimum y
        ymin: f64,
        /// Supplied maximum x
        xmax: f64,
        /// Supplied maximum y
        ymax: f64,
    },
}

/// Contract violations in the remote dataset.
///
/// These indicate a collaborator problem, not a caller input error: the
/// files returned by the Overture release are missing metadata the
/// GeoParquet specification requires.
#[derive(Debug, Error)]
pub enum StateError {
    /// The dataset schema carries no `geo` key-value metadata.
    #[error("No geometry metadata found in the Overture Maps data")]
    MissingGeoMetadata,

    /// The `geo` metadata names no primary geometry column, or names one
    /// that is absent from the schema.
    #[error("No valid primary geometry column defined in the Overture Maps metadata")]
    MissingPrimaryGeometryColumn,

    /// The geometry column holds a type that is not a WKB encoding.
    #[error("Geometry column '{column}' is not WKB-encoded (found {data_type})")]
    UnexpectedGeometryEncoding {
        /// The geometry column name
        column: String,
        /// The Arrow data type actually found
        data_type: String,
    },

    /// The dataset lacks the `bbox` covering column used for spatial filtering.
    #[error("Dataset is missing the '{column}' bounding box column required for spatial filtering")]
    MissingBboxColumn {
        /// The expected covering column name
        column: String,
    },

    /// No data files were found under the dataset prefix.
    #[error("No parquet files found under dataset prefix '{prefix}'")]
    NoDatasetFiles {
        /// The listed prefix
        prefix: String,
    },
}

/// Type alias for Results using [`OvertureError`].
pub type Result<T> = std::result::Result<T, OvertureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_message_lists_alternatives() {
        let err = ArgumentError::InvalidOvertureType {
            name: "not_a_type".to_string(),
            available: "building, segment".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("Invalid overture type: not_a_type"));
        assert!(message.contains("building, segment"));
    }

    #[test]
    fn bbox_messages_name_the_offending_values() {
        let err = ArgumentError::BboxLength { len: 3 };
        assert!(
            err.to_string()
                .contains("Bounding box must be a tuple of four values")
        );

        let err = ArgumentError::BboxOrdering {
            xmin: 1.0,
            ymin: 0.0,
            xmax: -1.0,
            ymax: 1.0,
        };
        let message = err.to_string();
        assert!(message.contains("minx < maxx"));
        assert!(message.contains("(1, 0, -1, 1)"));
    }

    #[test]
    fn state_errors_describe_the_contract_violation() {
        let err = StateError::MissingGeoMetadata;
        assert!(err.to_string().contains("No geometry metadata"));

        let err = StateError::MissingPrimaryGeometryColumn;
        assert!(err.to_string().contains("No valid primary geometry column"));
    }
}
