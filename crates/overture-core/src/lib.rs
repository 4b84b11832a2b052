//! `overture-core` fetches geospatial vector data from Overture Maps
//! releases and materializes it as spatially enabled Arrow tables.
//!
//! Given a feature type and a bounding box, the [`OvertureClient`] validates
//! both inputs, streams the matching GeoParquet records from the public
//! release bucket, converts the WKB geometry column to the native `GeoArrow`
//! encoding, and returns a [`SpatialTable`] tagged with EPSG:4326.
//!
//! ```no_run
//! use overture_core::OvertureClient;
//!
//! # async fn run() -> overture_core::error::Result<()> {
//! let client = OvertureClient::new()?;
//! let table = client
//!     .fetch("segment", &[-119.911, 48.3852, -119.8784, 48.4028])
//!     .await?;
//! println!(
//!     "{} rows, geometry in '{}'",
//!     table.num_rows(),
//!     table.geometry_column_name()
//! );
//! # Ok(())
//! # }
//! ```

pub mod bbox;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod operations;
pub mod reader;
pub mod store;
pub mod table;

pub use bbox::BoundingBox;
pub use error::{OvertureError, Result};
pub use operations::OvertureClient;
pub use store::ConnectOptions;
pub use table::SpatialTable;
