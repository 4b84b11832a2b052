//! Catalog of Overture Maps feature types.
//!
//! This module provides a static registry of the feature types published in
//! an Overture Maps release, each grouped under its distribution theme. The
//! registry drives input validation and the derivation of dataset prefixes
//! within the release bucket.
//!
//! # Examples
//!
//! ```
//! use overture_core::catalog::{feature_type_names, find_feature_type};
//!
//! let segment = find_feature_type("segment").expect("segment should exist");
//! assert_eq!(segment.theme, "transportation");
//!
//! for name in feature_type_names() {
//!     println!("{name}");
//! }
//! ```

use crate::error::ArgumentError;

/// An Overture Maps feature type and the theme it is distributed under.
///
/// The feature type name parameterizes queries (e.g. `"segment"`); the theme
/// is a partition key in the release layout and never varies independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureType {
    /// Feature type name as used in queries (e.g. `"segment"`).
    pub name: &'static str,
    /// Distribution theme the type is partitioned under (e.g. `"transportation"`).
    pub theme: &'static str,
}

impl FeatureType {
    /// Object-store prefix of this type's dataset within a release.
    ///
    /// The layout follows the Overture distribution convention:
    /// `release/{release}/theme={theme}/type={name}/`.
    #[must_use]
    pub fn dataset_prefix(&self, release: &str) -> String {
        format!("release/{release}/theme={}/type={}/", self.theme, self.name)
    }
}

/// Returns the complete registry of Overture feature types.
#[must_use]
pub fn feature_types() -> &'static [FeatureType] {
    const TYPES: &[FeatureType] = &[
        FeatureType {
            name: "address",
            theme: "addresses",
        },
        FeatureType {
            name: "bathymetry",
            theme: "base",
        },
        FeatureType {
            name: "building",
            theme: "buildings",
        },
        FeatureType {
            name: "building_part",
            theme: "buildings",
        },
        FeatureType {
            name: "division",
            theme: "divisions",
        },
        FeatureType {
            name: "division_area",
            theme: "divisions",
        },
        FeatureType {
            name: "division_boundary",
            theme: "divisions",
        },
        FeatureType {
            name: "place",
            theme: "places",
        },
        FeatureType {
            name: "segment",
            theme: "transportation",
        },
        FeatureType {
            name: "connector",
            theme: "transportation",
        },
        FeatureType {
            name: "infrastructure",
            theme: "base",
        },
        FeatureType {
            name: "land",
            theme: "base",
        },
        FeatureType {
            name: "land_cover",
            theme: "base",
        },
        FeatureType {
            name: "land_use",
            theme: "base",
        },
        FeatureType {
            name: "water",
            theme: "base",
        },
    ];

    TYPES
}

/// Returns the names of all feature types in the catalog.
#[must_use]
pub fn feature_type_names() -> Vec<&'static str> {
    feature_types().iter().map(|t| t.name).collect()
}

/// Looks up a feature type by name.
#[must_use]
pub fn find_feature_type(name: &str) -> Option<FeatureType> {
    feature_types().iter().find(|t| t.name == name).copied()
}

/// Looks up a feature type by name, failing with the list of valid types.
///
/// # Errors
///
/// Returns [`ArgumentError::InvalidOvertureType`] naming the offending value
/// and listing every valid type when `name` is not in the catalog.
pub fn resolve_feature_type(name: &str) -> Result<FeatureType, ArgumentError> {
    find_feature_type(name).ok_or_else(|| ArgumentError::InvalidOvertureType {
        name: name.to_string(),
        available: feature_type_names().join(", "),
    })
}
