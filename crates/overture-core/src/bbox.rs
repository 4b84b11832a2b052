//! Axis-aligned bounding boxes in geographic coordinates.
//!
//! A [`BoundingBox`] limits a spatial query to a rectangle expressed as
//! `(minx, miny, maxx, maxy)` longitude/latitude values. Validation happens
//! at construction, before any network activity, so every constructed value
//! is well-formed.

use std::fmt;
use std::str::FromStr;

use crate::error::{ArgumentError, OvertureError};

/// Axis-aligned rectangle limiting a spatial query.
///
/// Invariants: all four values are finite, `xmin < xmax`, and `ymin < ymax`.
/// Values are never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four ordered coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::BboxNotNumeric`] if any value is NaN or
    /// infinite, and [`ArgumentError::BboxOrdering`] unless `xmin < xmax`
    /// and `ymin < ymax` hold strictly.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, ArgumentError> {
        for value in [xmin, ymin, xmax, ymax] {
            if !value.is_finite() {
                return Err(ArgumentError::BboxNotNumeric {
                    value: value.to_string(),
                });
            }
        }

        if xmin >= xmax || ymin >= ymax {
            return Err(ArgumentError::BboxOrdering {
                xmin,
                ymin,
                xmax,
                ymax,
            });
        }

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Creates a bounding box from a slice of coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::BboxLength`] when the slice does not hold
    /// exactly four values, plus everything [`BoundingBox::new`] rejects.
    pub fn from_slice(values: &[f64]) -> Result<Self, ArgumentError> {
        match values {
            [xmin, ymin, xmax, ymax] => Self::new(*xmin, *ymin, *xmax, *ymax),
            _ => Err(ArgumentError::BboxLength { len: values.len() }),
        }
    }

    /// Minimum x (westernmost longitude).
    #[must_use]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Minimum y (southernmost latitude).
    #[must_use]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    /// Maximum x (easternmost longitude).
    #[must_use]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Maximum y (northernmost latitude).
    #[must_use]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Returns `true` when the rectangle `(xmin, ymin, xmax, ymax)`
    /// intersects this bounding box.
    ///
    /// Used both for row-group pruning from parquet statistics and for
    /// per-row filtering on the `bbox` covering column.
    #[must_use]
    pub fn intersects(&self, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> bool {
        xmin <= self.xmax && xmax >= self.xmin && ymin <= self.ymax && ymax >= self.ymin
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

impl TryFrom<(f64, f64, f64, f64)> for BoundingBox {
    type Error = ArgumentError;

    fn try_from(value: (f64, f64, f64, f64)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2, value.3)
    }
}

impl FromStr for BoundingBox {
    type Err = OvertureError;

    /// Parses `"minx,miny,maxx,maxy"`.
    ///
    /// Each comma-separated element must parse as a number; anything else is
    /// rejected as an invalid argument before the positional checks run.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(4);
        for part in s.split(',') {
            let trimmed = part.trim();
            let value: f64 = trimmed.parse().map_err(|_| {
                OvertureError::from(ArgumentError::BboxNotNumeric {
                    value: trimmed.to_string(),
                })
            })?;
            values.push(value);
        }

        Ok(Self::from_slice(&values)?)
    }
}
