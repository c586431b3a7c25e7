//! Geographic bounding box type
//!
//! Queries are expressed as WGS84 axis-aligned bounding boxes. Bounds are
//! validated at construction; a [`BoundingBox`] that exists is always
//! well-formed.

use serde::Serialize;
use thiserror::Error;

/// Valid longitude range in WGS84 degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Valid latitude range in WGS84 degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Errors from constructing a [`BoundingBox`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BboxError {
    /// Longitude outside [-180, 180]
    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),
    /// Latitude outside [-90, 90]
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),
    /// x_max must be strictly greater than x_min
    #[error("x_max ({x_max}) must be greater than x_min ({x_min})")]
    InvertedX { x_min: f64, x_max: f64 },
    /// y_max must be strictly greater than y_min
    #[error("y_max ({y_max}) must be greater than y_min ({y_min})")]
    InvertedY { y_min: f64, y_max: f64 },
}

/// Axis-aligned geographic rectangle in WGS84 degrees.
///
/// Immutable once constructed. `x` is longitude (west to east), `y` is
/// latitude (south to north).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Minimum longitude (west edge)
    pub x_min: f64,
    /// Minimum latitude (south edge)
    pub y_min: f64,
    /// Maximum longitude (east edge)
    pub x_max: f64,
    /// Maximum latitude (north edge)
    pub y_max: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    ///
    /// # Errors
    ///
    /// Returns a [`BboxError`] when a coordinate is out of range or the
    /// bounds are inverted (`x_max <= x_min` or `y_max <= y_min`).
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, BboxError> {
        for lon in [x_min, x_max] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(BboxError::InvalidLongitude(lon));
            }
        }
        for lat in [y_min, y_max] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(BboxError::InvalidLatitude(lat));
            }
        }
        if x_max <= x_min {
            return Err(BboxError::InvertedX { x_min, x_max });
        }
        if y_max <= y_min {
            return Err(BboxError::InvertedY { y_min, y_max });
        }

        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Renders the box in WFS parameter ordering: `x_min,y_min,x_max,y_max`.
    pub fn to_wfs_param(&self) -> String {
        format!("{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bbox() {
        let bbox = BoundingBox::new(-47.5, -15.9, -47.3, -15.7);
        assert!(bbox.is_ok());

        let bbox = bbox.unwrap();
        assert_eq!(bbox.x_min, -47.5);
        assert_eq!(bbox.y_max, -15.7);
    }

    #[test]
    fn test_inverted_x_rejected() {
        let result = BoundingBox::new(-47.3, -15.9, -47.5, -15.7);
        assert!(matches!(result.unwrap_err(), BboxError::InvertedX { .. }));
    }

    #[test]
    fn test_equal_x_rejected() {
        // Degenerate (zero-width) boxes are treated as inverted
        let result = BoundingBox::new(-47.5, -15.9, -47.5, -15.7);
        assert!(matches!(result.unwrap_err(), BboxError::InvertedX { .. }));
    }

    #[test]
    fn test_inverted_y_rejected() {
        let result = BoundingBox::new(-47.5, -15.7, -47.3, -15.9);
        assert!(matches!(result.unwrap_err(), BboxError::InvertedY { .. }));
    }

    #[test]
    fn test_longitude_out_of_range() {
        let result = BoundingBox::new(-185.0, -15.9, -47.3, -15.7);
        assert!(matches!(
            result.unwrap_err(),
            BboxError::InvalidLongitude(_)
        ));
    }

    #[test]
    fn test_latitude_out_of_range() {
        let result = BoundingBox::new(-47.5, -95.0, -47.3, -15.7);
        assert!(matches!(result.unwrap_err(), BboxError::InvalidLatitude(_)));
    }

    #[test]
    fn test_wfs_param_ordering() {
        let bbox = BoundingBox::new(-47.5, -15.9, -47.3, -15.7).unwrap();
        assert_eq!(bbox.to_wfs_param(), "-47.5,-15.9,-47.3,-15.7");
    }
}
