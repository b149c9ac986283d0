//! Gridded reference wind speeds.

use crate::WindpropError;
use geo::geometry::Coord;
use ndom::BBox;

/// Reference wind speeds at 100 m above ground over a coverage area.
///
/// Stands in for the wind-resource raster consumed upstream; reading
/// samples out of a file or service is the caller's concern. Lookup
/// is nearest-cell. Unlike a height grid, a query outside coverage
/// is a caller error, not a clamped border read.
#[derive(Debug, Clone, PartialEq)]
pub struct WindRaster {
    /// Geographic extent of the coverage.
    bbox: BBox,

    /// Number of (rows, columns); row 0 is the northern edge.
    dimensions: (usize, usize),

    /// Wind speed samples in m/s, row-major.
    samples: Box<[f64]>,
}

impl WindRaster {
    /// Returns a raster over `samples`, which must be row-major of
    /// the given dimensions.
    pub fn new(bbox: BBox, dimensions: (usize, usize), samples: Vec<f64>) -> Self {
        let (rows, cols) = dimensions;
        assert_eq!(samples.len(), rows * cols, "sample count mismatch");
        Self {
            bbox,
            dimensions,
            samples: samples.into_boxed_slice(),
        }
    }

    /// Returns the reference speed at the cell containing `coord`.
    pub fn speed_at(&self, coord: Coord<f64>) -> Result<f64, WindpropError> {
        if !self.bbox.contains(coord) {
            return Err(WindpropError::OutOfBounds {
                lon: coord.x,
                lat: coord.y,
            });
        }
        let (rows, cols) = self.dimensions;
        let col = nearest_index(coord.x, self.bbox.min.x, self.bbox.max.x, cols);
        let row = rows - 1 - nearest_index(coord.y, self.bbox.min.y, self.bbox.max.y, rows);
        Ok(self.samples[row * cols + col])
    }
}

/// Index of the nearest of `n` evenly spaced samples spanning
/// `[min, max]`; `value` is already known to be inside the span.
fn nearest_index(value: f64, min: f64, max: f64, n: usize) -> usize {
    #[allow(clippy::cast_precision_loss)]
    let position = ((value - min) / (max - min) * (n - 1) as f64).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (position as usize).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{BBox, Coord, WindRaster};
    use crate::WindpropError;
    use approx::assert_relative_eq;

    fn raster() -> WindRaster {
        // 2x2 coverage of one degree square: NW 4.0, NE 5.0,
        // SW 6.0, SE 7.0.
        let bbox = BBox::new(Coord { x: 6.0, y: 50.0 }, Coord { x: 7.0, y: 51.0 });
        WindRaster::new(bbox, (2, 2), vec![4.0, 5.0, 6.0, 7.0])
    }

    #[test]
    fn test_nearest_cell_lookup() {
        let raster = raster();
        let nw = raster.speed_at(Coord { x: 6.1, y: 50.9 }).unwrap();
        assert_relative_eq!(nw, 4.0);
        let se = raster.speed_at(Coord { x: 6.9, y: 50.1 }).unwrap();
        assert_relative_eq!(se, 7.0);
    }

    #[test]
    fn test_out_of_coverage_is_an_error() {
        let raster = raster();
        let err = raster.speed_at(Coord { x: 8.0, y: 50.5 }).unwrap_err();
        assert!(matches!(err, WindpropError::OutOfBounds { .. }));
    }

    #[test]
    #[should_panic(expected = "sample count mismatch")]
    fn test_sample_count_must_match_dimensions() {
        let bbox = BBox::new(Coord { x: 6.0, y: 50.0 }, Coord { x: 7.0, y: 51.0 });
        WindRaster::new(bbox, (2, 2), vec![4.0]);
    }
}
