//! Decoded building-height grids from rendered nDOM imagery.
//!
//! The imaging service renders a normalized digital surface model
//! (nDOM) as a fixed-palette RGBA image. This crate turns such an
//! image plus its declared geographic extent into a numeric height
//! grid with nearest-cell coordinate lookup.
//!
//! # References
//!
//! 1. [nDOM layer](https://www.wms.nrw.de/geobasis/wms_nw_ndom)

mod error;
pub mod palette;

pub use crate::{
    error::NdomError,
    palette::{PalEntry, Palette},
};
use geo::geometry::Coord;
use image::DynamicImage;

/// Base floating point type used for all coordinates and heights.
pub type C = f64;

/// Heights below this value (meters) read as open ground rather than
/// a structure; it is the upper edge of the palette's lowest bucket.
pub const CLEAR_HEIGHT_M: C = 1.5;

/// Geographic extent of a rendered image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    /// Southwest corner.
    pub min: Coord<C>,
    /// Northeast corner.
    pub max: Coord<C>,
}

impl BBox {
    /// Returns the box spanning `min` to `max`.
    pub fn new(min: Coord<C>, max: Coord<C>) -> Self {
        assert!(min.x < max.x && min.y < max.y, "degenerate bounding box");
        Self { min, max }
    }

    /// Returns a box centered on `center` with the given half-width
    /// and half-height margins (degrees).
    pub fn around(center: Coord<C>, half_width: C, half_height: C) -> Self {
        assert!(half_width > 0.0 && half_height > 0.0);
        Self {
            min: Coord {
                x: center.x - half_width,
                y: center.y - half_height,
            },
            max: Coord {
                x: center.x + half_width,
                y: center.y + half_height,
            },
        }
    }

    /// Returns whether `coord` falls inside this box.
    pub fn contains(&self, coord: Coord<C>) -> bool {
        self.min.x <= coord.x
            && coord.x <= self.max.x
            && self.min.y <= coord.y
            && coord.y <= self.max.y
    }
}

/// A decoded height grid.
///
/// Row-major with the same orientation as the source image: row 0 is
/// the image's top edge, which is the extent's northern edge. Cells
/// that decoded to no palette entry hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    /// Geographic extent this grid covers.
    bbox: BBox,

    /// Number of (rows, columns) in this grid.
    dimensions: (usize, usize),

    /// Height samples in meters, NaN for unknown.
    samples: Box<[C]>,
}

impl HeightGrid {
    /// Decodes encoded image bytes (e.g. a PNG response body) into a
    /// height grid covering `bbox`.
    pub fn decode_bytes(bytes: &[u8], bbox: BBox, palette: &Palette) -> Result<Self, NdomError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::decode(&image, bbox, palette))
    }

    /// Decodes an already-loaded image into a height grid covering
    /// `bbox`.
    ///
    /// Every pixel is looked up in `palette` after normalizing the
    /// image to RGBA; misses decode to NaN.
    pub fn decode(image: &DynamicImage, bbox: BBox, palette: &Palette) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let samples: Box<[C]> = rgba
            .pixels()
            .map(|pixel| {
                palette
                    .lookup(pixel.0)
                    .map_or(C::NAN, PalEntry::resolve)
            })
            .collect();
        Self {
            bbox,
            dimensions: (height as usize, width as usize),
            samples,
        }
    }

    /// Returns a denoised copy of this grid.
    ///
    /// One pass over the interior: every finite cell becomes the mean
    /// of its finite 4-neighbors, read from the original grid. Cells
    /// with no finite neighbor keep their value, unknown cells stay
    /// unknown, and the border is left untouched.
    pub fn smoothed(&self) -> Self {
        let (rows, cols) = self.dimensions;
        let mut smoothed = self.samples.clone();
        if rows >= 3 && cols >= 3 {
            for row in 1..rows - 1 {
                for col in 1..cols - 1 {
                    if self.get(row, col).is_nan() {
                        continue;
                    }
                    let neighbors = [
                        self.get(row - 1, col),
                        self.get(row + 1, col),
                        self.get(row, col - 1),
                        self.get(row, col + 1),
                    ];
                    let (sum, count) = neighbors
                        .iter()
                        .filter(|h| !h.is_nan())
                        .fold((0.0, 0), |(sum, count), h| (sum + h, count + 1));
                    if count > 0 {
                        smoothed[self.linear_index(row, col)] = sum / C::from(count);
                    }
                }
            }
        }
        Self {
            bbox: self.bbox,
            dimensions: self.dimensions,
            samples: smoothed,
        }
    }

    /// Geographic extent this grid covers.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Number of (rows, columns) in this grid.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the sample at (row, col).
    pub fn get(&self, row: usize, col: usize) -> C {
        self.samples[self.linear_index(row, col)]
    }

    /// Returns the (row, col) of the cell nearest to `coord`.
    ///
    /// Nearest-neighbor only, no interpolation; coordinates outside
    /// the extent clamp to the border cell.
    pub fn nearest_cell(&self, coord: Coord<C>) -> (usize, usize) {
        let (rows, cols) = self.dimensions;
        let col = axis_index(coord.x, self.bbox.min.x, self.bbox.max.x, cols);
        // Row 0 is the northern edge.
        let row = rows - 1 - axis_index(coord.y, self.bbox.min.y, self.bbox.max.y, rows);
        (row, col)
    }

    /// Returns the sample at the cell nearest to `coord`.
    pub fn sample_nearest(&self, coord: Coord<C>) -> C {
        let (row, col) = self.nearest_cell(coord);
        self.get(row, col)
    }
}

/// Private API.
impl HeightGrid {
    fn linear_index(&self, row: usize, col: usize) -> usize {
        let (rows, cols) = self.dimensions;
        debug_assert!(row < rows && col < cols);
        row * cols + col
    }
}

/// Returns the index of the sample nearest `value` on an axis of `n`
/// evenly spaced samples spanning `[min, max]`, clamped to the ends.
fn axis_index(value: C, min: C, max: C, n: usize) -> usize {
    debug_assert!(n > 0);
    let relative = (value - min) / (max - min);
    #[allow(clippy::cast_precision_loss)]
    let position = (relative * (n - 1) as C).round();
    if position <= 0.0 {
        0
    } else if position >= (n - 1) as C {
        n - 1
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            position as usize
        }
    }
}
