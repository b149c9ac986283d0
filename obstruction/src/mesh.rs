//! Projected coordinate mesh for a decoded height grid.

use crate::math::{linspace, web_mercator};
use geo::geometry::Coord;
use ndom::{BBox, C};

/// A geographic → projected (metric) coordinate transform.
///
/// Implementations are supplied by the caller; [`WebMercator`] covers
/// the common slippy-map case.
pub trait Project {
    fn project(&self, coord: Coord<C>) -> Coord<C>;
}

/// Spherical web-mercator projection (EPSG:3857).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Project for WebMercator {
    fn project(&self, coord: Coord<C>) -> Coord<C> {
        web_mercator(coord)
    }
}

/// Projected coordinates for every cell of a height grid.
///
/// Same shape and indexing as the grid it was built for: row i,
/// col j here is the projected location of grid cell (i, j), with
/// row 0 on the extent's northern edge. Built once per query, never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMesh {
    /// Number of (rows, columns).
    dimensions: (usize, usize),

    /// Projected x for every cell, row-major, meters.
    x: Box<[C]>,

    /// Projected y for every cell, row-major, meters.
    y: Box<[C]>,
}

impl ProjectedMesh {
    /// Projects the outer-product mesh of `bbox` sampled at
    /// `dimensions` through `projection`.
    pub fn build(bbox: BBox, dimensions: (usize, usize), projection: &impl Project) -> Self {
        let (rows, cols) = dimensions;
        let lons: Vec<C> = linspace(bbox.min.x, bbox.max.x, cols).collect();
        // North → south, matching grid row order.
        let lats: Vec<C> = linspace(bbox.max.y, bbox.min.y, rows).collect();

        let mut x = Vec::with_capacity(rows * cols);
        let mut y = Vec::with_capacity(rows * cols);
        for &lat in &lats {
            for &lon in &lons {
                let projected = projection.project(Coord { x: lon, y: lat });
                x.push(projected.x);
                y.push(projected.y);
            }
        }

        Self {
            dimensions,
            x: x.into_boxed_slice(),
            y: y.into_boxed_slice(),
        }
    }

    /// Number of (rows, columns).
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Projected (x, y) of cell (row, col), meters.
    pub fn get(&self, row: usize, col: usize) -> (C, C) {
        let idx = row * self.dimensions.1 + col;
        (self.x[idx], self.y[idx])
    }

    /// Projected (min, max) x over the whole mesh, meters.
    pub fn x_extent(&self) -> (C, C) {
        extent(&self.x)
    }

    /// Projected (min, max) y over the whole mesh, meters.
    pub fn y_extent(&self) -> (C, C) {
        extent(&self.y)
    }
}

fn extent(values: &[C]) -> (C, C) {
    values.iter().fold((C::MAX, C::MIN), |(min, max), &v| {
        (min.min(v), max.max(v))
    })
}
