//! Obstruction-aware site analysis over decoded height grids.
//!
//! Walks a cone of geodesic rays outward from a candidate turbine
//! site to find the first structure tall enough to shade it from the
//! mean wind, and builds the projected display mesh for the grid the
//! walk ran over.

mod error;
mod math;
mod mesh;
mod search;

pub use crate::{
    error::ObstructionError,
    mesh::{Project, ProjectedMesh, WebMercator},
    search::{ObstructionResult, ScanBuilder, SearchParams},
};
use ndom::{BBox, HeightGrid, Palette};

/// Decodes rendered height-image bytes into a denoised grid plus the
/// projected (web-mercator) mesh for its extent.
pub fn decode_and_smooth(
    png: &[u8],
    bbox: BBox,
) -> Result<(HeightGrid, ProjectedMesh), ObstructionError> {
    let grid = HeightGrid::decode_bytes(png, bbox, &Palette::ndom())?.smoothed();
    let mesh = ProjectedMesh::build(bbox, grid.dimensions(), &WebMercator);
    Ok((grid, mesh))
}
