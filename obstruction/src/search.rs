//! Two-phase directional search for the first obstruction downwind
//! of a site.

use crate::ObstructionError;
use geo::{
    algorithm::{GeodesicDestination, GeodesicDistance},
    geometry::{Coord, Point},
};
use log::debug;
use ndom::{HeightGrid, C, CLEAR_HEIGHT_M};

/// Tunables for the cone search.
///
/// The defaults match the surveyed deployment: 5 m radius steps, a
/// ±10° cone around the mean wind bearing, and a 100 m ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Radius increment per round, meters. One step size drives both
    /// phases.
    pub step_m: C,

    /// Half-width of the bearing cone, degrees.
    pub half_width_deg: C,

    /// Hard ceiling on the search radius, meters.
    pub max_distance_m: C,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            step_m: 5.0,
            half_width_deg: 10.0,
            max_distance_m: 100.0,
        }
    }
}

/// Outcome of an obstruction scan.
///
/// Constructed fresh per query and immutable once returned. A scan
/// that ran out of radius is a normal outcome (`found == false`),
/// not an error: the site then sees no reduction at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstructionResult {
    /// Whether a structure taller than the evaluation height was
    /// found within the search radius.
    pub found: bool,

    /// Geodesic distance from the origin to `endpoint`, meters.
    pub distance_m: C,

    /// Decoded height at `endpoint`, meters. For an unsuccessful
    /// scan this is the last examined cell's value and may be NaN.
    pub height_m: C,

    /// The last examined location (lon/lat degrees).
    pub endpoint: Coord<C>,
}

impl ObstructionResult {
    pub fn builder() -> ScanBuilder {
        ScanBuilder {
            origin: None,
            bearing_deg: None,
            eval_height_m: None,
            params: SearchParams::default(),
        }
    }
}

/// Builder for a single obstruction scan.
pub struct ScanBuilder {
    /// Site location (lon/lat degrees).
    origin: Option<Coord<C>>,

    /// Mean wind bearing, degrees clockwise from north.
    bearing_deg: Option<C>,

    /// Candidate turbine height the site is evaluated at (meters).
    eval_height_m: Option<C>,

    params: SearchParams,
}

impl ScanBuilder {
    pub fn origin(mut self, coord: Coord<C>) -> Self {
        self.origin = Some(coord);
        self
    }

    pub fn bearing(mut self, degrees: C) -> Self {
        self.bearing_deg = Some(degrees);
        self
    }

    pub fn eval_height(mut self, meters: C) -> Self {
        self.eval_height_m = Some(meters);
        self
    }

    pub fn step_size(mut self, meters: C) -> Self {
        self.params.step_m = meters;
        self
    }

    pub fn cone_half_width(mut self, degrees: C) -> Self {
        self.params.half_width_deg = degrees;
        self
    }

    pub fn max_distance(mut self, meters: C) -> Self {
        self.params.max_distance_m = meters;
        self
    }

    pub fn params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Runs the two-phase scan against `grid`.
    ///
    /// Phase 1 walks the cone outward until it crosses open ground
    /// (an unknown cell, or one below the lowest palette bucket).
    /// Phase 2 resumes from that radius and returns the first finite
    /// cell strictly taller than the evaluation height. Within one
    /// radius, integer bearings sweep ascending from the low edge of
    /// the cone; the first match wins.
    pub fn scan(&self, grid: &HeightGrid) -> Result<ObstructionResult, ObstructionError> {
        let origin = self.origin.ok_or(ObstructionError::Builder("origin"))?;
        let bearing_deg = self
            .bearing_deg
            .ok_or(ObstructionError::Builder("bearing"))?;
        let eval_height_m = self
            .eval_height_m
            .ok_or(ObstructionError::Builder("eval_height"))?;
        let SearchParams {
            step_m,
            half_width_deg,
            max_distance_m,
        } = self.params;

        let origin = Point::from(origin);
        #[allow(clippy::cast_possible_truncation)]
        let bearing_lo = (bearing_deg - half_width_deg).floor() as i32;
        #[allow(clippy::cast_possible_truncation)]
        let bearing_hi = (bearing_deg + half_width_deg).floor() as i32;

        let mut distance_m = step_m;
        let mut endpoint = origin;
        let mut height_m = C::NAN;

        // Phase 1: find open ground inside the cone.
        let mut cleared = false;
        'ground: while distance_m <= max_distance_m {
            for deg in bearing_lo..=bearing_hi {
                endpoint = origin.geodesic_destination(C::from(deg), distance_m);
                height_m = grid.sample_nearest(endpoint.into());
                if height_m.is_nan() || (0.0..CLEAR_HEIGHT_M).contains(&height_m) {
                    debug!("open ground at {distance_m} m, bearing {deg}");
                    cleared = true;
                    break 'ground;
                }
            }
            distance_m += step_m;
        }

        if !cleared {
            debug!("no open ground within {max_distance_m} m");
            return Ok(ObstructionResult {
                found: false,
                distance_m: origin.geodesic_distance(&endpoint),
                height_m,
                endpoint: endpoint.into(),
            });
        }

        // Phase 2: first structure taller than the evaluation height,
        // resuming from the phase 1 radius.
        while distance_m <= max_distance_m {
            for deg in bearing_lo..=bearing_hi {
                endpoint = origin.geodesic_destination(C::from(deg), distance_m);
                height_m = grid.sample_nearest(endpoint.into());
                if !height_m.is_nan() && height_m > eval_height_m {
                    let inverse_m = origin.geodesic_distance(&endpoint);
                    debug!(
                        "obstruction of {height_m} m at {inverse_m} m, bearing {deg}"
                    );
                    return Ok(ObstructionResult {
                        found: true,
                        distance_m: inverse_m,
                        height_m,
                        endpoint: endpoint.into(),
                    });
                }
            }
            distance_m += step_m;
        }

        debug!("no obstruction above {eval_height_m} m within {max_distance_m} m");
        Ok(ObstructionResult {
            found: false,
            distance_m: origin.geodesic_distance(&endpoint),
            height_m,
            endpoint: endpoint.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, GeodesicDestination, ObstructionError, ObstructionResult, Point};
    use approx::assert_relative_eq;
    use image::{DynamicImage, Rgba, RgbaImage};
    use ndom::{BBox, HeightGrid, Palette};

    const SITE: Coord = Coord {
        x: 6.083887,
        y: 50.775346,
    };

    fn site_bbox() -> BBox {
        BBox::around(SITE, 0.001, 0.001)
    }

    fn grid_from(image: RgbaImage) -> HeightGrid {
        HeightGrid::decode(
            &DynamicImage::ImageRgba8(image),
            site_bbox(),
            &Palette::ndom(),
        )
    }

    /// Paints the 3x3 block of cells around the grid cell nearest to
    /// the point `meters` out from the site at `bearing`.
    fn paint_at(image: &mut RgbaImage, grid: &HeightGrid, bearing: f64, meters: f64, rgba: [u8; 4]) {
        let target = Point::from(SITE).geodesic_destination(bearing, meters);
        let (row, col) = grid.nearest_cell(target.into());
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                let (r, c) = (row as i64 + dr, col as i64 + dc);
                image.put_pixel(c as u32, r as u32, Rgba(rgba));
            }
        }
    }

    #[test]
    fn test_missing_parameters_are_rejected() {
        let grid = grid_from(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let err = ObstructionResult::builder()
            .bearing(210.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap_err();
        assert!(matches!(err, ObstructionError::Builder("origin")));
    }

    #[test]
    fn test_all_unknown_grid_finds_nothing() {
        // Transparent image: every cell unknown. Phase 1 succeeds at
        // the first step, phase 2 runs out of radius.
        let grid = grid_from(RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 0])));
        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(210.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap();
        assert!(!result.found);
        assert!(result.height_m.is_nan());
    }

    #[test]
    fn test_single_obstruction_found() {
        // Open (white) ground everywhere, one 20 m block 50 m out at
        // bearing 90. The cone covers it, so phase 2 must report it.
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let grid = grid_from(image.clone());
        paint_at(&mut image, &grid, 90.0, 50.0, [255, 206, 71, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(90.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap();
        assert!(result.found);
        assert_relative_eq!(result.height_m, 17.5);
        // Within one step of the true distance.
        assert!((result.distance_m - 50.0).abs() <= 5.0);
    }

    #[test]
    fn test_obstruction_below_eval_height_is_ignored() {
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let grid = grid_from(image.clone());
        // A 2.25 m block is no obstruction for a 6 m turbine.
        paint_at(&mut image, &grid, 90.0, 50.0, [31, 120, 180, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(90.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap();
        assert!(!result.found);
    }

    #[test]
    fn test_due_north_obstruction_lands_in_northern_rows() {
        // Row orientation: a block placed due north must decode into
        // the upper image rows and be found by a north-facing scan.
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let grid = grid_from(image.clone());
        let target = Point::from(SITE).geodesic_destination(0.0, 60.0);
        let (row, _) = grid.nearest_cell(target.into());
        assert!(row < 150, "north must map to the grid's upper half");
        paint_at(&mut image, &grid, 0.0, 60.0, [215, 25, 28, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(0.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap();
        assert!(result.found);
        assert_relative_eq!(result.height_m, 37.5);
        assert!(result.endpoint.y > SITE.y);
    }

    #[test]
    fn test_phase_one_walks_past_blocking_structures() {
        // The site sits inside a 7.5 m building footprint: open cells
        // only appear 30 m out, and the first structure taller than
        // the 8 m turbine is at 60 m. Phase 1 must consume the
        // footprint, phase 2 the rest.
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([64, 207, 39, 255]));
        let grid = grid_from(image.clone());
        for step in 6..=9 {
            paint_at(&mut image, &grid, 90.0, f64::from(step) * 5.0, [255, 255, 255, 255]);
        }
        paint_at(&mut image, &grid, 90.0, 60.0, [114, 0, 11, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(90.0)
            .eval_height(8.0)
            .scan(&grid)
            .unwrap();
        assert!(result.found);
        assert_relative_eq!(result.height_m, 50.0);
        assert!((result.distance_m - 60.0).abs() <= 5.0);
    }

    #[test]
    fn test_cone_endpoints_inclusive() {
        // Obstruction exactly on the +10° cone edge.
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let grid = grid_from(image.clone());
        paint_at(&mut image, &grid, 100.0, 40.0, [255, 127, 0, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(90.0)
            .eval_height(6.0)
            .scan(&grid)
            .unwrap();
        assert!(result.found);
        assert_relative_eq!(result.height_m, 22.5);
    }

    #[test]
    fn test_max_distance_is_a_hard_ceiling() {
        // Obstruction beyond the ceiling is never reported.
        let mut image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let grid = grid_from(image.clone());
        paint_at(&mut image, &grid, 90.0, 65.0, [114, 0, 11, 255]);
        let grid = grid_from(image);

        let result = ObstructionResult::builder()
            .origin(SITE)
            .bearing(90.0)
            .eval_height(6.0)
            .max_distance(50.0)
            .scan(&grid)
            .unwrap();
        assert!(!result.found);
    }
}
