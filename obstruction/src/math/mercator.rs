//! Spherical web-mercator forward projection (EPSG:4326 →
//! EPSG:3857), as served by every slippy-map tile stack.
//!
//! [formulas](https://wiki.openstreetmap.org/wiki/Mercator)

use geo::geometry::Coord;

/// Earth radius of the web-mercator sphere, meters.
const SPHERE_RADIUS: f64 = 6_378_137.0;

/// Projects a lon/lat degree coordinate to web-mercator meters.
pub fn web_mercator(coord: Coord<f64>) -> Coord<f64> {
    let x = SPHERE_RADIUS * coord.x.to_radians();
    let y = SPHERE_RADIUS
        * (std::f64::consts::FRAC_PI_4 + coord.y.to_radians() / 2.0)
            .tan()
            .ln();
    Coord { x, y }
}

#[cfg(test)]
mod tests {
    use super::web_mercator;
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    #[test]
    fn test_origin_projects_to_origin() {
        let projected = web_mercator(Coord { x: 0.0, y: 0.0 });
        assert_relative_eq!(projected.x, 0.0);
        assert_relative_eq!(projected.y, 0.0);
    }

    #[test]
    fn test_known_point() {
        // Aachen cathedral, cross-checked against epsg.io.
        let projected = web_mercator(Coord {
            x: 6.083887,
            y: 50.775346,
        });
        assert_relative_eq!(projected.x, 677_255.2, epsilon = 1.0);
        assert_relative_eq!(projected.y, 6_581_650.8, epsilon = 1.0);
    }

    #[test]
    fn test_y_is_monotonic_in_latitude() {
        let south = web_mercator(Coord { x: 6.0, y: 50.0 });
        let north = web_mercator(Coord { x: 6.0, y: 51.0 });
        assert!(north.y > south.y);
    }
}
