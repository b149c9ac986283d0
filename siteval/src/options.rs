use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};

/// Evaluates a small-wind-turbine site against nearby buildings.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Rendered building-height image (PNG) centered on the site.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Site "lat,lon"
    #[arg(long)]
    pub site: LatLon,

    /// Half-width/height of the image's extent around the site
    /// (degrees).
    #[arg(long, default_value_t = 0.001)]
    pub bbox_margin: f64,

    /// Reference wind speed at 100 m above ground (m/s).
    #[arg(long)]
    pub wind_speed: f64,

    /// Mean wind bearing (degrees clockwise from north).
    #[arg(long, conflicts_with = "wind_dir")]
    pub bearing: Option<f64>,

    /// A wind-direction sample (degrees); repeat the flag to average
    /// a series.
    #[arg(long = "wind-dir")]
    pub wind_dir: Vec<f64>,

    /// Turbine hub height (meters) the site is evaluated at.
    #[arg(long)]
    pub height: f64,

    /// Blade radius (meters) of a horizontal-axis rotor.
    #[arg(long, conflicts_with_all = ["rotor_height", "rotor_diameter"])]
    pub radius: Option<f64>,

    /// Rotor height (meters) of a vertical-axis rotor.
    #[arg(long, requires = "rotor_diameter")]
    pub rotor_height: Option<f64>,

    /// Rotor diameter (meters) of a vertical-axis rotor.
    #[arg(long, requires = "rotor_height")]
    pub rotor_diameter: Option<f64>,

    /// Years of operation for total CO2 savings.
    #[arg(long, default_value_t = 20)]
    pub years: u32,

    /// Search radius step (meters).
    #[arg(long)]
    pub step: Option<f64>,

    /// Search cone half-width (degrees).
    #[arg(long)]
    pub cone: Option<f64>,

    /// Maximum search radius (meters).
    #[arg(long)]
    pub max_distance: Option<f64>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let idx = s.find(',').ok_or(anyhow!("not a valid lat,lon pair"))?;
        let (lat_str, lon_str) = {
            let (lat_str, lon_str) = s.split_at(idx);
            (lat_str, &lon_str[1..])
        };
        let lat = f64::from_str(lat_str)?;
        let lon = f64::from_str(lon_str)?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the evaluation to screen.
    Display,

    /// Print the evaluation as JSON.
    Json,
}

#[cfg(test)]
mod tests {
    use super::LatLon;
    use std::str::FromStr;

    #[test]
    fn test_lat_lon_parse() {
        let LatLon(coord) = LatLon::from_str("50.775346,6.083887").unwrap();
        assert_eq!(coord.y, 50.775346);
        assert_eq!(coord.x, 6.083887);
        assert!(LatLon::from_str("50.775346").is_err());
    }
}
