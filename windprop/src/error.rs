use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindpropError {
    #[error("target height {0} m is not above ground")]
    InvalidHeight(f64),

    #[error("({lon}, {lat}) is outside the wind raster's coverage")]
    OutOfBounds { lon: f64, lat: f64 },
}
