//! Power-law vertical wind profile.

use crate::WindpropError;

/// Height above ground the reference wind raster is sampled at,
/// meters.
pub const REFERENCE_HEIGHT_M: f64 = 100.0;

/// Power-law exponent for a neutral atmospheric boundary layer.
const ALPHA: f64 = 1.0 / 7.0;

/// Scales a wind speed measured at [`REFERENCE_HEIGHT_M`] to
/// `h_target_m` above ground with the power-law profile
/// `v = v_ref * (h / h_ref) ^ (1/7)`.
pub fn extrapolate(v_ref: f64, h_target_m: f64) -> Result<f64, WindpropError> {
    if h_target_m <= 0.0 {
        return Err(WindpropError::InvalidHeight(h_target_m));
    }
    Ok(v_ref * (h_target_m / REFERENCE_HEIGHT_M).powf(ALPHA))
}
