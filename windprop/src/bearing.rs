//! Mean wind bearing from a series of direction samples.

/// Circular mean of wind-direction samples (degrees clockwise from
/// north), normalized to [0, 360]. NaN samples are skipped; an
/// empty or all-NaN series has no mean.
///
/// A plain arithmetic mean is wrong near north (350° and 10° average
/// to 180°); summing unit vectors is not.
pub fn mean_bearing<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    let mut count = 0usize;
    for degrees in samples {
        if degrees.is_nan() {
            continue;
        }
        let radians = degrees.to_radians();
        sin_sum += radians.sin();
        cos_sum += radians.cos();
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mut mean = sin_sum.atan2(cos_sum).to_degrees();
    if mean < 0.0 {
        mean += 360.0;
    }
    Some(mean)
}
