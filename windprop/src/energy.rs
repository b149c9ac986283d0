//! Energy yield and CO₂ savings for a candidate turbine.

use std::f64::consts::PI;

/// Air density at sea level, kg/m³.
const AIR_DENSITY: f64 = 1.2255;

/// Overall conversion efficiency of a small turbine.
const EFFICIENCY: f64 = 0.4;

const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Rotor geometry of the candidate turbine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotor {
    /// Horizontal-axis turbine with the given blade radius (meters).
    Horizontal { radius_m: f64 },

    /// Vertical-axis turbine with the given rotor height and
    /// diameter (meters).
    Vertical { height_m: f64, diameter_m: f64 },
}

impl Rotor {
    /// Swept area in m². The vertical-axis area is the simple
    /// height × diameter approximation.
    pub fn swept_area_m2(&self) -> f64 {
        match *self {
            Self::Horizontal { radius_m } => PI * radius_m * radius_m,
            Self::Vertical {
                height_m,
                diameter_m,
            } => height_m * diameter_m,
        }
    }
}

/// Fossil fuel displaced by turbine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FossilFuel {
    Coal,
    NaturalGas,
    Oil,
}

impl FossilFuel {
    /// Emission factor in kg CO₂ per kWh.
    pub fn emission_factor(self) -> f64 {
        match self {
            Self::Coal => 0.87,
            Self::NaturalGas => 0.49,
            Self::Oil => 0.6,
        }
    }
}

/// Effective electrical power in watts at the given wind speed:
/// `P = ½ ρ A v³ · η`.
pub fn effective_power_w(swept_area_m2: f64, wind_speed_ms: f64) -> f64 {
    (AIR_DENSITY / 2.0) * swept_area_m2 * wind_speed_ms.powi(3) * EFFICIENCY
}

/// Annual energy production in kWh for a constant power draw.
pub fn annual_energy_kwh(power_w: f64) -> f64 {
    power_w * HOURS_PER_YEAR / 1000.0
}

/// Annual CO₂ savings in kg against the given displaced fuel.
pub fn co2_savings_kg(annual_energy_kwh: f64, fuel: FossilFuel) -> f64 {
    annual_energy_kwh * fuel.emission_factor()
}

/// Total CO₂ savings in kg over the turbine's years of operation.
pub fn total_co2_savings_kg(annual_savings_kg: f64, years: u32) -> f64 {
    annual_savings_kg * f64::from(years)
}

#[cfg(test)]
mod tests {
    use super::{
        annual_energy_kwh, co2_savings_kg, effective_power_w, total_co2_savings_kg, FossilFuel,
        Rotor,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_swept_areas() {
        assert_relative_eq!(
            Rotor::Horizontal { radius_m: 1.0 }.swept_area_m2(),
            std::f64::consts::PI
        );
        assert_relative_eq!(
            Rotor::Vertical {
                height_m: 2.0,
                diameter_m: 1.5
            }
            .swept_area_m2(),
            3.0
        );
    }

    #[test]
    fn test_no_wind_no_power() {
        assert_relative_eq!(effective_power_w(200.0, 0.0), 0.0);
        assert_relative_eq!(annual_energy_kwh(0.0), 0.0);
        assert_relative_eq!(co2_savings_kg(0.0, FossilFuel::Coal), 0.0);
    }

    #[test]
    fn test_power_formula() {
        // ½ · 1.2255 · 10 · 5³ · 0.4
        assert_relative_eq!(effective_power_w(10.0, 5.0), 306.375);
    }

    #[test]
    fn test_annual_energy() {
        assert_relative_eq!(annual_energy_kwh(1000.0), 8760.0);
    }

    #[test]
    fn test_savings_scale_linearly_with_years() {
        let annual = co2_savings_kg(1000.0, FossilFuel::NaturalGas);
        assert_relative_eq!(annual, 490.0);
        assert_relative_eq!(total_co2_savings_kg(annual, 20), 9800.0);
    }
}
