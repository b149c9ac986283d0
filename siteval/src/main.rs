mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use log::debug;
use ndom::BBox;
use obstruction::{ObstructionResult, ProjectedMesh, SearchParams};
use options::{Cli, Command as CliCmd};
use serde::Serialize;
use windprop::energy::{self, FossilFuel, Rotor};

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let cli = Cli::parse();
    let origin = cli.site.0;

    let bearing = match cli.bearing {
        Some(bearing) => bearing,
        None => windprop::bearing::mean_bearing(cli.wind_dir.iter().copied())
            .ok_or(anyhow!("either --bearing or --wind-dir is required"))?,
    };

    let rotor = match (cli.radius, cli.rotor_height, cli.rotor_diameter) {
        (Some(radius_m), None, None) => Rotor::Horizontal { radius_m },
        (None, Some(height_m), Some(diameter_m)) => Rotor::Vertical {
            height_m,
            diameter_m,
        },
        _ => {
            return Err(anyhow!(
                "either --radius or --rotor-height with --rotor-diameter is required"
            ))
        }
    };

    let mut params = SearchParams::default();
    if let Some(step_m) = cli.step {
        params.step_m = step_m;
    }
    if let Some(half_width_deg) = cli.cone {
        params.half_width_deg = half_width_deg;
    }
    if let Some(max_distance_m) = cli.max_distance {
        params.max_distance_m = max_distance_m;
    }

    let bbox = BBox::around(origin, cli.bbox_margin, cli.bbox_margin);
    let png = std::fs::read(&cli.image)?;
    let (grid, mesh) = obstruction::decode_and_smooth(&png, bbox)?;
    debug!("decoded {:?} cells around ({}, {})", grid.dimensions(), origin.y, origin.x);

    let obstruction = ObstructionResult::builder()
        .origin(origin)
        .bearing(bearing)
        .eval_height(cli.height)
        .params(params)
        .scan(&grid)?;

    let wind_speed_site = windprop::profile::extrapolate(cli.wind_speed, cli.height)?;
    let reduction = windprop::reduction::deficit(&obstruction);
    let wind_speed_final = windprop::reduction::apply(wind_speed_site, &obstruction);

    let swept_area_m2 = rotor.swept_area_m2();
    let power_w = energy::effective_power_w(swept_area_m2, wind_speed_final);
    let annual_energy_kwh = energy::annual_energy_kwh(power_w);
    let annual = Co2Savings::annual(annual_energy_kwh);

    let report = Report {
        site: [origin.x, origin.y],
        bearing_deg: bearing,
        eval_height_m: cli.height,
        wind_speed_ref_ms: cli.wind_speed,
        wind_speed_site_ms: wind_speed_site,
        reduction_ms: reduction,
        wind_speed_final_ms: wind_speed_final,
        obstruction: obstruction.found.then(|| Blocker {
            height_m: obstruction.height_m,
            distance_m: obstruction.distance_m,
            endpoint: [obstruction.endpoint.x, obstruction.endpoint.y],
        }),
        projected_extent: Extent::of(&mesh),
        swept_area_m2,
        power_w,
        annual_energy_kwh,
        total_co2_savings_kg: annual.over_years(cli.years),
        annual_co2_savings_kg: annual,
        years: cli.years,
    };

    match cli.cmd {
        CliCmd::Display => display(&report),
        CliCmd::Json => json(&report),
    }
}

#[derive(Serialize)]
struct Report {
    /// Site lon/lat, degrees.
    site: [f64; 2],
    bearing_deg: f64,
    eval_height_m: f64,
    wind_speed_ref_ms: f64,
    wind_speed_site_ms: f64,
    reduction_ms: f64,
    wind_speed_final_ms: f64,
    obstruction: Option<Blocker>,
    projected_extent: Extent,
    swept_area_m2: f64,
    power_w: f64,
    annual_energy_kwh: f64,
    annual_co2_savings_kg: Co2Savings,
    total_co2_savings_kg: Co2Savings,
    years: u32,
}

#[derive(Serialize)]
struct Blocker {
    height_m: f64,
    distance_m: f64,
    /// Lon/lat, degrees.
    endpoint: [f64; 2],
}

#[derive(Serialize)]
struct Extent {
    x_min_m: f64,
    x_max_m: f64,
    y_min_m: f64,
    y_max_m: f64,
}

impl Extent {
    fn of(mesh: &ProjectedMesh) -> Self {
        let (x_min_m, x_max_m) = mesh.x_extent();
        let (y_min_m, y_max_m) = mesh.y_extent();
        Self {
            x_min_m,
            x_max_m,
            y_min_m,
            y_max_m,
        }
    }
}

#[derive(Serialize, Clone, Copy)]
struct Co2Savings {
    coal: f64,
    natural_gas: f64,
    oil: f64,
}

impl Co2Savings {
    fn annual(annual_energy_kwh: f64) -> Self {
        Self {
            coal: energy::co2_savings_kg(annual_energy_kwh, FossilFuel::Coal),
            natural_gas: energy::co2_savings_kg(annual_energy_kwh, FossilFuel::NaturalGas),
            oil: energy::co2_savings_kg(annual_energy_kwh, FossilFuel::Oil),
        }
    }

    fn over_years(self, years: u32) -> Self {
        Self {
            coal: energy::total_co2_savings_kg(self.coal, years),
            natural_gas: energy::total_co2_savings_kg(self.natural_gas, years),
            oil: energy::total_co2_savings_kg(self.oil, years),
        }
    }
}

fn display(report: &Report) -> Result<(), AnyError> {
    println!("Mean wind direction: {:.2} deg", report.bearing_deg);
    match &report.obstruction {
        Some(blocker) => println!(
            "Obstruction: {:.2} m tall, {:.2} m away (lon {:.6}, lat {:.6})",
            blocker.height_m, blocker.distance_m, blocker.endpoint[0], blocker.endpoint[1]
        ),
        None => println!("No obstruction taller than {:.1} m found", report.eval_height_m),
    }
    println!(
        "Wind speed at {:.1} m: {:.2} m/s",
        report.eval_height_m, report.wind_speed_site_ms
    );
    println!(
        "Reduction due to nearby building: {:.2} m/s",
        report.reduction_ms
    );
    println!("Final wind speed: {:.2} m/s", report.wind_speed_final_ms);
    println!("Effective turbine power: {:.2} W", report.power_w);
    println!(
        "Annual energy production: {:.2} kWh",
        report.annual_energy_kwh
    );
    println!(
        "Annual CO2 savings vs natural gas: {:.2} kg",
        report.annual_co2_savings_kg.natural_gas
    );
    println!(
        "Total CO2 savings over {} years vs natural gas: {:.2} kg",
        report.years, report.total_co2_savings_kg.natural_gas
    );
    Ok(())
}

fn json(report: &Report) -> Result<(), AnyError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
