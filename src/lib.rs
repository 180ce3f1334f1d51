#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod errors;
pub mod forcing;
pub mod input;
pub mod output;
pub mod read_forcing_file;
pub mod service;
pub mod simulation_time;

pub use crate::core::heat_pump_asset::{HeatPumpAsset, TemperatureReport};
pub use crate::service::HeatPumpService;
pub use crate::simulation_time::SimulationTime;

use crate::input::ingest_input;
use crate::output::Output;
use crate::read_forcing_file::ForcingSeries;
use anyhow::Context;
use csv::WriterBuilder;
use indexmap::IndexMap;
use itertools::Itertools;
use std::borrow::Cow;
use std::io::Read;
use tracing::info;

/// Reported temperatures of every asset for every period of a run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunResults {
    /// start of each period, in seconds since the start of the run
    pub timestep_array: Vec<f64>,
    pub temperatures: IndexMap<String, Vec<TemperatureReport>>,
}

/// Run a simulation for every heat pump in the asset description over the whole
/// forcing series.
///
/// For each period and asset the temperatures are reported (initialising the asset in
/// the first period) and then advanced with the heat flows scheduled for that period.
/// A capacity violation stops the run. The reported temperatures are written to one
/// CSV per asset, keyed by asset id.
///
/// With `hourly_forcing` set, the forcing series is taken to hold one row per hour and is
/// resampled onto the period length of the asset description before the run.
pub fn run_project(
    input: impl Read,
    forcing: &ForcingSeries,
    output: impl Output,
    horizon: usize,
    hourly_forcing: bool,
) -> anyhow::Result<RunResults> {
    let input = ingest_input(input)?;
    let mut service = HeatPumpService::from_input(&input)?;
    let forcing = if hourly_forcing {
        info!("Resampling {} hours of forcing", forcing.len());
        Cow::Owned(forcing.resample_hourly(service.period_in_seconds()))
    } else {
        Cow::Borrowed(forcing)
    };
    let simulation_time = SimulationTime::for_periods(forcing.len(), service.period_in_seconds());
    info!(
        "Simulating {} heat pump(s) over {} periods of {} s",
        input.assets.len(),
        simulation_time.total_steps(),
        simulation_time.step()
    );

    let asset_ids = service.asset_ids().map(str::to_owned).collect_vec();
    let total_steps = simulation_time.total_steps();
    let mut results = RunResults {
        timestep_array: Vec::with_capacity(total_steps),
        temperatures: asset_ids
            .iter()
            .map(|id| (id.clone(), Vec::with_capacity(total_steps)))
            .collect(),
    };

    for t_it in simulation_time.iter() {
        let window = forcing.forcing_window(t_it.index, horizon)?;
        let heat_powers = forcing.heat_powers(t_it.index)?;

        for asset_id in &asset_ids {
            let report = service.send_temperatures(asset_id, &window)?;
            results.temperatures[asset_id].push(report);

            service
                .update_temperatures(asset_id, &window, heat_powers)
                .with_context(|| {
                    format!("Update of heat pump {asset_id} failed in period {}", t_it.index)
                })?;
        }
        results.timestep_array.push(t_it.time);
    }

    if !output.is_noop() {
        write_results(&output, &results)?;
    }

    Ok(results)
}

fn write_results(output: &impl Output, results: &RunResults) -> anyhow::Result<()> {
    let headings = [
        "Timestep",
        "Time",
        "DHW temperature",
        "Buffer temperature",
        "House indoor temperature",
        "House envelope temperature",
    ];
    let units_row = ["[count]", "[s]", "[K]", "[K]", "[K]", "[K]"];

    for (asset_id, reports) in &results.temperatures {
        info!("writing out results for heat pump {asset_id}");
        let writer = output.writer_for_location_key(asset_id)?;
        let mut writer = WriterBuilder::new().from_writer(writer);

        writer.write_record(headings)?;
        writer.write_record(units_row)?;
        for (t_idx, (time, report)) in results.timestep_array.iter().zip(reports).enumerate() {
            writer.write_record([
                t_idx.to_string(),
                time.to_string(),
                report.dhw_temperature.to_string(),
                report.buffer_temperature.to_string(),
                report.house_temperatures[0].to_string(),
                report.house_temperatures[1].to_string(),
            ])?;
        }
        writer.flush()?;
    }

    Ok(())
}
