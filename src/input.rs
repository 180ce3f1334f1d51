use crate::core::boundaries::TemperatureBounds;
use crate::core::heat_buffer::HeatBuffer;
use crate::core::heat_pump_asset::{HeatPumpAsset, InitialTemperatures};
use crate::core::house::{House, HouseCapacities, HouseResistances};
use crate::errors::ConfigurationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::Read;

pub const DEFAULT_PERIOD_IN_SECONDS: f64 = 900.;

pub fn ingest_input(json: impl Read) -> Result<Input, ConfigurationError> {
    let input: Input = serde_json::from_reader(json)
        .map_err(|err| ConfigurationError::Unreadable(err.to_string()))?;
    input
        .validate()
        .map_err(|err| ConfigurationError::Unreadable(err.to_string()))?;
    for (id, asset) in &input.assets {
        asset
            .validate()
            .map_err(|err| ConfigurationError::Unreadable(format!("asset {id}: {err}")))?;
    }

    Ok(input)
}

/// Description of all heat pump installations taking part in a simulation run
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Input {
    #[serde(default = "default_period_in_seconds")]
    #[validate(exclusive_minimum = 0.0)]
    pub period_in_seconds: f64,
    pub assets: IndexMap<String, AssetInput>,
}

fn default_period_in_seconds() -> f64 {
    DEFAULT_PERIOD_IN_SECONDS
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AssetInput {
    /// rated thermal power of the heat pump, in W
    #[validate(minimum = 0.0)]
    pub power: f64,
    #[validate]
    pub heat_pump: HeatPumpDescription,
    #[validate]
    pub building: BuildingDescription,
}

/// Tank parameters and temperature limits of a heat pump installation (temperatures in K)
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct HeatPumpDescription {
    /// in J/K
    #[validate(exclusive_minimum = 0.0)]
    pub buffer_capacitance: f64,
    /// in J/K
    #[validate(exclusive_minimum = 0.0)]
    pub dhw_capacitance: f64,
    pub buffer_temp_0: f64,
    pub dhw_temp_0: f64,
    pub house_temp_0: f64,
    pub buffer_temp_min: f64,
    pub buffer_temp_max: f64,
    pub dhw_temp_min: f64,
    pub dhw_temp_max: f64,
    pub house_temp_min: f64,
    #[serde(default)]
    pub house_temp_max: Option<f64>,
}

/// Parameters of the two-node house model
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BuildingDescription {
    /// in J/K
    #[serde(rename = "C_in")]
    #[validate(exclusive_minimum = 0.0)]
    pub c_in: f64,
    /// in J/K
    #[serde(rename = "C_out")]
    #[validate(exclusive_minimum = 0.0)]
    pub c_out: f64,
    /// in K/W
    #[serde(rename = "R_exch")]
    #[validate(exclusive_minimum = 0.0)]
    pub r_exch: f64,
    /// in K/W
    #[serde(rename = "R_floor")]
    #[validate(exclusive_minimum = 0.0)]
    pub r_floor: f64,
    /// in K/W
    #[serde(rename = "R_vent")]
    #[validate(exclusive_minimum = 0.0)]
    pub r_vent: f64,
    /// in K/W
    #[serde(rename = "R_cond")]
    #[validate(exclusive_minimum = 0.0)]
    pub r_cond: f64,
    /// in m2
    #[serde(rename = "A_glass")]
    #[validate(minimum = 0.0)]
    pub a_glass: f64,
}

impl AssetInput {
    /// Build the (uninitialised) thermal state for this installation.
    pub fn build_asset(&self, id: &str) -> Result<HeatPumpAsset, ConfigurationError> {
        let heat_pump = &self.heat_pump;
        let building = &self.building;

        let dhw_tank = HeatBuffer::new(heat_pump.dhw_capacitance).map_err(|_| {
            ConfigurationError::NonPositive {
                name: "dhw_capacitance",
                value: heat_pump.dhw_capacitance,
            }
        })?;
        let buffer = HeatBuffer::new(heat_pump.buffer_capacitance).map_err(|_| {
            ConfigurationError::NonPositive {
                name: "buffer_capacitance",
                value: heat_pump.buffer_capacitance,
            }
        })?;
        let house = House::new(
            HouseCapacities {
                c_in: building.c_in,
                c_out: building.c_out,
            },
            HouseResistances {
                r_exch: building.r_exch,
                r_floor: building.r_floor,
                r_vent: building.r_vent,
                r_cond: building.r_cond,
            },
            building.a_glass,
        )?;

        HeatPumpAsset::new(
            id.to_owned(),
            dhw_tank,
            buffer,
            house,
            self.power,
            InitialTemperatures {
                dhw: heat_pump.dhw_temp_0,
                buffer: heat_pump.buffer_temp_0,
                house_indoor: heat_pump.house_temp_0,
            },
            TemperatureBounds::new(heat_pump.dhw_temp_min, heat_pump.dhw_temp_max),
            TemperatureBounds::new(heat_pump.buffer_temp_min, heat_pump.buffer_temp_max),
            TemperatureBounds {
                min: heat_pump.house_temp_min,
                max: heat_pump.house_temp_max,
            },
        )
    }
}
