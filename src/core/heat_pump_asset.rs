use crate::core::boundaries::TemperatureBounds;
use crate::core::heat_buffer::HeatBuffer;
use crate::core::house::House;
use crate::errors::ConfigurationError;
use crate::forcing::CurrentForcing;

/// Configured starting temperatures of a heat pump installation, in K
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialTemperatures {
    pub dhw: f64,
    pub buffer: f64,
    pub house_indoor: f64,
}

/// The thermal state of one heat pump installation: its domestic hot water tank,
/// its space heating buffer and the house it heats, together with the static
/// parameters needed to initialise and validate them.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatPumpAsset {
    pub(crate) id: String,
    pub(crate) dhw_tank: HeatBuffer,
    pub(crate) buffer: HeatBuffer,
    pub(crate) house: House,
    rated_power: f64, // W
    initial_temperatures: InitialTemperatures,
    pub(crate) dhw_bounds: TemperatureBounds,
    pub(crate) buffer_bounds: TemperatureBounds,
    pub(crate) house_bounds: TemperatureBounds,
}

/// Temperatures reported for a heat pump installation, in K
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureReport {
    pub dhw_temperature: f64,
    pub buffer_temperature: f64,
    /// `[indoor, envelope]`
    pub house_temperatures: [f64; 2],
}

impl HeatPumpAsset {
    pub fn new(
        id: String,
        dhw_tank: HeatBuffer,
        buffer: HeatBuffer,
        house: House,
        rated_power: f64,
        initial_temperatures: InitialTemperatures,
        dhw_bounds: TemperatureBounds,
        buffer_bounds: TemperatureBounds,
        house_bounds: TemperatureBounds,
    ) -> Result<Self, ConfigurationError> {
        if rated_power < 0. || !rated_power.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "power",
                value: rated_power,
            });
        }
        for (name, bounds) in [
            ("dhw", dhw_bounds),
            ("buffer", buffer_bounds),
            ("house", house_bounds),
        ] {
            if let Some(max) = bounds.max {
                if bounds.min >= max {
                    return Err(ConfigurationError::InconsistentBounds {
                        name,
                        min: bounds.min,
                        max,
                    });
                }
            }
        }

        Ok(Self {
            id,
            dhw_tank,
            buffer,
            house,
            rated_power,
            initial_temperatures,
            dhw_bounds,
            buffer_bounds,
            house_bounds,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rated_power(&self) -> f64 {
        self.rated_power
    }

    pub fn dhw_tank(&self) -> &HeatBuffer {
        &self.dhw_tank
    }

    pub fn buffer(&self) -> &HeatBuffer {
        &self.buffer
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    /// Whether all three stored temperatures have been set.
    pub fn is_initialised(&self) -> bool {
        self.dhw_tank.is_initialised()
            && self.buffer.is_initialised()
            && self.house.is_initialised()
    }

    /// Move the asset from uninitialised to initialised: the tanks take their configured
    /// starting temperatures and the house is initialised from its indoor starting
    /// temperature and the current-period forcing.
    pub fn initialise(&mut self, forcing: CurrentForcing) {
        let initial = self.initial_temperatures;
        self.dhw_tank.set_initial_temperature(initial.dhw);
        self.buffer.set_initial_temperature(initial.buffer);
        self.house.set_initial_temperatures(
            initial.house_indoor,
            self.rated_power,
            forcing.air_temperature,
            forcing.soil_temperature,
            forcing.solar_irradiance,
        );
    }

    /// Current temperatures, or `None` while any of them is uninitialised.
    pub fn report(&self) -> Option<TemperatureReport> {
        Some(TemperatureReport {
            dhw_temperature: self.dhw_tank.temperature()?,
            buffer_temperature: self.buffer.temperature()?,
            house_temperatures: self.house.temperatures()?,
        })
    }
}
