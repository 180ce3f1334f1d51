use crate::errors::ForcingError;

/// Predicted weather for the coming periods; the first sample of each vector is the
/// value for the current period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forcing {
    pub solar_irradiance: Vec<f64>, // W/m2
    pub air_temperature: Vec<f64>,  // K
    pub soil_temperature: Vec<f64>, // K
}

/// Weather for the current period only
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrentForcing {
    pub solar_irradiance: f64,
    pub air_temperature: f64,
    pub soil_temperature: f64,
}

impl Forcing {
    pub fn current(&self) -> Result<CurrentForcing, ForcingError> {
        let first = |values: &[f64], name| values.first().copied().ok_or(ForcingError::Empty(name));

        Ok(CurrentForcing {
            solar_irradiance: first(&self.solar_irradiance, "solar_irradiance")?,
            air_temperature: first(&self.air_temperature, "air_temperature")?,
            soil_temperature: first(&self.soil_temperature, "soil_temperature")?,
        })
    }
}

/// Heat flows decided by the dispatch for one period, in W
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeatPowers {
    /// from the heat pump into the domestic hot water tank
    pub to_dhw_tank: f64,
    /// drawn from the domestic hot water tank
    pub to_dhw: f64,
    /// from the heat pump into the space heating buffer
    pub to_buffer: f64,
    /// from the buffer into the house
    pub to_house: f64,
}
