use thiserror::Error;

pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const ABSOLUTE_ZERO_IN_CELSIUS: f64 = -273.15;

pub fn celsius_to_kelvin(temp_c: f64) -> Result<f64, BelowAbsoluteZeroError> {
    if temp_c < ABSOLUTE_ZERO_IN_CELSIUS {
        Err(BelowAbsoluteZeroError::from_c(temp_c))
    } else {
        Ok(temp_c - ABSOLUTE_ZERO_IN_CELSIUS)
    }
}

pub fn kelvin_to_celsius(temp_k: f64) -> Result<f64, BelowAbsoluteZeroError> {
    if temp_k < 0.0 {
        Err(BelowAbsoluteZeroError::from_k(temp_k))
    } else {
        Ok(temp_k + ABSOLUTE_ZERO_IN_CELSIUS)
    }
}

#[derive(Debug, Error)]
#[error("A temperature of {k} K ({} °C) is less than absolute zero", k + ABSOLUTE_ZERO_IN_CELSIUS)]
pub struct BelowAbsoluteZeroError {
    k: f64,
}

impl BelowAbsoluteZeroError {
    fn from_k(k: f64) -> Self {
        Self { k }
    }

    fn from_c(c: f64) -> Self {
        Self {
            k: c - ABSOLUTE_ZERO_IN_CELSIUS,
        }
    }
}
