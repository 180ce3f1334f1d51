use strum::Display as StrumDisplay;
use thiserror::Error;

/// Top-level error for the thermal calculations of a simulation run.
#[derive(Debug, Error)]
pub enum ThermalError {
    #[error("Invalid asset configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    CapacityViolation(#[from] CapacityViolationError),
    #[error("Invalid forcing input: {0}")]
    Forcing(#[from] ForcingError),
    #[error("No heat pump asset registered with id {0}")]
    UnknownAsset(String),
    #[error("Temperatures of heat pump {0} have not been initialised yet")]
    NotInitialised(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("Minimum {name} temperature ({min} K) must be lower than its maximum ({max} K)")]
    InconsistentBounds {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("Heat pump asset {0} was registered more than once")]
    DuplicateAsset(String),
    #[error("Could not read asset description: {0}")]
    Unreadable(String),
}

/// The stored quantity whose temperature left its operating range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay)]
pub enum ThermalQuantity {
    #[strum(to_string = "dhw")]
    DomesticHotWater,
    #[strum(to_string = "buffer")]
    Buffer,
    #[strum(to_string = "house")]
    House,
}

/// Which side of its operating range a temperature left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay)]
pub enum Bound {
    #[strum(to_string = "under")]
    Lower,
    #[strum(to_string = "over")]
    Upper,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Heat pump {asset_id} is charged {bound} its {quantity} capacity: temperature {temperature} K, limit {limit} K")]
pub struct CapacityViolationError {
    pub asset_id: String,
    pub quantity: ThermalQuantity,
    pub bound: Bound,
    pub temperature: f64,
    pub limit: f64,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ForcingError {
    #[error("Forcing vector {0} has no sample for the current period")]
    Empty(&'static str),
    #[error("Forcing column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Forcing series does not contain period {0}")]
    OutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_describe_capacity_violation() {
        let error = CapacityViolationError {
            asset_id: "hp-1".into(),
            quantity: ThermalQuantity::DomesticHotWater,
            bound: Bound::Upper,
            temperature: 334.,
            limit: 333.15,
        };
        assert_eq!(
            error.to_string(),
            "Heat pump hp-1 is charged over its dhw capacity: temperature 334 K, limit 333.15 K"
        );
    }

    #[rstest]
    #[case(Bound::Lower, "under")]
    #[case(Bound::Upper, "over")]
    fn should_display_bound(#[case] bound: Bound, #[case] expected: &str) {
        assert_eq!(bound.to_string(), expected);
    }

    #[rstest]
    fn should_wrap_configuration_error() {
        let error: ThermalError = ConfigurationError::NonPositive {
            name: "buffer_capacitance",
            value: 0.,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Invalid asset configuration: buffer_capacitance must be strictly positive, got 0"
        );
    }
}
