use crate::errors::{Bound, CapacityViolationError, ThermalQuantity};

/// Temperatures within this distance of a bound are pushed inside it, in K
pub const CORRECTION_EPSILON: f64 = 1.0e-4;

/// Permissible operating range of a stored temperature, in K
///
/// The house indoor node has no upper bound unless one is configured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureBounds {
    pub min: f64,
    pub max: Option<f64>,
}

impl TemperatureBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn lower_only(min: f64) -> Self {
        Self { min, max: None }
    }
}

/// Reconcile numerical drift of a freshly computed temperature with its bounds.
///
/// A temperature within `CORRECTION_EPSILON` of a bound is moved to exactly
/// `CORRECTION_EPSILON` inside it. A temperature still outside the range after that
/// correction is a genuine capacity violation.
pub fn enforce_bounds(
    temperature: f64,
    bounds: TemperatureBounds,
    asset_id: &str,
    quantity: ThermalQuantity,
) -> Result<f64, CapacityViolationError> {
    let mut temperature = temperature;

    if (temperature - bounds.min).abs() < CORRECTION_EPSILON {
        temperature = bounds.min + CORRECTION_EPSILON;
    } else if let Some(max) = bounds.max {
        if (temperature - max).abs() < CORRECTION_EPSILON {
            temperature = max - CORRECTION_EPSILON;
        }
    }

    let violation = |bound, limit| CapacityViolationError {
        asset_id: asset_id.to_owned(),
        quantity,
        bound,
        temperature,
        limit,
    };

    if temperature < bounds.min || temperature.is_nan() {
        return Err(violation(Bound::Lower, bounds.min));
    }
    if let Some(max) = bounds.max {
        if temperature > max {
            return Err(violation(Bound::Upper, max));
        }
    }

    Ok(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const ASSET_ID: &str = "hp-1";

    #[fixture]
    fn bounds() -> TemperatureBounds {
        TemperatureBounds::new(303.15, 328.15)
    }

    #[rstest]
    #[case(315.)]
    #[case(303.15 + 2. * CORRECTION_EPSILON)]
    #[case(328.15 - 2. * CORRECTION_EPSILON)]
    fn should_leave_temperature_well_inside_bounds(
        bounds: TemperatureBounds,
        #[case] temperature: f64,
    ) {
        assert_eq!(
            enforce_bounds(temperature, bounds, ASSET_ID, ThermalQuantity::Buffer),
            Ok(temperature)
        );
    }

    #[rstest]
    #[case(303.15)]
    #[case(303.15 - 0.5 * CORRECTION_EPSILON)]
    #[case(303.15 + 0.5 * CORRECTION_EPSILON)]
    fn should_push_temperature_near_lower_bound_inwards(
        bounds: TemperatureBounds,
        #[case] temperature: f64,
    ) {
        assert_eq!(
            enforce_bounds(temperature, bounds, ASSET_ID, ThermalQuantity::Buffer),
            Ok(303.15 + CORRECTION_EPSILON)
        );
    }

    #[rstest]
    #[case(328.15)]
    #[case(328.15 - 0.5 * CORRECTION_EPSILON)]
    #[case(328.15 + 0.5 * CORRECTION_EPSILON)]
    fn should_push_temperature_near_upper_bound_inwards(
        bounds: TemperatureBounds,
        #[case] temperature: f64,
    ) {
        assert_eq!(
            enforce_bounds(temperature, bounds, ASSET_ID, ThermalQuantity::Buffer),
            Ok(328.15 - CORRECTION_EPSILON)
        );
    }

    #[rstest]
    fn should_fail_below_lower_bound(bounds: TemperatureBounds) {
        assert_eq!(
            enforce_bounds(303., bounds, ASSET_ID, ThermalQuantity::DomesticHotWater),
            Err(CapacityViolationError {
                asset_id: ASSET_ID.into(),
                quantity: ThermalQuantity::DomesticHotWater,
                bound: Bound::Lower,
                temperature: 303.,
                limit: 303.15,
            })
        );
    }

    #[rstest]
    fn should_fail_above_upper_bound(bounds: TemperatureBounds) {
        let result = enforce_bounds(330., bounds, ASSET_ID, ThermalQuantity::Buffer);
        let error = result.unwrap_err();
        assert_eq!(error.bound, Bound::Upper);
        assert_eq!(error.limit, 328.15);
    }

    #[rstest]
    fn should_fail_on_nan() {
        let result = enforce_bounds(
            f64::NAN,
            TemperatureBounds::lower_only(288.15),
            ASSET_ID,
            ThermalQuantity::House,
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn should_only_check_lower_bound_when_no_maximum() {
        let bounds = TemperatureBounds::lower_only(288.15);
        assert_eq!(
            enforce_bounds(400., bounds, ASSET_ID, ThermalQuantity::House),
            Ok(400.)
        );
        assert_eq!(
            enforce_bounds(288.15, bounds, ASSET_ID, ThermalQuantity::House),
            Ok(288.15 + CORRECTION_EPSILON)
        );
        let result = enforce_bounds(288., bounds, ASSET_ID, ThermalQuantity::House);
        assert!(result.is_err());
    }
}
