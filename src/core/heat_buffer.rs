use crate::errors::ConfigurationError;

/// A well-mixed thermal store (space heating buffer or domestic hot water tank)
///
/// The contents are modelled as a single node with one temperature and one heat
/// capacity. Heat flows in from the heat pump and out to the consumer (the house's
/// heating circuit or the hot water draw-off); the net flow is integrated over one
/// period with an explicit Euler step.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatBuffer {
    capacitance: f64, // J/K
    temperature: Option<f64>,
}

impl HeatBuffer {
    /// Arguments:
    /// * `capacitance` - heat capacity of the tank contents, in J/K
    pub fn new(capacitance: f64) -> Result<Self, ConfigurationError> {
        if capacitance <= 0. || !capacitance.is_finite() {
            return Err(ConfigurationError::NonPositive {
                name: "capacitance",
                value: capacitance,
            });
        }

        Ok(Self {
            capacitance,
            temperature: None,
        })
    }

    pub fn capacitance(&self) -> f64 {
        self.capacitance
    }

    /// Current tank temperature in K, or `None` before initialisation.
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn is_initialised(&self) -> bool {
        self.temperature.is_some()
    }

    /// Configured starting values are trusted, so no bounds are checked here.
    pub fn set_initial_temperature(&mut self, temperature: f64) {
        self.temperature = Some(temperature);
    }

    pub(crate) fn set_temperature(&mut self, temperature: f64) {
        self.temperature = Some(temperature);
    }

    /// Advance the tank temperature by one period and return the new value.
    ///
    /// Arguments:
    /// * `period_in_seconds` - length of the period, in s
    /// * `heat_out` - heat drawn from the tank, in W
    /// * `heat_in` - heat delivered into the tank, in W
    ///
    /// Returns `None` if the tank has not been initialised.
    pub fn update_temperature(
        &mut self,
        period_in_seconds: f64,
        heat_out: f64,
        heat_in: f64,
    ) -> Option<f64> {
        let temperature =
            self.temperature? + period_in_seconds * (heat_in - heat_out) / self.capacitance;
        self.temperature = Some(temperature);

        Some(temperature)
    }
}
