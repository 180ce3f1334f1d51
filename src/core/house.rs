use crate::errors::ConfigurationError;
use nalgebra::{Matrix2, Vector2};
use tracing::warn;

const INDOOR: usize = 0;
const ENVELOPE: usize = 1;

/// Thermal capacities of the two house nodes, in J/K
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HouseCapacities {
    pub c_in: f64,
    pub c_out: f64,
}

/// Thermal resistances of the house network, in K/W
///
/// * `r_exch` - between the indoor and envelope nodes
/// * `r_floor` - between the envelope node and the soil
/// * `r_vent` - ventilation, between the indoor node and the outdoor air
/// * `r_cond` - conduction, between the envelope node and the outdoor air
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HouseResistances {
    pub r_exch: f64,
    pub r_floor: f64,
    pub r_vent: f64,
    pub r_cond: f64,
}

/// A building represented as a two-node RC network
///
/// The indoor node (air and furniture) exchanges heat with the envelope node (walls
/// and floor mass) through `r_exch` and loses heat to the outdoor air by ventilation
/// through `r_vent`. It receives solar gains through the glazing and the heat injected
/// by the heat pump. The envelope node loses heat to the outdoor air through `r_cond`
/// and to the soil through `r_floor`.
///
/// With `T = [T_in, T_out]` the network obeys `C dT/dt = G T + F`, where `C` is the
/// diagonal capacitance matrix, `G` the conductance matrix and `F` the forcing vector.
#[derive(Clone, Debug, PartialEq)]
pub struct House {
    capacities: HouseCapacities,
    resistances: HouseResistances,
    window_area: f64, // m2
    inv_capacitance_matrix: Matrix2<f64>,
    conductance_matrix: Matrix2<f64>,
    temperatures: Option<Vector2<f64>>,
}

impl House {
    /// Arguments:
    /// * `capacities` - thermal capacities of the indoor and envelope nodes
    /// * `resistances` - thermal resistances between the nodes and their surroundings
    /// * `window_area` - glazing area through which solar irradiance enters the indoor node, in m2
    pub fn new(
        capacities: HouseCapacities,
        resistances: HouseResistances,
        window_area: f64,
    ) -> Result<Self, ConfigurationError> {
        for (name, value) in [
            ("C_in", capacities.c_in),
            ("C_out", capacities.c_out),
            ("R_exch", resistances.r_exch),
            ("R_floor", resistances.r_floor),
            ("R_vent", resistances.r_vent),
            ("R_cond", resistances.r_cond),
        ] {
            if value <= 0. || !value.is_finite() {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if window_area < 0. || !window_area.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "A_glass",
                value: window_area,
            });
        }

        let HouseResistances {
            r_exch,
            r_floor,
            r_vent,
            r_cond,
        } = resistances;

        #[rustfmt::skip]
        let inv_capacitance_matrix = Matrix2::new(
            1. / capacities.c_in, 0.,
            0., 1. / capacities.c_out,
        );
        #[rustfmt::skip]
        let conductance_matrix = Matrix2::new(
            -(1. / r_exch + 1. / r_vent), 1. / r_exch,
            1. / r_exch, -(1. / r_exch + 1. / r_cond + 1. / r_floor),
        );

        Ok(Self {
            capacities,
            resistances,
            window_area,
            inv_capacitance_matrix,
            conductance_matrix,
            temperatures: None,
        })
    }

    pub fn capacities(&self) -> HouseCapacities {
        self.capacities
    }

    pub fn resistances(&self) -> HouseResistances {
        self.resistances
    }

    pub fn window_area(&self) -> f64 {
        self.window_area
    }

    /// Current `[indoor, envelope]` temperatures in K, or `None` before initialisation.
    pub fn temperatures(&self) -> Option<[f64; 2]> {
        self.temperatures.map(|temps| [temps[INDOOR], temps[ENVELOPE]])
    }

    pub fn is_initialised(&self) -> bool {
        self.temperatures.is_some()
    }

    /// Heat that must be injected into the indoor node to hold it at `temp_indoor`, with
    /// the envelope at `temp_envelope`, in W.
    pub fn steady_state_heat_demand(
        &self,
        temp_indoor: f64,
        temp_envelope: f64,
        temp_air: f64,
        solar_irradiance: f64,
    ) -> f64 {
        (temp_indoor - temp_envelope) / self.resistances.r_exch
            + (temp_indoor - temp_air) / self.resistances.r_vent
            - self.window_area * solar_irradiance
    }

    /// Initialise the house from its indoor starting temperature.
    ///
    /// The envelope temperature is not configured separately: it is the steady state of
    /// the envelope node for the given indoor temperature and the first-period air and
    /// soil temperatures. The heat needed to hold the indoor node in steady state at
    /// that point is compared with the rated heat pump power, and a warning is logged
    /// when it exceeds it.
    ///
    /// Arguments:
    /// * `temp_indoor` - indoor starting temperature, in K
    /// * `rated_power` - rated thermal power of the heat pump, in W
    /// * `temp_air` - outdoor air temperature, in K
    /// * `temp_soil` - soil temperature, in K
    /// * `solar_irradiance` - solar irradiance, in W/m2
    pub fn set_initial_temperatures(
        &mut self,
        temp_indoor: f64,
        rated_power: f64,
        temp_air: f64,
        temp_soil: f64,
        solar_irradiance: f64,
    ) -> [f64; 2] {
        let HouseResistances {
            r_exch,
            r_floor,
            r_cond,
            ..
        } = self.resistances;

        let temp_envelope = (temp_indoor / r_exch + temp_air / r_cond + temp_soil / r_floor)
            / (1. / r_exch + 1. / r_cond + 1. / r_floor);

        let heat_demand =
            self.steady_state_heat_demand(temp_indoor, temp_envelope, temp_air, solar_irradiance);
        if heat_demand > rated_power {
            warn!(
                "Steady-state heat demand of {heat_demand} W at the initial indoor temperature exceeds the rated heat pump power of {rated_power} W"
            );
        }

        self.temperatures = Some(Vector2::new(temp_indoor, temp_envelope));

        [temp_indoor, temp_envelope]
    }

    pub(crate) fn set_temperatures(&mut self, temperatures: [f64; 2]) {
        self.temperatures = Some(Vector2::from(temperatures));
    }

    /// Forcing vector `F` for the current conditions.
    fn forcing(
        &self,
        temp_air: f64,
        temp_soil: f64,
        solar_irradiance: f64,
        heat_injection: f64,
    ) -> Vector2<f64> {
        let HouseResistances {
            r_floor,
            r_vent,
            r_cond,
            ..
        } = self.resistances;

        Vector2::new(
            self.window_area * solar_irradiance + heat_injection + temp_air / r_vent,
            temp_air / r_cond + temp_soil / r_floor,
        )
    }

    /// Advance both node temperatures by one period with an explicit Euler step of
    /// `dT/dt = C^-1 (G T + F)`, and return the new `[indoor, envelope]` temperatures.
    ///
    /// Arguments:
    /// * `period_in_seconds` - length of the period, in s
    /// * `temp_air` - outdoor air temperature, in K
    /// * `temp_soil` - soil temperature, in K
    /// * `solar_irradiance` - solar irradiance, in W/m2
    /// * `heat_injection` - heat delivered into the indoor node, in W
    ///
    /// Returns `None` if the house has not been initialised.
    pub fn update_temperatures(
        &mut self,
        period_in_seconds: f64,
        temp_air: f64,
        temp_soil: f64,
        solar_irradiance: f64,
        heat_injection: f64,
    ) -> Option<[f64; 2]> {
        let temperatures = self.temperatures?;
        let forcing = self.forcing(temp_air, temp_soil, solar_irradiance, heat_injection);

        let derivative =
            self.inv_capacitance_matrix * (self.conductance_matrix * temperatures + forcing);
        let temperatures = temperatures + derivative * period_in_seconds;
        self.temperatures = Some(temperatures);

        Some([temperatures[INDOOR], temperatures[ENVELOPE]])
    }
}
