use crate::core::boundaries::enforce_bounds;
use crate::core::heat_pump_asset::{HeatPumpAsset, TemperatureReport};
use crate::errors::{ConfigurationError, ThermalError, ThermalQuantity};
use crate::forcing::{Forcing, HeatPowers};
use crate::input::Input;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Calculates the thermal state of every registered heat pump installation, once per
/// period, in two phases:
///
/// * `send_temperatures` reports the current temperatures of an asset, initialising it
///   first if it has not been initialised yet
/// * `update_temperatures` advances the tanks and the house of an asset by one period
///   using the heat flows decided for that period
///
/// The caller is expected to serialise calls for the same asset; different assets share
/// no state.
#[derive(Clone, Debug)]
pub struct HeatPumpService {
    period_in_seconds: f64,
    assets: IndexMap<String, HeatPumpAsset>,
}

impl HeatPumpService {
    pub fn new(period_in_seconds: f64) -> Result<Self, ConfigurationError> {
        if period_in_seconds < 0. || !period_in_seconds.is_finite() {
            return Err(ConfigurationError::Negative {
                name: "period_in_seconds",
                value: period_in_seconds,
            });
        }

        Ok(Self {
            period_in_seconds,
            assets: Default::default(),
        })
    }

    /// Create a service with every asset in the given description registered.
    pub fn from_input(input: &Input) -> Result<Self, ConfigurationError> {
        let mut service = Self::new(input.period_in_seconds)?;
        for (id, asset_input) in &input.assets {
            service.register_asset(asset_input.build_asset(id)?)?;
        }

        Ok(service)
    }

    pub fn period_in_seconds(&self) -> f64 {
        self.period_in_seconds
    }

    pub fn register_asset(&mut self, asset: HeatPumpAsset) -> Result<(), ConfigurationError> {
        if self.assets.contains_key(asset.id()) {
            return Err(ConfigurationError::DuplicateAsset(asset.id().to_owned()));
        }
        info!("Registered heat pump {}", asset.id());
        self.assets.insert(asset.id().to_owned(), asset);

        Ok(())
    }

    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn asset(&self, asset_id: &str) -> Result<&HeatPumpAsset, ThermalError> {
        self.assets
            .get(asset_id)
            .ok_or_else(|| ThermalError::UnknownAsset(asset_id.to_owned()))
    }

    fn asset_mut(&mut self, asset_id: &str) -> Result<&mut HeatPumpAsset, ThermalError> {
        self.assets
            .get_mut(asset_id)
            .ok_or_else(|| ThermalError::UnknownAsset(asset_id.to_owned()))
    }

    pub fn is_initialised(&self, asset_id: &str) -> Result<bool, ThermalError> {
        Ok(self.asset(asset_id)?.is_initialised())
    }

    /// Initialise an asset from its configured starting temperatures and the
    /// current-period forcing. Any temperatures already held are overwritten.
    pub fn initialise(&mut self, asset_id: &str, forcing: &Forcing) -> Result<(), ThermalError> {
        let current = forcing.current()?;
        let asset = self.asset_mut(asset_id)?;
        asset.initialise(current);
        info!(
            "Initialised heat pump {asset_id}: house temperatures {:?}",
            asset.house().temperatures()
        );

        Ok(())
    }

    /// Report phase: the current dhw, buffer and house temperatures of an asset.
    ///
    /// An uninitialised asset is initialised first; an initialised asset is left as it is,
    /// so repeated calls without an update in between report the same values.
    pub fn send_temperatures(
        &mut self,
        asset_id: &str,
        forcing: &Forcing,
    ) -> Result<TemperatureReport, ThermalError> {
        info!("calculation 'send_temperatures' started for heat pump {asset_id}");
        if !self.is_initialised(asset_id)? {
            self.initialise(asset_id, forcing)?;
        }

        let report = self
            .asset(asset_id)?
            .report()
            .ok_or_else(|| ThermalError::NotInitialised(asset_id.to_owned()))?;
        debug!("House temperatures: {:?}", report.house_temperatures);

        Ok(report)
    }

    /// Update phase: advance the dhw tank, the buffer and the house of an asset by one
    /// period.
    ///
    /// The dhw tank receives `to_dhw_tank` and delivers `to_dhw`; the buffer receives
    /// `to_buffer` and delivers `to_house`, which is injected into the house's indoor node.
    /// If any resulting temperature violates its bounds the asset keeps its previous state.
    pub fn update_temperatures(
        &mut self,
        asset_id: &str,
        forcing: &Forcing,
        heat_powers: HeatPowers,
    ) -> Result<(), ThermalError> {
        info!("calculation 'update_temperatures' started for heat pump {asset_id}");
        let current = forcing.current()?;
        let period = self.period_in_seconds;
        let asset = self.asset_mut(asset_id)?;
        let not_initialised = || ThermalError::NotInitialised(asset_id.to_owned());

        debug!("temperatures before: {:?}", asset.report());
        debug!("heat flows: {heat_powers:?}");

        let mut dhw_tank = asset.dhw_tank.clone();
        let mut buffer = asset.buffer.clone();
        let mut house = asset.house.clone();

        let dhw_temperature = dhw_tank
            .update_temperature(period, heat_powers.to_dhw, heat_powers.to_dhw_tank)
            .ok_or_else(not_initialised)?;
        let buffer_temperature = buffer
            .update_temperature(period, heat_powers.to_house, heat_powers.to_buffer)
            .ok_or_else(not_initialised)?;
        let [indoor_temperature, envelope_temperature] = house
            .update_temperatures(
                period,
                current.air_temperature,
                current.soil_temperature,
                current.solar_irradiance,
                heat_powers.to_house,
            )
            .ok_or_else(not_initialised)?;

        // Correct numerical drift up to the epsilon and reject anything beyond it
        let dhw_temperature = enforce_bounds(
            dhw_temperature,
            asset.dhw_bounds,
            asset_id,
            ThermalQuantity::DomesticHotWater,
        )?;
        let buffer_temperature = enforce_bounds(
            buffer_temperature,
            asset.buffer_bounds,
            asset_id,
            ThermalQuantity::Buffer,
        )?;
        let indoor_temperature = enforce_bounds(
            indoor_temperature,
            asset.house_bounds,
            asset_id,
            ThermalQuantity::House,
        )?;

        dhw_tank.set_temperature(dhw_temperature);
        buffer.set_temperature(buffer_temperature);
        house.set_temperatures([indoor_temperature, envelope_temperature]);
        asset.dhw_tank = dhw_tank;
        asset.buffer = buffer;
        asset.house = house;

        debug!("temperatures after: {:?}", asset.report());

        Ok(())
    }
}
