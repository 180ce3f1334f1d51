use crate::core::units::{celsius_to_kelvin, SECONDS_PER_HOUR};
use crate::errors::ForcingError;
use crate::forcing::{Forcing, HeatPowers};
use anyhow::Context;
use csv::ReaderBuilder as CsvReaderBuilder;
use interp::{interp_slice, InterpMode};
use serde::Deserialize;
use std::io::Read;

/// Number of predicted samples handed to each calculation (12 hours at 15 minutes).
pub const DEFAULT_FORECAST_HORIZON: usize = 48;

/// One period of weather and dispatched heat flows, as read from a forcing file
#[derive(Clone, Debug, Deserialize)]
struct ForcingRecord {
    solar_irradiance: f64,
    air_temperature: f64,
    soil_temperature: f64,
    #[serde(default)]
    heat_power_to_tank_dhw: f64,
    #[serde(default)]
    heat_power_to_dhw: f64,
    #[serde(default)]
    heat_power_to_buffer: f64,
    #[serde(default)]
    heat_power_to_house: f64,
}

/// Weather and dispatched heat flows for every period of a simulation run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForcingSeries {
    pub solar_irradiance: Vec<f64>,
    pub air_temperature: Vec<f64>,
    pub soil_temperature: Vec<f64>,
    pub heat_powers: Vec<HeatPowers>,
}

impl ForcingSeries {
    /// Build a series from weather columns without any dispatched heat.
    pub fn from_weather(
        solar_irradiance: Vec<f64>,
        air_temperature: Vec<f64>,
        soil_temperature: Vec<f64>,
    ) -> Result<Self, ForcingError> {
        let expected = solar_irradiance.len();
        for (column, values) in [
            ("air_temperature", &air_temperature),
            ("soil_temperature", &soil_temperature),
        ] {
            if values.len() != expected {
                return Err(ForcingError::LengthMismatch {
                    column,
                    expected,
                    actual: values.len(),
                });
            }
        }

        Ok(Self {
            heat_powers: vec![HeatPowers::default(); expected],
            solar_irradiance,
            air_temperature,
            soil_temperature,
        })
    }

    pub fn len(&self) -> usize {
        self.solar_irradiance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solar_irradiance.is_empty()
    }

    /// The forcing seen by the calculations at period `index`: up to `horizon` samples
    /// starting at that period, fewer towards the end of the series.
    pub fn forcing_window(&self, index: usize, horizon: usize) -> Result<Forcing, ForcingError> {
        if index >= self.len() {
            return Err(ForcingError::OutOfRange(index));
        }
        let end = (index + horizon.max(1)).min(self.len());

        Ok(Forcing {
            solar_irradiance: self.solar_irradiance[index..end].to_vec(),
            air_temperature: self.air_temperature[index..end].to_vec(),
            soil_temperature: self.soil_temperature[index..end].to_vec(),
        })
    }

    pub fn heat_powers(&self, index: usize) -> Result<HeatPowers, ForcingError> {
        self.heat_powers
            .get(index)
            .copied()
            .ok_or(ForcingError::OutOfRange(index))
    }

    /// Resample a series read at hourly resolution onto periods of `period_in_seconds`.
    ///
    /// Weather columns are interpolated linearly between the hours; the heat powers of
    /// each hour are held for every period starting within that hour.
    pub fn resample_hourly(&self, period_in_seconds: f64) -> Self {
        if self.len() < 2 || period_in_seconds <= 0. {
            return self.clone();
        }

        let resample = |values: &[f64]| interpolate_hourly_to_period(values, period_in_seconds);
        let solar_irradiance = resample(&self.solar_irradiance);
        let periods_per_hour = SECONDS_PER_HOUR as f64 / period_in_seconds;
        let heat_powers = (0..solar_irradiance.len())
            .map(|period| {
                let hour = (period as f64 / periods_per_hour).floor() as usize;
                self.heat_powers
                    .get(hour)
                    .or(self.heat_powers.last())
                    .copied()
                    .unwrap_or_default()
            })
            .collect();

        Self {
            air_temperature: resample(&self.air_temperature),
            soil_temperature: resample(&self.soil_temperature),
            solar_irradiance,
            heat_powers,
        }
    }
}

/// Read a forcing file: a CSV with a header row and one row per period.
///
/// Required columns are `solar_irradiance` (W/m2), `air_temperature` and
/// `soil_temperature`; the heat power columns `heat_power_to_tank_dhw`,
/// `heat_power_to_dhw`, `heat_power_to_buffer` and `heat_power_to_house` (W) default
/// to zero when absent. Temperatures are in K unless `temperatures_in_celsius` is set.
pub fn forcing_data_from_csv(
    file: impl Read,
    temperatures_in_celsius: bool,
) -> anyhow::Result<ForcingSeries> {
    let mut reader = CsvReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut series = ForcingSeries::default();
    for (i, result) in reader.deserialize().enumerate() {
        let record: ForcingRecord =
            result.with_context(|| format!("Could not parse row {} of forcing file", i + 1))?;

        let (air_temperature, soil_temperature) = if temperatures_in_celsius {
            (
                celsius_to_kelvin(record.air_temperature)?,
                celsius_to_kelvin(record.soil_temperature)?,
            )
        } else {
            (record.air_temperature, record.soil_temperature)
        };

        series.solar_irradiance.push(record.solar_irradiance);
        series.air_temperature.push(air_temperature);
        series.soil_temperature.push(soil_temperature);
        series.heat_powers.push(HeatPowers {
            to_dhw_tank: record.heat_power_to_tank_dhw,
            to_dhw: record.heat_power_to_dhw,
            to_buffer: record.heat_power_to_buffer,
            to_house: record.heat_power_to_house,
        });
    }

    Ok(series)
}

/// Linearly interpolate an hourly series onto a grid of `period_in_seconds`, starting at
/// the first hour and ending at the last one.
pub fn interpolate_hourly_to_period(hourly: &[f64], period_in_seconds: f64) -> Vec<f64> {
    if hourly.len() < 2 || period_in_seconds <= 0. {
        return hourly.to_vec();
    }

    let hours = (0..hourly.len()).map(|hour| hour as f64).collect::<Vec<_>>();
    let periods_per_hour = SECONDS_PER_HOUR as f64 / period_in_seconds;
    let number_of_periods = ((hourly.len() - 1) as f64 * periods_per_hour).floor() as usize + 1;

    let period_starts = (0..number_of_periods)
        .map(|period| period as f64 / periods_per_hour)
        .collect::<Vec<_>>();

    interp_slice(&hours, hourly, &period_starts, &InterpMode::FirstLast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const FORCING_CSV: &str = "solar_irradiance,air_temperature,soil_temperature,heat_power_to_tank_dhw,heat_power_to_dhw,heat_power_to_buffer,heat_power_to_house
0.0,284.65,290.05,20,20,20,20
8.5,284.1,290.06,1000,0,2000,1500
25.0,283.55,290.07,0,300,0,1500
";

    #[fixture]
    fn series() -> ForcingSeries {
        forcing_data_from_csv(FORCING_CSV.as_bytes(), false).unwrap()
    }

    #[rstest]
    fn should_read_forcing_file(series: ForcingSeries) {
        assert_eq!(series.len(), 3);
        assert_eq!(series.solar_irradiance, vec![0.0, 8.5, 25.0]);
        assert_eq!(series.air_temperature, vec![284.65, 284.1, 283.55]);
        assert_eq!(
            series.heat_powers(1).unwrap(),
            HeatPowers {
                to_dhw_tank: 1000.,
                to_dhw: 0.,
                to_buffer: 2000.,
                to_house: 1500.,
            }
        );
    }

    #[rstest]
    fn should_default_missing_heat_power_columns_to_zero() {
        let csv = "solar_irradiance,air_temperature,soil_temperature\n100,10.0,12.5\n";
        let series = forcing_data_from_csv(csv.as_bytes(), true).unwrap();

        assert_relative_eq!(series.air_temperature[0], 283.15);
        assert_relative_eq!(series.soil_temperature[0], 285.65);
        assert_eq!(series.heat_powers(0).unwrap(), HeatPowers::default());
    }

    #[rstest]
    fn should_reject_unparseable_rows() {
        let csv = "solar_irradiance,air_temperature,soil_temperature\n100,warm,12.5\n";
        assert!(forcing_data_from_csv(csv.as_bytes(), false).is_err());
    }

    #[rstest]
    fn should_reject_temperatures_below_absolute_zero() {
        let csv = "solar_irradiance,air_temperature,soil_temperature\n0,-300,12.5\n";
        assert!(forcing_data_from_csv(csv.as_bytes(), true).is_err());
    }

    #[rstest]
    fn should_window_forcing_from_current_period(series: ForcingSeries) {
        let window = series.forcing_window(1, 48).unwrap();
        assert_eq!(window.solar_irradiance, vec![8.5, 25.0]);
        assert_eq!(window.air_temperature, vec![284.1, 283.55]);

        let window = series.forcing_window(0, 2).unwrap();
        assert_eq!(window.soil_temperature, vec![290.05, 290.06]);

        assert_eq!(
            series.forcing_window(3, 48),
            Err(ForcingError::OutOfRange(3))
        );
    }

    #[rstest]
    fn should_reject_columns_of_different_lengths() {
        assert_eq!(
            ForcingSeries::from_weather(vec![0.; 3], vec![280.; 3], vec![285.; 2]),
            Err(ForcingError::LengthMismatch {
                column: "soil_temperature",
                expected: 3,
                actual: 2
            })
        );
    }

    #[rstest]
    fn should_interpolate_hourly_values_to_quarter_hours() {
        let hourly_solar = [0., 0., 0., 0., 0., 0., 300., 1250.].map(|solar| solar / 9.);
        let solar = interpolate_hourly_to_period(&hourly_solar, 900.);
        assert_eq!(solar.len(), 29);
        assert_relative_eq!(solar[21], 25. / 3., epsilon = 1e-9);
        assert_relative_eq!(solar[26], 775. / 9., epsilon = 1e-9);

        let air = interpolate_hourly_to_period(&[284.65, 282.45], 900.);
        assert_eq!(air.len(), 5);
        assert_relative_eq!(air[1], 284.1, epsilon = 1e-9);
        assert_relative_eq!(air[2], 283.55, epsilon = 1e-9);
        assert_relative_eq!(air[4], 282.45, epsilon = 1e-9);
    }

    #[rstest]
    fn should_leave_short_series_unchanged() {
        assert_eq!(interpolate_hourly_to_period(&[280.], 900.), vec![280.]);
    }

    #[rstest]
    fn should_resample_hourly_series_onto_periods(series: ForcingSeries) {
        let resampled = series.resample_hourly(900.);

        assert_eq!(resampled.len(), 9);
        assert_eq!(resampled.heat_powers.len(), 9);
        assert_relative_eq!(resampled.solar_irradiance[2], 4.25, epsilon = 1e-9);
        assert_relative_eq!(resampled.air_temperature[6], 283.825, epsilon = 1e-9);
        assert_relative_eq!(resampled.soil_temperature[8], 290.07, epsilon = 1e-9);

        // heat powers are held for the whole hour they were dispatched in
        for period in 0..4 {
            assert_eq!(resampled.heat_powers[period], series.heat_powers[0]);
        }
        for period in 4..8 {
            assert_eq!(resampled.heat_powers[period], series.heat_powers[1]);
        }
        assert_eq!(resampled.heat_powers[8], series.heat_powers[2]);
    }

    #[rstest]
    fn should_keep_hourly_periods(series: ForcingSeries) {
        let resampled = series.resample_hourly(3_600.);
        assert_eq!(resampled.len(), 3);
        assert_eq!(resampled.heat_powers, series.heat_powers);
        let hourly_air = &series.air_temperature;
        for (value, expected) in resampled.air_temperature.iter().zip(hourly_air) {
            assert_relative_eq!(value, expected, epsilon = 1e-9);
        }

        assert_eq!(series.resample_hourly(0.), series);
    }
}
