//! Climate feature derivation
//!
//! Pure reimplementations of the unit conversions the prediction form
//! derives from weather data. The serde types mirror the weather
//! provider's JSON payloads so captured responses can be replayed
//! without network access.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::compose::CaseFeatures;

/// Crude mid-latitude constant standing in for tabulated Ra values
pub const EXTRATERRESTRIAL_RADIATION: f64 = 15.0;
/// Month length used when scaling daily figures
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Forecast readings considered per summary (5 days of 3-hour steps)
const MAX_READINGS: usize = 40;

/// Saturation vapour pressure in hPa at the given temperature,
/// Magnus formula
pub fn saturation_vapour_pressure_hpa(temp_c: f64) -> f64 {
    6.112 * ((17.67 * temp_c) / (temp_c + 243.5)).exp()
}

/// Actual vapour pressure in hPa from temperature and relative humidity
pub fn vapour_pressure_hpa(temp_c: f64, humidity_pct: f64) -> f64 {
    (humidity_pct / 100.0) * saturation_vapour_pressure_hpa(temp_c)
}

/// Reference evapotranspiration in mm/day, simplified Hargreaves.
///
/// A negative temperature range is clamped to zero so inverted inputs
/// yield 0.0 instead of NaN.
pub fn reference_evapotranspiration_mm_day(min_temp_c: f64, max_temp_c: f64) -> f64 {
    let mean = (min_temp_c + max_temp_c) / 2.0;
    let range = (max_temp_c - min_temp_c).max(0.0);
    0.0023 * EXTRATERRESTRIAL_RADIATION * range.sqrt() * (mean + 17.8)
}

/// Monthly evapotranspiration in mm
pub fn monthly_evapotranspiration_mm(min_temp_c: f64, max_temp_c: f64) -> f64 {
    reference_evapotranspiration_mm_day(min_temp_c, max_temp_c) * DAYS_PER_MONTH
}

/// Temperature block of one forecast reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadingMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Rain volume block, keyed "3h" on the wire
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RainVolume {
    #[serde(rename = "3h", default)]
    pub three_hour: f64,
}

/// One 3-hour forecast reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReading {
    /// Timestamp text, "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
    pub main: ReadingMain,
    #[serde(default)]
    pub rain: Option<RainVolume>,
}

impl ForecastReading {
    /// Calendar day of this reading, None when the timestamp is unparseable
    pub fn day(&self) -> Option<NaiveDate> {
        let date = self.dt_txt.split_whitespace().next()?;
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(day) => Some(day),
            Err(_) => {
                log::warn!("unparseable forecast date: {}", self.dt_txt);
                None
            }
        }
    }

    /// True when the reading recorded any rain
    pub fn is_wet(&self) -> bool {
        self.rain.map(|r| r.three_hour > 0.0).unwrap_or(false)
    }
}

/// Aggregates derived from a window of forecast readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub forecast_days: usize,
    pub wet_days: usize,
    /// Wet days scaled to a 30-day month, None when no day parsed
    pub wet_day_freq_monthly: Option<f64>,
    pub evapotranspiration_monthly_mm: f64,
}

/// Summarize up to [`MAX_READINGS`] forecast readings.
///
/// Returns None for an empty list. A day counts as wet when any of its
/// readings recorded rain.
pub fn summarize_forecast(readings: &[ForecastReading]) -> Option<ForecastSummary> {
    if readings.is_empty() {
        return None;
    }
    let readings = &readings[..readings.len().min(MAX_READINGS)];

    let mut min_temp = f64::MAX;
    let mut max_temp = f64::MIN;
    let mut days: HashMap<NaiveDate, bool> = HashMap::new();

    for reading in readings {
        min_temp = min_temp.min(reading.main.temp_min);
        max_temp = max_temp.max(reading.main.temp_max);
        if let Some(day) = reading.day() {
            let wet = days.entry(day).or_insert(false);
            if reading.is_wet() {
                *wet = true;
            }
        }
    }

    let forecast_days = days.len();
    let wet_days = days.values().filter(|wet| **wet).count();
    let wet_day_freq_monthly = if forecast_days > 0 {
        Some(wet_days as f64 / forecast_days as f64 * DAYS_PER_MONTH)
    } else {
        None
    };

    Some(ForecastSummary {
        min_temp_c: min_temp,
        max_temp_c: max_temp,
        forecast_days,
        wet_days,
        wet_day_freq_monthly,
        evapotranspiration_monthly_mm: monthly_evapotranspiration_mm(min_temp, max_temp),
    })
}

/// Temperature and humidity block of a current-conditions payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Cloud cover block, percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloudCover {
    pub all: f64,
}

/// Current weather conditions payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub main: CurrentMain,
    #[serde(default)]
    pub clouds: Option<CloudCover>,
    #[serde(default)]
    pub rain: Option<RainVolume>,
}

/// Fill features derivable from current conditions, keeping any value
/// already set.
///
/// Precipitation defaults to 0.00 when the payload has no rain block.
pub fn fill_from_current(features: &mut CaseFeatures, current: &CurrentConditions) {
    if features.mean_temp.is_none() {
        features.mean_temp = Some(current.main.temp);
    }
    if features.cloud_cover.is_none() {
        if let Some(clouds) = current.clouds {
            features.cloud_cover = Some(clouds.all);
        }
    }
    if features.precipitation.is_none() {
        features.precipitation = Some(current.rain.map(|r| r.three_hour).unwrap_or(0.0));
    }
    if features.vapour_pressure.is_none() {
        if let Some(humidity) = current.main.humidity {
            features.vapour_pressure = Some(vapour_pressure_hpa(current.main.temp, humidity));
        }
    }
}

/// Fill features derivable from a forecast summary, keeping any value
/// already set
pub fn fill_from_forecast(features: &mut CaseFeatures, summary: &ForecastSummary) {
    if features.min_temp.is_none() {
        features.min_temp = Some(summary.min_temp_c);
    }
    if features.max_temp.is_none() {
        features.max_temp = Some(summary.max_temp_c);
    }
    if features.wet_day_freq.is_none() {
        features.wet_day_freq = summary.wet_day_freq_monthly;
    }
    if features.evapotranspiration.is_none() {
        features.evapotranspiration = Some(summary.evapotranspiration_monthly_mm);
    }
}
