//! Shaping raw provider payloads into snapshots

use chrono::NaiveDate;

use crate::codes::{weather_description, weather_icon};
use crate::error::{Result, WeatherError};
use crate::models::{
    CurrentConditions, DailyForecast, DaySnapshot, HourlyData, HourlySeries, RawCurrent,
    RawDaily, RawForecast, RawHourly, WeatherSnapshot,
};
use crate::time_range::TimeRange;

/// Number of daily entries in every forecast
pub const FORECAST_DAYS: usize = 7;

/// Round to the nearest integer, halves toward positive infinity
///
/// `-2.5` rounds to `-2`, unlike [`f64::round`].
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Shape a multi-day payload, keeping `range.hours()` hourly points
pub fn shape_forecast(raw: &RawForecast, range: TimeRange) -> Result<WeatherSnapshot> {
    let current = raw
        .current
        .as_ref()
        .ok_or_else(|| missing("current"))
        .and_then(shape_current)?;
    let daily = raw.daily.as_ref().ok_or_else(|| missing("daily"))?;
    let hourly = raw.hourly.as_ref().ok_or_else(|| missing("hourly"))?;

    Ok(WeatherSnapshot {
        current,
        forecast: shape_daily(daily)?,
        hourly: shape_hourly(hourly, Some(range.hours() as usize))?,
    })
}

/// Shape a single-day payload, keeping every hour returned
pub fn shape_day(raw: &RawForecast, date: NaiveDate) -> Result<DaySnapshot> {
    let hourly = raw.hourly.as_ref().ok_or_else(|| missing("hourly"))?;
    Ok(DaySnapshot {
        date,
        hourly: shape_hourly(hourly, None)?,
    })
}

fn shape_current(current: &RawCurrent) -> Result<CurrentConditions> {
    let temperature = current
        .temperature_2m
        .ok_or_else(|| missing("current.temperature_2m"))?;
    let humidity = current
        .relative_humidity_2m
        .ok_or_else(|| missing("current.relative_humidity_2m"))?;
    let wind_speed = current
        .wind_speed_10m
        .ok_or_else(|| missing("current.wind_speed_10m"))?;
    let weather_code = current
        .weather_code
        .ok_or_else(|| missing("current.weather_code"))?;

    Ok(CurrentConditions {
        temperature: round_half_up(temperature),
        humidity,
        wind_speed,
        weather_code,
        icon: weather_icon(weather_code).to_string(),
        description: weather_description(weather_code).to_string(),
    })
}

fn shape_daily(daily: &RawDaily) -> Result<Vec<DailyForecast>> {
    if daily.time.len() < FORECAST_DAYS {
        return Err(WeatherError::Shaping(format!(
            "daily.time has {} entries, expected at least {FORECAST_DAYS}",
            daily.time.len()
        )));
    }
    check_len("daily.weather_code", daily.weather_code.len(), FORECAST_DAYS)?;
    check_len("daily.temperature_2m_max", daily.temperature_2m_max.len(), FORECAST_DAYS)?;
    check_len("daily.temperature_2m_min", daily.temperature_2m_min.len(), FORECAST_DAYS)?;
    check_len("daily.precipitation_sum", daily.precipitation_sum.len(), FORECAST_DAYS)?;

    daily
        .time
        .iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(i, day)| {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| WeatherError::Shaping(format!("daily.time[{i}] {day:?}: {e}")))?;
            let weather_code = daily.weather_code[i];
            Ok(DailyForecast {
                date,
                max_temp: round_half_up(daily.temperature_2m_max[i]),
                min_temp: round_half_up(daily.temperature_2m_min[i]),
                precipitation: daily.precipitation_sum[i],
                weather_code,
                icon: weather_icon(weather_code).to_string(),
            })
        })
        .collect()
}

fn shape_hourly(hourly: &RawHourly, limit: Option<usize>) -> Result<HourlyData> {
    let n = limit.map_or(hourly.time.len(), |hours| hours.min(hourly.time.len()));

    check_len("hourly.temperature_2m", hourly.temperature_2m.len(), n)?;
    check_len("hourly.relative_humidity_2m", hourly.relative_humidity_2m.len(), n)?;
    check_len("hourly.wind_speed_10m", hourly.wind_speed_10m.len(), n)?;
    if let Some(precipitation) = &hourly.precipitation {
        check_len("hourly.precipitation", precipitation.len(), n)?;
    }

    let times = &hourly.time[..n];
    Ok(HourlyData {
        temperature: series(
            times,
            hourly.temperature_2m[..n].iter().copied().map(round_half_up).collect(),
        ),
        humidity: series(times, hourly.relative_humidity_2m[..n].to_vec()),
        wind_speed: series(times, hourly.wind_speed_10m[..n].to_vec()),
        precipitation: series(
            times,
            hourly
                .precipitation
                .as_ref()
                .map(|p| p[..n].to_vec())
                .unwrap_or_default(),
        ),
    })
}

fn series<T>(times: &[String], values: Vec<T>) -> HourlySeries<T> {
    HourlySeries {
        times: times.to_vec(),
        values,
    }
}

fn check_len(field: &str, actual: usize, needed: usize) -> Result<()> {
    if actual < needed {
        return Err(WeatherError::Shaping(format!(
            "{field} has {actual} entries, expected at least {needed}"
        )));
    }
    Ok(())
}

fn missing(field: &str) -> WeatherError {
    WeatherError::Shaping(format!("missing {field}"))
}
