use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// A city name as typed by the user, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn parse(input: &str) -> Result<Self> {
        let name = input.trim();
        if name.is_empty() {
            return Err(WeatherError::InvalidInput("city name must not be empty".into()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used in the provider URL path: `&` and `?` would otherwise start
    /// a query string, so they are dropped. Whitespace exposed by the removal
    /// is trimmed again, so `"Bogor &"` becomes `"Bogor"`.
    pub fn sanitized(&self) -> String {
        self.0.replace(['&', '?'], "").trim().to_string()
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current conditions and a short forecast extracted from one provider response.
///
/// Numeric readings stay as the provider formatted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub area_name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: String,
    pub feels_like_c: String,
    pub description: String,
    pub humidity_pct: String,
    pub pressure_mb: String,
    pub wind_speed_kmph: String,
    pub wind_direction: String,
    pub visibility_km: String,
    pub uv_index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub min_temp_c: String,
    pub max_temp_c: String,
    pub description: String,
}
