use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{Result, WeatherError},
    model::{CityQuery, CurrentConditions, ForecastDay, Location, WeatherSnapshot},
};

use super::WeatherProvider;

/// Response format requested from wttr.in.
const FORMAT: &str = "j1";
/// Language of the localized `lang_<code>` description fields.
const LANG: &str = "id";
/// Forecast days shown in a report.
pub const FORECAST_DAYS: usize = 3;

/// Client for the wttr.in JSON endpoint (no API key needed).
#[derive(Debug, Clone)]
pub struct WttrProvider {
    base_url: String,
    http: Client,
}

impl WttrProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn location_url(&self, city: &CityQuery) -> Result<String> {
        let name = city.sanitized();
        if name.is_empty() {
            return Err(WeatherError::InvalidInput(format!(
                "'{city}' has no characters left after sanitizing"
            )));
        }
        // The URL parser resolves dot segments, which would leave a bare root
        // path and make the provider guess the location from the caller's IP.
        if name == "." || name == ".." {
            return Err(WeatherError::InvalidInput(format!("'{city}' is not a place name")));
        }
        Ok(format!("{}/{}", self.base_url, name))
    }
}

#[async_trait]
impl WeatherProvider for WttrProvider {
    async fn fetch(&self, city: &CityQuery) -> Result<Value> {
        let url = self.location_url(city)?;
        tracing::debug!(%url, "requesting weather");

        let res = self
            .http
            .get(&url)
            .query(&[("format", FORMAT), ("lang", LANG)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, city = %city, "weather lookup rejected");
            return Err(WeatherError::HttpStatus {
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::malformed(format!("response is not JSON: {e}")))
    }
}

/// Extract a [`WeatherSnapshot`] from a `format=j1` payload.
///
/// Only the first current-condition record, the first nearest-area record and
/// the first [`FORECAST_DAYS`] forecast days are inspected.
pub fn parse_snapshot(payload: &Value) -> Result<WeatherSnapshot> {
    let root = WttrPayload::deserialize(payload)
        .map_err(|e| WeatherError::malformed(format!("unexpected payload shape: {e}")))?;

    let current: WttrCurrent = first_record(root.current_condition, "current_condition")?;
    let area: WttrArea = first_record(root.nearest_area, "nearest_area")?;
    let days = root.weather.ok_or_else(|| WeatherError::malformed("missing `weather` array"))?;

    let forecast = days
        .iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(i, day)| {
            let path = format!("weather[{i}]");
            decode::<WttrDay>(day, &path).and_then(|d| d.into_forecast(&path))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeatherSnapshot {
        location: area.into_location()?,
        current: current.into_conditions()?,
        forecast,
    })
}

fn first_record<T: DeserializeOwned>(records: Option<Vec<Value>>, key: &str) -> Result<T> {
    let records = records.ok_or_else(|| WeatherError::malformed(format!("missing `{key}` array")))?;
    let first = records
        .first()
        .ok_or_else(|| WeatherError::malformed(format!("`{key}` array is empty")))?;

    decode(first, &format!("{key}[0]"))
}

fn decode<T: DeserializeOwned>(value: &Value, path: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| WeatherError::malformed(format!("{path}: {e}")))
}

/// Localized text wins; a missing or empty `lang_id` falls through.
fn pick_description(localized: &[WttrText], fallback: &[WttrText], path: &str) -> Result<String> {
    localized
        .first()
        .or_else(|| fallback.first())
        .map(|t| t.value.clone())
        .ok_or_else(|| WeatherError::malformed(format!("{path}: no weather description")))
}

fn first_text(values: &[WttrText], path: &str) -> Result<String> {
    values
        .first()
        .map(|t| t.value.clone())
        .ok_or_else(|| WeatherError::malformed(format!("{path} is empty")))
}

/// Readings are shown verbatim. wttr.in sends them as strings, but a bare
/// JSON number is accepted and printed as written.
fn display_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    use serde::de::Error as _;

    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected a string or number, got {other}"))),
    }
}

#[derive(Debug, Deserialize)]
struct WttrPayload {
    current_condition: Option<Vec<Value>>,
    nearest_area: Option<Vec<Value>>,
    weather: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct WttrText {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WttrCurrent {
    #[serde(rename = "temp_C", deserialize_with = "display_string")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC", deserialize_with = "display_string")]
    feels_like_c: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<WttrText>,
    #[serde(default)]
    lang_id: Vec<WttrText>,
    #[serde(deserialize_with = "display_string")]
    humidity: String,
    #[serde(deserialize_with = "display_string")]
    pressure: String,
    #[serde(rename = "windspeedKmph", deserialize_with = "display_string")]
    windspeed_kmph: String,
    #[serde(rename = "winddir16Point")]
    winddir_16_point: String,
    #[serde(deserialize_with = "display_string")]
    visibility: String,
    #[serde(rename = "uvIndex", deserialize_with = "display_string")]
    uv_index: String,
}

impl WttrCurrent {
    fn into_conditions(self) -> Result<CurrentConditions> {
        let description =
            pick_description(&self.lang_id, &self.weather_desc, "current_condition[0]")?;

        Ok(CurrentConditions {
            temperature_c: self.temp_c,
            feels_like_c: self.feels_like_c,
            description,
            humidity_pct: self.humidity,
            pressure_mb: self.pressure,
            wind_speed_kmph: self.windspeed_kmph,
            wind_direction: self.winddir_16_point,
            visibility_km: self.visibility,
            uv_index: self.uv_index,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WttrArea {
    #[serde(rename = "areaName")]
    area_name: Vec<WttrText>,
    country: Vec<WttrText>,
}

impl WttrArea {
    fn into_location(self) -> Result<Location> {
        Ok(Location {
            area_name: first_text(&self.area_name, "nearest_area[0].areaName")?,
            country: first_text(&self.country, "nearest_area[0].country")?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WttrHourly {
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<WttrText>,
}

#[derive(Debug, Deserialize)]
struct WttrDay {
    date: String,
    #[serde(rename = "maxtempC", deserialize_with = "display_string")]
    max_temp_c: String,
    #[serde(rename = "mintempC", deserialize_with = "display_string")]
    min_temp_c: String,
    #[serde(default)]
    lang_id: Vec<WttrText>,
    #[serde(default)]
    hourly: Vec<WttrHourly>,
}

impl WttrDay {
    fn into_forecast(self, path: &str) -> Result<ForecastDay> {
        let hourly_desc = self
            .hourly
            .first()
            .map(|h| h.weather_desc.as_slice())
            .unwrap_or_default();
        let description = pick_description(&self.lang_id, hourly_desc, path)?;

        Ok(ForecastDay {
            date: self.date,
            min_temp_c: self.min_temp_c,
            max_temp_c: self.max_temp_c,
            description,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
