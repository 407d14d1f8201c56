//! Terminal formatting of weather reports and search history.

use std::fmt;

use serde_json::Value;

use crate::{error::Result, model::WeatherSnapshot, provider::wttr::parse_snapshot};

const WIDTH: usize = 50;

/// Turn a provider payload into the printable report for `city`.
///
/// Fails with `MalformedPayload` when the payload lacks what the report needs;
/// nothing is printed in that case.
pub fn render(payload: &Value, city: &str) -> Result<String> {
    match parse_snapshot(payload) {
        Ok(snapshot) => {
            tracing::debug!(city, area = %snapshot.location.area_name, "rendering report");
            Ok(snapshot.to_string())
        }
        Err(err) => {
            tracing::warn!(city, %err, "cannot render weather report");
            Err(err)
        }
    }
}

/// Numbered listing of past searches, most recent first.
pub fn render_history(entries: &[String]) -> String {
    if entries.is_empty() {
        return "📜 Riwayat Pencarian: Belum ada riwayat".to_string();
    }

    let rule = "=".repeat(WIDTH);
    let mut lines = vec![rule.clone(), "📜 RIWAYAT PENCARIAN".to_string(), rule.clone()];
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(i, city)| format!("{}. 📍 {city}", i + 1)),
    );
    lines.push(rule);
    lines.join("\n")
}

impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(WIDTH);
        let c = &self.current;

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "🌍 CUACA DI {}, {}",
            self.location.area_name.to_uppercase(),
            self.location.country
        )?;
        writeln!(f, "{rule}")?;
        writeln!(f, "🌡️  Suhu Sekarang    : {}°C", c.temperature_c)?;
        writeln!(f, "🤔 Terasa Seperti   : {}°C", c.feels_like_c)?;
        writeln!(f, "☁️  Kondisi          : {}", c.description)?;
        writeln!(f, "💧 Kelembaban       : {}%", c.humidity_pct)?;
        writeln!(f, "📏 Tekanan Udara    : {} mb", c.pressure_mb)?;
        writeln!(
            f,
            "💨 Kecepatan Angin  : {} km/jam ({})",
            c.wind_speed_kmph, c.wind_direction
        )?;
        writeln!(f, "👁️  Jarak Pandang    : {} km", c.visibility_km)?;
        writeln!(f, "☀️  Indeks UV        : {}", c.uv_index)?;
        writeln!(f, "{rule}")?;

        writeln!(f)?;
        writeln!(f, "📅 PRAKIRAAN 3 HARI KE DEPAN:")?;
        writeln!(f, "{}", "-".repeat(WIDTH))?;
        for (i, day) in self.forecast.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Hari {} ({}):", i + 1, day.date)?;
            writeln!(f, "  🌡️  Suhu: {}°C - {}°C", day.min_temp_c, day.max_temp_c)?;
            writeln!(f, "  ☁️  Kondisi: {}", day.description)?;
        }
        writeln!(f)?;
        write!(f, "{rule}")
    }
}
