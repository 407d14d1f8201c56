//! The two interactive front ends: the menu with history and the quick
//! loop without it. Both read from any `BufRead` and write to any `Write`.

use std::io::{self, BufRead, Write};

use weather_core::{CityQuery, ErrorKind, HistoryStore, WeatherProvider, render};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";
const EXIT_KEYWORD: &str = "keluar";

struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, msg: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", msg.as_ref())
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, msg: &str) -> io::Result<Option<String>> {
        write!(self.output, "{msg}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn welcome(&mut self) -> io::Result<()> {
        self.say("🌦️  SELAMAT DATANG DI APLIKASI CEK CUACA 🌦️")?;
        self.say(RULE)?;
        self.say("✨ Tanpa API Key - Langsung Bisa Dipakai!")?;
        self.say(RULE)
    }

    fn farewell(&mut self) -> io::Result<()> {
        self.say("\n👋 Terima kasih telah menggunakan aplikasi ini!")
    }

    /// Fetch and print the report for `city`. Returns whether a report was shown.
    async fn lookup(&mut self, provider: &dyn WeatherProvider, city: &str) -> io::Result<bool> {
        let query = match CityQuery::parse(city) {
            Ok(query) => query,
            Err(_) => {
                self.say("❌ Nama kota tidak boleh kosong!")?;
                return Ok(false);
            }
        };

        self.say(format!("\n🔍 Mencari data cuaca untuk {query}..."))?;

        let payload = match provider.fetch(&query).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::info!(city = %query, %err, "lookup failed");
                match err.kind() {
                    ErrorKind::InvalidInput => {
                        self.say(format!("❌ Nama kota tidak valid: {err}"))?;
                    }
                    ErrorKind::MalformedPayload => {
                        self.say(format!("❌ Error saat memproses data: {err}"))?;
                    }
                    ErrorKind::Network | ErrorKind::Persistence => {
                        self.say(format!("❌ Error saat mengambil data: {err}"))?;
                        self.say(format!(
                            "❌ Tidak bisa mengambil data untuk '{query}'. Coba lagi!"
                        ))?;
                    }
                }
                return Ok(false);
            }
        };

        match render::render(&payload, query.as_str()) {
            Ok(report) => {
                self.say(format!("\n{report}\n"))?;
                Ok(true)
            }
            Err(err) => {
                self.say(format!("❌ Error saat memproses data: {err}"))?;
                Ok(false)
            }
        }
    }
}

/// Menu-driven variant: search, browse and re-search history, clear history.
pub struct MenuApp<'a, R, W> {
    provider: &'a dyn WeatherProvider,
    history: HistoryStore,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> MenuApp<'a, R, W> {
    pub fn new(provider: &'a dyn WeatherProvider, history: HistoryStore, input: R, output: W) -> Self {
        Self {
            provider,
            history,
            console: Console { input, output },
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        self.console.welcome()?;

        loop {
            self.show_menu()?;
            let Some(choice) = self.console.prompt("Pilih menu (1-4): ")? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    let Some(city) = self.console.prompt("\n🏙️  Masukkan nama kota: ")? else {
                        break;
                    };
                    if city.is_empty() {
                        self.console.say("❌ Nama kota tidak boleh kosong!")?;
                        continue;
                    }
                    self.search(&city).await?;
                }
                "2" => {
                    if !self.browse_history().await? {
                        break;
                    }
                }
                "3" => {
                    if !self.clear_history()? {
                        break;
                    }
                }
                "4" => break,
                other => {
                    tracing::debug!(choice = other, "invalid menu choice");
                    self.console.say("❌ Pilihan tidak valid! Silakan pilih 1-4.")?;
                }
            }
        }

        self.console.farewell()
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.console.say(format!("\n{THIN_RULE}"))?;
        self.console.say("MENU:")?;
        self.console.say("1. 🔍 Cari cuaca kota")?;
        self.console.say("2. 📜 Lihat riwayat pencarian")?;
        self.console.say("3. 🗑️  Hapus riwayat")?;
        self.console.say("4. 🚪 Keluar")?;
        self.console.say(THIN_RULE)
    }

    async fn search(&mut self, city: &str) -> io::Result<()> {
        if !self.console.lookup(self.provider, city).await? {
            return Ok(());
        }

        match self.history.record(city.trim()) {
            Ok(()) => self.console.say("✅ Kota telah ditambahkan ke riwayat!"),
            Err(err) => self
                .console
                .say(format!("⚠️  Error saat simpan riwayat: {err}")),
        }
    }

    /// Returns `false` when input ran out.
    async fn browse_history(&mut self) -> io::Result<bool> {
        self.console
            .say(format!("\n{}", render::render_history(self.history.list())))?;
        if self.history.is_empty() {
            return Ok(true);
        }

        let Some(answer) = self
            .console
            .prompt("\nIngin mencari cuaca dari riwayat? (ketik nomor atau 'tidak'): ")?
        else {
            return Ok(false);
        };

        if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
            return Ok(true);
        }

        let city = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.history.get(idx))
            .map(str::to_string);

        match city {
            Some(city) => self.search(&city).await?,
            None => self.console.say("❌ Nomor tidak valid!")?,
        }
        Ok(true)
    }

    /// Returns `false` when input ran out.
    fn clear_history(&mut self) -> io::Result<bool> {
        if self.history.is_empty() {
            self.console
                .say("\n📜 Riwayat kosong, tidak ada yang perlu dihapus.")?;
            return Ok(true);
        }

        let Some(answer) = self
            .console
            .prompt("Yakin ingin menghapus semua riwayat? (ya/tidak): ")?
        else {
            return Ok(false);
        };

        if answer.to_lowercase() != "ya" {
            self.console.say("Riwayat tidak dihapus.")?;
            return Ok(true);
        }

        match self.history.clear() {
            Ok(()) => self.console.say("\n✅ Riwayat pencarian berhasil dihapus!")?,
            Err(err) => self
                .console
                .say(format!("⚠️  Error saat simpan riwayat: {err}"))?,
        }
        Ok(true)
    }
}

/// History-free variant: ask for cities until `keluar`.
pub struct QuickApp<'a, R, W> {
    provider: &'a dyn WeatherProvider,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> QuickApp<'a, R, W> {
    pub fn new(provider: &'a dyn WeatherProvider, input: R, output: W) -> Self {
        Self {
            provider,
            console: Console { input, output },
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        self.console.welcome()?;

        while let Some(city) = self
            .console
            .prompt("\n🏙️  Masukkan nama kota (atau 'keluar' untuk berhenti): ")?
        {
            if city.to_lowercase() == EXIT_KEYWORD {
                break;
            }
            if city.is_empty() {
                self.console.say("❌ Nama kota tidak boleh kosong!")?;
                continue;
            }
            self.console.lookup(self.provider, &city).await?;
        }

        self.console.farewell()
    }
}

/// Print a single report and stop.
pub async fn show_once<W: Write>(
    provider: &dyn WeatherProvider,
    city: &str,
    mut output: W,
) -> anyhow::Result<()> {
    let query = CityQuery::parse(city)?;
    let payload = provider.fetch(&query).await?;
    let report = render::render(&payload, query.as_str())?;
    writeln!(output, "{report}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::{collections::HashMap, sync::Mutex};
    use weather_core::WeatherError;

    #[derive(Debug, Default)]
    struct StubProvider {
        payloads: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn with(cities: &[(&str, Value)]) -> Self {
            Self {
                payloads: cities
                    .iter()
                    .map(|(c, v)| (c.to_lowercase(), v.clone()))
                    .collect(),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch(&self, city: &CityQuery) -> weather_core::error::Result<Value> {
            self.calls.lock().unwrap().push(city.to_string());
            if city.sanitized().is_empty() {
                return Err(WeatherError::InvalidInput(format!("'{city}' is not a place name")));
            }
            if city.as_str() == "Rusak" {
                return Err(WeatherError::MalformedPayload("response is not JSON".into()));
            }
            self.payloads
                .get(&city.as_str().to_lowercase())
                .cloned()
                .ok_or_else(|| WeatherError::HttpStatus {
                    status: reqwest::StatusCode::NOT_FOUND,
                    body: "Unknown location".into(),
                })
        }
    }

    fn payload(area: &str) -> Value {
        json!({
            "current_condition": [{
                "temp_C": "28", "FeelsLikeC": "30", "humidity": "80", "pressure": "1010",
                "windspeedKmph": "9", "winddir16Point": "SW", "visibility": "10", "uvIndex": "5",
                "weatherDesc": [{ "value": "Partly cloudy" }],
                "lang_id": [{ "value": "Cerah berawan" }]
            }],
            "nearest_area": [{
                "areaName": [{ "value": area }],
                "country": [{ "value": "Indonesia" }]
            }],
            "weather": [{
                "date": "2024-05-01", "maxtempC": "31", "mintempC": "24",
                "hourly": [{ "weatherDesc": [{ "value": "Light rain" }] }]
            }]
        })
    }

    async fn run_menu(provider: &StubProvider, history: HistoryStore, script: &str) -> String {
        let mut out = Vec::new();
        MenuApp::new(provider, history, script.as_bytes(), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    async fn run_quick(provider: &StubProvider, script: &str) -> String {
        let mut out = Vec::new();
        QuickApp::new(provider, script.as_bytes(), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn history_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("riwayat.json")
    }

    #[tokio::test]
    async fn menu_search_renders_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::with(&[("Bandung", payload("Bandung"))]);

        let out = run_menu(
            &provider,
            HistoryStore::new(history_file(&dir), 8),
            "1\n  Bandung  \n4\n",
        )
        .await;

        assert!(out.contains("🌍 CUACA DI BANDUNG, Indonesia"));
        assert!(out.contains("Kondisi          : Cerah berawan"));
        assert!(out.contains("  ☁️  Kondisi: Light rain"));
        assert!(out.contains("✅ Kota telah ditambahkan ke riwayat!"));
        assert!(out.ends_with("👋 Terima kasih telah menggunakan aplikasi ini!\n"));
        assert_eq!(provider.calls(), ["Bandung"]);

        let reloaded = HistoryStore::load(history_file(&dir), 8);
        assert_eq!(reloaded.list(), ["Bandung"]);
    }

    #[tokio::test]
    async fn failed_lookup_is_reported_and_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::default();

        let out = run_menu(
            &provider,
            HistoryStore::new(history_file(&dir), 8),
            "1\nAtlantis\n4\n",
        )
        .await;

        assert!(out.contains("❌ Tidak bisa mengambil data untuk 'Atlantis'. Coba lagi!"));
        assert!(!out.contains("ditambahkan ke riwayat"));
        assert!(!history_file(&dir).exists());
    }

    #[tokio::test]
    async fn malformed_payload_is_reported_and_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::with(&[("Kosong", json!({ "nearest_area": [] }))]);

        let out = run_menu(
            &provider,
            HistoryStore::new(history_file(&dir), 8),
            "1\nKosong\n4\n",
        )
        .await;

        assert!(out.contains("❌ Error saat memproses data: Malformed weather payload"));
        assert!(HistoryStore::load(history_file(&dir), 8).is_empty());
    }

    #[tokio::test]
    async fn fetch_errors_are_worded_by_kind() {
        let provider = StubProvider::default();

        let out = run_quick(&provider, "&?\nRusak\nkeluar\n").await;

        assert!(out.contains("❌ Nama kota tidak valid: Invalid input: '&?' is not a place name"));
        assert!(out.contains("❌ Error saat memproses data: Malformed weather payload"));
        assert!(!out.contains("Error saat mengambil data"));
        assert!(!out.contains("Coba lagi!"));
        assert_eq!(provider.calls(), ["&?", "Rusak"]);
    }

    #[tokio::test]
    async fn empty_city_and_bad_choice_reprompt() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::default();

        let out = run_menu(
            &provider,
            HistoryStore::new(history_file(&dir), 8),
            "1\n   \n9\n4\n",
        )
        .await;

        assert!(out.contains("❌ Nama kota tidak boleh kosong!"));
        assert!(out.contains("❌ Pilihan tidak valid! Silakan pilih 1-4."));
        assert_eq!(out.matches("MENU:").count(), 3);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn history_research_by_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::new(history_file(&dir), 8);
        history.record("Medan").unwrap();
        history.record("Padang").unwrap();
        let provider = StubProvider::with(&[("Medan", payload("Medan"))]);

        let out = run_menu(&provider, history, "2\n2\n4\n").await;

        assert!(out.contains("1. 📍 Padang"));
        assert!(out.contains("2. 📍 Medan"));
        assert!(out.contains("🌍 CUACA DI MEDAN, Indonesia"));
        assert_eq!(provider.calls(), ["Medan"]);
        assert_eq!(
            HistoryStore::load(history_file(&dir), 8).list(),
            ["Medan", "Padang"]
        );
    }

    #[tokio::test]
    async fn history_out_of_range_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::new(history_file(&dir), 8);
        history.record("Medan").unwrap();
        let provider = StubProvider::default();

        let out = run_menu(&provider, history, "2\n0\n2\n5\n2\ntidak\n4\n").await;

        assert_eq!(out.matches("❌ Nomor tidak valid!").count(), 2);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_history_view() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::default();

        let out = run_menu(&provider, HistoryStore::new(history_file(&dir), 8), "2\n4\n").await;
        assert!(out.contains("📜 Riwayat Pencarian: Belum ada riwayat"));
        assert!(!out.contains("Ingin mencari cuaca dari riwayat?"));
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::new(history_file(&dir), 8);
        history.record("Ambon").unwrap();
        let provider = StubProvider::default();

        let out = run_menu(&provider, history, "3\ntidak\n3\nYA\n3\n4\n").await;

        assert!(out.contains("Riwayat tidak dihapus."));
        assert!(out.contains("✅ Riwayat pencarian berhasil dihapus!"));
        assert!(out.contains("📜 Riwayat kosong, tidak ada yang perlu dihapus."));
        assert!(HistoryStore::load(history_file(&dir), 8).is_empty());
    }

    #[tokio::test]
    async fn eof_ends_menu_with_farewell() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StubProvider::default();

        let out = run_menu(&provider, HistoryStore::new(history_file(&dir), 8), "1\n").await;
        assert!(out.ends_with("👋 Terima kasih telah menggunakan aplikasi ini!\n"));
    }

    #[tokio::test]
    async fn quick_loop_until_exit_keyword() {
        let provider = StubProvider::with(&[("Manado", payload("Manado"))]);

        let out = run_quick(&provider, "\nManado\nAtlantis\nKELUAR\nBali\n").await;

        assert!(out.contains("❌ Nama kota tidak boleh kosong!"));
        assert!(out.contains("🌍 CUACA DI MANADO, Indonesia"));
        assert!(out.contains("❌ Tidak bisa mengambil data untuk 'Atlantis'. Coba lagi!"));
        assert!(!out.contains("riwayat!"));
        assert_eq!(provider.calls(), ["Manado", "Atlantis"]);
        assert!(out.ends_with("👋 Terima kasih telah menggunakan aplikasi ini!\n"));
    }

    #[tokio::test]
    async fn show_once_prints_report_or_fails() {
        let provider = StubProvider::with(&[("Kupang", payload("Kupang"))]);

        let mut out = Vec::new();
        show_once(&provider, "Kupang", &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("CUACA DI KUPANG"));

        let err = show_once(&provider, "Atlantis", Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("404"));

        assert!(show_once(&provider, "  ", Vec::new()).await.is_err());
    }
}
