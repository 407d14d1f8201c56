use std::{io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use weather_core::{Config, HistoryStore, WeatherProvider, provider_from_config};

use crate::app::{self, MenuApp, QuickApp};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cuaca", version, about = "Cek cuaca kota lewat wttr.in")]
pub struct Cli {
    /// Show debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `menu`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu with search history.
    Menu,

    /// Ask for city names until `keluar`; keeps no history.
    Quick,

    /// Print the report for one city and exit.
    Show {
        /// City or place name.
        city: String,
    },

    /// Edit provider and history settings interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Menu) {
            Command::Menu => {
                let (config, provider) = load_provider()?;
                let history = HistoryStore::load(&config.history.path, config.history.max_entries);
                let mut app = MenuApp::new(
                    provider.as_ref(),
                    history,
                    io::stdin().lock(),
                    io::stdout().lock(),
                );
                app.run().await?;
            }
            Command::Quick => {
                let (_, provider) = load_provider()?;
                let mut app = QuickApp::new(provider.as_ref(), io::stdin().lock(), io::stdout().lock());
                app.run().await?;
            }
            Command::Show { city } => {
                let (_, provider) = load_provider()?;
                app::show_once(provider.as_ref(), &city, io::stdout().lock()).await?;
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn load_provider() -> anyhow::Result<(Config, Box<dyn WeatherProvider>)> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok((config, provider))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let base_url = config.provider.base_url.clone();
    config.provider.base_url = Text::new("Provider base URL:")
        .with_default(&base_url)
        .prompt()
        .context("Failed to read provider base URL")?;

    config.provider.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.provider.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    let history_path = config.history.path.display().to_string();
    config.history.path = PathBuf::from(
        Text::new("History file:")
            .with_default(&history_path)
            .prompt()
            .context("Failed to read history file path")?,
    );

    config.history.max_entries = CustomType::<usize>::new("Maximum history entries:")
        .with_default(config.history.max_entries)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Failed to read history size")?;

    config.validate()?;
    let path = config.save()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}
