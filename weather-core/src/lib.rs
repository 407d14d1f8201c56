//! Core library for the `cuaca` weather CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather provider abstraction and the wttr.in client
//! - Report rendering from provider payloads
//! - The persisted search history
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod render;

pub use config::{Config, HistoryConfig, ProviderConfig};
pub use error::{ErrorKind, WeatherError};
pub use history::HistoryStore;
pub use model::{CityQuery, CurrentConditions, ForecastDay, Location, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
