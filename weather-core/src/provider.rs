use crate::{CityQuery, Config, error::Result, provider::wttr::WttrProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod wttr;

/// Source of raw weather payloads.
///
/// Implementations return the decoded JSON body untouched; turning it into a
/// report is the renderer's job.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &CityQuery) -> Result<serde_json::Value>;
}

/// Construct the provider described by the `[provider]` config section.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = WttrProvider::new(&config.provider.base_url, config.provider.timeout())
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

    Ok(Box::new(provider))
}
