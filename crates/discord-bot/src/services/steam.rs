use std::collections::HashMap;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use medley_core::models::sales::{AppDetails, AppDetailsEnvelope};
use mockall::automock;

/// Where sale checks get current prices from.
#[automock]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Store details for one app, or `None` if the store doesn't know it.
    async fn app_details(&self, app_id: u32) -> Result<Option<AppDetails>>;
}

pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
    country_code: String,
}

impl SteamClient {
    pub fn new(http: reqwest::Client, base_url: &str, country_code: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code: country_code.to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for SteamClient {
    async fn app_details(&self, app_id: u32) -> Result<Option<AppDetails>> {
        let mut envelopes = self
            .http
            .get(format!("{}/api/appdetails", self.base_url))
            .query(&[
                ("appids", app_id.to_string()),
                ("cc", self.country_code.clone()),
                ("l", "en".to_string()),
            ])
            .send()
            .await?
            .error_for_status()
            .wrap_err("Store request failed")?
            .json::<HashMap<String, AppDetailsEnvelope>>()
            .await
            .wrap_err("Failed to decode app details")?;

        Ok(envelopes
            .remove(&app_id.to_string())
            .filter(|envelope| envelope.success)
            .and_then(|envelope| envelope.data))
    }
}
