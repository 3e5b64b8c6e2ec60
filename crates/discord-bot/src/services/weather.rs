use eyre::{Result, WrapErr};
use medley_core::models::weather::CurrentWeather;
use reqwest::StatusCode;

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Current conditions in `city`, or `None` if the city is unknown.
    pub async fn current(&self, city: &str) -> Result<Option<CurrentWeather>> {
        let response = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let weather = response
            .error_for_status()
            .wrap_err("Weather service returned an error")?
            .json::<CurrentWeather>()
            .await
            .wrap_err("Failed to decode weather")?;

        Ok(Some(weather))
    }
}
