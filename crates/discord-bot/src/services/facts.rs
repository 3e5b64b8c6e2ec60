use eyre::{Result, WrapErr};
use medley_core::models::facts::RandomFact;

pub struct FactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl FactsClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn random_fact(&self) -> Result<RandomFact> {
        self.http
            .get(format!("{}/api/v2/facts/random", self.base_url))
            .query(&[("language", "en")])
            .send()
            .await?
            .error_for_status()
            .wrap_err("Facts service returned an error")?
            .json::<RandomFact>()
            .await
            .wrap_err("Failed to decode fact")
    }
}
