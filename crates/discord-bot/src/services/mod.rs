//! Thin clients for the third-party HTTP APIs behind each command.
//!
//! Every client takes its base URL from [`Endpoints`] so it can be pointed at
//! a local server in tests.

pub mod facts;
pub mod openai;
pub mod spotify;
pub mod steam;
pub mod trivia;
pub mod weather;
pub mod wiki;

use std::{sync::Arc, time::Duration};

use eyre::{Result, WrapErr};

use crate::config::{BotConfig, Endpoints};

/// All service clients, shared by the handlers.
pub struct Services {
    pub facts: facts::FactsClient,
    pub wiki: wiki::WikiClient,
    pub trivia: trivia::TriviaClient,
    pub steam: Arc<steam::SteamClient>,
    pub weather: Option<weather::WeatherClient>,
    pub openai: Option<openai::OpenAiClient>,
    pub spotify: Option<spotify::SpotifyClient>,
}

impl Services {
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let http = build_http_client()?;
        Ok(Self::with_client(config, &config.endpoints, http))
    }

    pub fn with_client(config: &BotConfig, endpoints: &Endpoints, http: reqwest::Client) -> Self {
        Self {
            facts: facts::FactsClient::new(http.clone(), &endpoints.facts),
            wiki: wiki::WikiClient::new(http.clone(), &endpoints.wiki),
            trivia: trivia::TriviaClient::new(http.clone(), &endpoints.trivia),
            steam: Arc::new(steam::SteamClient::new(
                http.clone(),
                &endpoints.steam_store,
                &config.steam_country_code,
            )),
            weather: config
                .openweather_api_key
                .as_ref()
                .map(|key| weather::WeatherClient::new(http.clone(), &endpoints.weather, key)),
            openai: config
                .openai
                .clone()
                .map(|openai| openai::OpenAiClient::new(http.clone(), &endpoints.openai, openai)),
            spotify: config.spotify.clone().map(|spotify| {
                spotify::SpotifyClient::new(
                    http.clone(),
                    &endpoints.spotify_accounts,
                    &endpoints.spotify_api,
                    spotify,
                )
            }),
        }
    }
}

pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("medley/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(15))
        .build()
        .wrap_err("Failed to build HTTP client")
}
