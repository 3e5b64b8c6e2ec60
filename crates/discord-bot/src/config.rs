use eyre::{Result, eyre};
use std::env;

/// Configuration for the Discord bot.
///
/// Only the Discord token is mandatory. Each third-party integration is
/// enabled by its own credentials; when they are missing the matching
/// commands reply that the feature is not configured.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Application ID for Discord bot
    pub application_id: Option<u64>,
    /// Prefix for text commands (defaults to "!")
    pub command_prefix: Option<String>,
    /// Test guild ID for faster command registration during development
    pub test_guild_id: Option<u64>,
    /// Playlist integration
    pub spotify: Option<SpotifyConfig>,
    /// Chat completion integration
    pub openai: Option<OpenAiConfig>,
    /// API key for the weather service
    pub openweather_api_key: Option<String>,
    /// Country code used for storefront prices
    pub steam_country_code: String,
    /// Hours between two sale checks
    pub sale_check_interval_hours: u64,
    /// Base URLs of the third-party services
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Long-lived token obtained once through the OAuth consent flow
    pub refresh_token: String,
    pub playlist_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub spotify_accounts: String,
    pub spotify_api: String,
    pub trivia: String,
    pub weather: String,
    pub openai: String,
    pub steam_store: String,
    pub wiki: String,
    pub facts: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            spotify_accounts: "https://accounts.spotify.com".to_string(),
            spotify_api: "https://api.spotify.com/v1".to_string(),
            trivia: "https://opentdb.com".to_string(),
            weather: "https://api.openweathermap.org/data/2.5".to_string(),
            openai: "https://api.openai.com/v1".to_string(),
            steam_store: "https://store.steampowered.com".to_string(),
            wiki: "https://terraria.wiki.gg/wiki".to_string(),
            facts: "https://uselessfacts.jsph.pl".to_string(),
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = var("DISCORD_TOKEN")
            .ok_or_else(|| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = var("DISCORD_APPLICATION_ID")
            .map(|id| {
                id.parse::<u64>()
                    .map_err(|_| eyre!("DISCORD_APPLICATION_ID must be a valid u64"))
            })
            .transpose()?;

        let command_prefix = var("DISCORD_COMMAND_PREFIX");

        // Optional test guild ID for development
        let test_guild_id = var("DISCORD_TEST_GUILD_ID").and_then(|id| id.parse::<u64>().ok());

        let spotify = match (
            var("SPOTIFY_CLIENT_ID"),
            var("SPOTIFY_CLIENT_SECRET"),
            var("SPOTIFY_REFRESH_TOKEN"),
            var("SPOTIFY_PLAYLIST_ID"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token), Some(playlist_id)) => {
                Some(SpotifyConfig {
                    client_id,
                    client_secret,
                    refresh_token,
                    playlist_id,
                })
            }
            _ => None,
        };

        let openai = var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            max_tokens: var("OPENAI_MAX_TOKENS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(50),
        });

        let openweather_api_key = var("OPENWEATHER_API_KEY");

        let steam_country_code = var("STEAM_COUNTRY_CODE").unwrap_or_else(|| "us".to_string());

        let sale_check_interval_hours = var("SALE_CHECK_INTERVAL_HOURS")
            .map(|hours| {
                hours
                    .parse::<u64>()
                    .ok()
                    .filter(|hours| *hours > 0)
                    .ok_or_else(|| eyre!("SALE_CHECK_INTERVAL_HOURS must be a positive integer"))
            })
            .transpose()?
            .unwrap_or(6);

        let mut endpoints = Endpoints::default();
        if let Some(wiki) = var("WIKI_BASE_URL") {
            endpoints.wiki = wiki.trim_end_matches('/').to_string();
        }

        Ok(Self {
            token,
            application_id,
            command_prefix,
            test_guild_id,
            spotify,
            openai,
            openweather_api_key,
            steam_country_code,
            sale_check_interval_hours,
            endpoints,
        })
    }

    /// Get the command prefix (defaults to "!" if not set)
    pub fn command_prefix(&self) -> &str {
        self.command_prefix.as_deref().unwrap_or("!")
    }
}
