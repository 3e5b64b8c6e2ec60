use axum::Router;
use medley_discord_bot::config::{BotConfig, Endpoints, OpenAiConfig, SpotifyConfig};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake provider");
    let addr = listener.local_addr().expect("Fake provider has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake provider crashed");
    });
    format!("http://{}", addr)
}

/// Endpoints pointing every service at `base`.
pub fn endpoints(base: &str) -> Endpoints {
    Endpoints {
        spotify_accounts: base.to_string(),
        spotify_api: format!("{}/v1", base),
        trivia: base.to_string(),
        weather: base.to_string(),
        openai: format!("{}/v1", base),
        steam_store: base.to_string(),
        wiki: format!("{}/wiki", base),
        facts: base.to_string(),
    }
}

pub fn test_config(base: &str) -> BotConfig {
    BotConfig {
        token: "test-token".to_string(),
        application_id: None,
        command_prefix: None,
        test_guild_id: None,
        spotify: Some(SpotifyConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            playlist_id: "playlist".to_string(),
        }),
        openai: Some(OpenAiConfig {
            api_key: "sk-test".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 50,
        }),
        openweather_api_key: Some("weather-key".to_string()),
        steam_country_code: "us".to_string(),
        sale_check_interval_hours: 6,
        endpoints: endpoints(base),
    }
}
