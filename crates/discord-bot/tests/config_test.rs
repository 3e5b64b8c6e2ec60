use std::collections::HashMap;

use medley_discord_bot::config::BotConfig;
use pretty_assertions::assert_eq;

fn load(vars: &[(&str, &str)]) -> eyre::Result<BotConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    BotConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_token_is_required() {
    let err = load(&[]).unwrap_err();
    assert!(err.to_string().contains("DISCORD_TOKEN"));

    // Blank counts as missing
    assert!(load(&[("DISCORD_TOKEN", "  ")]).is_err());
}

#[test]
fn test_defaults() {
    let config = load(&[("DISCORD_TOKEN", "abc")]).unwrap();

    assert_eq!(config.command_prefix(), "!");
    assert_eq!(config.application_id, None);
    assert_eq!(config.steam_country_code, "us");
    assert_eq!(config.sale_check_interval_hours, 6);
    assert_eq!(config.endpoints.wiki, "https://terraria.wiki.gg/wiki");
    assert!(config.spotify.is_none());
    assert!(config.openai.is_none());
    assert!(config.openweather_api_key.is_none());
}

#[test]
fn test_command_prefix_custom() {
    let config = load(&[("DISCORD_TOKEN", "abc"), ("DISCORD_COMMAND_PREFIX", "?")]).unwrap();
    assert_eq!(config.command_prefix(), "?");
}

#[test]
fn test_spotify_needs_every_key() {
    let partial = load(&[
        ("DISCORD_TOKEN", "abc"),
        ("SPOTIFY_CLIENT_ID", "id"),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
    ])
    .unwrap();
    assert!(partial.spotify.is_none());

    let full = load(&[
        ("DISCORD_TOKEN", "abc"),
        ("SPOTIFY_CLIENT_ID", "id"),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
        ("SPOTIFY_REFRESH_TOKEN", "refresh"),
        ("SPOTIFY_PLAYLIST_ID", "playlist"),
    ])
    .unwrap();
    assert_eq!(full.spotify.unwrap().playlist_id, "playlist");
}

#[test]
fn test_openai_settings() {
    let config = load(&[
        ("DISCORD_TOKEN", "abc"),
        ("OPENAI_API_KEY", "sk"),
        ("OPENAI_MODEL", "gpt-4o-mini"),
        ("OPENAI_MAX_TOKENS", "200"),
    ])
    .unwrap();

    let openai = config.openai.unwrap();
    assert_eq!(openai.model, "gpt-4o-mini");
    assert_eq!(openai.max_tokens, 200);
}

#[test]
fn test_invalid_numbers_are_rejected() {
    assert!(load(&[("DISCORD_TOKEN", "abc"), ("DISCORD_APPLICATION_ID", "nope")]).is_err());
    assert!(load(&[("DISCORD_TOKEN", "abc"), ("SALE_CHECK_INTERVAL_HOURS", "0")]).is_err());

    let config = load(&[
        ("DISCORD_TOKEN", "abc"),
        ("DISCORD_APPLICATION_ID", "1234"),
        ("SALE_CHECK_INTERVAL_HOURS", "12"),
    ])
    .unwrap();
    assert_eq!(config.application_id, Some(1234));
    assert_eq!(config.sale_check_interval_hours, 12);
}

#[test]
fn test_wiki_base_url_override() {
    let config = load(&[
        ("DISCORD_TOKEN", "abc"),
        ("WIKI_BASE_URL", "https://minecraft.wiki/w/"),
    ])
    .unwrap();
    assert_eq!(config.endpoints.wiki, "https://minecraft.wiki/w");
}
