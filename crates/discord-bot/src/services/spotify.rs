use chrono::{DateTime, Duration, Utc};
use eyre::{Result, WrapErr};
use medley_core::models::spotify::{
    AddTracksRequest, Paging, PlaylistItem, SearchResponse, SnapshotResponse, TokenResponse, Track,
    parse_track_url, track_uri,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::SpotifyConfig;

/// Outcome of `/add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Track),
    AlreadyPresent,
    NotFound,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Client for the playlist service.
///
/// Authenticates with the refresh token from the configuration and caches
/// the resulting access token until shortly before it expires.
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
    config: SpotifyConfig,
    token: RwLock<Option<CachedToken>>,
}

fn fresh_token(cached: Option<&CachedToken>) -> Option<String> {
    cached
        .filter(|token| token.expires_at > Utc::now() + Duration::seconds(60))
        .map(|token| token.access_token.clone())
}

impl SpotifyClient {
    pub fn new(
        http: reqwest::Client,
        accounts_url: &str,
        api_url: &str,
        config: SpotifyConfig,
    ) -> Self {
        Self {
            http,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            config,
            token: RwLock::new(None),
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.config.playlist_id
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = fresh_token(self.token.read().await.as_ref()) {
            return Ok(token);
        }

        let mut cached = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = fresh_token(cached.as_ref()) {
            return Ok(token);
        }

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()
            .wrap_err("Token refresh failed")?
            .json::<TokenResponse>()
            .await
            .wrap_err("Failed to decode token response")?;

        info!("Refreshed Spotify access token");
        let access_token = response.access_token.clone();
        *cached = Some(CachedToken {
            access_token: response.access_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in as i64),
        });

        Ok(access_token)
    }

    pub async fn search_track(&self, query: &str) -> Result<Option<Track>> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()
            .wrap_err("Track search failed")?
            .json::<SearchResponse>()
            .await
            .wrap_err("Failed to decode search results")?;

        Ok(response.tracks.items.into_iter().next())
    }

    pub async fn track(&self, track_id: &str) -> Result<Track> {
        let token = self.access_token().await?;
        self.http
            .get(format!("{}/tracks/{}", self.api_url, track_id))
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()
            .wrap_err("Track lookup failed")?
            .json::<Track>()
            .await
            .wrap_err("Failed to decode track")
    }

    /// Walk every page of the playlist looking for `track_id`.
    pub async fn playlist_contains(&self, playlist_id: &str, track_id: &str) -> Result<bool> {
        let token = self.access_token().await?;
        let mut next = Some(format!(
            "{}/playlists/{}/tracks?fields=items(track(id)),next&limit=100",
            self.api_url, playlist_id
        ));

        while let Some(url) = next {
            let page = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await?
                .error_for_status()
                .wrap_err("Playlist lookup failed")?
                .json::<Paging<PlaylistItem>>()
                .await
                .wrap_err("Failed to decode playlist page")?;

            let found = page.items.iter().any(|item| {
                item.track
                    .as_ref()
                    .and_then(|track| track.id.as_deref())
                    == Some(track_id)
            });
            if found {
                return Ok(true);
            }
            next = page.next;
        }

        Ok(false)
    }

    pub async fn add_to_playlist(&self, playlist_id: &str, uri: &str) -> Result<String> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}/playlists/{}/tracks", self.api_url, playlist_id))
            .bearer_auth(token)
            .json(&AddTracksRequest {
                uris: vec![uri.to_string()],
            })
            .send()
            .await?
            .error_for_status()
            .wrap_err("Adding to playlist failed")?
            .json::<SnapshotResponse>()
            .await
            .wrap_err("Failed to decode playlist snapshot")?;

        Ok(response.snapshot_id)
    }

    /// Resolve `input` (a track link or a search query) and add it to the
    /// configured playlist unless it is already there.
    pub async fn add_track(&self, input: &str) -> Result<AddOutcome> {
        let track_id = match parse_track_url(input) {
            Some(id) => id,
            None => match self.search_track(input).await? {
                Some(track) => track.id,
                None => return Ok(AddOutcome::NotFound),
            },
        };

        let playlist_id = self.config.playlist_id.clone();
        if self.playlist_contains(&playlist_id, &track_id).await? {
            debug!(%track_id, "Track already in playlist");
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.add_to_playlist(&playlist_id, &track_uri(&track_id))
            .await?;
        let track = self.track(&track_id).await?;
        info!(track = %track.name, "Added track to playlist");

        Ok(AddOutcome::Added(track))
    }
}
