//! Voice playback on top of songbird.
//!
//! The queue itself lives in `medley-store`; this module owns the songbird
//! track handles and chains tracks together through an end-of-track event.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use medley_store::{
    models::{Advance, Enqueued, PlaybackQueue, QueuedTrack},
    repositories::queue::QueueRepository,
};
use serenity::model::id::{ChannelId, GuildId};
use songbird::{
    Event, EventContext, EventHandler as VoiceEventHandler, Songbird, TrackEvent,
    input::{Input, ytdl, ytdl_search},
    tracks::TrackHandle,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct Player {
    queues: QueueRepository,
    /// Current track per guild, tagged with its playback generation.
    handles: Arc<RwLock<HashMap<u64, (u64, TrackHandle)>>>,
}

/// What `/play` did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Started { title: String },
    Queued { position: usize },
}

impl Player {
    pub fn new(queues: QueueRepository) -> Self {
        Self {
            queues,
            handles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn join(&self, manager: &Arc<Songbird>, guild_id: u64, channel_id: u64) -> Result<()> {
        let (_call, joined) = manager.join(GuildId(guild_id), ChannelId(channel_id)).await;
        joined.wrap_err("Failed to join voice channel")?;
        debug!(guild_id, channel_id, "Joined voice channel");
        Ok(())
    }

    /// Queue a request and start it right away if the guild is idle.
    pub async fn play(
        &self,
        manager: Arc<Songbird>,
        guild_id: u64,
        track: QueuedTrack,
        next: bool,
    ) -> Result<PlayOutcome> {
        match self.queues.enqueue(guild_id, track, next).await {
            Enqueued::Queued { position } => Ok(PlayOutcome::Queued { position }),
            Enqueued::PlayNow { track, generation } => match self
                .start_track(&manager, guild_id, &track, generation)
                .await
            {
                Ok(title) => Ok(PlayOutcome::Started { title }),
                Err(e) => {
                    // Leave the queue in a playable state before reporting.
                    if let Err(next_err) = self.play_next(manager, guild_id, generation).await {
                        warn!("Failed to continue playback: {:?}", next_err);
                    }
                    Err(e)
                }
            },
        }
    }

    /// Move on from the track played under `finished`, skipping entries that
    /// fail to resolve.
    ///
    /// Returns the title of the started track, or `None` once the queue is
    /// empty or `finished` was already superseded.
    pub async fn play_next(
        &self,
        manager: Arc<Songbird>,
        guild_id: u64,
        finished: u64,
    ) -> Result<Option<String>> {
        let mut finished = finished;
        loop {
            match self.queues.advance(guild_id, finished).await {
                Advance::Next { track, generation } => {
                    match self.start_track(&manager, guild_id, &track, generation).await {
                        Ok(title) => return Ok(Some(title)),
                        Err(e) => {
                            warn!(locator = %track.locator, "Skipping unplayable track: {:?}", e);
                            finished = generation;
                        }
                    }
                }
                Advance::Exhausted => {
                    let mut handles = self.handles.write().await;
                    if handles.get(&guild_id).is_some_and(|(current, _)| *current == finished) {
                        handles.remove(&guild_id);
                    }
                    info!(guild_id, "Playback finished");
                    return Ok(None);
                }
                Advance::Stale => {
                    debug!(guild_id, finished, "Ignoring end of a replaced track");
                    return Ok(None);
                }
            }
        }
    }

    /// Stop the current track. The end-of-track event moves on to the next one.
    pub async fn skip(&self, guild_id: u64) -> Result<bool> {
        let handles = self.handles.read().await;
        match handles.get(&guild_id) {
            Some((_, handle)) => {
                handle.stop().wrap_err("Failed to stop track")?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear the queue, stop playback and leave the voice channel.
    pub async fn stop(&self, manager: &Arc<Songbird>, guild_id: u64) -> Result<usize> {
        let discarded = self.queues.clear(guild_id).await;

        if let Some((_, handle)) = self.handles.write().await.remove(&guild_id) {
            if let Err(e) = handle.stop() {
                debug!("Track already finished: {:?}", e);
            }
        }

        if manager.get(GuildId(guild_id)).is_some() {
            manager
                .remove(GuildId(guild_id))
                .await
                .wrap_err("Failed to leave voice channel")?;
        }

        Ok(discarded)
    }

    pub async fn queue(&self, guild_id: u64) -> PlaybackQueue {
        self.queues.snapshot(guild_id).await
    }

    async fn start_track(
        &self,
        manager: &Arc<Songbird>,
        guild_id: u64,
        track: &QueuedTrack,
        generation: u64,
    ) -> Result<String> {
        let call = manager
            .get(GuildId(guild_id))
            .ok_or_else(|| eyre!("Not connected to a voice channel"))?;

        let source = resolve(&track.locator).await?;
        let title = source
            .metadata
            .title
            .clone()
            .unwrap_or_else(|| track.title.clone());

        let handle = {
            let mut call = call.lock().await;
            call.play_source(source)
        };
        handle
            .add_event(
                Event::Track(TrackEvent::End),
                TrackEndNotifier {
                    player: self.clone(),
                    manager: manager.clone(),
                    guild_id,
                    generation,
                },
            )
            .wrap_err("Failed to watch track end")?;

        self.queues.set_now_playing_title(guild_id, &title).await;
        self.handles.write().await.insert(guild_id, (generation, handle));
        info!(guild_id, %title, "Now playing");

        Ok(title)
    }
}

async fn resolve(locator: &str) -> Result<Input> {
    let source = if is_url(locator) {
        ytdl(locator).await
    } else {
        ytdl_search(locator).await
    };
    source.map_err(|e| eyre!("Could not load audio for {}: {:?}", locator, e))
}

pub fn is_url(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

struct TrackEndNotifier {
    player: Player,
    manager: Arc<Songbird>,
    guild_id: u64,
    generation: u64,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        if let Err(e) = self
            .player
            .play_next(self.manager.clone(), self.guild_id, self.generation)
            .await
        {
            error!(guild_id = self.guild_id, "Failed to start next track: {:?}", e);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_played_directly() {
        assert!(is_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_url("never gonna give you up"));
    }
}
