use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Advance, Enqueued, PlaybackQueue, QueuedTrack};

// Playback Queue Repository

#[derive(Debug, Clone, Default)]
pub struct QueueRepository {
    queues: Arc<RwLock<HashMap<u64, PlaybackQueue>>>,
    generations: Arc<AtomicU64>,
}

impl QueueRepository {
    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Add a track to the back of the queue, or to the front when `next` is set.
    ///
    /// If nothing is playing the track skips the queue entirely and becomes
    /// the current track. The check and the update happen under one lock, so
    /// two concurrent requests can never both be told to start playback.
    pub async fn enqueue(&self, guild_id: u64, track: QueuedTrack, next: bool) -> Enqueued {
        let mut queues = self.queues.write().await;
        let queue = queues.entry(guild_id).or_default();

        if queue.now_playing.is_none() && queue.tracks.is_empty() {
            let generation = self.next_generation();
            queue.now_playing = Some(track.clone());
            queue.generation = generation;
            return Enqueued::PlayNow { track, generation };
        }

        if next {
            queue.tracks.push_front(track);
            Enqueued::Queued { position: 1 }
        } else {
            queue.tracks.push_back(track);
            Enqueued::Queued {
                position: queue.tracks.len(),
            }
        }
    }

    /// Move past the track playing under `finished`.
    ///
    /// End notifications can arrive late, e.g. after `/stop` and a fresh
    /// `/play`. Those carry an old generation and leave the queue untouched.
    pub async fn advance(&self, guild_id: u64, finished: u64) -> Advance {
        let mut queues = self.queues.write().await;
        let Some(queue) = queues.get_mut(&guild_id) else {
            return Advance::Stale;
        };
        if queue.generation != finished {
            return Advance::Stale;
        }

        match queue.tracks.pop_front() {
            Some(track) => {
                let generation = self.next_generation();
                queue.now_playing = Some(track.clone());
                queue.generation = generation;
                Advance::Next { track, generation }
            }
            None => {
                queues.remove(&guild_id);
                debug!(guild_id, "Playback queue exhausted");
                Advance::Exhausted
            }
        }
    }

    /// Replace the current track's title once the real one is known.
    pub async fn set_now_playing_title(&self, guild_id: u64, title: &str) {
        let mut queues = self.queues.write().await;
        if let Some(current) = queues
            .get_mut(&guild_id)
            .and_then(|queue| queue.now_playing.as_mut())
        {
            current.title = title.to_string();
        }
    }

    pub async fn snapshot(&self, guild_id: u64) -> PlaybackQueue {
        self.queues
            .read()
            .await
            .get(&guild_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop the guild's queue, returning how many waiting tracks were discarded.
    pub async fn clear(&self, guild_id: u64) -> usize {
        self.queues
            .write()
            .await
            .remove(&guild_id)
            .map(|queue| queue.tracks.len())
            .unwrap_or(0)
    }
}
