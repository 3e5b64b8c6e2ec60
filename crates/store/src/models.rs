use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// Sale tracking configuration for one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildTracking {
    pub notification_channel: Option<u64>,
    pub items: BTreeMap<u32, TrackedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub name: String,
    /// Last observed final price, in minor units.
    pub last_price: Option<u32>,
    pub currency: Option<String>,
    /// Minimum discount, in percent, that triggers an alert.
    pub target_discount: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTrack {
    /// URL or search query the audio is resolved from.
    pub locator: String,
    pub title: String,
    pub requested_by: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackQueue {
    pub now_playing: Option<QueuedTrack>,
    /// Changes every time `now_playing` does. Never reused, even across
    /// cleared queues.
    #[serde(default)]
    pub generation: u64,
    pub tracks: VecDeque<QueuedTrack>,
}

/// Result of adding a track to a guild's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueued {
    /// Nothing was playing; the track is now marked as playing and the caller
    /// must start it.
    PlayNow { track: QueuedTrack, generation: u64 },
    /// The track waits behind others. Position is 1-based.
    Queued { position: usize },
}

/// Result of moving past a finished track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The next track is now playing under a new generation.
    Next { track: QueuedTrack, generation: u64 },
    /// The finished track was the last one; the queue is gone.
    Exhausted,
    /// The finished track was already replaced or stopped. Nothing changed.
    Stale,
}
