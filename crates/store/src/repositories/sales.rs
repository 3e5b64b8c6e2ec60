use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{GuildTracking, TrackedItem};

// Sale Tracking Repository

#[derive(Debug, Clone, Default)]
pub struct SalesRepository {
    guilds: Arc<RwLock<HashMap<u64, GuildTracking>>>,
}

impl SalesRepository {
    pub async fn set_notification_channel(&self, guild_id: u64, channel_id: u64) {
        let mut guilds = self.guilds.write().await;
        guilds.entry(guild_id).or_default().notification_channel = Some(channel_id);
        debug!(guild_id, channel_id, "Sale notification channel set");
    }

    /// Start tracking an item, replacing any previous entry for the same app.
    ///
    /// Returns `true` when the item was not tracked before.
    pub async fn track_item(&self, guild_id: u64, app_id: u32, item: TrackedItem) -> bool {
        let mut guilds = self.guilds.write().await;
        guilds
            .entry(guild_id)
            .or_default()
            .items
            .insert(app_id, item)
            .is_none()
    }

    pub async fn untrack_item(&self, guild_id: u64, app_id: u32) -> Option<TrackedItem> {
        let mut guilds = self.guilds.write().await;
        guilds
            .get_mut(&guild_id)
            .and_then(|tracking| tracking.items.remove(&app_id))
    }

    pub async fn get_guild(&self, guild_id: u64) -> Option<GuildTracking> {
        self.guilds.read().await.get(&guild_id).cloned()
    }

    /// Guilds that have somewhere to post alerts and something to check.
    pub async fn guilds_to_check(&self) -> Vec<(u64, GuildTracking)> {
        let guilds = self.guilds.read().await;
        let mut due: Vec<_> = guilds
            .iter()
            .filter(|(_, tracking)| {
                tracking.notification_channel.is_some() && !tracking.items.is_empty()
            })
            .map(|(guild_id, tracking)| (*guild_id, tracking.clone()))
            .collect();
        due.sort_by_key(|(guild_id, _)| *guild_id);
        due
    }

    /// Store the latest observed price of a tracked item.
    ///
    /// Returns `false` if the item was untracked in the meantime.
    pub async fn record_price(&self, guild_id: u64, app_id: u32, price: u32, currency: &str) -> bool {
        let mut guilds = self.guilds.write().await;
        match guilds
            .get_mut(&guild_id)
            .and_then(|tracking| tracking.items.get_mut(&app_id))
        {
            Some(item) => {
                item.last_price = Some(price);
                item.currency = Some(currency.to_string());
                true
            }
            None => false,
        }
    }
}
