use serde::{Deserialize, Serialize};

use crate::text::{DISCORD_MESSAGE_LIMIT, EMBED_DESCRIPTION_LIMIT};

/// A message pushed to the web server that the bot should post to Discord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub channel_id: u64,
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl WebhookEvent {
    /// Longest content Discord accepts for this event. Titled events are
    /// posted as embeds and the content becomes the description.
    pub fn content_limit(&self) -> usize {
        if self.title.is_some() {
            EMBED_DESCRIPTION_LIMIT
        } else {
            DISCORD_MESSAGE_LIMIT
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAccepted {
    pub status: String,
}
