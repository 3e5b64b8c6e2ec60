use eyre::{Result, eyre};
use medley_core::{errors::MedleyError, text::pluralize};
use medley_store::models::{PlaybackQueue, QueuedTrack};
use serenity::{
    model::application::interaction::{
        InteractionResponseType, application_command::ApplicationCommandInteraction,
    },
    utils::Color,
};
use songbird::Songbird;
use std::sync::Arc;

use crate::{
    handlers::{
        HandlerContext, defer, follow_up, option_bool, option_string, reply, require_guild,
    },
    player::PlayOutcome,
};

/// Queue entries shown by /queue before the rest is summarised.
const QUEUE_PREVIEW: usize = 10;

async fn voice_manager(ctx: &HandlerContext) -> Result<Arc<Songbird>> {
    songbird::get(&ctx.ctx)
        .await
        .ok_or_else(|| eyre!("Songbird voice client not registered"))
}

/// Now-playing line plus the numbered upcoming tracks, or `None` when idle.
pub fn queue_description(queue: &PlaybackQueue) -> Option<String> {
    let current = queue.now_playing.as_ref()?;
    let mut description = format!("**Now playing:** {}\n", current.title);

    if !queue.tracks.is_empty() {
        description.push_str("\n**Up next:**\n");
        for (idx, track) in queue.tracks.iter().take(QUEUE_PREVIEW).enumerate() {
            description.push_str(&format!("{}. {} (<@{}>)\n", idx + 1, track.title, track.requested_by));
        }
        if queue.tracks.len() > QUEUE_PREVIEW {
            description.push_str(&format!(
                "…and {}\n",
                pluralize(queue.tracks.len() - QUEUE_PREVIEW, "more track", "more tracks")
            ));
        }
    }

    Some(description)
}

/// Handle the /play command
pub async fn handle_play(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_guild(command)?;
    let query = option_string(&command.data.options, "query")?;
    let next = option_bool(&command.data.options, "next").unwrap_or(false);

    let voice_channel = ctx
        .ctx
        .cache
        .guild(guild_id)
        .and_then(|guild| guild.voice_states.get(&command.user.id).and_then(|state| state.channel_id))
        .ok_or_else(|| MedleyError::Validation("Join a voice channel first.".to_string()))?;

    defer(&ctx, command).await?;

    let manager = voice_manager(&ctx).await?;
    ctx.player.join(&manager, guild_id, voice_channel.0).await?;

    let track = QueuedTrack {
        locator: query.trim().to_string(),
        title: query.trim().to_string(),
        requested_by: command.user.id.0,
    };

    let message = match ctx.player.play(manager, guild_id, track, next).await? {
        PlayOutcome::Started { title } => format!("▶️ Now playing **{}**", title),
        PlayOutcome::Queued { position } => {
            format!("Queued **{}** at position {}.", query.trim(), position)
        }
    };

    follow_up(&ctx, command, message).await
}

/// Handle the /skip command
pub async fn handle_skip(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_guild(command)?;

    if ctx.player.skip(guild_id).await? {
        reply(&ctx, command, "⏭️ Skipped.").await
    } else {
        reply(&ctx, command, "Nothing is playing.").await
    }
}

/// Handle the /stop command
pub async fn handle_stop(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_guild(command)?;
    let manager = voice_manager(&ctx).await?;

    let discarded = ctx.player.stop(&manager, guild_id).await?;
    reply(
        &ctx,
        command,
        format!(
            "⏹️ Stopped playback and cleared {}.",
            pluralize(discarded, "queued track", "queued tracks")
        ),
    )
    .await
}

/// Handle the /queue command
pub async fn handle_queue(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_guild(command)?;
    let queue = ctx.player.queue(guild_id).await;

    let Some(description) = queue_description(&queue) else {
        return reply(&ctx, command, "The queue is empty.").await;
    };

    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.embed(|e| e.title("Queue").description(description).color(Color::DARK_GREEN))
                })
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    fn track(title: &str) -> QueuedTrack {
        QueuedTrack {
            locator: title.to_string(),
            title: title.to_string(),
            requested_by: 42,
        }
    }

    #[test]
    fn idle_queue_has_no_description() {
        assert_eq!(queue_description(&PlaybackQueue::default()), None);
    }

    #[test]
    fn description_lists_upcoming_tracks() {
        let queue = PlaybackQueue {
            now_playing: Some(track("Intro")),
            generation: 1,
            tracks: VecDeque::from(vec![track("Second"), track("Third")]),
        };

        assert_eq!(
            queue_description(&queue).unwrap(),
            "**Now playing:** Intro\n\n**Up next:**\n1. Second (<@42>)\n2. Third (<@42>)\n"
        );
    }

    #[test]
    fn long_queues_are_summarised() {
        let queue = PlaybackQueue {
            now_playing: Some(track("Intro")),
            generation: 1,
            tracks: (0..12).map(|i| track(&format!("Song {}", i))).collect(),
        };

        let description = queue_description(&queue).unwrap();
        assert!(description.contains("10. Song 9"));
        assert!(!description.contains("Song 10"));
        assert!(description.ends_with("…and 2 more tracks\n"));
    }
}
