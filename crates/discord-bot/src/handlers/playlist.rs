use eyre::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use tracing::error;

use crate::{
    handlers::{HandlerContext, defer, follow_up, option_string, reply_ephemeral},
    services::spotify::AddOutcome,
};

pub fn add_message(outcome: &Result<AddOutcome>) -> String {
    match outcome {
        Ok(AddOutcome::Added(track)) => format!(
            "Added **{}** by **{}** to the playlist! 🎶",
            track.name,
            track.primary_artist()
        ),
        Ok(AddOutcome::NotFound) => "Couldn't find a track with that name.".to_string(),
        Ok(AddOutcome::AlreadyPresent) => "That track is already in the playlist! ✅".to_string(),
        Err(e) => format!("Failed to add song: {}", e),
    }
}

/// Handle the /add command
pub async fn handle_add(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let track = option_string(&command.data.options, "track")?;
    let Some(spotify) = ctx.services.spotify.as_ref() else {
        return reply_ephemeral(&ctx, command, "The playlist isn't set up on this bot.").await;
    };

    defer(&ctx, command).await?;

    let outcome = spotify.add_track(&track).await;
    if let Err(e) = &outcome {
        error!("Spotify error: {:?}", e);
    }

    follow_up(&ctx, command, add_message(&outcome)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use medley_core::models::spotify::{Artist, Track};
    use pretty_assertions::assert_eq;

    #[test]
    fn outcome_messages() {
        let track = Track {
            id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
            name: "Never Gonna Give You Up".to_string(),
            uri: "spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string(),
            artists: vec![Artist { name: "Rick Astley".to_string() }],
        };

        assert_eq!(
            add_message(&Ok(AddOutcome::Added(track))),
            "Added **Never Gonna Give You Up** by **Rick Astley** to the playlist! 🎶"
        );
        assert_eq!(
            add_message(&Ok(AddOutcome::AlreadyPresent)),
            "That track is already in the playlist! ✅"
        );
        assert_eq!(
            add_message(&Err(eyre::eyre!("403 Forbidden"))),
            "Failed to add song: 403 Forbidden"
        );
    }
}
