use serenity::{builder::CreateApplicationCommand, model::application::command::CommandOptionType};

/// Create the command queueing audio in the caller's voice channel
pub fn play_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("play")
        .description("Play a song in your voice channel.")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("query")
                .description("Video URL or search terms")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("next")
                .description("Play this right after the current song")
                .kind(CommandOptionType::Boolean)
                .required(false)
        });

    command
}

pub fn skip_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("skip")
        .description("Skip the current song.")
        .dm_permission(false);

    command
}

pub fn stop_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("stop")
        .description("Stop playback, clear the queue and leave the voice channel.")
        .dm_permission(false);

    command
}

pub fn queue_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("queue")
        .description("Show the songs waiting to be played.")
        .dm_permission(false);

    command
}
