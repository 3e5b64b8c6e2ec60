use serenity::{builder::CreateApplicationCommand, model::application::command::CommandOptionType};

/// Create the command adding a song to the shared playlist
pub fn add_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("add")
        .description("Add a song to the playlist using a URL or search query.")
        .create_option(|option| {
            option
                .name("track")
                .description("Spotify link or search query for a song.")
                .kind(CommandOptionType::String)
                .required(true)
        });

    command
}
