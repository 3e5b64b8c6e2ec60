use serenity::{builder::CreateApplicationCommand, model::application::command::CommandOptionType};

pub fn fact_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("fact").description("Get a random fact.");

    command
}

/// Create the wiki lookup command
pub fn wiki_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("wiki")
        .description("Search the Terraria Wiki for an entity page.")
        .create_option(|option| {
            option
                .name("query")
                .description("Name of the page to look up")
                .kind(CommandOptionType::String)
                .required(true)
        });

    command
}

/// Create the question answering command
pub fn ask_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("ask")
        .description("Ask OpenAI a question")
        .create_option(|option| {
            option
                .name("question")
                .description("What do you want to know?")
                .kind(CommandOptionType::String)
                .required(true)
        });

    command
}

pub fn weather_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("weather")
        .description("Show the current weather for a city.")
        .create_option(|option| {
            option
                .name("city")
                .description("City name, optionally followed by a country code")
                .kind(CommandOptionType::String)
                .required(true)
        });

    command
}
