use serenity::{builder::CreateApplicationCommand, model::application::command::CommandOptionType};

/// Create the latency check command
pub fn ping_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("ping").description("Check the bot's latency.");

    command
}

/// Create the random number command
pub fn number_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("number")
        .description("Generate a random number between two values.")
        .create_option(|option| {
            option
                .name("min_num")
                .description("Lowest possible number")
                .kind(CommandOptionType::Integer)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("max_num")
                .description("Highest possible number")
                .kind(CommandOptionType::Integer)
                .required(true)
        });

    command
}

pub fn coin_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("coin").description("Flip a coin.");

    command
}
