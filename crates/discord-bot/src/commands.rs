use serenity::builder::{CreateApplicationCommand, CreateApplicationCommands};

pub mod info;
pub mod music;
pub mod playlist;
pub mod sales;
pub mod trivia;
pub mod utility;

/// Every slash command the bot answers, in registration order.
pub fn all_commands() -> Vec<CreateApplicationCommand> {
    vec![
        utility::ping_command(),
        utility::number_command(),
        utility::coin_command(),
        info::fact_command(),
        info::wiki_command(),
        info::ask_command(),
        info::weather_command(),
        playlist::add_command(),
        trivia::trivia_command(),
        music::play_command(),
        music::skip_command(),
        music::stop_command(),
        music::queue_command(),
        sales::sales_command(),
    ]
}

/// Register all commands for the bot.
///
/// # Arguments
///
/// * `commands` - A mutable reference to a CreateApplicationCommands object
///   that will be modified to include our custom commands.
///
/// # Returns
///
/// The same CreateApplicationCommands object with our commands added.
pub fn register_commands(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    for definition in all_commands() {
        commands.create_application_command(|command| {
            *command = definition;
            command
        });
    }

    commands
}
