use serenity::builder::CreateApplicationCommand;

pub fn trivia_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("trivia")
        .description("Answer a multiple-choice trivia question.");

    command
}
