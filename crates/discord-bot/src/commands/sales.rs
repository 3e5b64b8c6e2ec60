use serenity::{
    builder::CreateApplicationCommand,
    model::{
        application::command::CommandOptionType, channel::ChannelType, permissions::Permissions,
    },
};

/// Create the command for managing sale alerts
///
/// Hidden from members without Manage Server by default; the handler checks
/// the permission again since server admins can override the default.
pub fn sales_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("sales")
        .description("Get notified when games go on sale")
        .dm_permission(false)
        .default_member_permissions(Permissions::MANAGE_GUILD)
        // Channel subcommand
        .create_option(|option| {
            option
                .name("channel")
                .description("Set the channel where sale alerts are posted")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("channel")
                        .description("Channel for sale alerts")
                        .kind(CommandOptionType::Channel)
                        .channel_types(&[ChannelType::Text])
                        .required(true)
                })
        })
        // Track subcommand
        .create_option(|option| {
            option
                .name("track")
                .description("Watch a game for discounts")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("game")
                        .description("Steam app id or store page URL")
                        .kind(CommandOptionType::String)
                        .required(true)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("discount")
                        .description("Minimum discount in percent")
                        .kind(CommandOptionType::Integer)
                        .min_int_value(1)
                        .max_int_value(100)
                        .required(true)
                })
        })
        // Untrack subcommand
        .create_option(|option| {
            option
                .name("untrack")
                .description("Stop watching a game")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("app_id")
                        .description("Steam app id")
                        .kind(CommandOptionType::Integer)
                        .min_int_value(1)
                        .required(true)
                })
        })
        // List subcommand
        .create_option(|option| {
            option
                .name("list")
                .description("List the games being watched")
                .kind(CommandOptionType::SubCommand)
        })
        // Check subcommand
        .create_option(|option| {
            option
                .name("check")
                .description("Check prices right now")
                .kind(CommandOptionType::SubCommand)
        });

    command
}
