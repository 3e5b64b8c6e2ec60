use eyre::{Result, eyre};
use medley_core::errors::MedleyError;
use medley_store::Store;
use serenity::{
    async_trait,
    model::{
        application::{
            command::Command,
            interaction::{
                Interaction, InteractionResponseType,
                application_command::{ApplicationCommandInteraction, CommandDataOption},
                message_component::MessageComponentInteraction,
            },
        },
        channel::Message,
        gateway::Ready,
        id::GuildId,
    },
    prelude::*,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod info;
pub mod music;
pub mod playlist;
pub mod sales;
pub mod text;
pub mod trivia;
pub mod utility;

use crate::{config::BotConfig, player::Player, services::Services, trivia::TriviaState};

/// Reply used whenever a command fails for a reason the user can't fix.
pub const GENERIC_APOLOGY: &str = "Sorry, couldn't process that request.";

/// Main Discord handler that processes all events.
///
/// Holds everything command handlers share: configuration, service clients,
/// per-guild state and in-flight trivia games.
pub struct Handler {
    config: BotConfig,
    services: Arc<Services>,
    store: Store,
    trivia: TriviaState,
    player: Player,
}

impl Handler {
    /// Create a new handler
    pub fn new(config: BotConfig, services: Arc<Services>, store: Store) -> Self {
        let player = Player::new(store.queues.clone());
        Self {
            config,
            services,
            store,
            trivia: TriviaState::new(),
            player,
        }
    }

    fn context(&self, ctx: &Context) -> HandlerContext {
        HandlerContext {
            ctx: ctx.clone(),
            config: self.config.clone(),
            services: self.services.clone(),
            store: self.store.clone(),
            trivia: self.trivia.clone(),
            player: self.player.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // Guild commands show up immediately, global ones can take a while
        if let Some(test_guild_id) = self.config.test_guild_id {
            match GuildId(test_guild_id)
                .set_application_commands(&ctx.http, |commands| {
                    crate::commands::register_commands(commands)
                })
                .await
            {
                Ok(cmds) => {
                    info!(
                        "Guild commands registered successfully for {}! Total commands: {}",
                        test_guild_id,
                        cmds.len()
                    );
                }
                Err(why) => {
                    error!("Error registering guild commands: {:?}", why);
                }
            }
        }

        match Command::set_global_application_commands(&ctx.http, |commands| {
            crate::commands::register_commands(commands)
        })
        .await
        {
            Ok(cmds) => {
                info!("Global commands registered successfully! Total commands: {}", cmds.len());
                for cmd in cmds {
                    info!("Command registered: /{} - {}", cmd.name, cmd.description);
                }
            }
            Err(why) => {
                error!("Error registering global commands: {:?}", why);
            }
        }
    }

    /// Handle interactions (slash commands, buttons, select menus)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                info!("Received command: {}", command.data.name);
                let handler_ctx = self.context(&ctx);

                let result = match command.data.name.as_str() {
                    "ping" => utility::handle_ping(handler_ctx, &command).await,
                    "number" => utility::handle_number(handler_ctx, &command).await,
                    "coin" => utility::handle_coin(handler_ctx, &command).await,
                    "fact" => info::handle_fact(handler_ctx, &command).await,
                    "wiki" => info::handle_wiki(handler_ctx, &command).await,
                    "ask" => info::handle_ask(handler_ctx, &command).await,
                    "weather" => info::handle_weather(handler_ctx, &command).await,
                    "add" => playlist::handle_add(handler_ctx, &command).await,
                    "trivia" => trivia::handle_trivia_command(handler_ctx, &command).await,
                    "play" => music::handle_play(handler_ctx, &command).await,
                    "skip" => music::handle_skip(handler_ctx, &command).await,
                    "stop" => music::handle_stop(handler_ctx, &command).await,
                    "queue" => music::handle_queue(handler_ctx, &command).await,
                    "sales" => sales::handle_sales_command(handler_ctx, &command).await,
                    _ => {
                        error!("Unknown command: {}", command.data.name);
                        Err(eyre!("Unknown command"))
                    }
                };

                if let Err(e) = result {
                    log_failure(&command.data.name, &e);
                    report_command_failure(&ctx, &command, &apology(&e)).await;
                }
            }
            Interaction::MessageComponent(component) => {
                let handler_ctx = self.context(&ctx);

                if let Err(e) = trivia::handle_component_interaction(handler_ctx, &component).await {
                    log_failure(&component.data.custom_id, &e);
                    report_component_failure(&ctx, &component, &apology(&e)).await;
                }
            }
            _ => {}
        }
    }

    /// Handle prefixed text commands
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let handler_ctx = self.context(&ctx);
        if let Err(e) = text::handle_message(handler_ctx, &msg).await {
            log_failure("text command", &e);
            if let Err(why) = msg.channel_id.say(&ctx.http, apology(&e)).await {
                error!("Failed to send error response: {:?}", why);
            }
        }
    }
}

/// Shared context for command handlers.
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct HandlerContext {
    pub ctx: Context,
    pub config: BotConfig,
    pub services: Arc<Services>,
    pub store: Store,
    pub trivia: TriviaState,
    pub player: Player,
}

/// User-facing text for a failed command.
pub fn apology(error: &eyre::Report) -> String {
    error
        .downcast_ref::<MedleyError>()
        .map(MedleyError::apology)
        .unwrap_or_else(|| GENERIC_APOLOGY.to_string())
}

fn log_failure(source: &str, error: &eyre::Report) {
    match error.downcast_ref::<MedleyError>() {
        Some(MedleyError::NotFound(_) | MedleyError::Validation(_)) => {
            info!("{} rejected: {}", source, error);
        }
        Some(MedleyError::Authentication(_) | MedleyError::Authorization(_)) => {
            warn!("{} refused: {}", source, error);
        }
        _ => error!("Error handling {}: {:?}", source, error),
    }
}

/// Answer with an ephemeral apology, or edit the deferred response if the
/// interaction was already acknowledged.
async fn report_command_failure(ctx: &Context, command: &ApplicationCommandInteraction, message: &str) {
    let responded = command
        .create_interaction_response(&ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(message).ephemeral(true))
        })
        .await;

    if responded.is_err() {
        if let Err(why) = command
            .edit_original_interaction_response(&ctx.http, |r| r.content(message))
            .await
        {
            error!("Failed to send error response: {:?}", why);
        }
    }
}

async fn report_component_failure(ctx: &Context, component: &MessageComponentInteraction, message: &str) {
    let responded = component
        .create_interaction_response(&ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(message).ephemeral(true))
        })
        .await;

    if responded.is_err() {
        if let Err(why) = component
            .create_followup_message(&ctx.http, |m| m.content(message).ephemeral(true))
            .await
        {
            error!("Failed to send error response: {:?}", why);
        }
    }
}

/// Send a visible reply.
pub async fn reply(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
) -> Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(content))
        })
        .await?;

    Ok(())
}

/// Send a reply only the invoking user can see.
pub async fn reply_ephemeral(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
) -> Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(content).ephemeral(true))
        })
        .await?;

    Ok(())
}

/// Acknowledge a command whose answer takes longer than Discord's 3 seconds.
pub async fn defer(ctx: &HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
        })
        .await?;

    Ok(())
}

/// Fill in a deferred response.
pub async fn follow_up(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    content: impl ToString,
) -> Result<()> {
    command
        .edit_original_interaction_response(&ctx.ctx.http, |r| r.content(content))
        .await?;

    Ok(())
}

pub fn option_string(options: &[CommandDataOption], name: &str) -> Result<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| eyre!("Missing {} parameter", name))
}

pub fn option_i64(options: &[CommandDataOption], name: &str) -> Result<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
        .ok_or_else(|| eyre!("Missing {} parameter", name))
}

pub fn option_bool(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}

/// Snowflake-valued options (channels, users) arrive as strings.
pub fn option_id(options: &[CommandDataOption], name: &str) -> Result<u64> {
    option_string(options, name)?
        .parse()
        .map_err(|_| eyre!("Invalid {} parameter", name))
}

/// Fail with a caller-facing message when the command was used outside a server.
pub fn require_guild(command: &ApplicationCommandInteraction) -> Result<u64> {
    command
        .guild_id
        .map(|id| id.0)
        .ok_or_else(|| MedleyError::Validation("This command only works in a server.".to_string()).into())
}
