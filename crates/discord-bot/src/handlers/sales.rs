use eyre::{Result, eyre};
use medley_core::{
    errors::MedleyError,
    models::sales::{evaluate_price, parse_app_id},
    text::{DISCORD_MESSAGE_LIMIT, EMBED_DESCRIPTION_LIMIT, format_minor_units, pluralize, truncate},
};
use medley_store::models::{GuildTracking, TrackedItem};
use serenity::{
    model::{
        application::interaction::{
            InteractionResponseType,
            application_command::{ApplicationCommandInteraction, CommandDataOption},
        },
        permissions::Permissions,
    },
    utils::Color,
};

use crate::{
    handlers::{
        HandlerContext, defer, follow_up, option_i64, option_id, option_string, reply,
        require_guild,
    },
    scheduler::{alert_title, check_guild, post_alerts, record_delivered},
    services::steam::PriceSource,
};

/// Administrator or Manage Server.
pub fn can_manage_sales(permissions: Option<Permissions>) -> bool {
    permissions
        .map(|p| p.administrator() || p.manage_guild())
        .unwrap_or(false)
}

/// Resolve the guild of an admin-only subcommand.
///
/// Outside a server the guild error wins over the permission check.
pub fn authorize_sales(guild_id: Option<u64>, permissions: Option<Permissions>, user_id: u64) -> Result<u64> {
    let guild_id = guild_id
        .ok_or_else(|| MedleyError::Validation("This command only works in a server.".to_string()))?;
    if !can_manage_sales(permissions) {
        return Err(MedleyError::Authorization(format!("{} lacks Manage Server for /sales", user_id)).into());
    }
    Ok(guild_id)
}

fn require_admin(command: &ApplicationCommandInteraction) -> Result<u64> {
    let permissions = command.member.as_ref().and_then(|member| member.permissions);
    authorize_sales(command.guild_id.map(|id| id.0), permissions, command.user.id.0)
}

pub fn validate_discount(discount: i64) -> Result<u8> {
    u8::try_from(discount)
        .ok()
        .filter(|d| (1..=100).contains(d))
        .ok_or_else(|| MedleyError::Validation("Discount must be between 1 and 100.".to_string()).into())
}

/// One line per tracked item, in app id order.
pub fn tracking_lines(tracking: &GuildTracking) -> String {
    tracking
        .items
        .iter()
        .map(|(app_id, item)| {
            let last_seen = match (item.last_price, item.currency.as_deref()) {
                (Some(price), Some(currency)) => format_minor_units(price, currency),
                _ => "not checked yet".to_string(),
            };
            format!(
                "**{}** (`{}`) · alert at {}% · last seen {}",
                item.name, app_id, item.target_discount, last_seen
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handle the /sales command
pub async fn handle_sales_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let subcommand = command
        .data
        .options
        .first()
        .ok_or_else(|| eyre!("Missing subcommand"))?;

    match subcommand.name.as_str() {
        "channel" => handle_sales_channel(ctx, command, subcommand).await,
        "track" => handle_sales_track(ctx, command, subcommand).await,
        "untrack" => handle_sales_untrack(ctx, command, subcommand).await,
        "list" => handle_sales_list(ctx, command).await,
        "check" => handle_sales_check(ctx, command).await,
        _ => {
            command
                .create_interaction_response(&ctx.ctx.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|m| m.content("Unknown subcommand").ephemeral(true))
                })
                .await?;

            Ok(())
        }
    }
}

/// Handle the /sales channel subcommand
async fn handle_sales_channel(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
    subcommand: &CommandDataOption,
) -> Result<()> {
    let guild_id = require_admin(command)?;
    let channel_id = option_id(&subcommand.options, "channel")?;

    ctx.store.sales.set_notification_channel(guild_id, channel_id).await;

    reply(&ctx, command, format!("Sale alerts will be posted in <#{}>.", channel_id)).await
}

/// Handle the /sales track subcommand
async fn handle_sales_track(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
    subcommand: &CommandDataOption,
) -> Result<()> {
    let guild_id = require_admin(command)?;

    let game = option_string(&subcommand.options, "game")?;
    let app_id = parse_app_id(&game).ok_or_else(|| {
        MedleyError::Validation("That doesn't look like a Steam app id or store link.".to_string())
    })?;
    let target_discount = validate_discount(option_i64(&subcommand.options, "discount")?)?;

    defer(&ctx, command).await?;

    let details = ctx
        .services
        .steam
        .app_details(app_id)
        .await?
        .ok_or_else(|| MedleyError::NotFound("Couldn't find that game on Steam.".to_string()))?;

    let Some(price) = details.price_overview.as_ref() else {
        return follow_up(
            &ctx,
            command,
            format!("**{}** has no price on Steam, so there's nothing to track.", details.name),
        )
        .await;
    };

    // Already discounted enough: report it now instead of at the next check
    let alert = evaluate_price(app_id, &details.name, target_discount, None, price);

    ctx.store
        .sales
        .track_item(
            guild_id,
            app_id,
            TrackedItem {
                name: details.name.clone(),
                last_price: Some(price.final_price),
                currency: Some(price.currency.clone()),
                target_discount,
            },
        )
        .await;

    let mut message = format!(
        "Now tracking **{}** (currently {}). You'll be alerted at {}% off or more.",
        details.name,
        price.final_display(),
        target_discount
    );
    if let Some(alert) = alert {
        message.push_str(&format!(
            "\n{} {} → {} {}",
            alert_title(&alert),
            alert.was,
            alert.now,
            alert.store_url
        ));
    }
    let has_channel = ctx
        .store
        .sales
        .get_guild(guild_id)
        .await
        .and_then(|tracking| tracking.notification_channel)
        .is_some();
    if !has_channel {
        message.push_str("\nSet a channel with `/sales channel` to receive alerts.");
    }

    follow_up(&ctx, command, message).await
}

/// Handle the /sales untrack subcommand
async fn handle_sales_untrack(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
    subcommand: &CommandDataOption,
) -> Result<()> {
    let guild_id = require_admin(command)?;

    let app_id = u32::try_from(option_i64(&subcommand.options, "app_id")?)
        .map_err(|_| MedleyError::Validation("That isn't a valid app id.".to_string()))?;

    match ctx.store.sales.untrack_item(guild_id, app_id).await {
        Some(item) => reply(&ctx, command, format!("Stopped tracking **{}**.", item.name)).await,
        None => reply(&ctx, command, "That game isn't being tracked.").await,
    }
}

/// Handle the /sales list subcommand
async fn handle_sales_list(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_guild(command)?;

    let tracking = ctx.store.sales.get_guild(guild_id).await.unwrap_or_default();
    if tracking.items.is_empty() {
        return reply(
            &ctx,
            command,
            "No games are being tracked. Use `/sales track` to add one.",
        )
        .await;
    }

    let channel = tracking
        .notification_channel
        .map(|id| format!("Alerts go to <#{}>", id))
        .unwrap_or_else(|| "No alert channel set".to_string());

    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.embed(|e| {
                        e.title("Tracked games")
                            .description(truncate(&tracking_lines(&tracking), EMBED_DESCRIPTION_LIMIT))
                            .color(Color::ORANGE)
                            .footer(|f| {
                                f.text(format!(
                                    "{} • {}",
                                    pluralize(tracking.items.len(), "game", "games"),
                                    channel
                                ))
                            })
                    })
                })
        })
        .await?;

    Ok(())
}

/// Handle the /sales check subcommand
async fn handle_sales_check(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let guild_id = require_admin(command)?;

    let Some(tracking) = ctx.store.sales.get_guild(guild_id).await.filter(|t| !t.items.is_empty())
    else {
        return reply(&ctx, command, "No games are being tracked.").await;
    };

    defer(&ctx, command).await?;

    let alerts = check_guild(&ctx.store.sales, ctx.services.steam.as_ref(), guild_id).await;
    let summary = format!(
        "Checked {}, found {}.",
        pluralize(tracking.items.len(), "game", "games"),
        pluralize(alerts.len(), "new sale", "new sales")
    );

    match tracking.notification_channel {
        Some(channel_id) => {
            let delivered = post_alerts(&ctx.ctx.http, channel_id, &alerts).await;
            record_delivered(&ctx.store.sales, guild_id, &delivered).await;

            let mut message = summary;
            let failed = alerts.len() - delivered.len();
            if failed > 0 {
                message.push_str(&format!(
                    "\nCouldn't post {} in <#{}>. They'll be retried on the next check.",
                    pluralize(failed, "alert", "alerts"),
                    channel_id
                ));
            }
            follow_up(&ctx, command, message).await
        }
        None => {
            let mut message = summary;
            for alert in &alerts {
                message.push_str(&format!(
                    "\n{} {} → {} {}",
                    alert_title(alert),
                    alert.was,
                    alert.now,
                    alert.store_url
                ));
            }
            follow_up(&ctx, command, truncate(&message, DISCORD_MESSAGE_LIMIT)).await?;

            let shown: Vec<_> = alerts.iter().collect();
            record_delivered(&ctx.store.sales, guild_id, &shown).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn managers_and_admins_may_configure_sales() {
        assert!(can_manage_sales(Some(Permissions::ADMINISTRATOR)));
        assert!(can_manage_sales(Some(Permissions::MANAGE_GUILD)));
        assert!(!can_manage_sales(Some(Permissions::SEND_MESSAGES)));
        assert!(!can_manage_sales(None));
    }

    #[test]
    fn direct_messages_are_rejected_before_permissions() {
        let err = authorize_sales(None, None, 42).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MedleyError>(),
            Some(MedleyError::Validation(message)) if message == "This command only works in a server."
        ));

        let err = authorize_sales(Some(7), Some(Permissions::SEND_MESSAGES), 42).unwrap_err();
        assert!(matches!(err.downcast_ref::<MedleyError>(), Some(MedleyError::Authorization(_))));

        assert_eq!(authorize_sales(Some(7), Some(Permissions::MANAGE_GUILD), 42).unwrap(), 7);
    }

    #[test]
    fn long_lists_fit_in_an_embed() {
        let items = (1..=200u32)
            .map(|app_id| {
                (
                    app_id,
                    TrackedItem {
                        name: format!("A game with a rather long title #{}", app_id),
                        last_price: Some(1999),
                        currency: Some("USD".to_string()),
                        target_discount: 50,
                    },
                )
            })
            .collect();
        let tracking = GuildTracking {
            notification_channel: None,
            items,
        };

        let description = truncate(&tracking_lines(&tracking), EMBED_DESCRIPTION_LIMIT);
        assert!(description.chars().count() <= EMBED_DESCRIPTION_LIMIT);
        assert!(description.ends_with('…'));
    }

    #[test]
    fn discount_bounds() {
        assert_eq!(validate_discount(1).unwrap(), 1);
        assert_eq!(validate_discount(100).unwrap(), 100);
        assert!(validate_discount(0).is_err());
        assert!(validate_discount(101).is_err());
        assert!(validate_discount(-5).is_err());
    }

    #[test]
    fn list_lines() {
        let mut items = BTreeMap::new();
        items.insert(
            620,
            TrackedItem {
                name: "Portal 2".to_string(),
                last_price: Some(199),
                currency: Some("USD".to_string()),
                target_discount: 75,
            },
        );
        items.insert(
            105600,
            TrackedItem {
                name: "Terraria".to_string(),
                last_price: None,
                currency: None,
                target_discount: 50,
            },
        );
        let tracking = GuildTracking {
            notification_channel: None,
            items,
        };

        assert_eq!(
            tracking_lines(&tracking),
            "**Portal 2** (`620`) · alert at 75% · last seen 1.99 USD\n\
             **Terraria** (`105600`) · alert at 50% · last seen not checked yet"
        );
    }
}
