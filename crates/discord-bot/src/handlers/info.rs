use eyre::Result;
use medley_core::{
    models::weather::CurrentWeather,
    text::{DISCORD_MESSAGE_LIMIT, truncate},
};
use serenity::{
    builder::CreateEmbed,
    model::application::interaction::application_command::ApplicationCommandInteraction,
    utils::Color,
};
use tracing::error;

use crate::handlers::{
    GENERIC_APOLOGY, HandlerContext, defer, follow_up, option_string, reply, reply_ephemeral,
};

pub fn fact_message(fact: &str) -> String {
    format!("Did you know? {}", fact.trim())
}

pub fn wiki_message(query: &str, page: Option<&str>) -> String {
    match page {
        Some(url) => format!("Here's the page: {}", url),
        None => format!("No page found for **{}**.", query),
    }
}

/// Handle the /fact command
pub async fn handle_fact(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let fact = ctx.services.facts.random_fact().await?;
    reply(&ctx, command, fact_message(&fact.text)).await
}

/// Handle the /wiki command
pub async fn handle_wiki(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let query = option_string(&command.data.options, "query")?;
    let page = ctx.services.wiki.find_page(&query).await?;
    reply(&ctx, command, wiki_message(&query, page.as_deref())).await
}

/// Handle the /ask command
///
/// The completion can take a while, so the response is deferred first. Any
/// failure ends in the same apology.
pub async fn handle_ask(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let question = option_string(&command.data.options, "question")?;
    let Some(openai) = ctx.services.openai.as_ref() else {
        return reply_ephemeral(&ctx, command, "Questions aren't set up on this bot.").await;
    };

    defer(&ctx, command).await?;

    let answer = match openai.ask(&question).await {
        Ok(answer) => truncate(&answer, DISCORD_MESSAGE_LIMIT),
        Err(e) => {
            error!("OpenAI error: {:?}", e);
            GENERIC_APOLOGY.to_string()
        }
    };

    follow_up(&ctx, command, answer).await
}

/// Handle the /weather command
pub async fn handle_weather(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let city = option_string(&command.data.options, "city")?;
    let Some(weather) = ctx.services.weather.as_ref() else {
        return reply_ephemeral(&ctx, command, "Weather lookups aren't set up on this bot.").await;
    };

    defer(&ctx, command).await?;

    match weather.current(&city).await? {
        Some(current) => {
            command
                .edit_original_interaction_response(&ctx.ctx.http, |r| {
                    r.embed(|e| weather_embed(e, &current))
                })
                .await?;
            Ok(())
        }
        None => follow_up(&ctx, command, format!("Couldn't find weather for **{}**.", city)).await,
    }
}

fn weather_embed<'a>(embed: &'a mut CreateEmbed, current: &CurrentWeather) -> &'a mut CreateEmbed {
    embed
        .title(format!("Weather in {}", current.location()))
        .description(current.summary())
        .field("Temperature", format!("{:.1} °C", current.main.temp), true)
        .field("Feels like", format!("{:.1} °C", current.main.feels_like), true)
        .field("Humidity", format!("{}%", current.main.humidity), true)
        .field("Wind", format!("{:.1} m/s", current.wind.speed), true)
        .color(Color::BLUE);

    if let Some(icon) = current.icon_url() {
        embed.thumbnail(icon);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wiki_messages() {
        assert_eq!(
            wiki_message("Eye of Cthulhu", Some("https://terraria.wiki.gg/wiki/Eye_of_Cthulhu")),
            "Here's the page: https://terraria.wiki.gg/wiki/Eye_of_Cthulhu"
        );
        assert_eq!(wiki_message("Nope", None), "No page found for **Nope**.");
    }

    #[test]
    fn fact_is_prefixed() {
        assert_eq!(fact_message("Honey never spoils.\n"), "Did you know? Honey never spoils.");
    }
}
