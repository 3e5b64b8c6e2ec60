//! Prefix commands typed in chat, e.g. `!number 1 6`.

use chrono::Utc;
use eyre::Result;
use serenity::model::channel::Message;

use crate::handlers::{
    HandlerContext,
    info::{fact_message, wiki_message},
    utility::{flip_coin, latency_ms, pong, roll_number},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    Ping,
    Coin,
    Number { min: i64, max: i64 },
    Fact,
    Wiki(String),
    /// A known command with bad arguments; carries the usage line.
    Usage(String),
}

/// Parse `<prefix><name> <args…>`. Unknown names and ordinary chat give `None`.
pub fn parse_text_command(prefix: &str, content: &str) -> Option<TextCommand> {
    let rest = content.trim().strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let args: Vec<&str> = parts.collect();

    let command = match name.as_str() {
        "ping" => TextCommand::Ping,
        "coin" => TextCommand::Coin,
        "fact" => TextCommand::Fact,
        "number" => match args.as_slice() {
            [min, max] => match (min.parse(), max.parse()) {
                (Ok(min), Ok(max)) => TextCommand::Number { min, max },
                _ => usage(prefix, "number <min> <max>"),
            },
            _ => usage(prefix, "number <min> <max>"),
        },
        "wiki" if !args.is_empty() => TextCommand::Wiki(args.join(" ")),
        "wiki" => usage(prefix, "wiki <query>"),
        _ => return None,
    };

    Some(command)
}

fn usage(prefix: &str, syntax: &str) -> TextCommand {
    TextCommand::Usage(format!("Usage: `{}{}`", prefix, syntax))
}

pub async fn handle_message(ctx: HandlerContext, msg: &Message) -> Result<()> {
    let Some(command) = parse_text_command(ctx.config.command_prefix(), &msg.content) else {
        return Ok(());
    };

    let response = match command {
        TextCommand::Ping => pong(latency_ms(msg.id.0, Utc::now().timestamp_millis())),
        TextCommand::Coin => flip_coin(&mut rand::thread_rng()).to_string(),
        TextCommand::Number { min, max } => {
            let number = roll_number(min, max, &mut rand::thread_rng())?;
            format!("Here is your number: {}", number)
        }
        TextCommand::Fact => fact_message(&ctx.services.facts.random_fact().await?.text),
        TextCommand::Wiki(query) => {
            let page = ctx.services.wiki.find_page(&query).await?;
            wiki_message(&query, page.as_deref())
        }
        TextCommand::Usage(usage) => usage,
    };

    msg.channel_id.say(&ctx.ctx.http, response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("!ping", Some(TextCommand::Ping))]
    #[case("  !COIN  ", Some(TextCommand::Coin))]
    #[case("!number 1 6", Some(TextCommand::Number { min: 1, max: 6 }))]
    #[case("!number -5 5", Some(TextCommand::Number { min: -5, max: 5 }))]
    #[case("!number 1", Some(TextCommand::Usage("Usage: `!number <min> <max>`".to_string())))]
    #[case("!number a b", Some(TextCommand::Usage("Usage: `!number <min> <max>`".to_string())))]
    #[case("!wiki Eye of Cthulhu", Some(TextCommand::Wiki("Eye of Cthulhu".to_string())))]
    #[case("!wiki", Some(TextCommand::Usage("Usage: `!wiki <query>`".to_string())))]
    #[case("!fact", Some(TextCommand::Fact))]
    #[case("!dance", None)]
    #[case("ping", None)]
    #[case("!", None)]
    fn parses_prefixed_commands(#[case] content: &str, #[case] expected: Option<TextCommand>) {
        assert_eq!(parse_text_command("!", content), expected);
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(parse_text_command("?", "?coin"), Some(TextCommand::Coin));
        assert_eq!(parse_text_command("?", "!coin"), None);
    }
}
