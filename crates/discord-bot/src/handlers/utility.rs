use chrono::Utc;
use eyre::Result;
use medley_core::{
    errors::{MedleyError, MedleyResult},
    text::snowflake_timestamp_ms,
};
use rand::Rng;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;

use crate::handlers::{HandlerContext, option_i64, reply, reply_ephemeral};

pub const INVALID_RANGE: &str = "Invalid range! First number must be ≤ second.";

/// Milliseconds between the creation of `snowflake` and `now_ms`.
pub fn latency_ms(snowflake: u64, now_ms: i64) -> Option<i64> {
    let elapsed = now_ms - snowflake_timestamp_ms(snowflake);
    (elapsed >= 0).then_some(elapsed)
}

pub fn pong(latency_ms: Option<i64>) -> String {
    match latency_ms {
        Some(ms) => format!("pong ({} ms)", ms),
        None => "pong".to_string(),
    }
}

pub fn roll_number<R: Rng + ?Sized>(min: i64, max: i64, rng: &mut R) -> MedleyResult<i64> {
    if min > max {
        return Err(MedleyError::Validation(INVALID_RANGE.to_string()));
    }
    Ok(rng.gen_range(min..=max))
}

pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    if rng.gen_bool(0.5) { "Heads" } else { "Tails" }
}

/// Handle the /ping command
pub async fn handle_ping(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let latency = latency_ms(command.id.0, Utc::now().timestamp_millis());
    reply(&ctx, command, pong(latency)).await
}

/// Handle the /number command
pub async fn handle_number(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let min = option_i64(&command.data.options, "min_num")?;
    let max = option_i64(&command.data.options, "max_num")?;

    let rolled = roll_number(min, max, &mut rand::thread_rng());
    match rolled {
        Ok(number) => reply(&ctx, command, format!("Here is your number: {}", number)).await,
        Err(e) => reply_ephemeral(&ctx, command, e.apology()).await,
    }
}

/// Handle the /coin command
pub async fn handle_coin(ctx: HandlerContext, command: &ApplicationCommandInteraction) -> Result<()> {
    let side = flip_coin(&mut rand::thread_rng());
    reply(&ctx, command, side).await
}
