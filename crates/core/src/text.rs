/// Maximum length of a Discord message body, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Maximum length of an embed description.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Maximum number of options in a Discord select menu.
pub const SELECT_MENU_LIMIT: usize = 25;

/// Cut `text` down to at most `limit` characters, ending with an ellipsis
/// when anything was dropped. Counts chars, not bytes.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Turn a free-text page title into a wiki path segment.
pub fn wiki_slug(query: &str) -> String {
    query.trim().replace(' ', "_")
}

/// "1 member", "3 members"
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

/// Render an amount in minor units (cents) with its currency code.
pub fn format_minor_units(amount: u32, currency: &str) -> String {
    format!("{}.{:02} {}", amount / 100, amount % 100, currency)
}

/// Unix time in milliseconds encoded in a Discord snowflake id.
pub fn snowflake_timestamp_ms(id: u64) -> i64 {
    const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;
    (id >> 22) as i64 + DISCORD_EPOCH_MS
}
