use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::format_minor_units;

lazy_static! {
    static ref STORE_URL_REGEX: Regex =
        Regex::new(r"store\.steampowered\.com/app/(\d+)").expect("valid store url regex");
}

/// One entry of the `appdetails` response, which is keyed by app id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDetailsEnvelope {
    pub success: bool,
    pub data: Option<AppDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDetails {
    pub steam_appid: u32,
    pub name: String,
    #[serde(default)]
    pub is_free: bool,
    pub price_overview: Option<PriceOverview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverview {
    pub currency: String,
    pub initial: u32,
    #[serde(rename = "final")]
    pub final_price: u32,
    pub discount_percent: u8,
    #[serde(default)]
    pub initial_formatted: String,
    #[serde(default)]
    pub final_formatted: String,
}

impl PriceOverview {
    pub fn initial_display(&self) -> String {
        if self.initial_formatted.is_empty() {
            format_minor_units(self.initial, &self.currency)
        } else {
            self.initial_formatted.clone()
        }
    }

    pub fn final_display(&self) -> String {
        if self.final_formatted.is_empty() {
            format_minor_units(self.final_price, &self.currency)
        } else {
            self.final_formatted.clone()
        }
    }
}

/// A discount worth announcing in a guild's notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleAlert {
    pub app_id: u32,
    pub name: String,
    pub discount_percent: u8,
    pub was: String,
    pub now: String,
    pub store_url: String,
    /// Observed price in minor units, recorded once the alert is delivered.
    pub final_price: u32,
    pub currency: String,
}

pub fn store_url(app_id: u32) -> String {
    format!("https://store.steampowered.com/app/{}/", app_id)
}

/// Accept either a bare app id or a store page URL.
pub fn parse_app_id(input: &str) -> Option<u32> {
    let input = input.trim();
    if let Ok(id) = input.parse::<u32>() {
        return Some(id);
    }

    STORE_URL_REGEX
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Decide whether an observed price should produce an alert.
///
/// An alert fires when the discount reaches the target and the final price
/// differs from the last one observed, so polling an unchanged sale twice
/// only announces it once.
pub fn evaluate_price(
    app_id: u32,
    name: &str,
    target_discount: u8,
    last_price: Option<u32>,
    price: &PriceOverview,
) -> Option<SaleAlert> {
    if price.discount_percent < target_discount {
        return None;
    }
    if last_price == Some(price.final_price) {
        return None;
    }

    Some(SaleAlert {
        app_id,
        name: name.to_string(),
        discount_percent: price.discount_percent,
        was: price.initial_display(),
        now: price.final_display(),
        store_url: store_url(app_id),
        final_price: price.final_price,
        currency: price.currency.clone(),
    })
}
