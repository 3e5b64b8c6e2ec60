//! Periodic sale checks.

use std::{sync::Arc, time::Duration};

use medley_core::models::sales::{SaleAlert, evaluate_price};
use medley_store::repositories::sales::SalesRepository;
use serenity::{http::Http, model::id::ChannelId, utils::Color};
use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tracing::{debug, error, info, warn};

use crate::services::steam::PriceSource;

/// Check every tracked item of one guild.
///
/// Prices that don't produce an alert are recorded right away. Alerting
/// items keep their previous price until [`record_delivered`] runs, so an
/// alert that never reached Discord is produced again on the next check.
///
/// Items that fail to load, are free or no longer listed are skipped with a
/// warning so the remaining items still get checked.
pub async fn check_guild(
    sales: &SalesRepository,
    prices: &dyn PriceSource,
    guild_id: u64,
) -> Vec<SaleAlert> {
    let Some(tracking) = sales.get_guild(guild_id).await else {
        return Vec::new();
    };

    let mut alerts = Vec::new();
    for (app_id, item) in &tracking.items {
        let details = match prices.app_details(*app_id).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                warn!(guild_id, app_id, "Tracked app is no longer listed");
                continue;
            }
            Err(e) => {
                warn!(guild_id, app_id, "Price lookup failed: {:?}", e);
                continue;
            }
        };

        let Some(price) = details.price_overview.as_ref() else {
            warn!(guild_id, app_id, free = details.is_free, "Tracked app has no price");
            continue;
        };

        match evaluate_price(*app_id, &item.name, item.target_discount, item.last_price, price) {
            Some(alert) => alerts.push(alert),
            None => {
                sales
                    .record_price(guild_id, *app_id, price.final_price, &price.currency)
                    .await;
            }
        }
    }

    debug!(guild_id, alerts = alerts.len(), "Sale check finished");
    alerts
}

/// Record the prices of alerts that reached the guild.
pub async fn record_delivered(sales: &SalesRepository, guild_id: u64, delivered: &[&SaleAlert]) {
    for alert in delivered {
        sales
            .record_price(guild_id, alert.app_id, alert.final_price, &alert.currency)
            .await;
    }
}

/// Post alerts as embeds in `channel_id` and return the ones that were sent.
///
/// A failed send is logged and the remaining alerts are still attempted.
pub async fn post_alerts<'a>(http: &Http, channel_id: u64, alerts: &'a [SaleAlert]) -> Vec<&'a SaleAlert> {
    let mut delivered = Vec::with_capacity(alerts.len());
    for alert in alerts {
        let sent = ChannelId(channel_id)
            .send_message(http, |m| {
                m.embed(|e| {
                    e.title(alert_title(alert))
                        .url(&alert.store_url)
                        .field("Was", &alert.was, true)
                        .field("Now", &alert.now, true)
                        .color(Color::ORANGE)
                })
            })
            .await;

        match sent {
            Ok(_) => delivered.push(alert),
            Err(e) => error!(channel_id, app_id = alert.app_id, "Failed to post sale alert: {:?}", e),
        }
    }
    delivered
}

pub fn alert_title(alert: &SaleAlert) -> String {
    format!("🔥 {} is {}% off!", alert.name, alert.discount_percent)
}

/// Background task running the sale check for every configured guild.
pub struct SaleScheduler {
    http: Arc<Http>,
    sales: SalesRepository,
    prices: Arc<dyn PriceSource>,
    period: Duration,
}

impl SaleScheduler {
    pub fn new(
        http: Arc<Http>,
        sales: SalesRepository,
        prices: Arc<dyn PriceSource>,
        period: Duration,
    ) -> Self {
        Self {
            http,
            sales,
            prices,
            period,
        }
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        info!("Sale checks every {:?}", self.period);
        // The first check happens one full period after startup.
        let mut ticker = interval_at(Instant::now() + self.period, self.period);

        loop {
            ticker.tick().await;
            self.check_all().await;
        }
    }

    async fn check_all(&self) {
        for (guild_id, tracking) in self.sales.guilds_to_check().await {
            let Some(channel_id) = tracking.notification_channel else {
                continue;
            };

            let alerts = check_guild(&self.sales, self.prices.as_ref(), guild_id).await;
            let delivered = post_alerts(&self.http, channel_id, &alerts).await;
            if delivered.len() < alerts.len() {
                warn!(
                    guild_id,
                    failed = alerts.len() - delivered.len(),
                    "Some sale alerts will be retried next check"
                );
            }
            record_delivered(&self.sales, guild_id, &delivered).await;
        }
    }
}
