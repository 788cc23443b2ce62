use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use html_escape::encode_text;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use deliverbot::models::CustomerRecord;

use crate::bots::delivery_bot::types::BotState;
use crate::observability::METRICS;

const CHECK_INTERVAL_SECS: u64 = 60;
const STATS_EVERY_TICKS: u64 = 60;

/// Where reminder notifications go. Production wraps the bot and the
/// configured reminder chat; tests record what would have been sent.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        METRICS.increment_messages_sent();
        Ok(())
    }
}

/// Daily variant: wakes every minute and, once the configured wall-clock
/// time has passed, notifies every record due today that has not been
/// notified yet. A failed delivery is retried on a later cycle.
pub async fn run_reminder_scheduler(state: Arc<BotState>) {
    tracing::info!("Starting reminder scheduler...");

    let mut ticks: u64 = 0;
    loop {
        let now = Local::now();
        let reminder_time = state.settings().reminder_time;

        if now.time() >= reminder_time {
            let sent = scan_once(&state, now.date_naive()).await;
            if sent > 0 {
                tracing::info!("Sent {} delivery reminders", sent);
            }
        }

        ticks += 1;
        if ticks % STATS_EVERY_TICKS == 0 {
            tracing::info!("Stats: {}", METRICS.snapshot());
        }

        tokio::time::sleep(Duration::from_secs(CHECK_INTERVAL_SECS)).await;
    }
}

/// One pass over the store. Returns how many reminders went out.
pub async fn scan_once(state: &BotState, today: NaiveDate) -> usize {
    let due: Vec<CustomerRecord> = {
        state
            .store()
            .list()
            .into_iter()
            .filter(|r| r.target_date == today && !r.notified)
            .collect()
    };

    let mut sent = 0;
    for record in due {
        if notify_record(state, &record).await {
            sent += 1;
        }
    }
    sent
}

/// One-shot variant: sleeps until `fire_at`, then notifies the one record
/// if it still exists and is un-notified. There is no re-delivery if the
/// send fails or the process restarts before the instant.
pub fn spawn_one_shot(state: Arc<BotState>, key: String, fire_at: DateTime<Utc>) {
    tokio::spawn(async move {
        let wait = (fire_at - Utc::now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let record = { state.store().get(&key).cloned() };
        match record {
            Some(record) if !record.notified => {
                notify_record(&state, &record).await;
            }
            Some(_) => {}
            None => {
                tracing::info!("Customer {} deleted before one-shot reminder fired", key);
            }
        }
    });
}

async fn notify_record(state: &BotState, record: &CustomerRecord) -> bool {
    let text = format_reminder_message(record);

    match state.reminder_sink.send(&text).await {
        Ok(()) => {
            if let Err(e) = state.store().mark_notified(&record.key) {
                // Deleted between scan and send; nothing left to mark.
                tracing::warn!("Could not mark {} notified: {}", record.key, e);
            }
            METRICS.increment_reminders_sent();
            tracing::info!("Sent delivery reminder for {}", record.key);
            true
        }
        Err(e) => {
            tracing::error!("Failed to deliver reminder for {}: {}", record.key, e);
            METRICS.increment_errors();
            false
        }
    }
}

fn format_reminder_message(record: &CustomerRecord) -> String {
    let mut text = format!(
        "<b>🔔 Delivery reminder!</b>\n\nCustomer: {}\nDate: {}",
        encode_text(&record.key),
        record.target_date.format("%d.%m.%Y")
    );
    if let Some(amount) = record.order_amount {
        text.push_str(&format!("\nOrder amount: {}", amount));
    }
    text
}
