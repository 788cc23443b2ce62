use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

mod bots;
mod observability;
mod services;

use deliverbot::config::AppConfig;
use deliverbot::store::CustomerStore;

use bots::delivery_bot::types::BotState;
use services::reminder_scheduler::{run_reminder_scheduler, TelegramSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("configuration is incomplete")?;

    let bot = Bot::new(config.bot_token.clone());
    let sink = Arc::new(TelegramSink::new(bot.clone(), config.reminder_chat_id));
    let store = CustomerStore::load(&config.data_file);

    let state = Arc::new(BotState::new(
        store,
        sink,
        config.track_payments,
        config.reminder_after_days,
    ));

    tokio::spawn(run_reminder_scheduler(state.clone()));

    bots::delivery_bot::run_bot(bot, state).await;

    tracing::info!("Closing bot... Goodbye!");
    Ok(())
}
