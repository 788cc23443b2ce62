use std::sync::Arc;

use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

pub mod actions;
pub mod intake;
pub mod types;

mod flows;
mod handlers;
mod keyboards;
mod utils;

use handlers::{callback_handler, command_handler, message_handler, Command};
use types::BotState;

pub async fn run_bot(bot: Bot, state: Arc<BotState>) {
    tracing::info!("Starting delivery bot...");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint({
                    let state = state.clone();
                    move |bot: Bot, msg: Message, cmd: Command| {
                        let state = state.clone();
                        async move { command_handler(bot, msg, cmd, state).await }
                    }
                }),
        )
        .branch(Update::filter_message().endpoint({
            let state = state.clone();
            move |bot: Bot, msg: Message| {
                let state = state.clone();
                async move { message_handler(bot, msg, state).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let state = state.clone();
            move |bot: Bot, q: CallbackQuery| {
                let state = state.clone();
                async move { callback_handler(bot, q, state).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
