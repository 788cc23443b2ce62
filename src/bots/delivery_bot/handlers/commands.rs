use std::sync::Arc;

use teloxide::macros::BotCommands;
use teloxide::prelude::*;

use crate::bots::delivery_bot::types::BotState;

use super::menu::{show_help, show_main_menu, MENU_TEXT, WELCOME_TEXT};

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Cancel current operation")]
    Cancel,
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    command: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    match command {
        Command::Start => {
            state.sessions().remove(&chat_id.0);
            show_main_menu(&bot, chat_id, None, WELCOME_TEXT).await?;
        }
        Command::Help => {
            show_help(&bot, chat_id, None).await?;
        }
        Command::Cancel => {
            let had_session = state.sessions().remove(&chat_id.0).is_some();
            let text = if had_session {
                "Action cancelled."
            } else {
                MENU_TEXT
            };
            show_main_menu(&bot, chat_id, None, text).await?;
        }
    }

    Ok(())
}
