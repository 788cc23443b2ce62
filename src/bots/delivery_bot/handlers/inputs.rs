use std::sync::Arc;

use teloxide::prelude::*;

use crate::bots::delivery_bot::flows::handle_intake_message;
use crate::bots::delivery_bot::types::{BotState, Session};

use super::menu::{show_main_menu, MENU_TEXT};
use super::settings::handle_reminder_time_input;

enum SessionKind {
    None,
    Intake,
    ReminderTime,
}

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;

    let kind = {
        let sessions = state.sessions();
        match sessions.get(&chat_id.0) {
            Some(Session::Intake(_)) => SessionKind::Intake,
            Some(Session::AwaitReminderTime) => SessionKind::ReminderTime,
            None => SessionKind::None,
        }
    };

    match kind {
        SessionKind::Intake => handle_intake_message(&bot, &state, chat_id, &text).await,
        SessionKind::ReminderTime => {
            handle_reminder_time_input(&bot, &state, chat_id, &text).await
        }
        SessionKind::None => show_main_menu(&bot, chat_id, None, MENU_TEXT).await,
    }
}
