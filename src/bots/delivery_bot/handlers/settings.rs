use std::sync::Arc;

use chrono::NaiveTime;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};

use crate::bots::delivery_bot::keyboards::{build_menu_keyboard, build_settings_keyboard};
use crate::bots::delivery_bot::types::{BotState, Session};
use crate::bots::delivery_bot::utils::{render, send_message_with_keyboard};

const SETTINGS_TEXT: &str =
    "⚙️ Bot settings:\n\nToggle the optional intake steps here:";

pub async fn show_settings(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    edit: Option<MessageId>,
) -> ResponseResult<()> {
    let keyboard = {
        let settings = state.settings();
        build_settings_keyboard(&settings)
    };
    render(bot, chat_id, edit, SETTINGS_TEXT, Some(keyboard)).await
}

pub async fn handle_toggle_amount(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
) -> ResponseResult<()> {
    {
        let mut settings = state.settings();
        settings.collect_amount = !settings.collect_amount;
    }
    bot.answer_callback_query(&q.id).await?;
    rerender_settings(bot, state, q).await
}

pub async fn handle_toggle_split(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
) -> ResponseResult<()> {
    {
        let mut settings = state.settings();
        settings.ask_split = !settings.ask_split;
    }
    bot.answer_callback_query(&q.id).await?;
    rerender_settings(bot, state, q).await
}

/// Puts the chat into the reminder-time detour; the next text message is
/// parsed as HH:MM.
pub async fn prompt_reminder_time(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
) -> ResponseResult<()> {
    bot.answer_callback_query(&q.id).await?;

    let msg = match &q.message {
        Some(m) => m,
        None => return Ok(()),
    };

    state
        .sessions()
        .insert(msg.chat.id.0, Session::AwaitReminderTime);

    render(
        bot,
        msg.chat.id,
        Some(msg.id),
        "Enter the reminder time as HH:MM (e.g. 10:00):",
        None,
    )
    .await
}

pub async fn handle_reminder_time_input(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    let time = match NaiveTime::parse_from_str(text.trim(), "%H:%M") {
        Ok(t) => t,
        Err(_) => {
            return render(
                bot,
                chat_id,
                None,
                "That is not a valid time. Enter it as HH:MM (e.g. 10:00):",
                None,
            )
            .await;
        }
    };

    {
        let mut settings = state.settings();
        settings.reminder_time = time;
    }
    state.sessions().remove(&chat_id.0);
    tracing::info!("Reminder time set to {}", time.format("%H:%M"));

    send_message_with_keyboard(
        bot,
        chat_id,
        &format!("⏰ Reminder time set to {}.", time.format("%H:%M")),
        build_menu_keyboard(),
    )
    .await
}

async fn rerender_settings(bot: &Bot, state: &Arc<BotState>, q: &CallbackQuery) -> ResponseResult<()> {
    if let Some(msg) = &q.message {
        show_settings(bot, state, msg.chat.id, Some(msg.id)).await?;
    }
    Ok(())
}
