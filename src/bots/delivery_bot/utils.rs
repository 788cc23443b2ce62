use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};

use crate::observability::METRICS;

pub async fn send_telegram_message(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    METRICS.increment_messages_sent();
    Ok(())
}

pub async fn send_message_with_keyboard(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> ResponseResult<()> {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    METRICS.increment_messages_sent();
    Ok(())
}

pub async fn edit_message_with_keyboard(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> ResponseResult<()> {
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Sends fresh or edits in place depending on whether the interaction came
/// from a button press.
pub async fn render(
    bot: &Bot,
    chat_id: ChatId,
    edit: Option<MessageId>,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    match (edit, keyboard) {
        (Some(message_id), Some(keyboard)) => {
            edit_message_with_keyboard(bot, chat_id, message_id, text, keyboard).await
        }
        (Some(message_id), None) => {
            bot.edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
            Ok(())
        }
        (None, Some(keyboard)) => send_message_with_keyboard(bot, chat_id, text, keyboard).await,
        (None, None) => send_telegram_message(bot, chat_id, text).await,
    }
}
