use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::CallbackQuery;

use crate::bots::delivery_bot::actions::Action;
use crate::bots::delivery_bot::flows::{handle_intake_action, start_intake};
use crate::bots::delivery_bot::intake::IntakeInput;
use crate::bots::delivery_bot::types::BotState;

use super::menu::{
    handle_delete_customer, handle_toggle_paid, show_customer_detail, show_customer_list,
    show_help, show_main_menu, MENU_TEXT,
};
use super::settings::{
    handle_toggle_amount, handle_toggle_split, prompt_reminder_time, show_settings,
};

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    let data = match &q.data {
        Some(d) => d.clone(),
        None => return Ok(()),
    };

    let action = match Action::parse(&data) {
        Some(action) => action,
        None => {
            tracing::warn!("Unknown callback token: {}", data);
            bot.answer_callback_query(&q.id)
                .text("Unknown action.")
                .await?;
            return Ok(());
        }
    };

    match action {
        Action::AddCustomer => {
            bot.answer_callback_query(&q.id).await?;
            if let Some(msg) = &q.message {
                start_intake(&bot, &state, msg.chat.id, Some(msg.id)).await?;
            }
        }
        Action::ListCustomers => {
            bot.answer_callback_query(&q.id).await?;
            if let Some(msg) = &q.message {
                show_customer_list(&bot, &state, msg.chat.id, Some(msg.id)).await?;
            }
        }
        Action::Settings => {
            bot.answer_callback_query(&q.id).await?;
            if let Some(msg) = &q.message {
                show_settings(&bot, &state, msg.chat.id, Some(msg.id)).await?;
            }
        }
        Action::Help => {
            bot.answer_callback_query(&q.id).await?;
            if let Some(msg) = &q.message {
                show_help(&bot, msg.chat.id, Some(msg.id)).await?;
            }
        }
        Action::BackToMenu => {
            bot.answer_callback_query(&q.id).await?;
            if let Some(msg) = &q.message {
                show_main_menu(&bot, msg.chat.id, Some(msg.id), MENU_TEXT).await?;
            }
        }
        Action::QuickDate(date) => {
            handle_intake_action(&bot, &state, &q, IntakeInput::QuickDate(date)).await?;
        }
        Action::CustomDate => {
            handle_intake_action(&bot, &state, &q, IntakeInput::CustomDateRequested).await?;
        }
        Action::Split(split) => {
            handle_intake_action(&bot, &state, &q, IntakeInput::Split(split)).await?;
        }
        Action::CustomerDetail(key) => {
            show_customer_detail(&bot, &state, &q, &key).await?;
        }
        Action::DeleteCustomer(key) => {
            handle_delete_customer(&bot, &state, &q, &key).await?;
        }
        Action::TogglePaid(category, key) => {
            handle_toggle_paid(&bot, &state, &q, category, &key).await?;
        }
        Action::ToggleOrderAmount => {
            handle_toggle_amount(&bot, &state, &q).await?;
        }
        Action::ToggleSplitPayment => {
            handle_toggle_split(&bot, &state, &q).await?;
        }
        Action::SetReminderTime => {
            prompt_reminder_time(&bot, &state, &q).await?;
        }
        Action::Cancel => {
            handle_cancel(&bot, &state, &q).await?;
        }
    }

    Ok(())
}

/// Aborts the local session only; stored records and scheduled reminders
/// are untouched.
async fn handle_cancel(bot: &Bot, state: &Arc<BotState>, q: &CallbackQuery) -> ResponseResult<()> {
    bot.answer_callback_query(&q.id).await?;

    if let Some(msg) = &q.message {
        state.sessions().remove(&msg.chat.id.0);
        show_main_menu(bot, msg.chat.id, Some(msg.id), "Action cancelled.").await?;
    }

    Ok(())
}
