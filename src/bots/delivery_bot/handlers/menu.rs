use std::sync::Arc;

use chrono::Local;
use html_escape::encode_text;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};

use deliverbot::models::{CustomerRecord, PaymentCategory};
use deliverbot::payments::calculate_payments;
use deliverbot::store::StoreError;

use crate::bots::delivery_bot::keyboards::{
    build_back_keyboard, build_customer_detail_keyboard, build_customer_list_keyboard,
    build_menu_keyboard,
};
use crate::bots::delivery_bot::types::BotState;
use crate::bots::delivery_bot::utils::render;

pub const MENU_TEXT: &str = "Main menu. Choose an action:";
pub const WELCOME_TEXT: &str =
    "👋 Welcome to the delivery tracking bot!\n\nChoose an action:";

pub async fn show_main_menu(
    bot: &Bot,
    chat_id: ChatId,
    edit: Option<MessageId>,
    text: &str,
) -> ResponseResult<()> {
    render(bot, chat_id, edit, text, Some(build_menu_keyboard())).await
}

pub async fn show_customer_list(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    edit: Option<MessageId>,
) -> ResponseResult<()> {
    let records = state.store().list();

    if records.is_empty() {
        return render(
            bot,
            chat_id,
            edit,
            "The customer list is empty.",
            Some(build_back_keyboard()),
        )
        .await;
    }

    let today = Local::now().date_naive();
    let mut text = String::from("👥 Customers:\n\n");
    for (i, record) in records.iter().enumerate() {
        let days_left = record.days_left(today);
        let status = match days_left {
            d if d > 0 => "🟢",
            0 => "🟡",
            _ => "🔴",
        };
        text.push_str(&format!(
            "{}. {} {}\n   📅 {} ({} days left)\n",
            i + 1,
            status,
            encode_text(&record.key),
            record.target_date.format("%d.%m.%Y"),
            days_left
        ));
        if let Some(amount) = record.order_amount {
            text.push_str(&format!("   💰 {}\n", amount));
        }
        if let Some(split) = record.split_payment {
            text.push_str(&format!("   💳 Split: {}\n", if split { "Yes" } else { "No" }));
        }
        text.push('\n');
    }

    render(
        bot,
        chat_id,
        edit,
        &text,
        Some(build_customer_list_keyboard(&records)),
    )
    .await
}

pub async fn show_customer_detail(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
    key: &str,
) -> ResponseResult<()> {
    let msg = match &q.message {
        Some(m) => m,
        None => return Ok(()),
    };

    let record = { state.store().get(key).cloned() };
    let record = match record {
        Some(r) => r,
        None => {
            bot.answer_callback_query(&q.id)
                .text("Customer not found!")
                .await?;
            return show_customer_list(bot, state, msg.chat.id, Some(msg.id)).await;
        }
    };

    bot.answer_callback_query(&q.id).await?;

    let text = detail_text(&record, state.track_payments);
    let keyboard = build_customer_detail_keyboard(&record, state.track_payments);
    render(bot, msg.chat.id, Some(msg.id), &text, Some(keyboard)).await
}

pub async fn handle_delete_customer(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
    key: &str,
) -> ResponseResult<()> {
    let msg = match &q.message {
        Some(m) => m,
        None => return Ok(()),
    };

    let result = { state.store().delete(key) };
    match result {
        Ok(()) => {
            tracing::info!("Deleted customer {}", key);
            bot.answer_callback_query(&q.id)
                .text("Customer deleted!")
                .await?;
        }
        Err(StoreError::NotFound(_)) => {
            bot.answer_callback_query(&q.id)
                .text("Customer not found!")
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to delete customer {}: {}", key, e);
            bot.answer_callback_query(&q.id)
                .text("Something went wrong.")
                .await?;
        }
    }

    show_customer_list(bot, state, msg.chat.id, Some(msg.id)).await
}

pub async fn handle_toggle_paid(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
    category: PaymentCategory,
    key: &str,
) -> ResponseResult<()> {
    let msg = match &q.message {
        Some(m) => m,
        None => return Ok(()),
    };

    let result = { state.store().toggle_payment_flag(key, category) };
    match result {
        Ok(paid) => {
            let note = format!(
                "{} marked {}",
                category.label(),
                if paid { "paid" } else { "unpaid" }
            );
            bot.answer_callback_query(&q.id).text(note).await?;
        }
        Err(StoreError::NotFound(_)) => {
            bot.answer_callback_query(&q.id)
                .text("Customer not found!")
                .await?;
            return show_customer_list(bot, state, msg.chat.id, Some(msg.id)).await;
        }
        Err(e) => {
            tracing::error!("Failed to toggle {} for {}: {}", category.as_str(), key, e);
            bot.answer_callback_query(&q.id)
                .text("Something went wrong.")
                .await?;
            return Ok(());
        }
    }

    let record = { state.store().get(key).cloned() };
    if let Some(record) = record {
        let text = detail_text(&record, state.track_payments);
        let keyboard = build_customer_detail_keyboard(&record, state.track_payments);
        render(bot, msg.chat.id, Some(msg.id), &text, Some(keyboard)).await?;
    }
    Ok(())
}

pub async fn show_help(
    bot: &Bot,
    chat_id: ChatId,
    edit: Option<MessageId>,
) -> ResponseResult<()> {
    let text = "ℹ️ How to use this bot:\n\n\
        📝 Add customer - record a new customer and a delivery date\n\
        👥 Customer list - browse customers and their details\n\
        ⚙️ Settings - toggle the optional intake steps\n\n\
        Optional steps:\n\
        • Order amount - ask for the order amount during intake\n\
        • Split payment - ask whether the payment is split\n\
        • Reminder time - when the daily delivery reminder is sent\n\n\
        The bot reminds you once on each delivery day.";
    render(bot, chat_id, edit, text, Some(build_back_keyboard())).await
}

fn detail_text(record: &CustomerRecord, track_payments: bool) -> String {
    let today = Local::now().date_naive();
    let mut text = format!(
        "🔍 Customer details:\n\n🏷️ Tag: {}\n📅 Delivery date: {}\n⏱️ Days left: {}\n",
        encode_text(&record.key),
        record.target_date.format("%d.%m.%Y"),
        record.days_left(today)
    );

    if let Some(amount) = record.order_amount {
        text.push_str(&format!("💰 Order amount: {}\n", amount));
    }
    if let Some(count) = record.product_count {
        text.push_str(&format!("📦 Products: {}\n", count));
    }
    if let Some(split) = record.split_payment {
        text.push_str(&format!(
            "💳 Split payment: {}\n",
            if split { "Yes" } else { "No" }
        ));
    }

    if track_payments {
        if let Some(amount) = record.order_amount {
            let breakdown = calculate_payments(amount);
            text.push_str(&format!(
                "\nPayments:\n• Duty: {}\n• Delivery: {}\n• Insurance: {}\n• Deposit: {}\n",
                breakdown.duty, breakdown.delivery, breakdown.insurance, breakdown.deposit
            ));
        }
    }

    text
}
