use std::sync::Arc;

use chrono::{Duration, Local};
use html_escape::encode_text;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardMarkup, MessageId};

use deliverbot::models::CustomerRecord;

use crate::bots::delivery_bot::intake::{
    IntakeInput, IntakeOutcome, IntakeSession, Prompt, RejectReason,
};
use crate::bots::delivery_bot::keyboards::{
    build_cancel_keyboard, build_date_keyboard, build_menu_keyboard, build_split_keyboard,
};
use crate::bots::delivery_bot::types::{BotState, Session};
use crate::bots::delivery_bot::utils::{render, send_message_with_keyboard};
use crate::observability::METRICS;
use crate::services::reminder_scheduler::spawn_one_shot;

/// Begins a fresh intake for this chat. An already-running session is
/// silently replaced.
pub async fn start_intake(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    edit: Option<MessageId>,
) -> ResponseResult<()> {
    let (session, prompt) = IntakeSession::start(state.intake_flags());
    state.sessions().insert(chat_id.0, Session::Intake(session));

    render(
        bot,
        chat_id,
        edit,
        &prompt_text(&prompt),
        prompt_keyboard(&prompt),
    )
    .await
}

/// Routes a free-text message into the running intake session.
pub async fn handle_intake_message(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    text: &str,
) -> ResponseResult<()> {
    let today = Local::now().date_naive();

    let outcome = {
        let mut sessions = state.sessions();
        let session = match sessions.get_mut(&chat_id.0) {
            Some(Session::Intake(session)) => session,
            _ => return Ok(()),
        };
        let outcome = session.advance(IntakeInput::Text(text), today);
        if matches!(outcome, IntakeOutcome::Complete(_)) {
            sessions.remove(&chat_id.0);
        }
        outcome
    };

    render_outcome(bot, state, chat_id, None, outcome).await
}

/// Routes a button press (quick date, custom-date request, split choice)
/// into the running intake session, editing the pressed message in place.
pub async fn handle_intake_action(
    bot: &Bot,
    state: &Arc<BotState>,
    q: &CallbackQuery,
    input: IntakeInput<'_>,
) -> ResponseResult<()> {
    bot.answer_callback_query(&q.id).await?;

    let msg = match &q.message {
        Some(m) => m,
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;
    let today = Local::now().date_naive();

    let outcome = {
        let mut sessions = state.sessions();
        let session = match sessions.get_mut(&chat_id.0) {
            Some(Session::Intake(session)) => session,
            _ => return Ok(()),
        };
        let outcome = session.advance(input, today);
        if matches!(outcome, IntakeOutcome::Complete(_)) {
            sessions.remove(&chat_id.0);
        }
        outcome
    };

    render_outcome(bot, state, chat_id, Some(msg.id), outcome).await
}

async fn render_outcome(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    edit: Option<MessageId>,
    outcome: IntakeOutcome,
) -> ResponseResult<()> {
    match outcome {
        IntakeOutcome::Next(prompt) => {
            render(
                bot,
                chat_id,
                edit,
                &prompt_text(&prompt),
                prompt_keyboard(&prompt),
            )
            .await
        }
        IntakeOutcome::Rejected { reason, prompt } => {
            let text = format!("{}\n\n{}", reject_text(reason), prompt_text(&prompt));
            render(bot, chat_id, edit, &text, prompt_keyboard(&prompt)).await
        }
        IntakeOutcome::Complete(record) => finalize(bot, state, chat_id, edit, record).await,
    }
}

async fn finalize(
    bot: &Bot,
    state: &Arc<BotState>,
    chat_id: ChatId,
    edit: Option<MessageId>,
    record: CustomerRecord,
) -> ResponseResult<()> {
    let summary = summary_text(&record);

    state.store().upsert(record.clone());
    METRICS.increment_intakes_completed();
    tracing::info!("Stored customer {} due {}", record.key, record.target_date);

    if let Some(days) = state.reminder_after_days {
        let fire_at = record.created_at + Duration::days(days);
        spawn_one_shot(state.clone(), record.key.clone(), fire_at);
    }

    render(bot, chat_id, edit, &summary, None).await?;
    send_message_with_keyboard(
        bot,
        chat_id,
        "Choose the next action:",
        build_menu_keyboard(),
    )
    .await
}

fn summary_text(record: &CustomerRecord) -> String {
    let mut text = format!(
        "✅ Customer {} added!\n📅 Delivery date: {}",
        encode_text(&record.key),
        record.target_date.format("%d.%m.%Y")
    );
    if let Some(amount) = record.order_amount {
        text.push_str(&format!("\n💰 Order amount: {}", amount));
    }
    if let Some(count) = record.product_count {
        text.push_str(&format!("\n📦 Products: {}", count));
    }
    if let Some(split) = record.split_payment {
        let split_text = if split { "Yes" } else { "No" };
        text.push_str(&format!("\n💳 Split payment: {}", split_text));
    }
    text
}

fn prompt_text(prompt: &Prompt) -> String {
    match prompt {
        Prompt::Key => {
            "Enter the customer tag (e.g. @username or a tracking code):".to_string()
        }
        Prompt::TargetDate { key, .. } => {
            format!("Customer: {}\n\nPick a delivery date:", encode_text(key))
        }
        Prompt::CustomDate => "Enter the delivery date as DD.MM.YYYY:".to_string(),
        Prompt::OrderAmount { key, target_date } => format!(
            "Customer: {}\nDelivery date: {}\n\nEnter the order amount:",
            encode_text(key),
            target_date.format("%d.%m.%Y")
        ),
        Prompt::ProductCount => "Enter the number of products:".to_string(),
        Prompt::SplitPayment { amount } => {
            format!("Order amount: {}\n\nSplit payment?", amount)
        }
    }
}

fn prompt_keyboard(prompt: &Prompt) -> Option<InlineKeyboardMarkup> {
    match prompt {
        Prompt::Key => None,
        Prompt::TargetDate { options, .. } => Some(build_date_keyboard(options)),
        Prompt::CustomDate => Some(build_cancel_keyboard()),
        Prompt::OrderAmount { .. } => Some(build_cancel_keyboard()),
        Prompt::ProductCount => Some(build_cancel_keyboard()),
        Prompt::SplitPayment { .. } => Some(build_split_keyboard()),
    }
}

fn reject_text(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::EmptyKey => "The tag cannot be empty.",
        RejectReason::BadDateFormat => "That date did not parse.",
        RejectReason::PastDate => "The date cannot be in the past.",
        RejectReason::BadAmount => "Please enter a valid amount (e.g. 1500.50).",
        RejectReason::BadCount => "Please enter a whole number greater than zero.",
        RejectReason::UnexpectedInput => "Please use the buttons above.",
    }
}
