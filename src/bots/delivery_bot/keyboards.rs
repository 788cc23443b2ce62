use chrono::NaiveDate;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use deliverbot::models::{CustomerRecord, PaymentCategory};

use super::actions::Action;
use super::types::BotSettings;

pub fn build_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "📝 Add customer",
            Action::AddCustomer.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "👥 Customer list",
            Action::ListCustomers.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "⚙️ Settings",
            Action::Settings.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "ℹ️ Help",
            Action::Help.encode(),
        )],
    ])
}

/// Quick-pick rows for the next seven days, a custom-date row and cancel.
pub fn build_date_keyboard(options: &[NaiveDate]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = options
        .iter()
        .map(|date| {
            vec![InlineKeyboardButton::callback(
                date.format("%d.%m.%Y (%A)").to_string(),
                Action::QuickDate(*date).encode(),
            )]
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback(
        "📅 Enter another date",
        Action::CustomDate.encode(),
    )]);
    rows.push(vec![InlineKeyboardButton::callback(
        "❌ Cancel",
        Action::Cancel.encode(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn build_split_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Yes", Action::Split(true).encode()),
        InlineKeyboardButton::callback("❌ No", Action::Split(false).encode()),
    ]])
}

pub fn build_cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "❌ Cancel",
        Action::Cancel.encode(),
    )]])
}

pub fn build_back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        Action::BackToMenu.encode(),
    )]])
}

pub fn build_customer_list_keyboard(records: &[CustomerRecord]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = records
        .iter()
        .take(10)
        .map(|record| {
            vec![InlineKeyboardButton::callback(
                format!("🔍 {}", record.key),
                Action::CustomerDetail(record.key.clone()).encode(),
            )]
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        Action::BackToMenu.encode(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn build_customer_detail_keyboard(
    record: &CustomerRecord,
    track_payments: bool,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();

    if track_payments && record.order_amount.is_some() {
        for category in PaymentCategory::ALL {
            let mark = if record.payments.get(category) {
                "✅"
            } else {
                "◻️"
            };
            rows.push(vec![InlineKeyboardButton::callback(
                format!("{} {} paid", mark, category.label()),
                Action::TogglePaid(category, record.key.clone()).encode(),
            )]);
        }
    }

    rows.push(vec![InlineKeyboardButton::callback(
        "🗑️ Delete",
        Action::DeleteCustomer(record.key.clone()).encode(),
    )]);
    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back to list",
        Action::ListCustomers.encode(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

pub fn build_settings_keyboard(settings: &BotSettings) -> InlineKeyboardMarkup {
    let amount_status = if settings.collect_amount { "✅ ON" } else { "❌ OFF" };
    let split_status = if settings.ask_split { "✅ ON" } else { "❌ OFF" };

    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            format!("💰 Order amount step: {}", amount_status),
            Action::ToggleOrderAmount.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            format!("💳 Split payment step: {}", split_status),
            Action::ToggleSplitPayment.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            format!("⏰ Reminder time: {}", settings.reminder_time.format("%H:%M")),
            Action::SetReminderTime.encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "⬅️ Back",
            Action::BackToMenu.encode(),
        )],
    ])
}
