use chrono::NaiveDate;

use deliverbot::models::PaymentCategory;

/// Every inline-button token the bot understands, decoded once at the
/// callback boundary and matched exhaustively afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddCustomer,
    ListCustomers,
    Settings,
    Help,
    BackToMenu,
    QuickDate(NaiveDate),
    CustomDate,
    Split(bool),
    CustomerDetail(String),
    DeleteCustomer(String),
    TogglePaid(PaymentCategory, String),
    ToggleOrderAmount,
    ToggleSplitPayment,
    SetReminderTime,
    Cancel,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Action::AddCustomer => "menu:add".into(),
            Action::ListCustomers => "menu:list".into(),
            Action::Settings => "menu:settings".into(),
            Action::Help => "menu:help".into(),
            Action::BackToMenu => "menu:back".into(),
            Action::QuickDate(date) => format!("date:{}", date.format("%Y-%m-%d")),
            Action::CustomDate => "date:custom".into(),
            Action::Split(true) => "split:yes".into(),
            Action::Split(false) => "split:no".into(),
            Action::CustomerDetail(key) => format!("cust:{}", key),
            Action::DeleteCustomer(key) => format!("del:{}", key),
            Action::TogglePaid(category, key) => format!("pay:{}:{}", category.as_str(), key),
            Action::ToggleOrderAmount => "settings:amount".into(),
            Action::ToggleSplitPayment => "settings:split".into(),
            Action::SetReminderTime => "settings:reminder_time".into(),
            Action::Cancel => "flow:cancel".into(),
        }
    }

    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "menu:add" => return Some(Action::AddCustomer),
            "menu:list" => return Some(Action::ListCustomers),
            "menu:settings" => return Some(Action::Settings),
            "menu:help" => return Some(Action::Help),
            "menu:back" => return Some(Action::BackToMenu),
            "date:custom" => return Some(Action::CustomDate),
            "split:yes" => return Some(Action::Split(true)),
            "split:no" => return Some(Action::Split(false)),
            "settings:amount" => return Some(Action::ToggleOrderAmount),
            "settings:split" => return Some(Action::ToggleSplitPayment),
            "settings:reminder_time" => return Some(Action::SetReminderTime),
            "flow:cancel" => return Some(Action::Cancel),
            _ => {}
        }

        if let Some(date_str) = data.strip_prefix("date:") {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            return Some(Action::QuickDate(date));
        }
        if let Some(key) = data.strip_prefix("cust:") {
            return non_empty(key).map(Action::CustomerDetail);
        }
        if let Some(key) = data.strip_prefix("del:") {
            return non_empty(key).map(Action::DeleteCustomer);
        }
        if let Some(rest) = data.strip_prefix("pay:") {
            let (category_str, key) = rest.split_once(':')?;
            let category = PaymentCategory::parse(category_str)?;
            return non_empty(key).map(|k| Action::TogglePaid(category, k));
        }

        None
    }
}

fn non_empty(key: &str) -> Option<String> {
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let actions = [
            Action::AddCustomer,
            Action::ListCustomers,
            Action::Settings,
            Action::Help,
            Action::BackToMenu,
            Action::QuickDate(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
            Action::CustomDate,
            Action::Split(true),
            Action::Split(false),
            Action::CustomerDetail("@alice".into()),
            Action::DeleteCustomer("TRK-42".into()),
            Action::TogglePaid(PaymentCategory::Insurance, "TRK-42".into()),
            Action::ToggleOrderAmount,
            Action::ToggleSplitPayment,
            Action::SetReminderTime,
            Action::Cancel,
        ];

        for action in actions {
            assert_eq!(Action::parse(&action.encode()), Some(action));
        }
    }

    #[test]
    fn test_malformed_tokens_decode_to_none() {
        for data in [
            "",
            "menu:",
            "menu:unknown",
            "date:not-a-date",
            "cust:",
            "del:",
            "pay:",
            "pay:vat:@alice",
            "pay:duty:",
            "something:else",
        ] {
            assert_eq!(Action::parse(data), None, "token {:?}", data);
        }
    }
}
