use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One tracked customer. The key (a handle or tracking code) is immutable
/// after creation; everything else is mutated only through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub key: String,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub order_amount: Option<f64>,
    #[serde(default)]
    pub split_payment: Option<bool>,
    #[serde(default)]
    pub product_count: Option<u32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notified: bool,
    #[serde(default)]
    pub payments: PaymentFlags,
}

impl CustomerRecord {
    pub fn new(key: String, target_date: NaiveDate) -> Self {
        Self {
            key,
            target_date,
            order_amount: None,
            split_payment: None,
            product_count: None,
            created_at: Utc::now(),
            notified: false,
            payments: PaymentFlags::default(),
        }
    }

    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

/// Which of the four payment categories have been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentFlags {
    #[serde(default)]
    pub duty_paid: bool,
    #[serde(default)]
    pub delivery_paid: bool,
    #[serde(default)]
    pub insurance_paid: bool,
    #[serde(default)]
    pub deposit_paid: bool,
}

impl PaymentFlags {
    pub fn get(&self, category: PaymentCategory) -> bool {
        match category {
            PaymentCategory::Duty => self.duty_paid,
            PaymentCategory::Delivery => self.delivery_paid,
            PaymentCategory::Insurance => self.insurance_paid,
            PaymentCategory::Deposit => self.deposit_paid,
        }
    }

    pub fn toggle(&mut self, category: PaymentCategory) -> bool {
        let flag = match category {
            PaymentCategory::Duty => &mut self.duty_paid,
            PaymentCategory::Delivery => &mut self.delivery_paid,
            PaymentCategory::Insurance => &mut self.insurance_paid,
            PaymentCategory::Deposit => &mut self.deposit_paid,
        };
        *flag = !*flag;
        *flag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCategory {
    Duty,
    Delivery,
    Insurance,
    Deposit,
}

impl PaymentCategory {
    pub const ALL: [PaymentCategory; 4] = [
        PaymentCategory::Duty,
        PaymentCategory::Delivery,
        PaymentCategory::Insurance,
        PaymentCategory::Deposit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentCategory::Duty => "duty",
            PaymentCategory::Delivery => "delivery",
            PaymentCategory::Insurance => "insurance",
            PaymentCategory::Deposit => "deposit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duty" => Some(PaymentCategory::Duty),
            "delivery" => Some(PaymentCategory::Delivery),
            "insurance" => Some(PaymentCategory::Insurance),
            "deposit" => Some(PaymentCategory::Deposit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentCategory::Duty => "Duty",
            PaymentCategory::Delivery => "Delivery",
            PaymentCategory::Insurance => "Insurance",
            PaymentCategory::Deposit => "Deposit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_flags_toggle() {
        let mut flags = PaymentFlags::default();
        assert!(!flags.get(PaymentCategory::Duty));

        assert!(flags.toggle(PaymentCategory::Duty));
        assert!(flags.get(PaymentCategory::Duty));
        assert!(!flags.get(PaymentCategory::Insurance));

        assert!(!flags.toggle(PaymentCategory::Duty));
        assert!(!flags.get(PaymentCategory::Duty));
    }

    #[test]
    fn test_payment_category_round_trip() {
        for category in PaymentCategory::ALL {
            assert_eq!(PaymentCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(PaymentCategory::parse("vat"), None);
    }

    #[test]
    fn test_record_serializes_date_as_iso() {
        let record = CustomerRecord::new(
            "@alice".to_string(),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["target_date"], "2026-09-01");
        assert_eq!(json["notified"], false);
    }

    #[test]
    fn test_record_deserializes_without_optional_fields() {
        let json = r#"{"key": "TRK-1", "target_date": "2026-09-05"}"#;
        let record: CustomerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.key, "TRK-1");
        assert_eq!(record.order_amount, None);
        assert!(!record.notified);
        assert_eq!(record.payments, PaymentFlags::default());
    }
}
