use chrono::{Duration, NaiveDate};

use deliverbot::models::CustomerRecord;

pub const QUICK_PICK_DAYS: i64 = 7;
pub const DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

/// Which optional steps this session collects. Snapshotted from the
/// process settings when the session starts; later toggle changes do not
/// affect a running session.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeFlags {
    pub collect_amount: bool,
    pub collect_product_count: bool,
    pub ask_split: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntakeStep {
    Key,
    TargetDate,
    CustomDate,
    OrderAmount,
    ProductCount,
    SplitPayment,
}

#[derive(Debug, Clone, Default)]
struct IntakeDraft {
    key: Option<String>,
    target_date: Option<NaiveDate>,
    order_amount: Option<f64>,
    product_count: Option<u32>,
    split_payment: Option<bool>,
}

/// Ephemeral per-chat intake state. Created by `start`, advanced one input
/// at a time, discarded by the caller on completion or cancellation.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    step: IntakeStep,
    draft: IntakeDraft,
    flags: IntakeFlags,
}

#[derive(Debug, Clone, Copy)]
pub enum IntakeInput<'a> {
    Text(&'a str),
    QuickDate(NaiveDate),
    CustomDateRequested,
    Split(bool),
}

/// What to ask the user next. The telegram layer owns the wording and
/// keyboards; the machine only names the step and its context.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Key,
    TargetDate { key: String, options: Vec<NaiveDate> },
    CustomDate,
    OrderAmount { key: String, target_date: NaiveDate },
    ProductCount,
    SplitPayment { amount: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyKey,
    BadDateFormat,
    PastDate,
    BadAmount,
    BadCount,
    UnexpectedInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    Next(Prompt),
    Rejected { reason: RejectReason, prompt: Prompt },
    Complete(CustomerRecord),
}

pub fn quick_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=QUICK_PICK_DAYS)
        .map(|i| today + Duration::days(i))
        .collect()
}

pub fn sanitize_input(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_amount(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok()
}

impl IntakeSession {
    pub fn start(flags: IntakeFlags) -> (Self, Prompt) {
        let session = Self {
            step: IntakeStep::Key,
            draft: IntakeDraft::default(),
            flags,
        };
        (session, Prompt::Key)
    }

    /// Advances one step. Invalid input keeps the session on the same step
    /// and re-prompts; a mismatched input kind (text where a button is
    /// expected, or the reverse) does the same.
    pub fn advance(&mut self, input: IntakeInput, today: NaiveDate) -> IntakeOutcome {
        match (self.step, input) {
            (IntakeStep::Key, IntakeInput::Text(text)) => {
                let key = sanitize_input(text);
                if key.is_empty() {
                    return self.reject(RejectReason::EmptyKey, today);
                }
                self.draft.key = Some(key);
                self.step = IntakeStep::TargetDate;
                IntakeOutcome::Next(self.current_prompt(today))
            }
            (IntakeStep::TargetDate, IntakeInput::QuickDate(date)) => {
                // Quick picks come from our own keyboard and are valid by
                // construction.
                self.draft.target_date = Some(date);
                self.after_date(today)
            }
            (IntakeStep::TargetDate, IntakeInput::CustomDateRequested) => {
                self.step = IntakeStep::CustomDate;
                IntakeOutcome::Next(Prompt::CustomDate)
            }
            (IntakeStep::CustomDate, IntakeInput::Text(text)) => {
                let date = match NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT) {
                    Ok(d) => d,
                    Err(_) => return self.reject(RejectReason::BadDateFormat, today),
                };
                if date < today {
                    return self.reject(RejectReason::PastDate, today);
                }
                self.draft.target_date = Some(date);
                self.after_date(today)
            }
            (IntakeStep::OrderAmount, IntakeInput::Text(text)) => {
                match parse_amount(text) {
                    Some(amount) if amount > 0.0 => {
                        self.draft.order_amount = Some(amount);
                        self.after_amount(today)
                    }
                    _ => self.reject(RejectReason::BadAmount, today),
                }
            }
            (IntakeStep::ProductCount, IntakeInput::Text(text)) => {
                match text.trim().parse::<u32>() {
                    Ok(count) if count > 0 => {
                        self.draft.product_count = Some(count);
                        self.after_count(today)
                    }
                    _ => self.reject(RejectReason::BadCount, today),
                }
            }
            (IntakeStep::SplitPayment, IntakeInput::Split(split)) => {
                self.draft.split_payment = Some(split);
                self.complete()
            }
            _ => self.reject(RejectReason::UnexpectedInput, today),
        }
    }

    fn reject(&self, reason: RejectReason, today: NaiveDate) -> IntakeOutcome {
        IntakeOutcome::Rejected {
            reason,
            prompt: self.current_prompt(today),
        }
    }

    fn after_date(&mut self, today: NaiveDate) -> IntakeOutcome {
        if self.flags.collect_amount {
            self.step = IntakeStep::OrderAmount;
            IntakeOutcome::Next(self.current_prompt(today))
        } else {
            self.after_amount(today)
        }
    }

    fn after_amount(&mut self, today: NaiveDate) -> IntakeOutcome {
        if self.flags.collect_product_count {
            self.step = IntakeStep::ProductCount;
            IntakeOutcome::Next(self.current_prompt(today))
        } else {
            self.after_count(today)
        }
    }

    fn after_count(&mut self, today: NaiveDate) -> IntakeOutcome {
        if self.flags.ask_split {
            self.step = IntakeStep::SplitPayment;
            IntakeOutcome::Next(self.current_prompt(today))
        } else {
            self.complete()
        }
    }

    fn complete(&self) -> IntakeOutcome {
        let key = self.draft.key.clone().unwrap_or_default();
        let target_date = match self.draft.target_date {
            Some(d) => d,
            // Unreachable through advance(); kept total instead of panicking.
            None => return IntakeOutcome::Rejected {
                reason: RejectReason::UnexpectedInput,
                prompt: Prompt::Key,
            },
        };
        let mut record = CustomerRecord::new(key, target_date);
        record.order_amount = self.draft.order_amount;
        record.product_count = self.draft.product_count;
        record.split_payment = self.draft.split_payment;
        IntakeOutcome::Complete(record)
    }

    fn current_prompt(&self, today: NaiveDate) -> Prompt {
        match self.step {
            IntakeStep::Key => Prompt::Key,
            IntakeStep::TargetDate => Prompt::TargetDate {
                key: self.draft.key.clone().unwrap_or_default(),
                options: quick_dates(today),
            },
            IntakeStep::CustomDate => Prompt::CustomDate,
            IntakeStep::OrderAmount => Prompt::OrderAmount {
                key: self.draft.key.clone().unwrap_or_default(),
                target_date: self.draft.target_date.unwrap_or(today),
            },
            IntakeStep::ProductCount => Prompt::ProductCount,
            IntakeStep::SplitPayment => Prompt::SplitPayment {
                amount: self.draft.order_amount.unwrap_or(0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    #[test]
    fn test_minimal_intake_completes_without_optional_steps() {
        let (mut session, prompt) = IntakeSession::start(IntakeFlags::default());
        assert_eq!(prompt, Prompt::Key);

        let outcome = session.advance(IntakeInput::Text("@alice"), today());
        assert!(matches!(outcome, IntakeOutcome::Next(Prompt::TargetDate { .. })));

        let pick = today() + Duration::days(3);
        let outcome = session.advance(IntakeInput::QuickDate(pick), today());
        let record = match outcome {
            IntakeOutcome::Complete(r) => r,
            other => panic!("expected completion, got {:?}", other),
        };

        assert_eq!(record.key, "@alice");
        assert_eq!(record.target_date, pick);
        assert_eq!(record.order_amount, None);
        assert!(!record.notified);
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        let outcome = session.advance(IntakeInput::Text("   "), today());
        assert!(matches!(
            outcome,
            IntakeOutcome::Rejected {
                reason: RejectReason::EmptyKey,
                prompt: Prompt::Key,
            }
        ));
    }

    #[test]
    fn test_past_custom_date_re_prompts_same_step() {
        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        session.advance(IntakeInput::Text("@alice"), today());
        session.advance(IntakeInput::CustomDateRequested, today());

        let outcome = session.advance(IntakeInput::Text("28.08.2026"), today());
        assert!(matches!(
            outcome,
            IntakeOutcome::Rejected {
                reason: RejectReason::PastDate,
                prompt: Prompt::CustomDate,
            }
        ));

        // Still on the custom-date step; a valid date now completes.
        let outcome = session.advance(IntakeInput::Text("02.09.2026"), today());
        assert!(matches!(outcome, IntakeOutcome::Complete(_)));
    }

    #[test]
    fn test_custom_date_today_is_accepted() {
        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        session.advance(IntakeInput::Text("@alice"), today());
        session.advance(IntakeInput::CustomDateRequested, today());

        let outcome = session.advance(IntakeInput::Text("29.08.2026"), today());
        match outcome {
            IntakeOutcome::Complete(record) => assert_eq!(record.target_date, today()),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_date_is_rejected() {
        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        session.advance(IntakeInput::Text("@alice"), today());
        session.advance(IntakeInput::CustomDateRequested, today());

        let outcome = session.advance(IntakeInput::Text("2026-09-02"), today());
        assert!(matches!(
            outcome,
            IntakeOutcome::Rejected {
                reason: RejectReason::BadDateFormat,
                ..
            }
        ));
    }

    #[test]
    fn test_full_flow_with_all_steps_enabled() {
        let flags = IntakeFlags {
            collect_amount: true,
            collect_product_count: true,
            ask_split: true,
        };
        let (mut session, _) = IntakeSession::start(flags);

        session.advance(IntakeInput::Text("TRK-42"), today());
        let pick = today() + Duration::days(1);
        let outcome = session.advance(IntakeInput::QuickDate(pick), today());
        assert!(matches!(outcome, IntakeOutcome::Next(Prompt::OrderAmount { .. })));

        let outcome = session.advance(IntakeInput::Text("12000,50"), today());
        assert!(matches!(outcome, IntakeOutcome::Next(Prompt::ProductCount)));

        let outcome = session.advance(IntakeInput::Text("3"), today());
        assert!(matches!(
            outcome,
            IntakeOutcome::Next(Prompt::SplitPayment { .. })
        ));

        let record = match session.advance(IntakeInput::Split(true), today()) {
            IntakeOutcome::Complete(r) => r,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(record.order_amount, Some(12000.5));
        assert_eq!(record.product_count, Some(3));
        assert_eq!(record.split_payment, Some(true));
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let flags = IntakeFlags {
            collect_amount: true,
            ..IntakeFlags::default()
        };
        let (mut session, _) = IntakeSession::start(flags);
        session.advance(IntakeInput::Text("@alice"), today());
        session.advance(IntakeInput::QuickDate(today() + Duration::days(1)), today());

        for bad in ["0", "-5", "abc"] {
            let outcome = session.advance(IntakeInput::Text(bad), today());
            assert!(matches!(
                outcome,
                IntakeOutcome::Rejected {
                    reason: RejectReason::BadAmount,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_mismatched_input_kind_re_prompts() {
        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        session.advance(IntakeInput::Text("@alice"), today());

        // Free text while the date keyboard is showing.
        let outcome = session.advance(IntakeInput::Text("tomorrow please"), today());
        assert!(matches!(
            outcome,
            IntakeOutcome::Rejected {
                reason: RejectReason::UnexpectedInput,
                prompt: Prompt::TargetDate { .. },
            }
        ));
    }

    #[test]
    fn test_completed_intake_lands_in_store_once() {
        use deliverbot::store::CustomerStore;
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let mut store = CustomerStore::load(dir.path().join("customers.json"));

        let (mut session, _) = IntakeSession::start(IntakeFlags::default());
        session.advance(IntakeInput::Text("@alice"), today());
        let pick = today() + Duration::days(3);
        let record = match session.advance(IntakeInput::QuickDate(pick), today()) {
            IntakeOutcome::Complete(r) => r,
            other => panic!("expected completion, got {:?}", other),
        };
        store.upsert(record);

        let records = store.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "@alice");
        assert_eq!(records[0].target_date, pick);
        assert_eq!(records[0].order_amount, None);
        assert!(!records[0].notified);
    }

    #[test]
    fn test_quick_dates_are_the_next_seven_days() {
        let dates = quick_dates(today());
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], today() + Duration::days(1));
        assert_eq!(dates[6], today() + Duration::days(7));
    }
}
