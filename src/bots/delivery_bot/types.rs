use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveTime;

use deliverbot::store::CustomerStore;

use crate::services::reminder_scheduler::NotificationSink;

use super::intake::{IntakeFlags, IntakeSession};

pub const DEFAULT_REMINDER_TIME: (u32, u32) = (9, 0);

/// Process-wide toggles changed through the settings menu. Intake sessions
/// snapshot these at start, so a mid-session toggle never reshapes a
/// running flow.
#[derive(Debug, Clone, Copy)]
pub struct BotSettings {
    pub collect_amount: bool,
    pub ask_split: bool,
    pub reminder_time: NaiveTime,
}

impl Default for BotSettings {
    fn default() -> Self {
        let (hour, minute) = DEFAULT_REMINDER_TIME;
        Self {
            collect_amount: false,
            ask_split: false,
            reminder_time: NaiveTime::from_hms_opt(hour, minute, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

/// The one conversation a chat can be in. Starting a new intake replaces
/// whatever was here before.
pub enum Session {
    Intake(IntakeSession),
    AwaitReminderTime,
}

pub struct BotState {
    store: Mutex<CustomerStore>,
    sessions: Mutex<HashMap<i64, Session>>,
    settings: Mutex<BotSettings>,
    pub reminder_sink: Arc<dyn NotificationSink>,
    pub track_payments: bool,
    pub reminder_after_days: Option<i64>,
}

impl BotState {
    pub fn new(
        store: CustomerStore,
        reminder_sink: Arc<dyn NotificationSink>,
        track_payments: bool,
        reminder_after_days: Option<i64>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            sessions: Mutex::new(HashMap::new()),
            settings: Mutex::new(BotSettings::default()),
            reminder_sink,
            track_payments,
            reminder_after_days,
        }
    }

    // Lock holders never panic and never await, so poisoning is not a
    // reachable state.
    pub fn store(&self) -> MutexGuard<'_, CustomerStore> {
        self.store.lock().expect("store mutex poisoned")
    }

    pub fn sessions(&self) -> MutexGuard<'_, HashMap<i64, Session>> {
        self.sessions.lock().expect("sessions mutex poisoned")
    }

    pub fn settings(&self) -> MutexGuard<'_, BotSettings> {
        self.settings.lock().expect("settings mutex poisoned")
    }

    /// Step toggles for a session starting now.
    pub fn intake_flags(&self) -> IntakeFlags {
        let settings = self.settings();
        IntakeFlags {
            collect_amount: settings.collect_amount || self.track_payments,
            collect_product_count: self.track_payments,
            ask_split: settings.ask_split,
        }
    }
}
