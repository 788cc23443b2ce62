use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct Metrics {
    pub messages_sent: AtomicU64,
    pub intakes_completed: AtomicU64,
    pub reminders_sent: AtomicU64,
    pub errors: AtomicU64,
    pub start_time: Instant,
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub intakes_completed: u64,
    pub reminders_sent: u64,
    pub errors: u64,
    pub uptime_secs: u64,
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "uptime {}s, messages sent {}, intakes completed {}, reminders sent {}, errors {}",
            self.uptime_secs,
            self.messages_sent,
            self.intakes_completed,
            self.reminders_sent,
            self.errors
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            messages_sent: AtomicU64::new(0),
            intakes_completed: AtomicU64::new(0),
            reminders_sent: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn increment_messages_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_intakes_completed(&self) {
        self.intakes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reminders_sent(&self) {
        self.reminders_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            intakes_completed: self.intakes_completed.load(Ordering::Relaxed),
            reminders_sent: self.reminders_sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_metrics() {
        let metrics = Metrics::new();
        metrics.increment_messages_sent();
        metrics.increment_messages_sent();
        metrics.increment_reminders_sent();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_sent, 2);
        assert_eq!(snapshot.reminders_sent, 1);
        assert_eq!(snapshot.errors, 0);
    }

    #[test]
    fn test_snapshot_renders_every_counter() {
        let snapshot = MetricsSnapshot {
            messages_sent: 7,
            intakes_completed: 3,
            reminders_sent: 2,
            errors: 1,
            uptime_secs: 90,
        };

        let line = snapshot.to_string();
        assert!(line.contains("uptime 90s"));
        assert!(line.contains("messages sent 7"));
        assert!(line.contains("intakes completed 3"));
        assert!(line.contains("reminders sent 2"));
        assert!(line.contains("errors 1"));
    }
}
