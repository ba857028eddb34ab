//! Outbound interfaces: the repetition event sink and the learner-facing
//! message surface. Hosts install their own implementations; the defaults
//! forward everything to the `log` facade.

use review_domain::Card;

/// Sink receiving one event per committed repetition.
pub trait RepetitionSink {
    /// Called after every commit, and once per card during initial grading.
    fn repetition(
        &mut self,
        card: &Card,
        scheduled_interval: i64,
        actual_interval: i64,
        thinking_time: i64,
    );
}

/// Default sink forwarding repetition events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl RepetitionSink for LogSink {
    fn repetition(
        &mut self,
        card: &Card,
        scheduled_interval: i64,
        actual_interval: i64,
        thinking_time: i64,
    ) {
        log::debug!(
            "repetition {} grade={} scheduled={}s actual={}s thinking={}s",
            card.id,
            card.grade_code(),
            scheduled_interval,
            actual_interval,
            thinking_time,
        );
    }
}

/// The two opaque messages the scheduler surfaces to the learner.
pub trait SchedulerUi {
    /// Informational notice, e.g. the workload warning.
    fn show_information(&mut self, message: &str);
    /// Internal-error signal; the scheduler proceeds after reporting.
    fn show_error(&mut self, message: &str);
}

/// Default surface routing messages to the `log` facade.
#[derive(Debug, Default)]
pub struct LogUi;

impl SchedulerUi for LogUi {
    fn show_information(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn show_error(&mut self, message: &str) {
        log::error!("{message}");
    }
}
