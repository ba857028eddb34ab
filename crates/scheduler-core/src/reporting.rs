//! Scheduled-count helpers and human-readable interval rendering.

use review_domain::{Card, DAY, HOUR};

use crate::scheduler::Scheduler;
use crate::store::SchedulerStore;
use crate::time::midnight_utc;

impl<S: SchedulerStore> Scheduler<S> {
    /// Number of cards currently due. While learning ahead the store count
    /// lags behind, so the working queue provides a floor.
    pub fn scheduled_count(&self) -> usize {
        let queue_count = if self.queue.in_learn_ahead() {
            self.queue.len() + 1
        } else {
            0
        };
        self.store.scheduled_count(self.adjusted_now()).max(queue_count)
    }

    /// Number of cards that are unseen or sitting at grade 0.
    pub fn non_memorised_count(&self) -> usize {
        self.store.non_memorised_count()
    }

    /// Number of cards in the active set.
    pub fn active_count(&self) -> usize {
        self.store.active_count()
    }

    /// Cards scheduled `n` days from now: yesterday is −1, today 0,
    /// tomorrow 1. Past days delegate to the store's historical query.
    pub fn card_count_scheduled_n_days_from_now(&self, n: i64) -> usize {
        if n > 0 {
            let now = self.adjusted_now();
            self.store
                .card_count_scheduled_between(now + (n - 1) * DAY, now + n * DAY)
        } else {
            self.store.card_count_scheduled_n_days_ago(-n)
        }
    }

    /// Renders `next_rep` relative to `now` (default: adjusted now) as a
    /// short phrase like "tomorrow" or "in 12 days".
    pub fn next_rep_to_interval_string(&self, next_rep: i64, now: Option<i64>) -> String {
        let now = now.unwrap_or_else(|| self.adjusted_now());
        let interval_days = (next_rep - now) as f64 / DAY as f64;
        if interval_days >= 1.0 {
            format!("in {} days", interval_days as i64 + 1)
        } else if interval_days >= 0.0 {
            "tomorrow".to_string()
        } else if interval_days >= -1.0 {
            "today".to_string()
        } else if interval_days >= -2.0 {
            "1 day overdue".to_string()
        } else {
            format!("{} days overdue", (-interval_days) as i64 - 1)
        }
    }

    /// Renders `last_rep` relative to `now` (default: the clock) as a short
    /// phrase like "Today" or "3 days ago". Both ends are snapped to their
    /// day-start-shifted dates so the phrase follows the study day, not the
    /// calendar one.
    pub fn last_rep_to_interval_string(&self, last_rep: i64, now: Option<i64>) -> String {
        if last_rep == Card::NEVER {
            return "Never".to_string();
        }
        let now = now.unwrap_or_else(|| self.clock.now());
        let shift = i64::from(self.config.day_starts_at) * HOUR;
        let now = midnight_utc(self.zone.as_ref(), now - shift);
        let last_rep = midnight_utc(self.zone.as_ref(), last_rep - shift);
        let interval_days = (last_rep - now) as f64 / DAY as f64;
        if interval_days > -1.0 {
            "Today".to_string()
        } else if interval_days > -2.0 {
            format!("{} day ago", (-interval_days) as i64)
        } else {
            format!("{} days ago", (-interval_days) as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use review_domain::{CardId, FactId, Grade};

    use crate::config::SchedulerConfig;
    use crate::store::{InMemoryStore, SchedulerStore};
    use crate::time::{FixedZone, ManualClock};

    use super::*;

    const T: i64 = 1_700_000_000;

    fn scheduler(clock: &ManualClock) -> Scheduler<InMemoryStore> {
        Scheduler::new(InMemoryStore::new(), SchedulerConfig { day_starts_at: 0 })
            .with_clock(Box::new(clock.clone()))
            .with_zone(Box::new(FixedZone::utc()))
    }

    fn retained_card(id: u64, next_rep: i64) -> Card {
        let mut card = Card::new(CardId::new(id), FactId::new(id));
        card.grade = Some(Grade::Same);
        card.last_rep = 0;
        card.next_rep = next_rep;
        card
    }

    #[test]
    fn next_rep_strings_cover_every_bucket() {
        let clock = ManualClock::new(T);
        let scheduler = scheduler(&clock);
        let now = Some(T);
        assert_eq!(
            scheduler.next_rep_to_interval_string(T + 12 * DAY, now),
            "in 13 days"
        );
        assert_eq!(
            scheduler.next_rep_to_interval_string(T + DAY, now),
            "in 2 days"
        );
        assert_eq!(
            scheduler.next_rep_to_interval_string(T + DAY / 2, now),
            "tomorrow"
        );
        assert_eq!(scheduler.next_rep_to_interval_string(T, now), "tomorrow");
        assert_eq!(
            scheduler.next_rep_to_interval_string(T - DAY / 2, now),
            "today"
        );
        assert_eq!(
            scheduler.next_rep_to_interval_string(T - 3 * DAY / 2, now),
            "1 day overdue"
        );
        assert_eq!(
            scheduler.next_rep_to_interval_string(T - 7 * DAY / 2, now),
            "2 days overdue"
        );
    }

    #[test]
    fn last_rep_strings_snap_to_study_days() {
        let clock = ManualClock::new(T);
        let mut scheduler = scheduler(&clock);
        scheduler.config.day_starts_at = 3;
        let now = Some(T);
        assert_eq!(
            scheduler.last_rep_to_interval_string(Card::NEVER, now),
            "Never"
        );
        assert_eq!(scheduler.last_rep_to_interval_string(T, now), "Today");
        assert_eq!(
            scheduler.last_rep_to_interval_string(T - DAY, now),
            "1 day ago"
        );
        assert_eq!(
            scheduler.last_rep_to_interval_string(T - 3 * DAY, now),
            "3 days ago"
        );
    }

    #[test]
    fn n_days_from_now_uses_half_open_day_windows() {
        let clock = ManualClock::new(T);
        let mut scheduler = scheduler(&clock);
        scheduler
            .store_mut()
            .upsert_card(retained_card(1, T + DAY / 2));
        scheduler
            .store_mut()
            .upsert_card(retained_card(2, T + 3 * DAY / 2));

        assert_eq!(scheduler.card_count_scheduled_n_days_from_now(1), 1);
        assert_eq!(scheduler.card_count_scheduled_n_days_from_now(2), 1);
        assert_eq!(scheduler.card_count_scheduled_n_days_from_now(3), 0);
    }

    #[test]
    fn past_days_delegate_to_the_store_history() {
        let clock = ManualClock::new(T);
        let mut scheduler = scheduler(&clock);
        let mut card = retained_card(1, T + 5 * DAY);
        card.last_rep = T - DAY / 2;
        scheduler.store_mut().upsert_card(card);
        scheduler.store_mut().set_history_reference(T);

        assert_eq!(scheduler.card_count_scheduled_n_days_from_now(-1), 1);
        assert_eq!(scheduler.card_count_scheduled_n_days_from_now(-2), 0);
    }

    #[test]
    fn scheduled_count_reflects_due_cards() {
        let clock = ManualClock::new(T);
        let mut scheduler = scheduler(&clock);
        scheduler.store_mut().upsert_card(retained_card(1, T - DAY));
        scheduler.store_mut().upsert_card(retained_card(2, T + DAY));
        assert_eq!(scheduler.scheduled_count(), 1);
        assert_eq!(scheduler.store().scheduled_count(scheduler.adjusted_now()), 1);
    }
}
