use std::collections::BTreeMap;

use review_domain::{Card, CardId, FactId, Grade, DAY};

use super::candidate_ordering::candidate_ordering;
use super::{DefaultCriterion, ReviewCriterion, SchedulerStore, SortOrder};

/// Reference in-memory implementation of [`SchedulerStore`] used in tests,
/// examples and hosts that keep their collection in memory.
pub struct InMemoryStore {
    cards: BTreeMap<CardId, Card>,
    criterion: Box<dyn ReviewCriterion>,
    history_reference: i64,
}

impl InMemoryStore {
    /// Construct a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: BTreeMap::new(),
            criterion: Box::new(DefaultCriterion),
            history_reference: 0,
        }
    }

    /// Replace the criterion applied after committed repetitions.
    pub fn set_criterion(&mut self, criterion: Box<dyn ReviewCriterion>) {
        self.criterion = criterion;
    }

    /// Anchor for the historical day windows used by
    /// [`SchedulerStore::card_count_scheduled_n_days_ago`]: the adjusted
    /// start of the current day. A database-backed store would consult its
    /// repetition log instead.
    pub fn set_history_reference(&mut self, adjusted_day_start: i64) {
        self.history_reference = adjusted_day_start;
    }

    fn sorted_pairs(&self, mut matches: Vec<&Card>, order: SortOrder) -> Vec<(CardId, FactId)> {
        matches.sort_by(|a, b| candidate_ordering(a, b, order));
        matches.into_iter().map(|card| (card.id, card.fact_id)).collect()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerStore for InMemoryStore {
    fn is_loaded(&self) -> bool {
        true
    }

    fn card(&self, id: CardId) -> Option<Card> {
        self.cards.get(&id).cloned()
    }

    fn upsert_card(&mut self, card: Card) {
        self.cards.insert(card.id, card);
    }

    fn cards_due_for_ret_rep(
        &self,
        adjusted_now: i64,
        order: SortOrder,
        limit: usize,
    ) -> Vec<(CardId, FactId)> {
        let due = self
            .cards
            .values()
            .filter(|card| card.in_retention_phase() && card.next_rep <= adjusted_now)
            .collect();
        let mut pairs = self.sorted_pairs(due, order);
        pairs.truncate(limit);
        pairs
    }

    fn cards_to_relearn(&self, grade: Grade, order: SortOrder) -> Vec<(CardId, FactId)> {
        let lapsed = self
            .cards
            .values()
            .filter(|card| card.grade == Some(grade) && card.lapses > 0)
            .collect();
        self.sorted_pairs(lapsed, order)
    }

    fn cards_new_memorising(&self, grade: Grade) -> Vec<(CardId, FactId)> {
        self.cards
            .values()
            .filter(|card| card.grade == Some(grade) && card.lapses == 0)
            .map(|card| (card.id, card.fact_id))
            .collect()
    }

    fn cards_unseen(&self, limit: usize) -> Vec<(CardId, FactId)> {
        self.cards
            .values()
            .filter(|card| card.is_unseen())
            .take(limit)
            .map(|card| (card.id, card.fact_id))
            .collect()
    }

    fn cards_learn_ahead(&self, max_next_rep: i64, order: SortOrder) -> Vec<(CardId, FactId)> {
        let upcoming = self
            .cards
            .values()
            .filter(|card| card.in_retention_phase() && card.next_rep <= max_next_rep)
            .collect();
        self.sorted_pairs(upcoming, order)
    }

    fn sister_card_count_scheduled_between(&self, card: &Card, lo: i64, hi: i64) -> usize {
        self.cards
            .values()
            .filter(|sister| {
                sister.fact_id == card.fact_id
                    && sister.id != card.id
                    && sister.next_rep >= lo
                    && sister.next_rep < hi
            })
            .count()
    }

    fn scheduled_count(&self, adjusted_now: i64) -> usize {
        self.cards
            .values()
            .filter(|card| card.in_retention_phase() && card.next_rep <= adjusted_now)
            .count()
    }

    fn non_memorised_count(&self) -> usize {
        self.cards
            .values()
            .filter(|card| card.is_unseen() || card.in_acquisition_phase())
            .count()
    }

    fn active_count(&self) -> usize {
        self.cards.len()
    }

    fn card_count_scheduled_between(&self, lo: i64, hi: i64) -> usize {
        self.cards
            .values()
            .filter(|card| {
                card.in_retention_phase() && card.next_rep >= lo && card.next_rep < hi
            })
            .count()
    }

    fn card_count_scheduled_n_days_ago(&self, n: i64) -> usize {
        let hi = self.history_reference - (n - 1) * DAY;
        let lo = self.history_reference - n * DAY;
        self.cards
            .values()
            .filter(|card| {
                card.last_rep != Card::NEVER && card.last_rep >= lo && card.last_rep < hi
            })
            .count()
    }

    fn current_criterion(&self) -> &dyn ReviewCriterion {
        self.criterion.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use review_domain::Grade;

    use super::*;

    fn retained_card(id: u64, fact: u64, last_rep: i64, next_rep: i64) -> Card {
        let mut card = Card::new(CardId::new(id), FactId::new(fact));
        card.grade = Some(Grade::Same);
        card.last_rep = last_rep;
        card.next_rep = next_rep;
        card
    }

    fn forgotten_card(id: u64, fact: u64, lapses: u32) -> Card {
        let mut card = Card::new(CardId::new(id), FactId::new(fact));
        card.grade = Some(Grade::Forgot);
        card.lapses = lapses;
        card.last_rep = 1_000 + i64::from(lapses);
        card.next_rep = card.last_rep;
        card
    }

    #[test]
    fn upsert_and_card_round_trip() {
        let mut store = InMemoryStore::new();
        let card = retained_card(1, 1, 0, DAY);
        assert!(store.card(card.id).is_none());
        store.upsert_card(card.clone());
        assert_eq!(store.card(card.id), Some(card.clone()));

        let mut updated = card.clone();
        updated.next_rep += DAY;
        store.upsert_card(updated.clone());
        assert_eq!(store.card(card.id), Some(updated));
    }

    #[test]
    fn due_cards_filter_and_order_shortest_first() {
        let mut store = InMemoryStore::new();
        store.upsert_card(retained_card(1, 1, 0, 50 * DAY)); // long interval, due
        store.upsert_card(retained_card(2, 2, 0, 2 * DAY)); // short interval, due
        store.upsert_card(retained_card(3, 3, 0, 100 * DAY)); // not due
        store.upsert_card(forgotten_card(4, 4, 0)); // acquisition phase

        let due = store.cards_due_for_ret_rep(50 * DAY, SortOrder::ShortestIntervalFirst, 50);
        assert_eq!(
            due,
            vec![
                (CardId::new(2), FactId::new(2)),
                (CardId::new(1), FactId::new(1)),
            ]
        );
    }

    #[test]
    fn due_cards_respect_the_limit() {
        let mut store = InMemoryStore::new();
        for id in 0..60 {
            store.upsert_card(retained_card(id, id, 0, DAY));
        }
        let due = store.cards_due_for_ret_rep(DAY, SortOrder::ShortestIntervalFirst, 50);
        assert_eq!(due.len(), 50);
    }

    #[test]
    fn relearn_and_memorising_split_on_lapses() {
        let mut store = InMemoryStore::new();
        store.upsert_card(forgotten_card(1, 1, 2)); // lapsed: relearn
        store.upsert_card(forgotten_card(2, 2, 0)); // never retained: memorising
        store.upsert_card(retained_card(3, 3, 0, DAY));

        let relearn = store.cards_to_relearn(Grade::Forgot, SortOrder::LastRep);
        assert_eq!(relearn, vec![(CardId::new(1), FactId::new(1))]);

        let memorising = store.cards_new_memorising(Grade::Forgot);
        assert_eq!(memorising, vec![(CardId::new(2), FactId::new(2))]);
    }

    #[test]
    fn relearn_orders_by_grading_time() {
        let mut store = InMemoryStore::new();
        let mut late = forgotten_card(1, 1, 1);
        late.last_rep = 9_000;
        late.next_rep = late.last_rep;
        let mut early = forgotten_card(2, 2, 1);
        early.last_rep = 1_000;
        early.next_rep = early.last_rep;
        store.upsert_card(late);
        store.upsert_card(early);

        let relearn = store.cards_to_relearn(Grade::Forgot, SortOrder::LastRep);
        assert_eq!(
            relearn,
            vec![
                (CardId::new(2), FactId::new(2)),
                (CardId::new(1), FactId::new(1)),
            ]
        );
    }

    #[test]
    fn unseen_cards_are_limited_and_id_ordered() {
        let mut store = InMemoryStore::new();
        for id in 0..5 {
            store.upsert_card(Card::new(CardId::new(id), FactId::new(id)));
        }
        store.upsert_card(retained_card(99, 99, 0, DAY));

        let unseen = store.cards_unseen(3);
        assert_eq!(
            unseen,
            vec![
                (CardId::new(0), FactId::new(0)),
                (CardId::new(1), FactId::new(1)),
                (CardId::new(2), FactId::new(2)),
            ]
        );
    }

    #[test]
    fn learn_ahead_orders_longest_interval_first() {
        let mut store = InMemoryStore::new();
        store.upsert_card(retained_card(1, 1, 0, 40 * DAY));
        store.upsert_card(retained_card(2, 2, 0, 90 * DAY));
        store.upsert_card(retained_card(3, 3, 0, 200 * DAY)); // outside window

        let ahead = store.cards_learn_ahead(100 * DAY, SortOrder::LongestIntervalFirst);
        assert_eq!(
            ahead,
            vec![
                (CardId::new(2), FactId::new(2)),
                (CardId::new(1), FactId::new(1)),
            ]
        );
    }

    #[test]
    fn sister_count_scans_the_window() {
        let mut store = InMemoryStore::new();
        let card = retained_card(1, 7, 0, 10 * DAY);
        store.upsert_card(card.clone());
        store.upsert_card(retained_card(2, 7, 0, 10 * DAY)); // same day sister
        store.upsert_card(retained_card(3, 7, 0, 11 * DAY)); // next day sister
        store.upsert_card(retained_card(4, 8, 0, 10 * DAY)); // unrelated fact

        assert_eq!(
            store.sister_card_count_scheduled_between(&card, 10 * DAY, 11 * DAY),
            1
        );
        assert_eq!(
            store.sister_card_count_scheduled_between(&card, 10 * DAY, 12 * DAY),
            2
        );
        // The card itself is never its own sister.
        assert_eq!(
            store.sister_card_count_scheduled_between(&card, 0, 100 * DAY),
            2
        );
    }

    #[test]
    fn counts_split_by_phase() {
        let mut store = InMemoryStore::new();
        store.upsert_card(Card::new(CardId::new(1), FactId::new(1))); // unseen
        store.upsert_card(forgotten_card(2, 2, 0)); // acquisition
        store.upsert_card(retained_card(3, 3, 0, DAY)); // retention, due at DAY

        assert_eq!(store.active_count(), 3);
        assert_eq!(store.non_memorised_count(), 2);
        assert_eq!(store.scheduled_count(DAY), 1);
        assert_eq!(store.scheduled_count(DAY - 1), 0);
    }

    #[test]
    fn scheduled_between_is_half_open() {
        let mut store = InMemoryStore::new();
        store.upsert_card(retained_card(1, 1, 0, 5 * DAY));
        assert_eq!(store.card_count_scheduled_between(5 * DAY, 6 * DAY), 1);
        assert_eq!(store.card_count_scheduled_between(4 * DAY, 5 * DAY), 0);
    }

    #[test]
    fn history_counts_use_day_windows() {
        let mut store = InMemoryStore::new();
        let reference = 100 * DAY;
        store.set_history_reference(reference);
        store.upsert_card(retained_card(1, 1, reference - DAY / 2, 105 * DAY)); // today
        store.upsert_card(retained_card(2, 2, reference - DAY - 1, 105 * DAY)); // two days ago
        store.upsert_card(Card::new(CardId::new(3), FactId::new(3))); // never repeated

        assert_eq!(store.card_count_scheduled_n_days_ago(1), 1);
        assert_eq!(store.card_count_scheduled_n_days_ago(2), 1);
        assert_eq!(store.card_count_scheduled_n_days_ago(3), 0);
    }
}
