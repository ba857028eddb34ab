use review_domain::{Card, CardId, FactId, Grade};

/// How a store query orders the candidates it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Shortest scheduled interval first. Being a day late on an interval
    /// of two is much worse than being a day late on an interval of fifty.
    ShortestIntervalFirst,
    /// Longest scheduled interval first; used when learning ahead.
    LongestIntervalFirst,
    /// Oldest `last_rep` first, preserving the order cards were graded in.
    LastRep,
}

/// Criterion applied to a card after each committed repetition, e.g. to
/// re-evaluate whether the card stays in the active set.
pub trait ReviewCriterion {
    fn apply_to_card(&self, card: &mut Card);
}

/// Criterion that keeps every card as it is.
#[derive(Debug, Default)]
pub struct DefaultCriterion;

impl ReviewCriterion for DefaultCriterion {
    fn apply_to_card(&self, _card: &mut Card) {}
}

/// Storage abstraction required by the scheduler.
///
/// Range queries treat `lo` as inclusive and `hi` as exclusive. Queries
/// returning `(card, fact)` pairs materialize at most `limit` rows where a
/// limit is given.
pub trait SchedulerStore {
    /// Whether a card collection is currently open.
    fn is_loaded(&self) -> bool;

    /// Fetch a card by identifier if it exists.
    fn card(&self, id: CardId) -> Option<Card>;

    /// Insert or update a card in the backing store.
    fn upsert_card(&mut self, card: Card);

    /// Retention-phase cards due at the adjusted time, i.e. with
    /// `next_rep <= adjusted_now`.
    fn cards_due_for_ret_rep(
        &self,
        adjusted_now: i64,
        order: SortOrder,
        limit: usize,
    ) -> Vec<(CardId, FactId)>;

    /// Cards at the given grade that lapsed out of the retention phase.
    fn cards_to_relearn(&self, grade: Grade, order: SortOrder) -> Vec<(CardId, FactId)>;

    /// Cards at the given grade that have never reached the retention phase.
    fn cards_new_memorising(&self, grade: Grade) -> Vec<(CardId, FactId)>;

    /// Cards that have never been graded.
    fn cards_unseen(&self, limit: usize) -> Vec<(CardId, FactId)>;

    /// Retention-phase cards with `next_rep <= max_next_rep`, candidates for
    /// studying ahead of schedule.
    fn cards_learn_ahead(&self, max_next_rep: i64, order: SortOrder) -> Vec<(CardId, FactId)>;

    /// Number of sister cards of `card` scheduled in `[lo, hi)`.
    fn sister_card_count_scheduled_between(&self, card: &Card, lo: i64, hi: i64) -> usize;

    /// Number of retention-phase cards due at the adjusted time.
    fn scheduled_count(&self, adjusted_now: i64) -> usize;

    /// Number of cards that are unseen or sitting at grade 0.
    fn non_memorised_count(&self) -> usize;

    /// Number of cards in the active set.
    fn active_count(&self) -> usize;

    /// Number of retention-phase cards with `next_rep` in `[lo, hi)`.
    fn card_count_scheduled_between(&self, lo: i64, hi: i64) -> usize;

    /// Historical count of cards repeated `n` days ago.
    fn card_count_scheduled_n_days_ago(&self, n: i64) -> usize;

    /// The criterion applied to cards after each committed repetition.
    fn current_criterion(&self) -> &dyn ReviewCriterion;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criterion_leaves_cards_untouched() {
        use review_domain::{CardId, FactId};

        let mut card = Card::new(CardId::new(1), FactId::new(1));
        let before = card.clone();
        DefaultCriterion.apply_to_card(&mut card);
        assert_eq!(card, before);
    }
}
