use std::cmp::Ordering;

use review_domain::Card;

use super::SortOrder;

/// Ordering function for store query results. Ties break on the card
/// identifier so every order is stable across rebuilds.
#[must_use]
pub fn candidate_ordering(a: &Card, b: &Card, order: SortOrder) -> Ordering {
    match order {
        SortOrder::ShortestIntervalFirst => (a.scheduled_interval(), a.id)
            .cmp(&(b.scheduled_interval(), b.id)),
        SortOrder::LongestIntervalFirst => b
            .scheduled_interval()
            .cmp(&a.scheduled_interval())
            .then_with(|| a.id.cmp(&b.id)),
        SortOrder::LastRep => (a.last_rep, a.id).cmp(&(b.last_rep, b.id)),
    }
}

#[cfg(test)]
mod tests {
    use review_domain::{CardId, FactId, DAY};

    use super::*;

    fn card_with_interval(id: u64, interval_days: i64) -> Card {
        let mut card = Card::new(CardId::new(id), FactId::new(id));
        card.last_rep = 1_000;
        card.next_rep = 1_000 + interval_days * DAY;
        card
    }

    #[test]
    fn shortest_interval_first_orders_ascending() {
        let short = card_with_interval(1, 2);
        let long = card_with_interval(2, 50);
        assert_eq!(
            candidate_ordering(&short, &long, SortOrder::ShortestIntervalFirst),
            Ordering::Less
        );
        assert_eq!(
            candidate_ordering(&long, &short, SortOrder::ShortestIntervalFirst),
            Ordering::Greater
        );
    }

    #[test]
    fn longest_interval_first_orders_descending() {
        let short = card_with_interval(1, 2);
        let long = card_with_interval(2, 50);
        assert_eq!(
            candidate_ordering(&long, &short, SortOrder::LongestIntervalFirst),
            Ordering::Less
        );
    }

    #[test]
    fn equal_intervals_tie_break_on_id() {
        let a = card_with_interval(1, 10);
        let b = card_with_interval(2, 10);
        for order in [
            SortOrder::ShortestIntervalFirst,
            SortOrder::LongestIntervalFirst,
        ] {
            assert_eq!(candidate_ordering(&a, &b, order), Ordering::Less);
            assert_eq!(candidate_ordering(&b, &a, order), Ordering::Greater);
        }
    }

    #[test]
    fn last_rep_orders_by_grading_time() {
        let mut early = card_with_interval(2, 10);
        early.last_rep = 100;
        let mut late = card_with_interval(1, 10);
        late.last_rep = 200;
        assert_eq!(
            candidate_ordering(&early, &late, SortOrder::LastRep),
            Ordering::Less
        );
    }

    #[test]
    fn identical_cards_compare_equal() {
        let a = card_with_interval(1, 10);
        let b = card_with_interval(1, 10);
        for order in [
            SortOrder::ShortestIntervalFirst,
            SortOrder::LongestIntervalFirst,
            SortOrder::LastRep,
        ] {
            assert_eq!(candidate_ordering(&a, &b, order), Ordering::Equal);
        }
    }
}
