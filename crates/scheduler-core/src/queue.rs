//! Working-queue state and the five-stage rebuild pipeline.
//!
//! The queue holds card identifiers (duplicates allowed: a forgotten card
//! is queued twice so the learner re-sees it within the session). The fact
//! identifiers of queued cards are tracked so that no two sister cards can
//! ever be in the queue together. Facts memorised this session persist
//! across rebuilds and keep sister cards out of the unseen pile.

use std::collections::{BTreeSet, VecDeque};

use review_domain::{CardId, FactId, Grade, DAY};

use crate::store::{SchedulerStore, SortOrder};

/// At most this many cards are fetched per query, trading memory use
/// against redoing the query.
const FETCH_LIMIT: usize = 50;
/// Concentrate on a limited number of non-memorised cards at a time, to
/// avoid overly long gaps between repetitions of the same card.
const NON_MEMORISED_LIMIT: usize = 50;
/// Learning ahead looks at cards scheduled within the next week.
const LEARN_AHEAD_WINDOW_DAYS: i64 = 7;
/// Only cards with an interval this long are safe to study early; short
/// intervals really should run their full course.
const LEARN_AHEAD_MIN_INTERVAL_DAYS: i64 = 34;

/// Stages of the queue-building pipeline. The recorded stage lets the next
/// rebuild skip queries that can no longer produce cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    /// Cards scheduled for today or overdue.
    DueToday,
    /// Cards forgotten during earlier reviews.
    Relearn,
    /// Cards seen before but never committed to long-term memory.
    Memorising,
    /// Cards never shown to the learner.
    Unseen,
    /// Cards pulled in ahead of schedule.
    LearnAhead,
}

fn fallback_stage(new_only: bool) -> Stage {
    if new_only { Stage::Memorising } else { Stage::Relearn }
}

/// Process-local queue state; created on reset and rebuilt as it drains.
#[derive(Debug)]
pub(crate) struct ReviewQueue {
    card_ids: VecDeque<CardId>,
    fact_ids: BTreeSet<FactId>,
    fact_ids_memorised: BTreeSet<FactId>,
    card_id_last: Option<CardId>,
    stage: Stage,
    new_only: bool,
    in_learn_ahead: bool,
    warned_about_too_many_cards: bool,
}

impl ReviewQueue {
    pub(crate) fn new(new_only: bool) -> Self {
        Self {
            card_ids: VecDeque::new(),
            fact_ids: BTreeSet::new(),
            fact_ids_memorised: BTreeSet::new(),
            card_id_last: None,
            stage: if new_only { Stage::Memorising } else { Stage::DueToday },
            new_only,
            in_learn_ahead: false,
            warned_about_too_many_cards: false,
        }
    }

    pub(crate) fn reset(&mut self, new_only: bool) {
        *self = Self::new(new_only);
    }

    fn begin_rebuild(&mut self) {
        self.card_ids.clear();
        self.fact_ids.clear();
        self.in_learn_ahead = false;
    }

    fn append_once(&mut self, card_id: CardId, fact_id: FactId) {
        self.card_ids.push_back(card_id);
        self.fact_ids.insert(fact_id);
    }

    fn append_twice(&mut self, card_id: CardId, fact_id: FactId) {
        self.card_ids.push_back(card_id);
        self.card_ids.push_back(card_id);
        self.fact_ids.insert(fact_id);
    }

    fn contains_fact(&self, fact_id: FactId) -> bool {
        self.fact_ids.contains(&fact_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.card_ids.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    pub(crate) fn pop_front(&mut self) -> Option<CardId> {
        self.card_ids.pop_front()
    }

    pub(crate) fn front(&self) -> Option<CardId> {
        self.card_ids.front().copied()
    }

    pub(crate) fn contains(&self, card_id: CardId) -> bool {
        self.card_ids.contains(&card_id)
    }

    /// True when every queued entry repeats the same identifier.
    pub(crate) fn only_contains(&self, card_id: CardId) -> bool {
        self.card_ids.iter().all(|queued| *queued == card_id)
    }

    /// Removes the first occurrence of the identifier; returns whether one
    /// was found.
    pub(crate) fn remove_one(&mut self, card_id: CardId) -> bool {
        match self.card_ids.iter().position(|queued| *queued == card_id) {
            Some(index) => {
                self.card_ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn card_id_last(&self) -> Option<CardId> {
        self.card_id_last
    }

    pub(crate) fn set_card_id_last(&mut self, card_id: CardId) {
        self.card_id_last = Some(card_id);
    }

    pub(crate) fn note_memorised(&mut self, fact_id: FactId) {
        self.fact_ids_memorised.insert(fact_id);
    }

    pub(crate) fn memorised_count(&self) -> usize {
        self.fact_ids_memorised.len()
    }

    pub(crate) fn warned_about_too_many_cards(&self) -> bool {
        self.warned_about_too_many_cards
    }

    pub(crate) fn set_warned_about_too_many_cards(&mut self) {
        self.warned_about_too_many_cards = true;
    }

    pub(crate) fn in_learn_ahead(&self) -> bool {
        self.in_learn_ahead
    }
}

/// Walks the stages in order, filling the queue from the store. Each stage
/// may return early once it has produced a useful working set; the recorded
/// stage tells the next rebuild where to resume.
pub(crate) fn rebuild<S: SchedulerStore>(
    queue: &mut ReviewQueue,
    store: &S,
    adjusted_now: i64,
    learn_ahead: bool,
) {
    if !store.is_loaded() || store.active_count() == 0 {
        return;
    }
    queue.begin_rebuild();
    log::debug!("rebuilding queue from stage {:?}", queue.stage);

    let mut non_memorised_in_queue = 0;

    // Stage 1: cards scheduled for today or overdue, shortest interval
    // first, since being a day late on an interval of 2 hurts far more than
    // on an interval of 50.
    if queue.stage == Stage::DueToday {
        for (card_id, fact_id) in
            store.cards_due_for_ret_rep(adjusted_now, SortOrder::ShortestIntervalFirst, FETCH_LIMIT)
        {
            if !queue.contains_fact(fact_id) {
                queue.append_once(card_id, fact_id);
            }
        }
        if !queue.is_empty() {
            return;
        }
        queue.stage = Stage::Relearn;
    }

    // Stage 2: rememorise the cards that went wrong earlier, in the order
    // they were graded. Each is queued twice so it is seen again within the
    // session.
    if queue.stage == Stage::Relearn {
        for (card_id, fact_id) in store.cards_to_relearn(Grade::Forgot, SortOrder::LastRep) {
            if !queue.contains_fact(fact_id) {
                if non_memorised_in_queue < NON_MEMORISED_LIMIT {
                    queue.append_twice(card_id, fact_id);
                    non_memorised_in_queue += 1;
                }
                if non_memorised_in_queue == NON_MEMORISED_LIMIT {
                    break;
                }
            }
        }
        // Only stop at the non-memorised limit; otherwise keep going to add
        // extra cards for more spread.
        if non_memorised_in_queue == NON_MEMORISED_LIMIT {
            return;
        }
        // An empty queue means stage 2 can be skipped in the future.
        if queue.is_empty() {
            queue.stage = Stage::Memorising;
        }
    }

    // Stage 3: cards seen before but never committed to long-term memory.
    // `<=` lets earlier stages top up their hand from this stage.
    if queue.stage <= Stage::Memorising {
        for (card_id, fact_id) in store.cards_new_memorising(Grade::Forgot) {
            if !queue.contains_fact(fact_id) {
                if non_memorised_in_queue < NON_MEMORISED_LIMIT {
                    queue.append_twice(card_id, fact_id);
                    non_memorised_in_queue += 1;
                }
                if non_memorised_in_queue == NON_MEMORISED_LIMIT {
                    break;
                }
            }
        }
        if non_memorised_in_queue == NON_MEMORISED_LIMIT {
            return;
        }
        if queue.is_empty() {
            queue.stage = Stage::Unseen;
        }
    }

    // Stage 4: cards never seen before. Keep away from sister cards of
    // freshly memorised facts for as long as possible.
    if queue.stage <= Stage::Unseen {
        for (card_id, fact_id) in store.cards_unseen(FETCH_LIMIT) {
            if !queue.contains_fact(fact_id) && !queue.fact_ids_memorised.contains(&fact_id) {
                queue.append_once(card_id, fact_id);
                non_memorised_in_queue += 1;
                if non_memorised_in_queue == NON_MEMORISED_LIMIT {
                    queue.stage = fallback_stage(queue.new_only);
                    return;
                }
            }
        }

        // The queue is close to empty: start pulling in sister cards.
        if queue.fact_ids.len() <= 2 {
            for (card_id, fact_id) in store.cards_unseen(FETCH_LIMIT) {
                if !queue.contains_fact(fact_id) {
                    queue.append_once(card_id, fact_id);
                    non_memorised_in_queue += 1;
                    if non_memorised_in_queue == NON_MEMORISED_LIMIT {
                        queue.stage = fallback_stage(queue.new_only);
                        return;
                    }
                }
            }
        }

        if queue.is_empty() {
            queue.stage = Stage::LearnAhead;
        }
    }

    // Stage 5: no scheduled or new cards remain. Only fill the queue if the
    // caller asked to learn ahead, and only with cards whose interval is
    // long enough that an early review cannot wreck their schedule. Largest
    // interval first, like the daily pass.
    if !learn_ahead {
        queue.stage = fallback_stage(queue.new_only);
        return;
    }
    let max_next_rep = adjusted_now + LEARN_AHEAD_WINDOW_DAYS * DAY;
    for (card_id, _fact_id) in
        store.cards_learn_ahead(max_next_rep, SortOrder::LongestIntervalFirst)
    {
        let Some(card) = store.card(card_id) else {
            continue;
        };
        if card.scheduled_interval() / DAY < LEARN_AHEAD_MIN_INTERVAL_DAYS {
            continue;
        }
        queue.card_ids.push_back(card_id);
        queue.in_learn_ahead = true;
    }
    if queue.in_learn_ahead {
        log::info!("learning ahead of schedule with {} cards", queue.len());
    }
    // Cards forgotten while learning ahead are relearned next.
    queue.stage = Stage::Relearn;
}
