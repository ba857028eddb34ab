//! High-level scheduler: the queue driver, the grading entry points and the
//! due-time arithmetic tying them together.
//!
//! The scheduler is a single-threaded state machine. Every entry point
//! completes synchronously; the host interleaves `next_card`,
//! `grade_answer`, `reset` and the reporting calls on one thread.

use rand::rngs::StdRng;
use rand::SeedableRng;

use review_domain::{Card, CardId, Grade, DAY, HOUR};

use crate::config::SchedulerConfig;
use crate::errors::SchedulerError;
use crate::events::{LogSink, LogUi, RepetitionSink, SchedulerUi};
use crate::hooks::{HookPoint, HookRegistry};
use crate::queue::{self, ReviewQueue};
use crate::sm2;
use crate::store::SchedulerStore;
use crate::time::{midnight_utc, Clock, LocalZone, Stopwatch, SystemClock, ZoneProvider};

/// Scheduler deciding which card to show next and when a graded card comes
/// back.
pub struct Scheduler<S: SchedulerStore> {
    pub(crate) store: S,
    pub(crate) config: SchedulerConfig,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) zone: Box<dyn ZoneProvider>,
    rng: StdRng,
    hooks: HookRegistry,
    sink: Box<dyn RepetitionSink>,
    ui: Box<dyn SchedulerUi>,
    pub(crate) queue: ReviewQueue,
    stopwatch: Stopwatch,
}

impl<S: SchedulerStore> Scheduler<S> {
    /// Creates a scheduler over the given store with the default
    /// collaborators: the system clock, the process-local timezone, and
    /// `log`-backed event surfaces.
    pub fn new(store: S, config: SchedulerConfig) -> Self {
        Self {
            store,
            config,
            clock: Box::new(SystemClock),
            zone: Box::new(LocalZone),
            rng: StdRng::from_entropy(),
            hooks: HookRegistry::new(),
            sink: Box::new(LogSink),
            ui: Box::new(LogUi),
            queue: ReviewQueue::new(false),
            stopwatch: Stopwatch::default(),
        }
    }

    /// Replaces the clock; readings drive due-time checks and grading.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the timezone provider.
    #[must_use]
    pub fn with_zone(mut self, zone: Box<dyn ZoneProvider>) -> Self {
        self.zone = zone;
        self
    }

    /// Replaces the repetition event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn RepetitionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the learner-facing message surface.
    #[must_use]
    pub fn with_ui(mut self, ui: Box<dyn SchedulerUi>) -> Self {
        self.ui = ui;
        self
    }

    /// Seeds the noise generator; used to make tests deterministic.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the scheduler and returns the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Hook channels fired around grading.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Clears all queue state. With `new_only` the rebuild skips scheduled
    /// cards and serves only the not-yet-memorised ones.
    pub fn reset(&mut self, new_only: bool) {
        self.queue.reset(new_only);
    }

    /// Timezone and day-start shift only become relevant when the queue is
    /// built, not at schedule time, so a card scheduled in one timezone
    /// becomes due at the configured hour after moving to another. Cards
    /// are due when `adjusted_now >= next_rep`.
    pub fn adjusted_now(&self) -> i64 {
        self.adjusted_time(self.clock.now())
    }

    /// [`Scheduler::adjusted_now`] for an explicit instant.
    pub fn adjusted_time(&self, now: i64) -> i64 {
        // The later the day starts, the later cards become due, so the
        // shift is subtracted. The offset is resolved at the shifted
        // instant, matching how the due comparison will read it.
        let shifted = now - i64::from(self.config.day_starts_at) * HOUR;
        shifted + self.zone.utc_offset(shifted)
    }

    /// The interval that led up to this repetition. `next_rep` is stored as
    /// midnight UTC, so the day-start shift and zone offset are undone to
    /// recover the real span.
    pub fn true_scheduled_interval(&mut self, card: &Card) -> i64 {
        let interval = card.next_rep - card.last_rep;
        if card.grade == Some(Grade::Forgot) {
            if interval != 0 {
                self.ui.show_error("Internal error: interval not zero.");
            }
            return interval;
        }
        interval + i64::from(self.config.day_starts_at) * HOUR
            - self.zone.utc_offset(self.clock.now())
    }

    /// Rebuilds the working queue from the store.
    pub fn rebuild_queue(&mut self, learn_ahead: bool) {
        let adjusted_now = self.adjusted_now();
        queue::rebuild(&mut self.queue, &self.store, adjusted_now, learn_ahead);
    }

    /// Pops the next card to show, rebuilding the queue as needed. Returns
    /// `Ok(None)` when there is nothing left to study.
    ///
    /// The same card is never shown twice in succession, except when the
    /// rebuilt queue contains nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::CardNotFound`] when a queued identifier no
    /// longer resolves in the store.
    pub fn next_card(&mut self, learn_ahead: bool) -> Result<Option<Card>, SchedulerError> {
        if self.queue.is_empty() {
            self.rebuild_queue(learn_ahead);
            if self.queue.is_empty() {
                return Ok(None);
            }
        }
        let Some(mut card_id) = self.queue.pop_front() else {
            return Ok(None);
        };
        if let Some(last) = self.queue.card_id_last() {
            while card_id == last {
                if self.queue.is_empty() {
                    self.rebuild_queue(learn_ahead);
                    if self.queue.is_empty() {
                        return Ok(None);
                    }
                    if self.queue.only_contains(card_id) {
                        // Hopeless: one repeating card beats an empty hand.
                        return self.deal(card_id).map(Some);
                    }
                }
                let Some(next_id) = self.queue.pop_front() else {
                    return Ok(None);
                };
                card_id = next_id;
            }
        }
        self.queue.set_card_id_last(card_id);
        self.deal(card_id).map(Some)
    }

    fn deal(&mut self, card_id: CardId) -> Result<Card, SchedulerError> {
        self.stopwatch.arm(self.clock.now());
        self.store
            .card(card_id)
            .ok_or(SchedulerError::CardNotFound(card_id))
    }

    /// Whether the host may fetch and render the next card before the grade
    /// of `card_to_grade` has been processed.
    pub fn is_prefetch_allowed(&self, card_to_grade: &Card) -> bool {
        // Grading a card that previously sat at grade 0 splices its second
        // copy out of the queue, so the head entry cannot be trusted if it
        // is that same card.
        if self.queue.front() == Some(card_to_grade.id) {
            return false;
        }
        // Enough cards must remain to find one that is not a duplicate.
        self.queue.len() >= 3
    }

    /// Whether the card currently appears in the working queue.
    pub fn is_in_queue(&self, card: &Card) -> bool {
        self.queue.contains(card.id)
    }

    /// Removes both queued occurrences of the card, tolerating absence.
    pub fn remove_from_queue_if_present(&mut self, card: &Card) {
        if self.queue.remove_one(card.id) {
            self.queue.remove_one(card.id);
        }
    }

    /// Computes the interval a grade would produce, without committing
    /// anything: no hooks, no card mutation, no queue changes. Typically
    /// used to label the grading buttons.
    pub fn preview_interval(&mut self, card: &Card, new_grade: Grade) -> i64 {
        let mut copy = card.clone();
        let now = self
            .stopwatch
            .start_time()
            .unwrap_or_else(|| self.clock.now());
        let scheduled_interval = self.true_scheduled_interval(&copy);
        let actual_interval = if copy.is_unseen() { 0 } else { now - copy.last_rep };
        self.computed_interval(&mut copy, new_grade, actual_interval, scheduled_interval)
    }

    /// Processes a grade: mutates the card, reschedules it, persists it to
    /// the store and emits the repetition event. Returns the new interval
    /// in seconds.
    ///
    /// `last_rep` is set to the instant the card was dealt, not the instant
    /// the grade arrives.
    pub fn grade_answer(&mut self, card: &mut Card, new_grade: Grade) -> i64 {
        self.hooks.run(HookPoint::BeforeRepetition, card);

        let graded_at = self.stopwatch.take().unwrap_or_else(|| self.clock.now());
        let scheduled_interval = self.true_scheduled_interval(card);
        let actual_interval = if card.is_unseen() {
            0
        } else {
            graded_at - card.last_rep
        };
        let previous_grade = card.grade;
        let leaves_acquisition =
            previous_grade == Some(Grade::Forgot) && new_grade.is_retained();

        // Track memorised facts so their sisters stay out of the unseen
        // pile for the rest of the session.
        if leaves_acquisition {
            self.queue.note_memorised(card.fact_id);
        }

        let new_interval =
            self.computed_interval(card, new_grade, actual_interval, scheduled_interval);

        // The second copy of a grade-0 card must not show up again once the
        // card leaves the acquisition phase.
        if leaves_acquisition {
            self.queue.remove_one(card.id);
        }

        card.grade = Some(new_grade);
        card.last_rep = graded_at;
        if new_grade.is_retained() {
            card.next_rep = midnight_utc(self.zone.as_ref(), card.last_rep + new_interval);
            self.avoid_sister_cards(card);
        } else {
            card.next_rep = card.last_rep;
        }

        if self.queue.memorised_count() == 15 && !self.queue.warned_about_too_many_cards() {
            self.ui.show_information(
                "You've memorised 15 new or failed cards. \
                 If you do this for many days, you could get a big workload later.",
            );
            self.queue.set_warned_about_too_many_cards();
        }

        self.store.current_criterion().apply_to_card(card);
        self.store.upsert_card(card.clone());
        self.hooks.run(HookPoint::AfterRepetition, card);

        let thinking_time = (self.clock.now() - graded_at).max(0);
        self.sink
            .repetition(card, scheduled_interval, actual_interval, thinking_time);
        new_interval
    }

    fn computed_interval(
        &mut self,
        card: &mut Card,
        new_grade: Grade,
        actual_interval: i64,
        scheduled_interval: i64,
    ) -> i64 {
        let raw = sm2::transition_interval(card, new_grade, actual_interval, scheduled_interval);
        let clamped = sm2::clamp_interval(raw, scheduled_interval);
        let (capped, near_reminder_cap) = sm2::apply_reminder_caps(card, clamped);
        if near_reminder_cap || sm2::wants_spread_noise(capped, new_grade) {
            capped + sm2::noise_offset(&mut self.rng)
        } else {
            capped
        }
    }

    /// Shifts `next_rep` forward a day at a time until no sister card is
    /// scheduled on the same date.
    pub fn avoid_sister_cards(&mut self, card: &mut Card) {
        while self
            .store
            .sister_card_count_scheduled_between(card, card.next_rep, card.next_rep + DAY)
            > 0
        {
            card.next_rep += DAY;
        }
    }

    /// Sets the initial grade for a set of sister cards, spreading their
    /// next repetitions over successive days. Even when this happens while
    /// adding cards, it counts as a repetition.
    pub fn set_initial_grade(&mut self, cards: &mut [Card], grade: Grade) {
        let new_interval = grade.initial_interval();
        let last_rep = self.clock.now();
        let mut next_rep = midnight_utc(self.zone.as_ref(), last_rep + new_interval);
        for card in cards {
            card.grade = Some(grade);
            card.easiness = 2.0;
            card.acq_reps = 1;
            card.acq_reps_since_lapse = 1;
            card.last_rep = last_rep;
            card.next_rep = next_rep;
            next_rep += DAY;
            self.store.upsert_card(card.clone());
            self.sink.repetition(card, 0, 0, 0);
        }
    }
}
