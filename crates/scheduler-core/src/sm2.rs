//! The SM-2 derived grading state machine: interval transitions, clamping,
//! reminder-tag caps and spreading noise.
//!
//! All intervals are integer seconds, since time is stored as POSIX
//! timestamps.

use rand::seq::SliceRandom;
use rand::Rng;

use review_domain::grade::intervals::{growth_factor, shrink_divisor};
use review_domain::tags::reminder_caps;
use review_domain::{Card, Grade, DAY};

/// At most increase an interval by 30 days per step.
pub const MAX_INCREASE: i64 = 30 * DAY;
/// Cap out the total interval at 360 days.
pub const MAX_TOTAL: i64 = 360 * DAY;

/// Day offsets sampled when spreading noise is applied.
const NOISE_DAYS: [i64; 5] = [-2, -1, 0, 1, 2];

/// Applies the `(previous grade, new grade)` transition to the card's
/// repetition counters and returns the raw interval before clamping.
///
/// `actual_interval` is the time elapsed since the previous repetition and
/// `scheduled_interval` the corrected interval that led up to it.
pub(crate) fn transition_interval(
    card: &mut Card,
    new_grade: Grade,
    actual_interval: i64,
    scheduled_interval: i64,
) -> i64 {
    match (card.grade, new_grade) {
        // The card has not yet been given its initial grade.
        (None, grade) => {
            card.easiness = 2.0;
            card.acq_reps = 1;
            card.acq_reps_since_lapse = 1;
            grade.initial_interval()
        }
        // In the acquisition phase and staying there.
        (Some(Grade::Forgot), Grade::Forgot) => {
            card.acq_reps += 1;
            card.acq_reps_since_lapse += 1;
            0
        }
        // In the acquisition phase and moving to the retention phase.
        (Some(Grade::Forgot), grade) => {
            card.acq_reps += 1;
            card.acq_reps_since_lapse += 1;
            match grade {
                Grade::MoreBig => 4 * DAY,
                Grade::MoreSmall => 2 * DAY,
                _ => DAY,
            }
        }
        // In the retention phase and dropping back to acquisition.
        (Some(_), Grade::Forgot) => {
            card.ret_reps += 1;
            card.lapses += 1;
            card.acq_reps_since_lapse = 0;
            card.ret_reps_since_lapse = 0;
            0
        }
        // In the retention phase and staying there.
        (Some(_), grade) => {
            card.ret_reps += 1;
            card.ret_reps_since_lapse += 1;
            retention_interval(grade, actual_interval, scheduled_interval)
        }
    }
}

fn retention_interval(grade: Grade, actual_interval: i64, scheduled_interval: i64) -> i64 {
    let mut new_interval = if matches!(grade, Grade::LessBig | Grade::LessSmall) {
        let reduced = actual_interval / shrink_divisor(grade);
        let shortened = scheduled_interval.min(reduced);
        // Anything shorter than two and a half days collapses to one day.
        if shortened < 5 * DAY / 2 { DAY } else { shortened }
    } else if grade == Grade::Same {
        actual_interval
    } else {
        // A card graded 4 or 5 is never rescheduled less than 2 days out.
        (actual_interval * growth_factor(grade)).max(2 * DAY)
    };
    // Pathological case: learning ahead the same card many times on one day
    // can drive the actual interval to zero.
    if new_interval < DAY {
        new_interval = DAY;
    }
    new_interval
}

/// Caps both the absolute interval length and the per-step growth.
pub(crate) fn clamp_interval(new_interval: i64, scheduled_interval: i64) -> i64 {
    let capped = new_interval.min(MAX_TOTAL);
    let diff = (capped - scheduled_interval).min(MAX_INCREASE);
    scheduled_interval + diff
}

/// Applies every reminder-tag day cap on the card. Returns the capped
/// interval and whether the result landed within a day of a cap, which
/// forces noise so capped sister reminders do not pile onto one date.
pub(crate) fn apply_reminder_caps(card: &Card, mut interval: i64) -> (i64, bool) {
    let mut add_noise = false;
    for cap_days in reminder_caps(&card.tags) {
        let cap = cap_days * DAY;
        interval = interval.min(cap);
        if interval >= cap - DAY {
            add_noise = true;
        }
    }
    (interval, add_noise)
}

/// Long intervals bunch up over the long haul; spread grades 3-5 once the
/// interval reaches 40 days.
pub(crate) fn wants_spread_noise(interval: i64, new_grade: Grade) -> bool {
    interval / DAY >= 40
        && matches!(new_grade, Grade::Same | Grade::MoreSmall | Grade::MoreBig)
}

/// Uniform sample from {−2, −1, 0, +1, +2} days.
pub(crate) fn noise_offset<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    NOISE_DAYS.choose(rng).copied().unwrap_or(0) * DAY
}
