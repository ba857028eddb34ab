use super::Grade;
use crate::DAY;

/// Returns the interval granted by the very first repetition of a card.
///
/// The first repetition is treated specially and gives longer intervals, to
/// allow for the fact that the learner may have seen the card before.
#[must_use]
pub fn initial_interval(grade: Grade) -> i64 {
    match grade {
        Grade::Forgot => 0,
        Grade::LessBig | Grade::LessSmall | Grade::Same => DAY,
        Grade::MoreSmall => 2 * DAY,
        Grade::MoreBig => 4 * DAY,
    }
}

/// Divisor applied to the elapsed interval when the learner asks for a
/// shorter schedule (grades 1 and 2).
#[must_use]
pub fn shrink_divisor(grade: Grade) -> i64 {
    if grade == Grade::LessBig { 3 } else { 2 }
}

/// Factor applied to the elapsed interval when the learner asks for a longer
/// schedule (grades 4 and 5).
#[must_use]
pub fn growth_factor(grade: Grade) -> i64 {
    if grade == Grade::MoreBig { 3 } else { 2 }
}

impl Grade {
    /// Returns the interval granted by the very first repetition of a card.
    #[must_use]
    pub fn initial_interval(self) -> i64 {
        initial_interval(self)
    }
}
