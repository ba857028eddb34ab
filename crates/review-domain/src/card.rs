use crate::ids::{CardId, FactId};
use crate::Grade;

/// A single side of a flashcard; the unit of scheduling.
///
/// Several sister cards may share one fact. Timestamps are integer POSIX
/// seconds; `next_rep` holds midnight UTC of the due date for retained
/// cards, and equals `last_rep` for cards in the acquisition phase.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    /// Stable opaque identifier.
    pub id: CardId,
    /// The fact this card was generated from.
    pub fact_id: FactId,
    /// Free-form tags; reminder tags cap the scheduled interval.
    pub tags: Vec<String>,
    /// Latest recall grade; `None` until the card is first graded.
    pub grade: Option<Grade>,
    /// Retained for compatibility with earlier scheduler revisions.
    pub easiness: f32,
    /// Repetitions while in the acquisition phase.
    pub acq_reps: u32,
    /// Acquisition repetitions since the last lapse.
    pub acq_reps_since_lapse: u32,
    /// Repetitions while in the retention phase.
    pub ret_reps: u32,
    /// Retention repetitions since the last lapse.
    pub ret_reps_since_lapse: u32,
    /// Count of retention-to-acquisition drops.
    pub lapses: u32,
    /// When the card was last graded; [`Card::NEVER`] if it never was.
    pub last_rep: i64,
    /// Midnight UTC of the date the card is due; [`Card::NEVER`] if unset.
    pub next_rep: i64,
}

impl Card {
    /// Sentinel timestamp for a card that has never been repeated.
    pub const NEVER: i64 = -1;

    /// Creates an unseen card.
    #[must_use]
    pub fn new(id: CardId, fact_id: FactId) -> Self {
        Self {
            id,
            fact_id,
            tags: Vec::new(),
            grade: None,
            easiness: 2.0,
            acq_reps: 0,
            acq_reps_since_lapse: 0,
            ret_reps: 0,
            ret_reps_since_lapse: 0,
            lapses: 0,
            last_rep: Self::NEVER,
            next_rep: Self::NEVER,
        }
    }

    /// Creates an unseen card carrying the given tags.
    #[must_use]
    pub fn with_tags(id: CardId, fact_id: FactId, tags: Vec<String>) -> Self {
        Self {
            tags,
            ..Self::new(id, fact_id)
        }
    }

    /// Stored integer representation of the grade, −1 for unseen.
    #[must_use]
    pub fn grade_code(&self) -> i8 {
        crate::grade::conversions::to_stored(self.grade)
    }

    /// Returns true while the card has never been graded.
    #[must_use]
    pub fn is_unseen(&self) -> bool {
        self.grade.is_none()
    }

    /// Returns true while the card sits in the acquisition phase.
    #[must_use]
    pub fn in_acquisition_phase(&self) -> bool {
        self.grade == Some(Grade::Forgot)
    }

    /// Returns true while the card is reviewed on an interval schedule.
    #[must_use]
    pub fn in_retention_phase(&self) -> bool {
        matches!(self.grade, Some(grade) if grade.is_retained())
    }

    /// The uncorrected scheduled interval, `next_rep − last_rep`.
    #[must_use]
    pub fn scheduled_interval(&self) -> i64 {
        self.next_rep - self.last_rep
    }
}
