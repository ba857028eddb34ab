/// Recall grades supported by the scheduler.
///
/// The numeric values match the stored representation. An unseen card has no
/// grade at all and is modelled as `Option<Grade>` = `None` (stored as −1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grade {
    /// The card was not recalled; it drops (back) into the acquisition phase.
    Forgot = 0,
    /// Recalled, but the interval should shrink sharply.
    LessBig = 1,
    /// Recalled, but the interval should shrink mildly.
    LessSmall = 2,
    /// Recalled about as expected; the interval tracks the elapsed time.
    Same = 3,
    /// Recalled easily; the interval grows mildly.
    MoreSmall = 4,
    /// Recalled effortlessly; the interval grows sharply.
    MoreBig = 5,
}

impl Grade {
    /// Returns true when the grade keeps the card in the acquisition phase.
    #[must_use]
    pub fn is_forgot(self) -> bool {
        matches!(self, Grade::Forgot)
    }

    /// Returns true for the grades that retain the card on an interval
    /// schedule.
    #[must_use]
    pub fn is_retained(self) -> bool {
        !self.is_forgot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forgot_is_the_only_acquisition_grade() {
        assert!(Grade::Forgot.is_forgot());
        for grade in [
            Grade::LessBig,
            Grade::LessSmall,
            Grade::Same,
            Grade::MoreSmall,
            Grade::MoreBig,
        ] {
            assert!(!grade.is_forgot());
            assert!(grade.is_retained());
        }
    }

    #[test]
    fn grades_order_by_recall_strength() {
        assert!(Grade::Forgot < Grade::LessBig);
        assert!(Grade::Same < Grade::MoreBig);
    }
}
