/// Errors produced when attempting to construct a [`Grade`].
///
/// [`Grade`]: super::Grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    /// The provided grade was outside the supported range of 0-5.
    #[error("grade {grade} outside the supported range 0..=5")]
    GradeOutsideRange { grade: i8 },
}
