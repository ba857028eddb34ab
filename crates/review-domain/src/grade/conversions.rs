use super::{Grade, GradeError};

/// Converts a stored `i8` to a `Grade` if it is between 0 and 5 inclusive.
///
/// # Errors
///
/// Returns `GradeError::GradeOutsideRange` for any other value, including
/// the −1 unseen sentinel: callers decode that separately into `None`.
pub fn from_i8(grade: i8) -> Result<Grade, GradeError> {
    match grade {
        0 => Ok(Grade::Forgot),
        1 => Ok(Grade::LessBig),
        2 => Ok(Grade::LessSmall),
        3 => Ok(Grade::Same),
        4 => Ok(Grade::MoreSmall),
        5 => Ok(Grade::MoreBig),
        _ => Err(GradeError::GradeOutsideRange { grade }),
    }
}

/// Converts a `Grade` to its stored `i8` representation.
#[must_use]
pub fn to_i8(grade: Grade) -> i8 {
    grade as i8
}

/// Decodes a stored grade column where −1 means "never seen".
///
/// # Errors
///
/// Returns `GradeError::GradeOutsideRange` for values other than −1..=5.
pub fn from_stored(grade: i8) -> Result<Option<Grade>, GradeError> {
    if grade == -1 {
        return Ok(None);
    }
    from_i8(grade).map(Some)
}

/// Encodes an optional grade into the stored column value, −1 for unseen.
#[must_use]
pub fn to_stored(grade: Option<Grade>) -> i8 {
    grade.map_or(-1, to_i8)
}

impl Grade {
    /// Converts a stored `i8` to a `Grade` if it is between 0 and 5 inclusive.
    ///
    /// # Errors
    ///
    /// Returns `GradeError::GradeOutsideRange` otherwise.
    pub fn from_i8(grade: i8) -> Result<Self, GradeError> {
        from_i8(grade)
    }

    /// Converts a `Grade` to its stored `i8` representation.
    #[must_use]
    pub fn to_i8(self) -> i8 {
        to_i8(self)
    }
}

impl TryFrom<i8> for Grade {
    type Error = GradeError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        from_i8(value)
    }
}
