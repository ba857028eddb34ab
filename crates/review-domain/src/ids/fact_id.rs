use std::fmt;

use crate::ids::{IdConversionError, IdKind};

/// Strongly typed identifier for the fact behind one or more sister cards.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactId(u64);

impl FactId {
    /// Creates a new identifier wrapper from a raw `u64` value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw `u64` backing this identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for FactId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<FactId> for u64 {
    fn from(value: FactId) -> Self {
        value.0
    }
}

impl TryFrom<u128> for FactId {
    type Error = IdConversionError;

    /// # Errors
    ///
    /// Returns `IdConversionError::Overflow` if the value exceeds `u64::MAX`.
    fn try_from(value: u128) -> Result<Self, Self::Error> {
        if value > u128::from(u64::MAX) {
            return Err(IdConversionError::Overflow {
                kind: IdKind::Fact,
                value,
                max: u64::MAX,
            });
        }
        Ok(Self::new(u64::try_from(value).unwrap()))
    }
}

impl TryFrom<i128> for FactId {
    type Error = IdConversionError;

    /// # Errors
    ///
    /// Returns `IdConversionError::Negative` if the value is negative and
    /// `IdConversionError::Overflow` if it exceeds `u64::MAX`.
    fn try_from(value: i128) -> Result<Self, Self::Error> {
        let value = u128::try_from(value).map_err(|_| IdConversionError::Negative {
            kind: IdKind::Fact,
            value,
        })?;
        Self::try_from(value)
    }
}

impl TryFrom<i64> for FactId {
    type Error = IdConversionError;

    /// # Errors
    ///
    /// Returns `IdConversionError::Negative` if the value is negative.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from(i128::from(value))
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactId({})", self.0)
    }
}
