use super::IdKind;

/// Error raised when converting into a strongly typed identifier fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdConversionError {
    /// The provided unsigned value exceeded the `u64` range of the identifier.
    #[error("{kind} identifier overflow: {value} exceeds maximum {max}")]
    Overflow {
        /// The identifier that failed to convert.
        kind: IdKind,
        /// The value that exceeded the supported range.
        value: u128,
        /// The maximum supported value for the identifier.
        max: u64,
    },
    /// The provided signed value was negative.
    #[error("{kind} identifier received negative value {value}")]
    Negative {
        /// The identifier that failed to convert.
        kind: IdKind,
        /// The negative value supplied by the caller.
        value: i128,
    },
}
