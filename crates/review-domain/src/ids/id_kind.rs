use std::fmt;

/// Identifies which strongly typed identifier failed to convert.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdKind {
    /// Identifier for persisted review cards.
    Card,
    /// Identifier for the facts shared by sister cards.
    Fact,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Card => "card",
            Self::Fact => "fact",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_lowercase_labels() {
        assert_eq!(IdKind::Card.to_string(), "card");
        assert_eq!(IdKind::Fact.to_string(), "fact");
    }
}
