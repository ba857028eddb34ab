//! Type-safe identifier wrappers shared across review domain modules.
pub mod id_conversion_error;
pub mod id_kind;

pub mod card_id;
pub mod fact_id;

pub use id_conversion_error::IdConversionError;
pub use id_kind::IdKind;

pub use card_id::CardId;
pub use fact_id::FactId;
