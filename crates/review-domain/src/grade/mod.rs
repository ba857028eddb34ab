pub mod conversions;
mod error;
mod grade_impl;
pub mod intervals;

pub use error::GradeError;
pub use grade_impl::Grade;
