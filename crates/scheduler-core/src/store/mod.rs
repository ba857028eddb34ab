//! Persistence abstraction used by the scheduler along with an in-memory
//! reference store.

pub mod candidate_ordering;
pub mod in_memory_store;
pub mod scheduler_store;

pub use candidate_ordering::candidate_ordering;
pub use in_memory_store::InMemoryStore;
pub use scheduler_store::{DefaultCriterion, ReviewCriterion, SchedulerStore, SortOrder};
