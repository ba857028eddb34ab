//! Scheduler configuration values governing due-time arithmetic.

use serde::{Deserialize, Serialize};

/// Configuration for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Hour of the local day (0-23) at which the study day rolls over.
    /// Cards become due at this hour local time rather than at midnight.
    pub day_starts_at: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { day_starts_at: 3 }
    }
}
