//! Error types returned by the scheduler.

use review_domain::CardId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The queue referenced a card the store no longer holds.
    #[error("card not found: {0}")]
    CardNotFound(CardId),
}
