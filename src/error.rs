use thiserror::Error;

use crate::{crypto::Hash, roles::Role, time::TimestampSeconds};

/// Every failure aborts the whole entry point: no state is mutated and no
/// event is emitted on the error path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernorError {
    #[error("Caller lacks required role: {0}")]
    Unauthorized(Role),

    #[error("Contract is paused")]
    ContractPaused,

    #[error("Contract is already paused")]
    AlreadyPaused,

    #[error("Contract is already unpaused")]
    AlreadyUnpaused,

    #[error("Operation {0} is already scheduled")]
    DuplicateOperation(Hash),

    #[error("Operation {0} not found")]
    NotFound(Hash),

    #[error("Operation {0} is already completed")]
    AlreadyCompleted(Hash),

    #[error("Operation is time-locked until {ready_at}, current time is {now}")]
    TimeLocked {
        ready_at: TimestampSeconds,
        now: TimestampSeconds,
    },

    #[error("Cooldown active until {next_allowed_at}, current time is {now}")]
    TooSoon {
        next_allowed_at: TimestampSeconds,
        now: TimestampSeconds,
    },
}

pub type GovernorResult<T> = Result<T, GovernorError>;
