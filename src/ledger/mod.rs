// Time-locked operation ledger.
//
// State machine per operation: NonExistent -> Scheduled -> Completed.
// There are no back-transitions and no cancellation path; a completed
// operation is immutable forever and its id is never reused.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::TIMELOCK_DELAY,
    crypto::{hash, Hash, Principal},
    error::{GovernorError, GovernorResult},
    time::TimestampSeconds,
};

/// One scheduled privileged action.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Content-derived fingerprint, computed as
    /// blake3(payload || scheduled_at_le). Unique across the ledger lifetime.
    pub id: Hash,
    /// Principal that scheduled the operation.
    pub executor: Principal,
    /// Earliest instant at which execution is permitted (boundary inclusive).
    pub ready_at: TimestampSeconds,
    /// Set exactly once, by execute.
    pub completed: bool,
}

/// Derived view of an operation's position in the lifecycle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OperationState {
    NonExistent,
    /// Scheduled but still inside the time-lock window.
    Scheduled,
    /// Time-lock elapsed, executable.
    Ready,
    Completed,
}

/// Deterministic fingerprint of an operation payload and its scheduling
/// instant. Two submissions of the same payload at different instants yield
/// distinct ids; identical payload+instant pairs collide on purpose so the
/// ledger can reject the resubmission as a duplicate.
pub fn operation_fingerprint(payload: &[u8], scheduled_at: TimestampSeconds) -> Hash {
    let mut input = Vec::with_capacity(payload.len() + 8);
    input.extend_from_slice(payload);
    input.extend_from_slice(&scheduled_at.to_le_bytes());
    hash(&input)
}

/// Ledger entries are owned here; lookups are by id only.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OperationLedger {
    operations: IndexMap<Hash, Operation>,
}

impl OperationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new operation for `payload` scheduled at `now`.
    /// All checks happen before the insert; on error the ledger is untouched.
    pub fn schedule(
        &mut self,
        executor: Principal,
        payload: &[u8],
        now: TimestampSeconds,
    ) -> GovernorResult<Hash> {
        let id = operation_fingerprint(payload, now);
        if self.operations.contains_key(&id) {
            return Err(GovernorError::DuplicateOperation(id));
        }

        let ready_at = now.saturating_add(TIMELOCK_DELAY);
        self.operations.insert(
            id.clone(),
            Operation {
                id: id.clone(),
                executor,
                ready_at,
                completed: false,
            },
        );

        debug!("Operation {} scheduled, ready at {}", id, ready_at);
        Ok(id)
    }

    /// Mark the operation as completed. Terminal and irreversible.
    /// Time comparison is inclusive at the boundary: `now == ready_at`
    /// executes.
    pub fn execute(&mut self, id: &Hash, now: TimestampSeconds) -> GovernorResult<()> {
        let operation = self
            .operations
            .get_mut(id)
            .ok_or_else(|| GovernorError::NotFound(id.clone()))?;

        if operation.completed {
            return Err(GovernorError::AlreadyCompleted(id.clone()));
        }

        if now < operation.ready_at {
            return Err(GovernorError::TimeLocked {
                ready_at: operation.ready_at,
                now,
            });
        }

        operation.completed = true;
        debug!("Operation {} executed at {}", id, now);
        Ok(())
    }

    /// Whether an entry with this id exists, completed or not.
    pub fn contains(&self, id: &Hash) -> bool {
        self.operations.contains_key(id)
    }

    /// Lookup by id. Never mutates, never rate-limited, never pause-gated.
    pub fn get(&self, id: &Hash) -> GovernorResult<&Operation> {
        self.operations
            .get(id)
            .ok_or_else(|| GovernorError::NotFound(id.clone()))
    }

    /// Derived lifecycle state at `now`.
    pub fn state(&self, id: &Hash, now: TimestampSeconds) -> OperationState {
        match self.operations.get(id) {
            None => OperationState::NonExistent,
            Some(operation) if operation.completed => OperationState::Completed,
            Some(operation) if now < operation.ready_at => OperationState::Scheduled,
            Some(_) => OperationState::Ready,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> Principal {
        Principal::new([1u8; 32])
    }

    const T0: TimestampSeconds = 1_700_000_000;

    #[test]
    fn fingerprint_depends_on_payload_and_instant() {
        let a = operation_fingerprint(b"upgrade-config", T0);
        let b = operation_fingerprint(b"upgrade-config", T0);
        let c = operation_fingerprint(b"upgrade-config", T0 + 1);
        let d = operation_fingerprint(b"rotate-keys", T0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn schedule_rejects_duplicate_payload_and_instant() {
        let mut ledger = OperationLedger::new();
        let id = ledger.schedule(executor(), b"upgrade-config", T0).unwrap();
        assert_eq!(
            ledger.schedule(executor(), b"upgrade-config", T0),
            Err(GovernorError::DuplicateOperation(id.clone()))
        );
        // Same payload at a different instant is a distinct operation
        let other = ledger
            .schedule(executor(), b"upgrade-config", T0 + 1)
            .unwrap();
        assert_ne!(id, other);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn execute_honors_timelock_boundary_inclusive() {
        let mut ledger = OperationLedger::new();
        let id = ledger.schedule(executor(), b"upgrade-config", T0).unwrap();
        let ready_at = ledger.get(&id).unwrap().ready_at;
        assert_eq!(ready_at, T0 + TIMELOCK_DELAY);

        assert_eq!(
            ledger.execute(&id, ready_at - 1),
            Err(GovernorError::TimeLocked {
                ready_at,
                now: ready_at - 1
            })
        );
        assert_eq!(ledger.execute(&id, ready_at), Ok(()));
        assert!(ledger.get(&id).unwrap().completed);
    }

    #[test]
    fn execute_is_terminal() {
        let mut ledger = OperationLedger::new();
        let id = ledger.schedule(executor(), b"upgrade-config", T0).unwrap();
        ledger.execute(&id, T0 + TIMELOCK_DELAY).unwrap();
        assert_eq!(
            ledger.execute(&id, T0 + TIMELOCK_DELAY + 1),
            Err(GovernorError::AlreadyCompleted(id))
        );
    }

    #[test]
    fn execute_unknown_id_fails() {
        let mut ledger = OperationLedger::new();
        let id = operation_fingerprint(b"never-scheduled", T0);
        assert_eq!(
            ledger.execute(&id, T0),
            Err(GovernorError::NotFound(id.clone()))
        );
        assert_eq!(ledger.get(&id), Err(GovernorError::NotFound(id)));
    }

    #[test]
    fn state_follows_lifecycle() {
        let mut ledger = OperationLedger::new();
        let unknown = operation_fingerprint(b"nope", T0);
        assert_eq!(ledger.state(&unknown, T0), OperationState::NonExistent);

        let id = ledger.schedule(executor(), b"upgrade-config", T0).unwrap();
        assert_eq!(ledger.state(&id, T0), OperationState::Scheduled);
        assert_eq!(
            ledger.state(&id, T0 + TIMELOCK_DELAY),
            OperationState::Ready
        );

        ledger.execute(&id, T0 + TIMELOCK_DELAY).unwrap();
        assert_eq!(
            ledger.state(&id, T0 + TIMELOCK_DELAY),
            OperationState::Completed
        );
    }
}
