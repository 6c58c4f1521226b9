// Serializing coordinator for all entry points.
//
// Every entry point is a function of (state, caller, arguments, now) and
// executes atomically: all checks precede all mutations, so an error leaves
// the state untouched and emits nothing. GovernorState takes the current
// time explicitly; Governor wraps it in a mutex and stamps live calls with
// wall-clock time, reproducing the serial single-writer semantics of the
// original execution environment.


use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::{
    config::OPERATOR_COOLDOWN,
    crypto::{Hash, Principal},
    error::{GovernorError, GovernorResult},
    events::Event,
    governance::proposal_fingerprint,
    ledger::{operation_fingerprint, Operation, OperationLedger, OperationState},
    roles::{Role, RoleRegistry},
    time::{get_current_time_in_seconds, TimestampSeconds},
};

/// Process-wide governor state: role registry, pause switch, operation
/// ledger and the rate-limit cursor, plus the sink of emitted events.
#[derive(Debug)]
pub struct GovernorState {
    roles: RoleRegistry,
    ledger: OperationLedger,
    paused: bool,
    /// Global cooldown cursor shared by the operator paths.
    next_allowed_at: TimestampSeconds,
    events: Vec<Event>,
}

impl GovernorState {
    /// The initializer receives DefaultAdmin, Admin, Operator and Governance
    /// atomically. DefaultAdmin can never be granted again afterwards.
    pub fn new(initializer: Principal) -> Self {
        let mut roles = RoleRegistry::new();
        roles.grant(Role::DefaultAdmin, initializer.clone());
        roles.grant(Role::Admin, initializer.clone());
        roles.grant(Role::Operator, initializer.clone());
        roles.grant(Role::Governance, initializer);

        Self {
            roles,
            ledger: OperationLedger::new(),
            paused: false,
            next_allowed_at: 0,
            events: Vec::new(),
        }
    }

    fn require_role(&self, role: Role, caller: &Principal) -> GovernorResult<()> {
        if !self.roles.has_role(role, caller) {
            debug!("Rejected: caller {} lacks role {}", caller, role);
            return Err(GovernorError::Unauthorized(role));
        }
        Ok(())
    }

    fn require_unpaused(&self) -> GovernorResult<()> {
        if self.paused {
            return Err(GovernorError::ContractPaused);
        }
        Ok(())
    }

    // Rate-limit gate for the operator paths. The cursor itself is only
    // advanced once every remaining check has passed, so a failing entry
    // point never consumes the cooldown.
    fn check_cooldown(&self, now: TimestampSeconds) -> GovernorResult<()> {
        if now < self.next_allowed_at {
            return Err(GovernorError::TooSoon {
                next_allowed_at: self.next_allowed_at,
                now,
            });
        }
        Ok(())
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Drain the events emitted since the last call. Events correspond only
    /// to successful transitions; entry-point logic never reads them back.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ===== Role administration =====

    /// Grant `role` to `principal`. Admin-gated; granting DefaultAdmin is
    /// only possible at construction. Idempotent: re-granting a held role is
    /// a no-op and emits nothing. Never pause-gated.
    pub fn grant_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> GovernorResult<()> {
        if role == Role::DefaultAdmin {
            return Err(GovernorError::Unauthorized(Role::DefaultAdmin));
        }
        self.require_role(Role::Admin, caller)?;

        if self.roles.grant(role, principal.clone()) {
            info!("Role {} granted to {}", role, principal);
            self.emit(Event::RoleGranted { role, principal });
        }
        Ok(())
    }

    /// Revoke `role` from `principal`. Admin-gated; revoking DefaultAdmin
    /// requires the caller to hold DefaultAdmin. Idempotent. Never
    /// pause-gated. Nothing prevents removing the last DefaultAdmin holder,
    /// which leaves the registry permanently without a root role.
    pub fn revoke_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: &Principal,
    ) -> GovernorResult<()> {
        let required = if role == Role::DefaultAdmin {
            Role::DefaultAdmin
        } else {
            Role::Admin
        };
        self.require_role(required, caller)?;

        if self.roles.revoke(role, principal) {
            info!("Role {} revoked from {}", role, principal);
            self.emit(Event::RoleRevoked {
                role,
                principal: principal.clone(),
            });
        }
        Ok(())
    }

    /// Pure read, never blocked by pause.
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.roles.has_role(role, principal)
    }

    // ===== Pause switch =====

    pub fn pause(&mut self, caller: &Principal) -> GovernorResult<()> {
        self.require_role(Role::Admin, caller)?;
        if self.paused {
            return Err(GovernorError::AlreadyPaused);
        }

        self.paused = true;
        info!("Paused by {}", caller);
        self.emit(Event::Paused { by: caller.clone() });
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Principal) -> GovernorResult<()> {
        self.require_role(Role::Admin, caller)?;
        if !self.paused {
            return Err(GovernorError::AlreadyUnpaused);
        }

        self.paused = false;
        info!("Unpaused by {}", caller);
        self.emit(Event::Unpaused { by: caller.clone() });
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ===== Operation ledger =====

    /// Schedule `payload` for execution no earlier than
    /// `now + TIMELOCK_DELAY`. Operator-gated, pause-gated, rate-limited.
    /// Returns the operation fingerprint.
    pub fn schedule(
        &mut self,
        caller: &Principal,
        payload: &[u8],
        now: TimestampSeconds,
    ) -> GovernorResult<Hash> {
        self.require_role(Role::Operator, caller)?;
        self.require_unpaused()?;
        // Duplicate detection comes before the cooldown so a resubmission of
        // an identical payload+instant pair is reported as the duplicate it
        // is instead of being masked by TooSoon.
        let fingerprint = operation_fingerprint(payload, now);
        if self.ledger.contains(&fingerprint) {
            return Err(GovernorError::DuplicateOperation(fingerprint));
        }
        self.check_cooldown(now)?;

        let id = self.ledger.schedule(caller.clone(), payload, now)?;
        self.next_allowed_at = now.saturating_add(OPERATOR_COOLDOWN);

        info!("Operation {} scheduled by {}", id, caller);
        self.emit(Event::OperationScheduled {
            id: id.clone(),
            executor: caller.clone(),
            at: now,
        });
        Ok(id)
    }

    /// Execute a scheduled operation once its time-lock has elapsed
    /// (`now == ready_at` is executable). Operator-gated, pause-gated,
    /// rate-limited. Completion is terminal.
    pub fn execute(
        &mut self,
        caller: &Principal,
        id: &Hash,
        now: TimestampSeconds,
    ) -> GovernorResult<()> {
        self.require_role(Role::Operator, caller)?;
        self.require_unpaused()?;
        self.check_cooldown(now)?;

        self.ledger.execute(id, now)?;
        self.next_allowed_at = now.saturating_add(OPERATOR_COOLDOWN);

        info!("Operation {} executed by {}", id, caller);
        self.emit(Event::OperationExecuted {
            id: id.clone(),
            executor: caller.clone(),
            at: now,
        });
        Ok(())
    }

    /// Lookup by id. Never mutates, never rate-limited, never pause-gated.
    pub fn get(&self, id: &Hash) -> GovernorResult<&Operation> {
        self.ledger.get(id)
    }

    /// Derived lifecycle state of an operation at `now`. Pure read.
    pub fn operation_state(&self, id: &Hash, now: TimestampSeconds) -> OperationState {
        self.ledger.state(id, now)
    }

    // ===== Governance log =====

    /// Emit a proposal-created event and return its deterministic id.
    /// Governance-gated. Intentionally not pause-gated, matching the original
    /// contract where proposal creation skips the pause check every other
    /// mutator performs. No proposal record is persisted.
    pub fn create_proposal(
        &mut self,
        caller: &Principal,
        description: &str,
        now: TimestampSeconds,
    ) -> GovernorResult<Hash> {
        self.require_role(Role::Governance, caller)?;

        let id = proposal_fingerprint(caller, description, now);
        info!("Proposal {} created by {}", id, caller);
        self.emit(Event::GovernanceProposalCreated {
            id: id.clone(),
            creator: caller.clone(),
            description: description.to_owned(),
        });
        Ok(id)
    }

    /// Emit a vote-cast event. Governance-gated and pause-gated. There is no
    /// check that `proposal_id` was ever created, no double-vote prevention
    /// and no tally.
    pub fn cast_vote(
        &mut self,
        caller: &Principal,
        proposal_id: Hash,
        support: bool,
    ) -> GovernorResult<()> {
        self.require_role(Role::Governance, caller)?;
        self.require_unpaused()?;

        info!(
            "Vote cast by {} on proposal {}: {}",
            caller, proposal_id, support
        );
        self.emit(Event::GovernanceVoteCast {
            proposal_id,
            voter: caller.clone(),
            support,
        });
        Ok(())
    }
}

/// Thread-safe front of GovernorState. Concurrent callers are serialized by
/// a single mutex and each call is stamped with the current wall-clock time,
/// so the read-check-write sequence of one entry point is never interleaved
/// with another caller's.
#[derive(Debug)]
pub struct Governor {
    inner: Mutex<GovernorState>,
}

impl Governor {
    pub fn new(initializer: Principal) -> Self {
        Self {
            inner: Mutex::new(GovernorState::new(initializer)),
        }
    }

    // State is only mutated after every check has passed, so a panicking
    // caller cannot leave partial state behind a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, GovernorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn grant_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> GovernorResult<()> {
        self.lock().grant_role(caller, role, principal)
    }

    pub fn revoke_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: &Principal,
    ) -> GovernorResult<()> {
        self.lock().revoke_role(caller, role, principal)
    }

    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.lock().has_role(role, principal)
    }

    pub fn pause(&self, caller: &Principal) -> GovernorResult<()> {
        self.lock().pause(caller)
    }

    pub fn unpause(&self, caller: &Principal) -> GovernorResult<()> {
        self.lock().unpause(caller)
    }

    pub fn is_paused(&self) -> bool {
        self.lock().is_paused()
    }

    pub fn schedule(&self, caller: &Principal, payload: &[u8]) -> GovernorResult<Hash> {
        self.lock()
            .schedule(caller, payload, get_current_time_in_seconds())
    }

    pub fn execute(&self, caller: &Principal, id: &Hash) -> GovernorResult<()> {
        self.lock()
            .execute(caller, id, get_current_time_in_seconds())
    }

    pub fn get(&self, id: &Hash) -> GovernorResult<Operation> {
        self.lock().get(id).cloned()
    }

    pub fn operation_state(&self, id: &Hash) -> OperationState {
        self.lock()
            .operation_state(id, get_current_time_in_seconds())
    }

    pub fn create_proposal(&self, caller: &Principal, description: &str) -> GovernorResult<Hash> {
        self.lock()
            .create_proposal(caller, description, get_current_time_in_seconds())
    }

    pub fn cast_vote(
        &self,
        caller: &Principal,
        proposal_id: Hash,
        support: bool,
    ) -> GovernorResult<()> {
        self.lock().cast_vote(caller, proposal_id, support)
    }

    pub fn drain_events(&self) -> Vec<Event> {
        self.lock().drain_events()
    }
}
