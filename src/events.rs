use serde::{Deserialize, Serialize};

use crate::{
    crypto::{Hash, Principal},
    roles::Role,
    time::TimestampSeconds,
};

/// Emitted fact for a successful state transition. Events are append-only and
/// externally observable; entry-point logic never reads them back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Event {
    /// Role membership grew. Only emitted when the principal did not already
    /// hold the role.
    RoleGranted { role: Role, principal: Principal },
    /// Role membership shrank. Only emitted when the principal held the role.
    RoleRevoked { role: Role, principal: Principal },
    Paused { by: Principal },
    Unpaused { by: Principal },
    OperationScheduled {
        id: Hash,
        executor: Principal,
        at: TimestampSeconds,
    },
    OperationExecuted {
        id: Hash,
        executor: Principal,
        at: TimestampSeconds,
    },
    GovernanceProposalCreated {
        id: Hash,
        creator: Principal,
        description: String,
    },
    GovernanceVoteCast {
        proposal_id: Hash,
        voter: Principal,
        support: bool,
    },
}
