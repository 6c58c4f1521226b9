// Governance event log.
//
// Proposals and votes are emitted facts only: nothing is persisted, nothing
// is tallied. The governor checks the Governance role (and, for votes, the
// pause switch) before emitting.

use crate::{
    crypto::{hash, Hash, Principal},
    time::TimestampSeconds,
};

/// Deterministic proposal identifier derived from the creation instant, the
/// creator and the description. The id is only ever used as an event
/// correlation key; the governor keeps no proposal records.
pub fn proposal_fingerprint(
    creator: &Principal,
    description: &str,
    now: TimestampSeconds,
) -> Hash {
    let description = description.as_bytes();
    let mut input = Vec::with_capacity(8 + 32 + description.len());
    input.extend_from_slice(&now.to_le_bytes());
    input.extend_from_slice(creator.as_bytes());
    input.extend_from_slice(description);
    hash(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: TimestampSeconds = 1_700_000_000;

    #[test]
    fn proposal_id_depends_on_all_inputs() {
        let alice = Principal::new([1u8; 32]);
        let bob = Principal::new([2u8; 32]);

        let base = proposal_fingerprint(&alice, "raise quorum", T0);
        assert_eq!(base, proposal_fingerprint(&alice, "raise quorum", T0));
        assert_ne!(base, proposal_fingerprint(&bob, "raise quorum", T0));
        assert_ne!(base, proposal_fingerprint(&alice, "lower quorum", T0));
        assert_ne!(base, proposal_fingerprint(&alice, "raise quorum", T0 + 1));
    }
}
