//! `geovault-access` – Stateless access-control evaluator.
//!
//! [`evaluate`] decides whether an identity may view a memory at a given
//! ledger time. It is a pure predicate: side-effect free, no caching, no
//! stored state, evaluated fresh on every call, so it serves both
//! single-record authorization and bulk filtering during geographic queries.
//!
//! Access is granted when **any** rule admits the requester, checked in
//! order:
//!
//! | Rule | Grants when |
//! |------|-------------|
//! | [`AccessGrant::Owner`] | the requester created the memory |
//! | [`AccessGrant::Public`] | the memory is public |
//! | [`AccessGrant::TimeUnlocked`] | `now >= unlock_time` — the time lock opens read access to *everyone* once passed, not only to inheritance addresses |
//! | [`AccessGrant::Inheritor`] | the requester appears in the inheritance list; admits designated identities ahead of the unlock time (after it, the time rule already admits everyone) |
//!
//! No capability is ever revoked once a memory exists: every rule's inputs
//! are immutable after creation except `now`, and the time rule is monotone,
//! so access can only widen over time.

use chrono::{DateTime, Utc};
use geovault_types::{Identity, Memory};

/// The rule that admitted a requester.
///
/// Useful for logging and diagnostics; callers that only need the decision
/// use [`can_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    /// Requester is the memory's creator.
    Owner,
    /// The memory is publicly visible.
    Public,
    /// The unlock time has passed; access is open to everyone.
    TimeUnlocked,
    /// Requester is on the inheritance list.
    Inheritor,
}

/// Evaluate the access rules for `requester` against `memory` at ledger time
/// `now`.
///
/// Returns the first admitting rule, or `None` when every rule denies.
pub fn evaluate(memory: &Memory, requester: &Identity, now: DateTime<Utc>) -> Option<AccessGrant> {
    if *requester == memory.owner {
        return Some(AccessGrant::Owner);
    }
    if memory.is_public {
        return Some(AccessGrant::Public);
    }
    if now >= memory.unlock_time {
        return Some(AccessGrant::TimeUnlocked);
    }
    if memory.inheritance.contains(requester) {
        return Some(AccessGrant::Inheritor);
    }
    None
}

/// True when `requester` may view `memory` at ledger time `now`.
pub fn can_access(memory: &Memory, requester: &Identity, now: DateTime<Utc>) -> bool {
    evaluate(memory, requester, now).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use geovault_types::{GeoPoint, MemoryId};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// Private memory owned by alice, unlocking at t=1000, bob inheriting.
    fn locked_memory() -> Memory {
        let owner = Identity::new("alice");
        let point = GeoPoint::new(10_000_000, 20_000_000);
        Memory {
            id: MemoryId::derive(&owner, point, at(0), 0),
            owner,
            encrypted_content: "ciphertext".to_string(),
            created_at: at(0),
            point,
            unlock_time: at(1_000),
            inheritance: vec![Identity::new("bob")],
            is_public: false,
            likes: 0,
            memory_type: "personal".to_string(),
            sequence: 0,
        }
    }

    // ── individual rules ────────────────────────────────────────────────────

    #[test]
    fn owner_is_always_admitted() {
        let m = locked_memory();
        assert_eq!(
            evaluate(&m, &Identity::new("alice"), at(1)),
            Some(AccessGrant::Owner)
        );
    }

    #[test]
    fn stranger_is_denied_before_unlock() {
        let m = locked_memory();
        assert_eq!(evaluate(&m, &Identity::new("mallory"), at(500)), None);
    }

    #[test]
    fn public_memory_admits_anyone() {
        let mut m = locked_memory();
        m.is_public = true;
        assert_eq!(
            evaluate(&m, &Identity::new("mallory"), at(1)),
            Some(AccessGrant::Public)
        );
    }

    #[test]
    fn time_lock_opens_to_everyone_not_only_inheritors() {
        let m = locked_memory();
        assert_eq!(
            evaluate(&m, &Identity::new("mallory"), at(1_000)),
            Some(AccessGrant::TimeUnlocked)
        );
    }

    #[test]
    fn unlock_boundary_is_inclusive() {
        let m = locked_memory();
        let mallory = Identity::new("mallory");
        assert!(!can_access(&m, &mallory, at(999)));
        assert!(can_access(&m, &mallory, at(1_000)));
    }

    #[test]
    fn inheritor_is_admitted_ahead_of_unlock() {
        let m = locked_memory();
        assert_eq!(
            evaluate(&m, &Identity::new("bob"), at(1)),
            Some(AccessGrant::Inheritor)
        );
    }

    #[test]
    fn inheritance_duplicates_are_harmless() {
        let mut m = locked_memory();
        m.inheritance = vec![
            Identity::new("bob"),
            Identity::new("bob"),
            Identity::new("carol"),
        ];
        assert!(can_access(&m, &Identity::new("bob"), at(1)));
        assert!(can_access(&m, &Identity::new("carol"), at(1)));
    }

    // ── rule precedence ─────────────────────────────────────────────────────

    #[test]
    fn owner_rule_wins_over_later_rules() {
        let mut m = locked_memory();
        m.is_public = true;
        // alice is both owner and admitted by publicness; the owner rule is
        // reported because it is checked first.
        assert_eq!(
            evaluate(&m, &Identity::new("alice"), at(2_000)),
            Some(AccessGrant::Owner)
        );
    }

    #[test]
    fn time_rule_reported_for_inheritors_after_unlock() {
        let m = locked_memory();
        assert_eq!(
            evaluate(&m, &Identity::new("bob"), at(1_500)),
            Some(AccessGrant::TimeUnlocked)
        );
    }

    // ── monotonicity ────────────────────────────────────────────────────────

    #[test]
    fn access_is_monotone_in_time() {
        // Once the time rule admits a requester, every later time admits too.
        let m = locked_memory();
        let mallory = Identity::new("mallory");
        let mut admitted = false;
        for t in [0, 500, 999, 1_000, 1_001, 10_000] {
            let now_admitted = can_access(&m, &mallory, at(t));
            assert!(
                now_admitted || !admitted,
                "access revoked between steps at t={t}"
            );
            admitted = now_admitted;
        }
        assert!(admitted);
    }

    #[test]
    fn evaluation_leaves_the_memory_untouched() {
        let m = locked_memory();
        let snapshot = m.clone();
        let _ = evaluate(&m, &Identity::new("mallory"), at(500));
        let _ = evaluate(&m, &Identity::new("bob"), at(2_000));
        assert_eq!(m, snapshot);
    }
}
