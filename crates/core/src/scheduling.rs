//! # Slot Ranking
//!
//! This module contains the aggregation logic that turns members' submitted
//! availability proposals into a ranked list of candidate kickoff times.
//!
//! ## Ranking Algorithm
//!
//! The core algorithm tallies how often each distinct `(datetime,
//! location_type)` pair appears across all proposals for a pursuit:
//!
//! 1. Build a map keyed by the normalized slot pair with a running count
//! 2. For every proposal, for every slot in it, increment the key's count
//! 3. Emit one [`AggregatedSlot`] per distinct key with its final count
//! 4. Sort descending by count, with a deterministic tie-break
//!
//! No per-proposal de-duplication is performed: a member listing the same
//! slot twice contributes two to its count. Ties are broken by earliest
//! `datetime`, then `video` before `in_person`, so the output order is fully
//! deterministic regardless of input order.
//!
//! The computation is a pure function over an in-memory snapshot: no I/O, no
//! shared state, safe to invoke concurrently with different inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::proposal::{AggregatedSlot, LocationType, TimeSlotProposal};

/// Ranks the candidate kickoff slots proposed for a pursuit by popularity.
///
/// Every distinct `(datetime, location_type)` pair appearing in any input
/// proposal appears exactly once in the output, and the sum of output counts
/// equals the total number of slot entries across all proposals. The output
/// is sorted by descending count; tied counts are ordered by earliest
/// `datetime`, then `Video` before `InPerson`.
///
/// An empty input yields an empty output. Proposals with no slots contribute
/// nothing. This function cannot fail.
///
/// # Parameters
///
/// * `proposals` - snapshot of all active proposals for one pursuit, at most
///   one per member (the store replaces on resubmission)
///
/// # Returns
///
/// * `Vec<AggregatedSlot>` - ranked candidates, most popular first
pub fn rank_slots(proposals: &[TimeSlotProposal]) -> Vec<AggregatedSlot> {
    // BTreeMap keys iterate in (datetime, location_type) order, which is
    // exactly the tie-break order we want after the stable sort by count.
    let mut tally: BTreeMap<(DateTime<Utc>, LocationType), usize> = BTreeMap::new();

    for proposal in proposals {
        for slot in &proposal.proposed_slots {
            *tally.entry((slot.datetime, slot.location_type)).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<AggregatedSlot> = tally
        .into_iter()
        .map(|((datetime, location_type), count)| AggregatedSlot {
            datetime,
            location_type,
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Returns the single best candidate, if any proposals were submitted.
pub fn top_slot(proposals: &[TimeSlotProposal]) -> Option<AggregatedSlot> {
    rank_slots(proposals).into_iter().next()
}
