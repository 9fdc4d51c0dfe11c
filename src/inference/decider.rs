//! Picks the winning width from a vote table

use super::votes::VoteTable;
use crate::models::{Decision, Whitelist};

/// Choose the whitelisted delta with the most votes.
///
/// Deltas are scanned in ascending order and only a strictly higher count
/// replaces the current best, so ties go to the smaller width.
pub fn decide(votes: &VoteTable, whitelist: &Whitelist) -> Decision {
    let mut best = 0;
    let mut best_score = 0;
    for (delta, score) in votes.iter() {
        if whitelist.contains(delta) && score > best_score {
            best = delta;
            best_score = score;
        }
    }

    if best == 0 {
        Decision::Undetermined
    } else {
        Decision::Spaces(best)
    }
}
