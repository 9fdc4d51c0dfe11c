//! Vote accumulation over indentation deltas

use std::collections::BTreeMap;

/// Votes per indentation delta magnitude.
///
/// Sparse: only deltas that received a vote are stored, so a single deeply
/// indented line costs one entry. Every stored key is a positive delta and
/// unset deltas read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTable {
    counts: BTreeMap<usize, u32>,
}

impl VoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes recorded for `delta` (zero when absent)
    pub fn get(&self, delta: usize) -> u32 {
        self.counts.get(&delta).copied().unwrap_or(0)
    }

    fn add_vote(&mut self, delta: usize) {
        debug_assert!(delta > 0, "deltas are positive");
        *self.counts.entry(delta).or_insert(0) += 1;
    }

    /// Largest delta with a vote, or `None` when nothing was voted
    pub fn max_delta(&self) -> Option<usize> {
        self.counts.last_key_value().map(|(&delta, _)| delta)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in ascending delta order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(&delta, &count)| (delta, count))
    }

    pub fn to_map(&self) -> BTreeMap<usize, u32> {
        self.counts.clone()
    }
}

/// Folds evidence-line indentation into a [`VoteTable`].
///
/// A change of indentation votes for its magnitude. A line that stays on the
/// same non-zero level votes again for the delta that reached that level.
#[derive(Debug, Default)]
pub struct VoteAccumulator {
    previous_indent: usize,
    carried_delta: usize,
    votes: VoteTable,
    evidence_lines: usize,
}

impl VoteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evidence line indented by `indent` spaces.
    ///
    /// Returns the delta from the previous evidence line.
    pub fn observe(&mut self, indent: usize) -> usize {
        let diff = indent.abs_diff(self.previous_indent);

        if diff == 0 {
            if self.carried_delta != 0 && indent != 0 {
                self.votes.add_vote(self.carried_delta);
            }
        } else {
            self.votes.add_vote(diff);
            self.carried_delta = diff;
        }

        self.previous_indent = indent;
        self.evidence_lines += 1;
        diff
    }

    pub fn evidence_lines(&self) -> usize {
        self.evidence_lines
    }

    pub fn votes(&self) -> &VoteTable {
        &self.votes
    }

    pub fn into_votes(self) -> VoteTable {
        self.votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(indents: &[usize]) -> VoteAccumulator {
        let mut acc = VoteAccumulator::new();
        for &indent in indents {
            acc.observe(indent);
        }
        acc
    }

    #[test]
    fn test_empty_table() {
        let table = VoteTable::new();
        assert!(table.is_empty());
        assert_eq!(table.max_delta(), None);
        assert_eq!(table.get(4), 0);
    }

    #[test]
    fn test_plateau_revotes_carried_delta() {
        // 0 -> 2 votes 2, 2 -> 2 re-votes 2, 2 -> 0 votes 2
        let acc = accumulate(&[0, 2, 2, 0]);
        assert_eq!(acc.votes().get(2), 3);
        assert_eq!(acc.evidence_lines(), 4);
    }

    #[test]
    fn test_zero_level_plateau_does_not_vote() {
        let acc = accumulate(&[0, 0, 0]);
        assert!(acc.votes().is_empty());

        // back at column 0 after a step: no re-vote even with a carried delta
        let acc = accumulate(&[0, 4, 0, 0, 0]);
        assert_eq!(acc.votes().get(4), 2);
    }

    #[test]
    fn test_carried_delta_tracks_latest_change() {
        // 0 -> 4 (4), 4 -> 6 (2), 6 -> 6 re-votes 2
        let acc = accumulate(&[0, 4, 6, 6]);
        assert_eq!(acc.votes().get(4), 1);
        assert_eq!(acc.votes().get(2), 2);
    }

    #[test]
    fn test_first_line_is_measured_from_zero() {
        let acc = accumulate(&[3]);
        assert_eq!(acc.votes().get(3), 1);
    }

    #[test]
    fn test_observe_returns_delta() {
        let mut acc = VoteAccumulator::new();
        assert_eq!(acc.observe(4), 4);
        assert_eq!(acc.observe(4), 0);
        assert_eq!(acc.observe(0), 4);
    }

    #[test]
    fn test_iter_and_map_in_delta_order() {
        let acc = accumulate(&[0, 2, 8]);
        let map = acc.votes().to_map();
        assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![(2, 1), (6, 1)]);
        assert_eq!(acc.votes().max_delta(), Some(6));
    }

    #[test]
    fn test_deep_indent_stays_sparse() {
        let acc = accumulate(&[0, 4, 5_000_000, 4]);
        let votes = acc.votes();
        assert_eq!(votes.get(4_999_996), 2);
        assert_eq!(votes.max_delta(), Some(4_999_996));
        assert_eq!(votes.iter().count(), 2);
    }
}
