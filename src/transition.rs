//! Transition counting and smoothing.
//!
//! Each aligned sequence implies a state path through the profile: its
//! pattern of gaps at match columns selects match or delete states, and
//! residues in non-match columns select insert states. Walking the columns
//! left to right and resolving, for every consumed/entered state, the
//! previous consuming state of the same sequence yields one transition
//! count per step. The End transition is the same resolution applied one
//! position past the last column.

use crate::matrix::Matrix;
use crate::msa::Msa;
use crate::states::StateSpace;
use crate::{Error, Result};

/// Raw transition counts over the full `state_count x state_count` grid.
/// Consumed by `smooth`; normalizing twice is unrepresentable.
#[derive(Debug, Clone)]
pub struct TransitionCounts {
    counts: Matrix,
    states: StateSpace,
}

/// Cursor over the match-column structure of the alignment. `profile`
/// counts the match columns crossed so far; the two options keep the
/// column indices of the current and the previous match column, `None`
/// before the first one is reached.
#[derive(Debug, Clone, Copy)]
struct MatchCursor {
    previous: Option<usize>,
    current: Option<usize>,
    profile: usize,
}

impl TransitionCounts {
    pub fn from_msa(
        msa: &Msa,
        match_columns: &[usize],
        states: StateSpace,
        gap: u8,
    ) -> Result<Self> {
        let n = states.state_count();
        let mut counts = Matrix::new(n, n, 0f64);
        let mut remaining = match_columns.iter().peekable();
        let mut cursor = MatchCursor {
            previous: None,
            current: None,
            profile: 0,
        };
        for column in 0..msa.len() {
            if remaining.peek() == Some(&&column) {
                cursor.previous = cursor.current;
                cursor.current = remaining.next().copied();
                cursor.profile += 1;
            }
            let is_match = cursor.current == Some(column);
            for seq in msa.seqs() {
                let is_gap = seq[column] == gap;
                if !is_match && is_gap {
                    // a gap in a non-match column consumes nothing and
                    // selects no state; it contributes no transition.
                    continue;
                }
                let destination = if is_match && is_gap {
                    states.delete_state(cursor.profile)
                } else if is_match {
                    states.match_state(cursor.profile)
                } else {
                    states.insert_state(cursor.profile)
                };
                // The backward scan for a match-column destination stops at
                // the *previous* match column; for an insert destination it
                // stops at the current one.
                let (floor, floor_profile) = if is_match {
                    (cursor.previous, cursor.profile - 1)
                } else {
                    (cursor.current, cursor.profile)
                };
                let source = previous_state(seq, column, floor, floor_profile, states, gap);
                counts[(source, destination)] += 1f64;
            }
        }
        // Transition into End: resolve the previous state one position
        // past the last column.
        for seq in msa.seqs() {
            let source = previous_state(seq, msa.len(), cursor.current, cursor.profile, states, gap);
            counts[(source, states.end())] += 1f64;
        }
        Ok(Self { counts, states })
    }
    pub fn counts(&self) -> &Matrix {
        &self.counts
    }
    /// Add `pseudocount` to every structurally valid transition, then
    /// normalize each non-End row to sum to one. Consumes the counts and
    /// returns pre-log probabilities.
    pub fn smooth(self, pseudocount: f64) -> Result<Matrix> {
        if pseudocount < 0f64 {
            return Err(Error::InvalidInput(format!(
                "negative pseudocount {}",
                pseudocount
            )));
        }
        let Self { mut counts, states } = self;
        for source in 0..states.state_count() {
            for successor in states.successors(source)? {
                counts[(source, successor)] += pseudocount;
            }
        }
        for source in 0..states.state_count() {
            if source == states.end() {
                continue;
            }
            let sum = counts.row_sum(source);
            if sum <= 0f64 {
                // only possible with pseudocount 0; leave the row zero.
                continue;
            }
            for x in counts.row_mut(source).iter_mut() {
                *x /= sum;
            }
        }
        Ok(counts)
    }
}

/// Find the state that consumed/occupied this sequence last, scanning
/// backward from `column - 1` down to the bounding match column `floor`
/// (or to the start of the alignment when `floor` is None):
/// a residue strictly between the two columns means the insert state of
/// `floor_profile`; at `floor` itself a gap means its delete state and a
/// residue its match state; running past the start means Begin.
fn previous_state(
    seq: &[u8],
    column: usize,
    floor: Option<usize>,
    floor_profile: usize,
    states: StateSpace,
    gap: u8,
) -> usize {
    let bound = floor.map(|c| c as isize).unwrap_or(-1);
    let mut i = column as isize - 1;
    while i >= bound {
        if i < 0 {
            return states.begin();
        }
        let at = i as usize;
        if Some(at) == floor {
            return if seq[at] == gap {
                states.delete_state(floor_profile)
            } else {
                states.match_state(floor_profile)
            };
        }
        if seq[at] != gap {
            return states.insert_state(floor_profile);
        }
        i -= 1;
    }
    // the scan always returns at the floor column or at -1
    states.begin()
}
