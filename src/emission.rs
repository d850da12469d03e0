//! Emission counting and smoothing.
//!
//! Only Begin, the match block, and the insert block have emission rows
//! (`0..=last_insert`); delete states are silent and End never emits, so
//! their rows would be dead weight. Begin/End rows exist but stay all-zero.

use crate::alphabet::Alphabet;
use crate::matrix::Matrix;
use crate::msa::Msa;
use crate::states::StateSpace;
use crate::{Error, Result};

/// Raw per-state symbol counts. Consumed by `smooth`, so the
/// count-then-normalize pipeline can only run once.
#[derive(Debug, Clone)]
pub struct EmissionCounts {
    counts: Matrix,
    states: StateSpace,
}

impl EmissionCounts {
    /// Walk every alignment column and attribute each non-gap symbol to
    /// the match state of its profile column, or to the insert state of
    /// the current profile column for non-match columns.
    pub fn from_msa(
        msa: &Msa,
        alphabet: &Alphabet,
        match_columns: &[usize],
        states: StateSpace,
    ) -> Result<Self> {
        let mut counts = Matrix::new(states.last_insert() + 1, alphabet.len(), 0f64);
        let gap = alphabet.gap();
        let mut remaining = match_columns.iter().peekable();
        let mut profile_column = 0;
        let mut current_match = None;
        for column in 0..msa.len() {
            if remaining.peek() == Some(&&column) {
                current_match = remaining.next().copied();
                profile_column += 1;
            }
            let is_match = current_match == Some(column);
            for seq in msa.seqs() {
                let symbol = seq[column];
                if symbol == gap {
                    continue;
                }
                let code = alphabet.code(symbol).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "symbol {:?} in the alignment is not in the alphabet",
                        symbol as char
                    ))
                })?;
                let state = if is_match {
                    states.match_state(profile_column)
                } else {
                    states.insert_state(profile_column)
                };
                counts[(state, code)] += 1f64;
            }
        }
        Ok(Self { counts, states })
    }
    pub fn counts(&self) -> &Matrix {
        &self.counts
    }
    /// Add-`pseudocount` smoothing: every emitting row except Begin/End
    /// becomes `(c + p) / (rowsum + p * |alphabet|)`, hence sums to one.
    /// Consumes the counts; returns pre-log probabilities.
    pub fn smooth(self, pseudocount: f64) -> Result<Matrix> {
        if pseudocount < 0f64 {
            return Err(Error::InvalidInput(format!(
                "negative pseudocount {}",
                pseudocount
            )));
        }
        let Self { mut counts, states } = self;
        let alphabet_size = counts.columns() as f64;
        for state in 1..counts.rows() {
            if state == states.end() {
                continue;
            }
            let divisor = counts.row_sum(state) + pseudocount * alphabet_size;
            if divisor <= 0f64 {
                // pseudocount 0 and an unobserved row; keep it zero.
                continue;
            }
            for x in counts.row_mut(state).iter_mut() {
                *x = (*x + pseudocount) / divisor;
            }
        }
        Ok(counts)
    }
}
