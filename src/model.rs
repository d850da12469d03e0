//! The immutable model bundle and its build orchestration.

use crate::alphabet::Alphabet;
use crate::emission::EmissionCounts;
use crate::matrix::Matrix;
use crate::msa::Msa;
use crate::states::StateSpace;
use crate::transition::TransitionCounts;
use crate::Result;
use log::{debug, trace};

/// Knobs for model construction. The two pseudocounts are independent so
/// that emission smoothing can be tuned without touching the transitions.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    pub gap: u8,
    pub match_threshold: f64,
    pub emission_pseudocount: f64,
    pub transition_pseudocount: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            gap: b'-',
            match_threshold: 0.5,
            emission_pseudocount: 1f64,
            transition_pseudocount: 1f64,
        }
    }
}

/// A trained profile HMM. Both matrices are already in log space and every
/// row was normalized before this value came to exist, so it is safe to
/// share across decoding threads as-is.
#[derive(Debug, Clone)]
pub struct ProfileHmm {
    states: StateSpace,
    log_emission: Matrix,
    log_transition: Matrix,
    alphabet: Alphabet,
    column_count: usize,
}

impl ProfileHmm {
    /// Classify columns, lay out the state space, count and smooth both
    /// parameter tables, and take logs. Single threaded.
    pub fn new(msa: &Msa, alphabet: &Alphabet, config: &BuildConfig) -> Result<Self> {
        let match_columns = msa.match_columns(config.gap, config.match_threshold)?;
        debug!(
            "{} of {} columns are match columns",
            match_columns.len(),
            msa.len()
        );
        let states = StateSpace::new(match_columns.len())?;
        let emission = EmissionCounts::from_msa(msa, alphabet, &match_columns, states)?
            .smooth(config.emission_pseudocount)?;
        let transition =
            TransitionCounts::from_msa(msa, &match_columns, states, config.gap)?
                .smooth(config.transition_pseudocount)?;
        trace!("emission:\n{}", emission);
        trace!("transition:\n{}", transition);
        Ok(Self {
            states,
            log_emission: emission.ln(),
            log_transition: transition.ln(),
            alphabet: alphabet.clone(),
            column_count: msa.len(),
        })
    }
    pub fn states(&self) -> &StateSpace {
        &self.states
    }
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
    /// Number of columns of the training alignment.
    pub fn column_count(&self) -> usize {
        self.column_count
    }
    pub fn log_emission(&self) -> &Matrix {
        &self.log_emission
    }
    pub fn log_transition(&self) -> &Matrix {
        &self.log_transition
    }
}
