//! Profile hidden Markov models over multiple sequence alignments, with a
//! log-space Viterbi decoder for scoring and classifying unaligned queries.
//!
//! The pipeline: parse an aligned FASTA file into an [`msa::Msa`], build a
//! [`model::ProfileHmm`] (column classification, count, smooth, log), then
//! run [`viterbi::decode`] per query, or [`decode_batch`] over many.
pub mod alphabet;
pub mod emission;
pub mod fasta;
pub mod gen_seq;
pub mod matrix;
pub mod model;
pub mod msa;
pub mod states;
pub mod transition;
pub mod viterbi;
use alphabet::Alphabet;
use model::{BuildConfig, ProfileHmm};
use msa::AlignedRecord;
use rayon::prelude::*;
use viterbi::ViterbiResult;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("decoding failed: {0}")]
    Decode(String),
    #[error("state {0} out of range (state count {1})")]
    StateOutOfRange(usize, usize),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Train a profile HMM from aligned FASTA records.
pub fn build_profile(
    records: &[AlignedRecord],
    alphabet: &Alphabet,
    config: &BuildConfig,
) -> Result<ProfileHmm> {
    let msa = msa::Msa::new(records)?;
    ProfileHmm::new(&msa, alphabet, config)
}

/// Decode every query against the shared model, in parallel. Each query is
/// encoded and decoded independently; a failure (unknown symbol, empty
/// sequence) is reported in its own slot and does not affect the rest.
pub fn decode_batch<T: std::borrow::Borrow<[u8]> + Sync>(
    model: &ProfileHmm,
    queries: &[T],
) -> Vec<Result<ViterbiResult>> {
    queries
        .par_iter()
        .map(|query| {
            let observations = model.alphabet().encode(query.borrow())?;
            viterbi::decode(&observations, model)
        })
        .collect()
}
