//! Log-space Viterbi decoding.
//!
//! Two entry points: `decode` runs the profile decoder with its silent
//! Begin/Delete/End states, `decode_dense` runs plain Viterbi over an
//! arbitrary dense model (start state 0, every state emitting).
//!
//! Profile DP layout: `state_count` rows, `n + 2` columns. Column 0 holds
//! Begin and the silent delete chain reachable from it, column `c` in
//! `1..=n` the states after consuming the c-th observation, column `n + 1`
//! only End. Within a column states are filled in ascending index order, so
//! a delete state always reads predecessors that are already final.

use crate::matrix::{Matrix, EP};
use crate::model::ProfileHmm;
use crate::states::StateSpace;
use crate::{Error, Result};

/// A decoded path and its log probability. The path of the profile decoder
/// runs `Begin ... End` and includes silent delete states; `decode_dense`
/// yields one state per observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiResult {
    pub path: Vec<usize>,
    pub score: f64,
}

impl ViterbiResult {
    /// Render the path as state labels (`B`, `M1`, `I0`, ..., `E`).
    pub fn labels(&self, states: &StateSpace) -> Result<Vec<String>> {
        self.path
            .iter()
            .map(|&s| states.kind(s).map(|k| k.to_string()))
            .collect()
    }
}

impl std::fmt::Display for ViterbiResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let path: Vec<_> = self.path.iter().map(|s| s.to_string()).collect();
        write!(f, "{};{}", path.join(","), self.score)
    }
}

// Last-wins maximum, matching ascending predecessor enumeration: on a tie
// the largest state index is kept.
fn max_and_argmax(candidates: impl Iterator<Item = (usize, f64)>) -> (usize, f64) {
    let mut best: Option<(usize, f64)> = None;
    for (state, score) in candidates {
        best = match best {
            Some((_, b)) if score < b => best,
            _ => Some((state, score)),
        };
    }
    best.expect("no candidate state")
}

/// Decode `observations` (dense alphabet codes) against a profile model.
pub fn decode(observations: &[usize], model: &ProfileHmm) -> Result<ViterbiResult> {
    let states = model.states();
    let trans = model.log_transition();
    let emit = model.log_emission();
    if observations.is_empty() {
        return Err(Error::InvalidInput("empty observation sequence".to_string()));
    }
    if let Some(&code) = observations.iter().find(|&&code| code >= emit.columns()) {
        return Err(Error::Decode(format!(
            "observation code {} out of range (alphabet size {})",
            code,
            emit.columns()
        )));
    }
    let n = observations.len();
    let mut dp = Matrix::new(states.state_count(), n + 2, EP);
    let mut backtrack = vec![vec![0; n + 2]; states.state_count()];
    dp[(states.begin(), 0)] = 0f64;
    // Silent pass: delete chains leaving Begin consume nothing, so the
    // whole Begin -> Delete_1 -> ... prefix lives in column 0.
    for state in states.first_delete()..=states.last_delete() {
        let (argmax, max) = max_and_argmax(
            states
                .predecessors(state)?
                .into_iter()
                .map(|p| (p, dp[(p, 0)] + trans[(p, state)])),
        );
        dp[(state, 0)] = max;
        backtrack[state][0] = argmax;
    }
    for (idx, &code) in observations.iter().enumerate() {
        let column = idx + 1;
        for state in 1..states.state_count() {
            if state == states.end() {
                continue;
            }
            let (argmax, max) = if states.is_consuming(state) {
                let (argmax, max) = max_and_argmax(
                    states
                        .predecessors(state)?
                        .into_iter()
                        .map(|p| (p, dp[(p, column - 1)] + trans[(p, state)])),
                );
                (argmax, max + emit[(state, code)])
            } else {
                // delete: same column, predecessors already final
                max_and_argmax(
                    states
                        .predecessors(state)?
                        .into_iter()
                        .map(|p| (p, dp[(p, column)] + trans[(p, state)])),
                )
            };
            dp[(state, column)] = max;
            backtrack[state][column] = argmax;
        }
    }
    // termination: End reads column n and lands in column n + 1
    let end = states.end();
    let (argmax, max) = max_and_argmax(
        states
            .predecessors(end)?
            .into_iter()
            .map(|p| (p, dp[(p, n)] + trans[(p, end)])),
    );
    dp[(end, n + 1)] = max;
    backtrack[end][n + 1] = argmax;

    let mut path = vec![end];
    let mut state = argmax;
    let mut column = n;
    loop {
        path.push(state);
        if state == states.begin() {
            break;
        }
        let predecessor = backtrack[state][column];
        if states.is_consuming(state) {
            column -= 1;
        }
        state = predecessor;
    }
    path.reverse();
    Ok(ViterbiResult { path, score: max })
}

/// Plain Viterbi over a dense model: `transition` is `|S| x |S|`,
/// `emission` is `|S| x |A|`, state 0 is the start state and emits
/// nothing. Both matrices are probabilities; logs are taken here. Ties go
/// to the smallest state index.
pub fn decode_dense(
    observations: &[usize],
    transition: &Matrix,
    emission: &Matrix,
) -> Result<ViterbiResult> {
    let state_count = transition.rows();
    if observations.is_empty() {
        return Err(Error::InvalidInput("empty observation sequence".to_string()));
    }
    if let Some(&code) = observations.iter().find(|&&code| code >= emission.columns()) {
        return Err(Error::Decode(format!(
            "observation code {} out of range (alphabet size {})",
            code,
            emission.columns()
        )));
    }
    let trans = transition.ln();
    let emit = emission.ln();
    let n = observations.len();
    let mut dp = Matrix::new(state_count, n + 1, EP);
    let mut backtrack = vec![vec![0; n + 1]; state_count];
    dp[(0, 0)] = 0f64;
    for (idx, &code) in observations.iter().enumerate() {
        let column = idx + 1;
        for state in 0..state_count {
            let mut max = dp[(0, column - 1)] + trans[(0, state)];
            let mut argmax = 0;
            for predecessor in 1..state_count {
                let score = dp[(predecessor, column - 1)] + trans[(predecessor, state)];
                if max < score {
                    max = score;
                    argmax = predecessor;
                }
            }
            dp[(state, column)] = max + emit[(state, code)];
            backtrack[state][column] = argmax;
        }
    }
    let mut last = 0;
    let mut score = dp[(0, n)];
    for state in 1..state_count {
        if score < dp[(state, n)] {
            score = dp[(state, n)];
            last = state;
        }
    }
    let mut path = vec![0; n];
    path[n - 1] = last;
    for column in (1..n).rev() {
        path[column - 1] = backtrack[path[column]][column + 1];
    }
    Ok(ViterbiResult { path, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::model::{BuildConfig, ProfileHmm};
    use crate::msa::Msa;

    fn model(seqs: &[&[u8]], pseudocount: f64) -> ProfileHmm {
        let msa = Msa::from_seqs(seqs).unwrap();
        let config = BuildConfig {
            emission_pseudocount: pseudocount,
            transition_pseudocount: pseudocount,
            ..BuildConfig::default()
        };
        ProfileHmm::new(&msa, &Alphabet::dna(b'-'), &config).unwrap()
    }

    fn assert_path_is_valid(result: &ViterbiResult, states: &StateSpace) {
        assert_eq!(result.path.first(), Some(&states.begin()));
        assert_eq!(result.path.last(), Some(&states.end()));
        for pair in result.path.windows(2) {
            assert!(
                states.successors(pair[0]).unwrap().contains(&pair[1]),
                "illegal step {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn consensus_query_follows_the_match_chain() {
        let model = model(&[b"ACG", b"ACG"], 0.001);
        let obs = model.alphabet().encode(b"ACG").unwrap();
        let result = decode(&obs, &model).unwrap();
        let states = model.states();
        assert_eq!(
            result.path,
            vec![
                states.begin(),
                states.match_state(1),
                states.match_state(2),
                states.match_state(3),
                states.end(),
            ]
        );
        assert!(result.score < 0f64);
        assert_eq!(
            result.labels(states).unwrap(),
            vec!["B", "M1", "M2", "M3", "E"]
        );
    }

    #[test]
    fn missing_symbol_routes_through_a_delete_state() {
        let model = model(&[b"ACG", b"ACG"], 0.001);
        // "AG" skips the C column: the cheap route is M1 -> D2 -> M3.
        let obs = model.alphabet().encode(b"AG").unwrap();
        let result = decode(&obs, &model).unwrap();
        let states = model.states();
        assert_eq!(
            result.path,
            vec![
                states.begin(),
                states.match_state(1),
                states.delete_state(2),
                states.match_state(3),
                states.end(),
            ]
        );
        assert_path_is_valid(&result, states);
    }

    #[test]
    fn extra_symbol_routes_through_an_insert_state() {
        let model = model(&[b"ACG", b"ACG"], 0.001);
        // one symbol too many; some insert state has to absorb it
        let obs = model.alphabet().encode(b"ACTG").unwrap();
        let result = decode(&obs, &model).unwrap();
        let states = model.states();
        assert_path_is_valid(&result, states);
        assert_eq!(result.path.len(), 6);
        assert!(result
            .path
            .iter()
            .any(|&s| states.first_insert() <= s && s <= states.last_insert()));
    }

    #[test]
    fn consuming_states_cover_every_observation() {
        let model = model(
            &[b"AG---C".as_ref(), b"A-AG-C", b"AG-AA-", b"--AAAC", b"AG---C"],
            1f64,
        );
        let obs = model.alphabet().encode(b"TTTG").unwrap();
        let result = decode(&obs, &model).unwrap();
        let states = model.states();
        assert_path_is_valid(&result, states);
        let consumed = result
            .path
            .iter()
            .filter(|&&s| s != states.begin() && states.is_consuming(s))
            .count();
        assert_eq!(consumed, obs.len());
    }

    #[test]
    fn decoding_is_deterministic() {
        let model = model(
            &[b"AG---C".as_ref(), b"A-AG-C", b"AG-AA-", b"--AAAC", b"AG---C"],
            1f64,
        );
        let obs = model.alphabet().encode(b"AGAAC").unwrap();
        let first = decode(&obs, &model).unwrap();
        let second = decode(&obs, &model).unwrap();
        assert_eq!(first.path, second.path);
        assert!(first.score == second.score);
    }

    #[test]
    fn rejects_bad_observations() {
        let model = model(&[b"ACG", b"ACG"], 1f64);
        assert!(decode(&[], &model).is_err());
        assert!(decode(&[0, 4, 1], &model).is_err());
    }

    #[test]
    fn display_renders_path_and_score() {
        let result = ViterbiResult {
            path: vec![0, 1, 4],
            score: -2.5,
        };
        assert_eq!(result.to_string(), "0,1,4;-2.5");
    }

    #[test]
    fn dense_decoder_recovers_the_dishonest_casino() {
        // Fair/loaded die regression data. State 0 is the silent start,
        // 1 the fair die, 2 the loaded die (0.5 mass on the six).
        let observations: Vec<usize> = vec![
            2, 0, 4, 0, 0, 5, 1, 3, 5, 3, 3, 5, 5, 3, 3, 1, 3, 4, 2, 0, 0, 2, 1, 0, 5, 2, 0,
            0, 5, 3, 0, 4, 1, 0, 2, 2, 5, 1, 4, 0, 3, 3, 4, 3, 2, 5, 2, 0, 5, 4, 5, 5, 1, 5,
            4, 5, 5, 5, 5, 5, 5, 4, 0, 0, 5, 5, 3, 4, 2, 0, 2, 1, 5, 4, 0, 1, 3, 4, 5, 2, 5,
            5, 5, 3, 5, 2, 0, 5, 2, 5, 5, 5, 2, 0, 5, 1, 2, 1, 5, 3, 4, 4, 1, 2, 5, 1, 5, 5,
            5, 5, 5, 5, 1, 4, 0, 4, 0, 5, 2, 0, 1, 1, 1, 4, 4, 4, 3, 3, 0, 5, 5, 5, 4, 5, 5,
            4, 5, 2, 4, 5, 3, 2, 1, 3, 2, 5, 3, 0, 2, 0, 4, 0, 2, 3, 5, 4, 0, 3, 5, 2, 4, 2,
            3, 0, 0, 0, 1, 5, 3, 0, 3, 5, 1, 5, 1, 4, 2, 2, 4, 5, 2, 5, 5, 0, 5, 2, 5, 5, 5,
            3, 5, 5, 1, 2, 1, 4, 2, 3, 3, 0, 2, 5, 5, 0, 5, 5, 0, 0, 5, 2, 1, 4, 1, 4, 5, 1,
            3, 5, 1, 1, 4, 4, 1, 5, 4, 1, 4, 1, 1, 5, 5, 3, 2, 4, 2, 4, 2, 2, 2, 5, 1, 2, 2,
            0, 1, 0, 5, 1, 4, 2, 5, 3, 3, 0, 3, 3, 2, 1, 2, 2, 4, 0, 5, 2, 1, 3, 2, 5, 2, 2,
            5, 5, 4, 4, 5, 1, 3, 5, 5, 5, 5, 1, 5, 2, 1, 5, 5, 5, 5, 0, 1, 2, 4, 4, 1, 3, 4,
            1, 3, 1,
        ];
        let mut transition = Matrix::new(3, 3, 0f64);
        for (i, row) in [[0f64, 0.5, 0.5], [0., 0.95, 0.05], [0., 0.1, 0.9]]
            .iter()
            .enumerate()
        {
            transition.row_mut(i).copy_from_slice(row);
        }
        let mut emission = Matrix::new(3, 6, 0f64);
        emission.row_mut(1).copy_from_slice(&[1. / 6.; 6]);
        emission
            .row_mut(2)
            .copy_from_slice(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.5]);
        let expected: Vec<usize> = vec![
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2,
            2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2,
            2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
            2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
            2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
            2, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
        ];
        let result = decode_dense(&observations, &transition, &emission).unwrap();
        assert_eq!(result.path, expected);
        assert!(result.score < 0f64);
    }

    #[test]
    fn dense_decoder_rejects_bad_observations() {
        let transition = Matrix::new(2, 2, 0.5);
        let emission = Matrix::new(2, 4, 0.25);
        assert!(decode_dense(&[], &transition, &emission).is_err());
        assert!(decode_dense(&[0, 4], &transition, &emission).is_err());
    }
}
