//! Linear numbering and adjacency of the profile-HMM state graph.
//!
//! For `m` match columns the states are laid out in one contiguous range:
//!
//! ```text
//! Begin  Match_1 .. Match_m  End  Insert_0 .. Insert_m  Delete_1 .. Delete_m
//!   0       1         m     m+1     m+2        2m+2       2m+3       3m+2
//! ```
//!
//! Everything past `last_insert` is silent: delete states never emit.
//! The adjacency below is the single source of truth for which transitions
//! may ever carry probability mass; the transition builder smooths exactly
//! these pairs and the decoder enumerates their inverses.

use crate::{Error, Result};

/// A state with its kind and profile column made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Begin,
    /// k in 1..=match_count
    Match(usize),
    /// k in 0..=match_count
    Insert(usize),
    /// k in 1..=match_count
    Delete(usize),
    End,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            StateKind::Begin => write!(f, "B"),
            StateKind::Match(k) => write!(f, "M{}", k),
            StateKind::Insert(k) => write!(f, "I{}", k),
            StateKind::Delete(k) => write!(f, "D{}", k),
            StateKind::End => write!(f, "E"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace {
    match_count: usize,
    end: usize,
    first_insert: usize,
    last_insert: usize,
    first_delete: usize,
    last_delete: usize,
    state_count: usize,
}

impl StateSpace {
    pub fn new(match_count: usize) -> Result<Self> {
        if match_count == 0 {
            return Err(Error::InvalidInput("no match columns".to_string()));
        }
        let end = match_count + 1;
        let first_insert = end + 1;
        let last_insert = first_insert + match_count;
        let first_delete = last_insert + 1;
        let last_delete = first_delete + match_count - 1;
        Ok(Self {
            match_count,
            end,
            first_insert,
            last_insert,
            first_delete,
            last_delete,
            state_count: last_delete + 1,
        })
    }
    pub fn match_count(&self) -> usize {
        self.match_count
    }
    pub fn begin(&self) -> usize {
        0
    }
    pub fn end(&self) -> usize {
        self.end
    }
    pub fn first_insert(&self) -> usize {
        self.first_insert
    }
    pub fn last_insert(&self) -> usize {
        self.last_insert
    }
    pub fn first_delete(&self) -> usize {
        self.first_delete
    }
    pub fn last_delete(&self) -> usize {
        self.last_delete
    }
    pub fn state_count(&self) -> usize {
        self.state_count
    }
    /// Index of Match_k (k in 1..=match_count).
    pub fn match_state(&self, k: usize) -> usize {
        debug_assert!(1 <= k && k <= self.match_count);
        k
    }
    /// Index of Insert_k (k in 0..=match_count).
    pub fn insert_state(&self, k: usize) -> usize {
        debug_assert!(k <= self.match_count);
        self.first_insert + k
    }
    /// Index of Delete_k (k in 1..=match_count).
    pub fn delete_state(&self, k: usize) -> usize {
        debug_assert!(1 <= k && k <= self.match_count);
        self.first_delete + k - 1
    }
    /// Match and insert states consume an observation; Begin anchors the
    /// DP at column zero. Delete states and End are silent.
    pub fn is_consuming(&self, state: usize) -> bool {
        state <= self.last_insert && state != self.end
    }
    pub fn kind(&self, state: usize) -> Result<StateKind> {
        if state == 0 {
            Ok(StateKind::Begin)
        } else if state < self.end {
            Ok(StateKind::Match(state))
        } else if state == self.end {
            Ok(StateKind::End)
        } else if state <= self.last_insert {
            Ok(StateKind::Insert(state - self.first_insert))
        } else if state <= self.last_delete {
            Ok(StateKind::Delete(state - self.first_delete + 1))
        } else {
            Err(Error::StateOutOfRange(state, self.state_count))
        }
    }
    /// Inverse of `kind`.
    pub fn index(&self, kind: StateKind) -> usize {
        match kind {
            StateKind::Begin => 0,
            StateKind::Match(k) => self.match_state(k),
            StateKind::Insert(k) => self.insert_state(k),
            StateKind::Delete(k) => self.delete_state(k),
            StateKind::End => self.end,
        }
    }
    /// The profile column a state belongs to: 0 for Begin and Insert_0,
    /// k for Match_k/Insert_k/Delete_k, match_count+1 for End.
    pub fn column_of(&self, state: usize) -> Result<usize> {
        Ok(match self.kind(state)? {
            StateKind::Begin => 0,
            StateKind::Match(k) => k,
            StateKind::Insert(k) => k,
            StateKind::Delete(k) => k,
            StateKind::End => self.match_count + 1,
        })
    }
    /// First index of the block after the one `state` lives in: the match
    /// block (Begin..=End) is followed by the inserts, the inserts by the
    /// deletes, the deletes by `state_count`.
    pub fn next_kind_boundary(&self, state: usize) -> Result<usize> {
        Ok(match self.kind(state)? {
            StateKind::Begin | StateKind::Match(_) | StateKind::End => self.first_insert,
            StateKind::Insert(_) => self.first_delete,
            StateKind::Delete(_) => self.state_count,
        })
    }
    /// Structurally valid successors of `state`, ascending. Only these
    /// pairs may carry non-zero transition probability.
    pub fn successors(&self, state: usize) -> Result<Vec<usize>> {
        let m = self.match_count;
        Ok(match self.kind(state)? {
            StateKind::Begin => vec![
                self.match_state(1),
                self.insert_state(0),
                self.delete_state(1),
            ],
            StateKind::Match(k) if k < m => vec![
                self.match_state(k + 1),
                self.insert_state(k),
                self.delete_state(k + 1),
            ],
            StateKind::Match(_) => vec![self.end, self.insert_state(m)],
            StateKind::End => vec![],
            StateKind::Insert(k) => {
                let next = if k < m { self.match_state(k + 1) } else { self.end };
                let mut succ = vec![next, self.insert_state(k)];
                if k < m {
                    succ.push(self.delete_state(k + 1));
                }
                succ
            }
            StateKind::Delete(k) => {
                let next = if k < m { self.match_state(k + 1) } else { self.end };
                let mut succ = vec![next, self.insert_state(k)];
                if k < m {
                    succ.push(self.delete_state(k + 1));
                }
                succ
            }
        })
    }
    /// Structural inverse of `successors`, ascending. The decoder walks
    /// these lists; their order decides which predecessor wins a tie.
    pub fn predecessors(&self, state: usize) -> Result<Vec<usize>> {
        Ok(match self.kind(state)? {
            StateKind::Begin => vec![],
            StateKind::Match(1) => vec![self.begin(), self.insert_state(0)],
            StateKind::Match(k) => vec![
                self.match_state(k - 1),
                self.insert_state(k - 1),
                self.delete_state(k - 1),
            ],
            StateKind::End => {
                let m = self.match_count;
                vec![self.match_state(m), self.insert_state(m), self.delete_state(m)]
            }
            StateKind::Insert(0) => vec![self.begin(), self.insert_state(0)],
            StateKind::Insert(k) => vec![
                self.match_state(k),
                self.insert_state(k),
                self.delete_state(k),
            ],
            StateKind::Delete(1) => vec![self.begin(), self.insert_state(0)],
            StateKind::Delete(k) => vec![
                self.match_state(k - 1),
                self.insert_state(k - 1),
                self.delete_state(k - 1),
            ],
        })
    }
}
