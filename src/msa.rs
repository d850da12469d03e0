//! Multiple sequence alignment input and the match-column classifier.

use crate::{Error, Result};

/// An alignment record: identifier and gapped sequence, as parsed from
/// FASTA. All records in one `Msa` share the same length.
pub type AlignedRecord = (String, Vec<u8>);

#[derive(Debug, Clone)]
pub struct Msa {
    ids: Vec<String>,
    seqs: Vec<Vec<u8>>,
    len: usize,
}

impl Msa {
    pub fn new(records: &[AlignedRecord]) -> Result<Self> {
        let (ids, seqs): (Vec<_>, Vec<_>) = records.iter().cloned().unzip();
        Msa::from_parts(ids, seqs)
    }
    /// Convenience for tests and callers without identifiers.
    pub fn from_seqs<T: std::borrow::Borrow<[u8]>>(seqs: &[T]) -> Result<Self> {
        let ids = (0..seqs.len()).map(|i| i.to_string()).collect();
        let seqs = seqs.iter().map(|x| x.borrow().to_vec()).collect();
        Msa::from_parts(ids, seqs)
    }
    fn from_parts(ids: Vec<String>, seqs: Vec<Vec<u8>>) -> Result<Self> {
        let len = match seqs.first() {
            Some(first) => first.len(),
            None => return Err(Error::InvalidInput("empty training set".to_string())),
        };
        if len == 0 {
            return Err(Error::InvalidInput("zero-length alignment".to_string()));
        }
        if let Some(pos) = seqs.iter().position(|seq| seq.len() != len) {
            return Err(Error::InvalidInput(format!(
                "alignment lengths differ ({} has {}, expected {})",
                ids[pos],
                seqs[pos].len(),
                len
            )));
        }
        Ok(Self { ids, seqs, len })
    }
    /// The alignment length (number of columns).
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
    pub fn n_seqs(&self) -> usize {
        self.seqs.len()
    }
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
    pub fn seqs(&self) -> &[Vec<u8>] {
        &self.seqs
    }
    /// Classify the alignment columns. Column c is a match column iff the
    /// number of gaps at c is strictly below `n_seqs * threshold`. The
    /// returned indices are strictly increasing.
    pub fn match_columns(&self, gap: u8, threshold: f64) -> Result<Vec<usize>> {
        if !(0.0 < threshold && threshold <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "match threshold {} out of (0,1]",
                threshold
            )));
        }
        let cutoff = self.n_seqs() as f64 * threshold;
        let columns: Vec<_> = (0..self.len)
            .filter(|&column| {
                let gaps = self.seqs.iter().filter(|seq| seq[column] == gap).count();
                (gaps as f64) < cutoff
            })
            .collect();
        if columns.is_empty() {
            return Err(Error::InvalidInput("no match columns".to_string()));
        }
        Ok(columns)
    }
}
