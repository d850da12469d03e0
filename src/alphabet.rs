//! Observation alphabet: a dense integer code for every emittable symbol.
//! The gap symbol is deliberately not part of the alphabet; gaps are
//! structural (they select delete states) and are never emitted.

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<u8>,
    gap: u8,
    // symbol byte -> dense code, 256-entry lookup.
    codes: Vec<Option<usize>>,
}

impl Alphabet {
    /// Build an alphabet from `symbols` in order (the n-th symbol gets
    /// code n). The gap symbol must not occur among the symbols.
    pub fn new(symbols: &[u8], gap: u8) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput("empty alphabet".to_string()));
        }
        let mut codes = vec![None; 256];
        for (code, &sym) in symbols.iter().enumerate() {
            if sym == gap {
                return Err(Error::InvalidInput(format!(
                    "alphabet contains the gap symbol {:?}",
                    gap as char
                )));
            }
            if codes[sym as usize].is_some() {
                return Err(Error::InvalidInput(format!(
                    "duplicated symbol {:?}",
                    sym as char
                )));
            }
            codes[sym as usize] = Some(code);
        }
        Ok(Self {
            symbols: symbols.to_vec(),
            gap,
            codes,
        })
    }
    /// The usual four-letter DNA alphabet, A=0, C=1, G=2, T=3.
    pub fn dna(gap: u8) -> Self {
        Alphabet::new(b"ACGT", gap).unwrap()
    }
    pub fn len(&self) -> usize {
        self.symbols.len()
    }
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
    pub fn gap(&self) -> u8 {
        self.gap
    }
    /// Dense code of `symbol`, or None for the gap and anything unknown.
    pub fn code(&self, symbol: u8) -> Option<usize> {
        self.codes[symbol as usize]
    }
    pub fn symbol(&self, code: usize) -> Option<u8> {
        self.symbols.get(code).copied()
    }
    /// Encode an (ungapped) observation sequence into dense codes.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<usize>> {
        seq.iter()
            .map(|&sym| {
                self.code(sym).ok_or_else(|| {
                    Error::Decode(format!("symbol {:?} is not in the alphabet", sym as char))
                })
            })
            .collect()
    }
}
