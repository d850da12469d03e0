//! Very thin FASTA reader. Only batch IO; records are `(id, sequence)`.
use crate::{Error, Result};
use std::io::{BufRead, BufReader, Read};

pub type FastaRecord = (String, Vec<u8>);

/// Read a file, or stdin when `file` is None, and parse the contents.
pub fn read_fasta<P: AsRef<std::path::Path>>(file: &Option<P>) -> Result<Vec<FastaRecord>> {
    let stdin = std::io::stdin();
    let mut reader: Box<dyn BufRead> = match file {
        Some(file) => std::fs::File::open(file)
            .map(BufReader::new)
            .map(Box::new)?,
        None => {
            let lock = stdin.lock();
            Box::new(BufReader::new(lock))
        }
    };
    let mut contents = vec![];
    reader.read_to_end(&mut contents)?;
    parse_fasta(&contents)
}

/// The id of a record is the header up to the first space; sequence lines
/// are concatenated.
pub fn parse_fasta(contents: &[u8]) -> Result<Vec<FastaRecord>> {
    let mut chunks = contents.split(|&x| x == b'>');
    match chunks.next() {
        Some(first) if first.iter().all(|x| x.is_ascii_whitespace()) => {}
        _ => return Err(Error::Parse("junk before the first header".to_string())),
    }
    let records: Vec<_> = chunks
        .map(|record| {
            let mut record = record.splitn(2, |&x| x == b'\n');
            let id = record
                .next()
                .and_then(|header| header.split(|&x| x == b' ').next())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| Error::Parse("record without an id".to_string()))?;
            let seq: Vec<_> = record
                .next()
                .unwrap_or(&[])
                .iter()
                .filter(|x| !x.is_ascii_whitespace())
                .copied()
                .collect();
            Ok((String::from_utf8_lossy(id).to_string(), seq))
        })
        .collect::<Result<_>>()?;
    if records.is_empty() {
        return Err(Error::Parse("no records".to_string()));
    }
    Ok(records)
}
