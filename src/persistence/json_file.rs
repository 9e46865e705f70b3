use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_string};
use thiserror::Error;
use crate::domain::{Auction, Bid};

/// Everything a store holds, in one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub auctions: Vec<Auction>,
    pub bids: Vec<Bid>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads a snapshot. A missing file is an empty snapshot, not an error.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::default()),
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(file);
    Ok(from_reader(reader)?)
}

pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let json = to_string(snapshot)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}
