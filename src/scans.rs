// 📡 Scan Input - roadside sensor batch files
//
// A batch is a flat stream of whitespace-separated tokens read in pairs:
//
//   TTTTTT EE TTTTTT EE ...
//
// where TTTTTT is the vehicle tag and EE the exit id. Line breaks carry no
// meaning. A dangling tag at the end of the stream is fatal.

use crate::error::{TollError, TollResult};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// One (tag, exit) observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub tag: String,
    pub exit: String,
}

impl ScanEvent {
    pub fn new(tag: &str, exit: &str) -> Self {
        ScanEvent {
            tag: tag.to_string(),
            exit: exit.to_string(),
        }
    }
}

/// Split a batch into scan events, in input order
pub fn parse_scans(input: &str) -> TollResult<Vec<ScanEvent>> {
    let mut tokens = input.split_whitespace();
    let mut events = Vec::new();

    while let Some(tag) = tokens.next() {
        let exit = tokens.next().ok_or_else(|| TollError::TruncatedInput {
            tag: tag.to_string(),
        })?;
        events.push(ScanEvent::new(tag, exit));
    }

    Ok(events)
}

/// Read and parse a batch file
pub fn read_scans<P: AsRef<Path>>(path: P) -> Result<Vec<ScanEvent>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read scan file: {:?}", path.as_ref()))?;

    let events = parse_scans(&content)?;
    debug!("Read {} scans from {:?}", events.len(), path.as_ref());

    Ok(events)
}
