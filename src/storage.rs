use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{MatchError, Result};

/// Read one JSON record per line. Blank lines are skipped.
pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| MatchError::Parse {
            path: path.display().to_string(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    debug!(path = %path.display(), records = records.len(), "loaded jsonl");
    Ok(records)
}

/// Like [`load_jsonl`], but an absent path means an empty collection.
pub fn load_optional_jsonl<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>> {
    match path {
        Some(path) => load_jsonl(path),
        None => Ok(Vec::new()),
    }
}
