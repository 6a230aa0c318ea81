//! Trigger file counter
//!
//! The trigger file holds the decimal text of a non-negative counter and
//! nothing else. A missing file counts as 0.

use crate::error::{BenchError, BenchResult, MutationStage};
use std::io::ErrorKind;
use std::path::Path;

/// Parse trigger file content. Only ASCII digits are accepted.
pub fn parse_counter(path: &Path, content: &str) -> BenchResult<u64> {
    let parse_error = |reason: String| BenchError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    if content.is_empty() {
        return Err(parse_error("file is empty".into()));
    }
    if !content.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(format!("{content:?} is not a non-negative integer")));
    }

    content
        .parse::<u64>()
        .map_err(|e| parse_error(format!("{content:?}: {e}")))
}

/// Current counter value stored at `path`
pub async fn read_counter(path: &Path) -> BenchResult<u64> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let content = String::from_utf8(bytes).map_err(|_| BenchError::Parse {
                path: path.to_path_buf(),
                reason: "file is not valid UTF-8".into(),
            })?;
            parse_counter(path, &content)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(BenchError::Mutation {
            path: path.to_path_buf(),
            stage: MutationStage::Read,
            source: Box::new(e),
        }),
    }
}

/// Counter value after one more trigger
pub fn next_counter(path: &Path, current: u64) -> BenchResult<u64> {
    current.checked_add(1).ok_or_else(|| BenchError::Parse {
        path: path.to_path_buf(),
        reason: format!("counter {current} cannot be incremented"),
    })
}
