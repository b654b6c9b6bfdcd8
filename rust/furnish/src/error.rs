// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout operations.

use thiserror::Error;

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating layout input.
///
/// Failing to place an item is not an error; see
/// [`PlacementOutcome`](crate::placement::PlacementOutcome).
#[derive(Error, Debug)]
pub enum Error {
    /// The room polygon cannot be furnished (degenerate or self-intersecting).
    #[error("Invalid room polygon: {0}")]
    InvalidRoom(String),

    /// A bounding box is malformed (wrong arity, min above max, non-finite).
    #[error("Invalid bounding box: {0}")]
    InvalidBox(String),

    /// A line in a legacy text file could not be parsed.
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// A referenced room or object is absent from the input.
    #[error("Missing entry: {0}")]
    MissingEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
