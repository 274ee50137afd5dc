//! Error kinds for the reporting pipeline.
//!
//! Row-level id-coercion failures are not errors; the loader counts them
//! and the driver surfaces the count. Everything here is fatal to the run.

use crate::parser::GenreParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Input file missing, unreadable, or a row failed CSV-level parsing.
    #[error("failed to read {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record did not match the fixed column schema.
    #[error("{}: record {record} has {found} columns, expected {expected}", path.display())]
    Schema {
        path: PathBuf,
        record: u64,
        expected: usize,
        found: usize,
    },

    /// The genres field of a row could not be decoded.
    #[error("movie {movie_id}: malformed genres field")]
    Genres {
        movie_id: i64,
        #[source]
        source: GenreParseError,
    },

    /// A report file could not be written.
    #[error("failed to write report {name}")]
    Sink {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
