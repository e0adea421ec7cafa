#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistent trip dataset.
//!
//! The dataset is a single JSON array file with one compact trip object
//! per line:
//!
//! ```text
//! [
//!   {"start_city_name":"Lyon",...,"duration":275},
//!   {"start_city_name":"Nice",...,"duration":512}
//! ]
//! ```
//!
//! [`accumulator::append_trips`] grows the file in place by splicing new
//! entries in front of the closing bracket. [`writer::DatasetWriter`]
//! serializes those appends through one background task so that batches
//! land in submission order.

pub mod accumulator;
pub mod writer;

/// Errors that can occur while writing the dataset file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the dataset file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the dataset file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A trip could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The existing file does not end with a JSON array's closing bracket.
    #[error("{path} is not a JSON array that can be appended to")]
    Malformed {
        /// Path of the dataset file.
        path: String,
    },

    /// The background writer has already shut down.
    #[error("Dataset writer for {path} is closed")]
    WriterClosed {
        /// Path of the dataset file.
        path: String,
    },

    /// The background writer task panicked or was cancelled.
    #[error("Dataset writer task failed: {0}")]
    WriterTask(#[from] tokio::task::JoinError),
}
