use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that can happen before a session starts or while persisting
/// its results. A running session never produces one of these.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read words from {}: {source}", path.display())]
    WordSourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("word source `{0}` contains no words")]
    EmptyWordPool(String),

    #[error("built-in word list is unreadable: {0}")]
    BuiltinWords(String),

    #[error("word `{word}` does not fit in {columns} columns")]
    WordTooWide { word: String, columns: usize },

    #[error("layout produced no words")]
    NoWordsPlaced,

    #[error("grid of {columns}x{rows} is too small (minimum {min_columns}x{min_rows})")]
    InvalidDimensions {
        columns: usize,
        rows: usize,
        min_columns: usize,
        min_rows: usize,
    },

    #[error("time limit must be at least one second")]
    InvalidTimeLimit,

    #[error("config file error: {0}")]
    Config(#[source] io::Error),

    #[error("failed to write session history: {0}")]
    History(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
