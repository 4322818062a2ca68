// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way a run can fail. None of these are recovered from: they travel
/// up to `main` which logs them and exits.
#[derive(Error, Debug)]
pub enum Error {
    /// A named constant or array literal is absent from the source text
    #[error("no definition of '{name}' found in source text")]
    ConfigNotFound { name: String },
    /// A matched token is not a valid integer
    #[error("bad value for '{name}': '{token}' is not an integer")]
    ConfigParse { name: String, token: String },
    /// The workload matrix does not hold whole triplets
    #[error("workload parameters have length {len} which is not a multiple of 3")]
    ConfigShape { len: usize },
    /// The workload operation counts do not sum within `i64`
    #[error("workload operation counts overflow a 64-bit total")]
    ConfigOverflow,
    /// The lookup pattern built for a constant name was rejected
    #[error("cannot build pattern for '{name}': {source}")]
    Pattern { name: String, source: regex::Error },
    /// A log row has a missing or malformed numeric field
    #[error("log row {row}: cannot parse {field} from '{value}'")]
    MeasurementParse {
        row: usize,
        field: &'static str,
        value: String,
    },
    /// A series that has to bound the x-axis has no points
    #[error("series '{label}' is empty")]
    EmptySeries { label: String },
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed log: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to render plot: {0}")]
    Render(String),
    #[error("invalid run configuration: {0}")]
    RunConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
