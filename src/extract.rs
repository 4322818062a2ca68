// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pulls the experiment constants out of the benchmark driver source. The
//! values plotted against are the ones the benchmark was compiled with, so
//! they are read from the source file itself rather than a side config.

use crate::error::{Error, Result};
use crate::workload::{self, Workload};

use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Names of the constants looked up in the source text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantNames {
    pub num_trials: String,
    pub time_interval: String,
    pub workload_params: String,
}

impl Default for ConstantNames {
    fn default() -> Self {
        Self {
            num_trials: "num_trials".to_owned(),
            time_interval: "time_interval".to_owned(),
            workload_params: "params".to_owned(),
        }
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        name: name.to_owned(),
        source,
    })
}

/// Finds the first `name = <digits> ;` statement and returns its value.
/// Only ASCII digits count.
pub fn extract_scalar(text: &str, name: &str) -> Result<u64> {
    let re = compile(
        name,
        &format!(r"{}\s*=\s*([0-9]+)\s*;", regex::escape(name)),
    )?;

    let digits = re
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::ConfigNotFound {
            name: name.to_owned(),
        })?
        .as_str();

    digits.parse().map_err(|_| Error::ConfigParse {
        name: name.to_owned(),
        token: digits.to_owned(),
    })
}

/// Finds the first `name[..][..] = { ... };` array literal and returns its
/// elements flattened in source order. Declared dimensions are not checked
/// against the element count.
pub fn extract_matrix(text: &str, name: &str) -> Result<Vec<i64>> {
    let re = compile(
        name,
        &format!(
            r"{}\[[0-9]+\]\[[0-9]+\]\s*=\s*\{{([^;]*)\}}\s*;",
            regex::escape(name)
        ),
    )?;

    let body = re
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::ConfigNotFound {
            name: name.to_owned(),
        })?
        .as_str();

    let body: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .collect();

    body.split(',')
        .map(|token| {
            token.parse().map_err(|_| Error::ConfigParse {
                name: name.to_owned(),
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Constants of one benchmark run
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    num_trials: u64,
    time_interval: u64,
    workload_params: Vec<i64>,
    total_ops: i64,
}

impl ExperimentConfig {
    /// Rejects matrices that are not whole triplets and operation counts
    /// whose running total leaves the `i64` range.
    pub fn new(num_trials: u64, time_interval: u64, workload_params: Vec<i64>) -> Result<Self> {
        if workload_params.len() % 3 != 0 {
            return Err(Error::ConfigShape {
                len: workload_params.len(),
            });
        }
        let total_ops = workload_params
            .chunks_exact(3)
            .try_fold(0i64, |total, t| total.checked_add(t[0]))
            .ok_or(Error::ConfigOverflow)?;
        Ok(Self {
            num_trials,
            time_interval,
            workload_params,
            total_ops,
        })
    }

    pub fn extract(text: &str, names: &ConstantNames) -> Result<Self> {
        let num_trials = extract_scalar(text, &names.num_trials)?;
        let time_interval = extract_scalar(text, &names.time_interval)?;
        let workload_params = extract_matrix(text, &names.workload_params)?;
        debug!(
            "extracted {}={} {}={} {}: {} values",
            names.num_trials,
            num_trials,
            names.time_interval,
            time_interval,
            names.workload_params,
            workload_params.len()
        );
        Self::new(num_trials, time_interval, workload_params)
    }

    pub fn load<P: AsRef<Path>>(path: P, names: &ConstantNames) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| Error::io(path, e))?;
        Self::extract(&text, names)
    }

    pub fn num_trials(&self) -> u64 {
        self.num_trials
    }

    pub fn time_interval(&self) -> u64 {
        self.time_interval
    }

    pub fn workload_params(&self) -> &[i64] {
        &self.workload_params
    }

    pub fn num_workloads(&self) -> usize {
        self.workload_params.len() / 3
    }

    pub fn workloads(&self) -> Vec<Workload> {
        self.workload_params
            .chunks_exact(3)
            .map(|t| Workload::new(t[0], [t[1], t[2]]))
            .collect()
    }

    /// Sum of the operation counts of every workload
    pub fn total_ops(&self) -> i64 {
        self.total_ops
    }

    /// Number of log samples the run is expected to emit, `None` when the
    /// sampling interval is zero.
    pub fn num_datapoints(&self) -> Option<i64> {
        if self.time_interval == 0 {
            None
        } else {
            // the quotient never exceeds |total_ops|, so it fits back in i64
            Some((i128::from(self.total_ops) / i128::from(self.time_interval)) as i64)
        }
    }

    pub fn boundaries(&self) -> Result<Vec<i64>> {
        workload::compute_boundaries(&self.workload_params)
    }
}
