// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};

/// One row of the workload matrix. Only the operation count is used when
/// plotting; the remaining two values are workload specific parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    op_count: i64,
    params: [i64; 2],
}

impl Workload {
    pub fn new(op_count: i64, params: [i64; 2]) -> Self {
        Self { op_count, params }
    }

    pub fn op_count(&self) -> i64 {
        self.op_count
    }

    pub fn params(&self) -> [i64; 2] {
        self.params
    }
}

/// Returns the cumulative operation count at which each workload hands over
/// to the next one. The end of the final workload is the end of the run and
/// is not a boundary, so `n` workloads give `n - 1` values. The total of
/// every workload, the last one included, must fit in an `i64`.
pub fn compute_boundaries(triplets: &[i64]) -> Result<Vec<i64>> {
    if triplets.len() % 3 != 0 {
        return Err(Error::ConfigShape {
            len: triplets.len(),
        });
    }

    let mut total: i64 = 0;
    let mut boundaries = Vec::with_capacity(triplets.len() / 3);
    for workload in triplets.chunks_exact(3) {
        total = total
            .checked_add(workload[0])
            .ok_or(Error::ConfigOverflow)?;
        boundaries.push(total);
    }
    boundaries.pop();

    Ok(boundaries)
}
