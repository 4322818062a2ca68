// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

mod config;
mod error;
mod logger;

pub mod extract;
pub mod measurement;
pub mod plot;
pub mod workload;

pub use crate::config::{Config, NAME, VERSION};
pub use crate::error::{Error, Result};
pub use crate::extract::{extract_matrix, extract_scalar, ConstantNames, ExperimentConfig};
pub use crate::logger::{Level, Logger};
pub use crate::measurement::{load_series, Classifier, MeasurementRecord, Series};
pub use crate::plot::{render, PlotConfig};
pub use crate::workload::{compute_boundaries, Workload};

use std::path::PathBuf;

/// Runs extraction, segmentation, loading and plotting in order
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<Summary> {
        let input = self.config.input();

        let experiment = ExperimentConfig::load(input.source(), &self.config.constant_names())?;
        info!(
            "{}: {} trials, {} workloads, sample interval {}",
            input.source().display(),
            experiment.num_trials(),
            experiment.num_workloads(),
            experiment.time_interval()
        );

        let boundaries = experiment.boundaries()?;
        debug!("workload boundaries: {:?}", boundaries);

        let category = self.config.series().category();
        let (primary, secondary) =
            measurement::load_series_from_path(input.log(), category, input.has_headers())?;
        info!(
            "{}: {} '{}' points, {} other points",
            input.log().display(),
            primary.len(),
            category,
            secondary.len()
        );

        let output = self.config.output().path();
        self.config
            .plot_config()
            .render(&primary, &secondary, &boundaries, output)?;

        Ok(Summary {
            experiment,
            boundaries,
            primary,
            secondary,
            output: output.to_path_buf(),
        })
    }
}

/// What a completed run extracted, loaded and wrote
#[derive(Debug)]
pub struct Summary {
    experiment: ExperimentConfig,
    boundaries: Vec<i64>,
    primary: Series,
    secondary: Series,
    output: PathBuf,
}

impl Summary {
    pub fn experiment(&self) -> &ExperimentConfig {
        &self.experiment
    }

    pub fn boundaries(&self) -> &[i64] {
        &self.boundaries
    }

    pub fn primary(&self) -> &Series {
        &self.primary
    }

    pub fn secondary(&self) -> &Series {
        &self.secondary
    }

    pub fn output(&self) -> &std::path::Path {
        &self.output
    }
}
