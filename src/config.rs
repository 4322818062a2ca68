// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};
use crate::extract::ConstantNames;
use crate::plot::PlotConfig;

use serde_derive::*;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Everything a run needs besides the inputs themselves. Every section and
/// field is optional; the defaults plot `out.csv` against `test.cc` into
/// `test.svg`.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    input: Input,
    #[serde(default)]
    constants: Constants,
    #[serde(default)]
    series: Series,
    #[serde(default)]
    output: Output,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let filename = filename.as_ref();
        let mut file = std::fs::File::open(filename).map_err(|e| Error::io(filename, e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::io(filename, e))?;
        toml::from_str(&content)
            .map_err(|e| Error::RunConfig(format!("{}: {}", filename.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::RunConfig(e.to_string()))
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn constant_names(&self) -> ConstantNames {
        ConstantNames {
            num_trials: self.constants.num_trials.clone(),
            time_interval: self.constants.time_interval.clone(),
            workload_params: self.constants.workload_params.clone(),
        }
    }

    pub fn plot_config(&self) -> PlotConfig {
        let mut plot = PlotConfig::new();
        plot.caption(&self.output.caption)
            .x_desc(&self.output.x_desc)
            .y_desc(&self.output.y_desc)
            .primary_label(&self.series.primary_label)
            .secondary_label(&self.series.secondary_label)
            .size((self.output.width, self.output.height));
        plot
    }

    pub fn set_source(&mut self, path: impl Into<PathBuf>) {
        self.input.source = path.into();
    }

    pub fn set_log(&mut self, path: impl Into<PathBuf>) {
        self.input.log = path.into();
    }

    pub fn set_output(&mut self, path: impl Into<PathBuf>) {
        self.output.path = path.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.series.category = category.into();
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("test.cc")
}

fn default_log() -> PathBuf {
    PathBuf::from("out.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("test.svg")
}

fn default_num_trials() -> String {
    "num_trials".to_owned()
}

fn default_time_interval() -> String {
    "time_interval".to_owned()
}

fn default_workload_params() -> String {
    "params".to_owned()
}

fn default_category() -> String {
    "splay".to_owned()
}

fn default_primary_label() -> String {
    "LSM+Cache".to_owned()
}

fn default_secondary_label() -> String {
    "?Splay".to_owned()
}

fn default_x_desc() -> String {
    "Operation Number (in 1000s)".to_owned()
}

fn default_y_desc() -> String {
    "Disk I/O per Operation".to_owned()
}

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    720
}

#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Input {
    #[serde(default = "default_source")]
    source: PathBuf,
    #[serde(default = "default_log")]
    log: PathBuf,
    #[serde(default)]
    has_headers: bool,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            source: default_source(),
            log: default_log(),
            has_headers: false,
        }
    }
}

impl Input {
    /// Benchmark source the experiment constants are read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Measurement log written by the benchmark
    pub fn log(&self) -> &Path {
        &self.log
    }

    pub fn has_headers(&self) -> bool {
        self.has_headers
    }
}

/// Names of the constants in the benchmark source
#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Constants {
    #[serde(default = "default_num_trials")]
    num_trials: String,
    #[serde(default = "default_time_interval")]
    time_interval: String,
    #[serde(default = "default_workload_params")]
    workload_params: String,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            num_trials: default_num_trials(),
            time_interval: default_time_interval(),
            workload_params: default_workload_params(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Series {
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_primary_label")]
    primary_label: String,
    #[serde(default = "default_secondary_label")]
    secondary_label: String,
}

impl Default for Series {
    fn default() -> Self {
        Self {
            category: default_category(),
            primary_label: default_primary_label(),
            secondary_label: default_secondary_label(),
        }
    }
}

impl Series {
    /// Log rows with this label form the primary series
    pub fn category(&self) -> &str {
        &self.category
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default = "default_output")]
    path: PathBuf,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default)]
    caption: String,
    #[serde(default = "default_x_desc")]
    x_desc: String,
    #[serde(default = "default_y_desc")]
    y_desc: String,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            path: default_output(),
            width: default_width(),
            height: default_height(),
            caption: String::new(),
            x_desc: default_x_desc(),
            y_desc: default_y_desc(),
        }
    }
}

impl Output {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[test]
fn test_load_config() {
    let config = Config::parse(include_str!("../configs/splay.toml")).unwrap();

    assert_eq!(config.input().source(), Path::new("splaylsm/test.cc"));
    assert_eq!(config.input().log(), Path::new("splaylsm/out.csv"));
    assert!(!config.input().has_headers());
    assert_eq!(config.series().category(), "splay");
    assert_eq!(config.output().path(), Path::new("splay.svg"));

    // unspecified fields fall back to their defaults
    let names = config.constant_names();
    assert_eq!(names, ConstantNames::default());
}

#[test]
fn test_defaults() {
    let config = Config::parse("").unwrap();

    assert_eq!(config.input().source(), Path::new("test.cc"));
    assert_eq!(config.input().log(), Path::new("out.csv"));
    assert_eq!(config.output().path(), Path::new("test.svg"));
    assert_eq!(config.series().category(), "splay");
}

#[test]
fn test_unknown_field() {
    match Config::parse("[input]\nsauce = \"test.cc\"\n") {
        Err(Error::RunConfig(_)) => {}
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_overrides() {
    let mut config = Config::parse("[series]\ncategory = \"nosplay\"\n").unwrap();
    config.set_category("splay");
    config.set_output("other.svg");

    assert_eq!(config.series().category(), "splay");
    assert_eq!(config.output().path(), Path::new("other.svg"));
}
