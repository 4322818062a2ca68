// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;
#[macro_use]
extern crate splaygraph;

use clap::{App, Arg};
use splaygraph::*;

fn main() {
    let matches = App::new(NAME)
        .version(VERSION)
        .author("Brian Martin <bmartin@twitter.com>")
        .about("Plot splay LSM benchmark logs against their workload boundaries")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML run configuration")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("source")
                .long("source")
                .value_name("FILE")
                .help("benchmark source holding the experiment constants")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .value_name("FILE")
                .help("measurement log written by the benchmark")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .help("SVG file to write")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("category")
                .long("category")
                .value_name("NAME")
                .help("log label of the primary series")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("verbosity (stacking)")
                .multiple(true),
        )
        .get_matches();

    if Logger::new()
        .verbosity(matches.occurrences_of("verbose"))
        .init()
        .is_err()
    {
        eprintln!("failed to initialize logger");
        std::process::exit(1);
    }

    let mut config = match matches.value_of("config") {
        Some(file) => Config::load_from_file(file).unwrap_or_else(|e| fatal!("{}", e)),
        None => Config::default(),
    };
    if let Some(source) = matches.value_of("source") {
        config.set_source(source);
    }
    if let Some(log) = matches.value_of("log") {
        config.set_log(log);
    }
    if let Some(output) = matches.value_of("output") {
        config.set_output(output);
    }
    if let Some(category) = matches.value_of("category") {
        config.set_category(category);
    }

    match Pipeline::new(config).run() {
        Ok(summary) => {
            if let Some(points) = summary.experiment().num_datapoints() {
                debug!(
                    "expected {} samples per series, got {} and {}",
                    points,
                    summary.primary().len(),
                    summary.secondary().len()
                );
            }
        }
        Err(e) => fatal!("{}", e),
    }
}
