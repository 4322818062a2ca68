// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A single row of the measurement log
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementRecord {
    pub category: String,
    pub op_index: i64,
    pub value: f64,
}

impl MeasurementRecord {
    /// Parses a positional `category, op_index, value` row. `row` is the
    /// 1-based row number used for error reporting. The category is kept
    /// verbatim; whitespace around the numeric fields is ignored.
    pub fn from_record(record: &StringRecord, row: usize) -> Result<Self> {
        let field = |index: usize, name: &'static str| {
            record.get(index).ok_or_else(|| Error::MeasurementParse {
                row,
                field: name,
                value: String::new(),
            })
        };

        let category = record.get(0).unwrap_or_default().to_owned();

        let op_index = field(1, "op_index")?;
        let op_index: i64 = op_index.trim().parse().map_err(|_| Error::MeasurementParse {
            row,
            field: "op_index",
            value: op_index.to_owned(),
        })?;

        let value = field(2, "value")?;
        let value: f64 = value.trim().parse().map_err(|_| Error::MeasurementParse {
            row,
            field: "value",
            value: value.to_owned(),
        })?;

        Ok(Self {
            category,
            op_index,
            value,
        })
    }
}

/// Points sharing one category, kept in log order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    xs: Vec<i64>,
    ys: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: i64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn xs(&self) -> &[i64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn last_x(&self) -> Option<i64> {
        self.xs.last().copied()
    }

    /// Largest finite measurement in the series
    pub fn max_y(&self) -> Option<f64> {
        self.ys
            .iter()
            .copied()
            .filter(|y| y.is_finite())
            .fold(None, |max, y| match max {
                Some(m) if m >= y => Some(m),
                _ => Some(y),
            })
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(x, y)| (*x as f64, *y))
    }
}

/// Maps a category label to the index of the series it belongs to. Labels
/// that are not routed explicitly land in the fallback series.
#[derive(Clone, Debug)]
pub struct Classifier {
    routes: HashMap<String, usize>,
    fallback: usize,
}

impl Classifier {
    pub fn new(fallback: usize) -> Self {
        Self {
            routes: HashMap::new(),
            fallback,
        }
    }

    /// Series 0 holds `category`, series 1 holds everything else.
    pub fn binary(category: &str) -> Self {
        let mut classifier = Self::new(1);
        classifier.route(category, 0);
        classifier
    }

    pub fn route(&mut self, category: &str, series: usize) -> &mut Self {
        self.routes.insert(category.to_owned(), series);
        self
    }

    pub fn classify(&self, category: &str) -> usize {
        self.routes.get(category).copied().unwrap_or(self.fallback)
    }

    /// Number of series this classifier can produce
    pub fn series(&self) -> usize {
        self.routes
            .values()
            .copied()
            .chain(std::iter::once(self.fallback))
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// Reads every row of the log and appends it to the series chosen by the
/// classifier. The returned vector has `classifier.series()` entries.
pub fn load_classified<R: Read>(
    source: R,
    classifier: &Classifier,
    has_headers: bool,
) -> Result<Vec<Series>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(source);

    let mut series = vec![Series::new(); classifier.series()];
    let mut rows = 0;

    for (i, record) in reader.records().enumerate() {
        let record = MeasurementRecord::from_record(&record?, i + 1)?;
        series[classifier.classify(&record.category)].push(record.op_index, record.value);
        rows += 1;
    }

    trace!("loaded {} rows into {} series", rows, series.len());

    Ok(series)
}

/// Splits a header-less log into the rows labeled `category` and all others.
pub fn load_series<R: Read>(source: R, category: &str) -> Result<(Series, Series)> {
    split(load_classified(source, &Classifier::binary(category), false)?)
}

pub fn load_series_from_path<P: AsRef<Path>>(
    path: P,
    category: &str,
    has_headers: bool,
) -> Result<(Series, Series)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let series = load_classified(file, &Classifier::binary(category), has_headers)?;
    let (primary, secondary) = split(series)?;
    debug!(
        "{}: {} rows labeled '{}', {} other rows",
        path.display(),
        primary.len(),
        category,
        secondary.len()
    );
    Ok((primary, secondary))
}

fn split(series: Vec<Series>) -> Result<(Series, Series)> {
    let mut series = series.into_iter();
    match (series.next(), series.next()) {
        (Some(primary), Some(secondary)) => Ok((primary, secondary)),
        _ => Err(Error::RunConfig(
            "log classifier must produce two series".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_by_category() {
        let log = "splay,0,1.0\nnosplay,0,1.5\nsplay,5,2.0\n";
        let (a, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.xs(), &[0, 5]);
        assert_eq!(a.ys(), &[1.0, 2.0]);
        assert_eq!(b.xs(), &[0]);
        assert_eq!(b.ys(), &[1.5]);
    }

    #[test]
    fn empty_log() {
        let (a, b) = load_series("".as_bytes(), "splay").unwrap();
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn category_is_case_sensitive() {
        let log = "Splay,0,1.0\nsplay,1,2.0\n";
        let (a, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.xs(), &[1]);
        assert_eq!(b.xs(), &[0]);
    }

    #[test]
    fn every_other_label_is_secondary() {
        let log = "a,0,1\nb,1,2\nc,2,3\nsplay,3,4\n";
        let (a, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.xs(), &[0, 1, 2]);
    }

    #[test]
    fn order_is_preserved() {
        let log = "x,9,1\nx,3,2\nx,3,2\nx,1,3\n";
        let (_, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(b.xs(), &[9, 3, 3, 1]);
        assert_eq!(b.ys(), &[1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn surrounding_whitespace() {
        let log = "splay, 10 , 0.25\n";
        let (a, _) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.xs(), &[10]);
        assert_eq!(a.ys(), &[0.25]);
    }

    #[test]
    fn padded_category_is_not_distinguished() {
        let log = " splay,0,1.0\nsplay ,1,2.0\nsplay,2,3.0\n";
        let (a, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.xs(), &[2]);
        assert_eq!(b.xs(), &[0, 1]);
    }

    #[test]
    fn bad_op_index() {
        let log = "splay,0,1.0\nsplay,1.5,2.0\n";
        match load_series(log.as_bytes(), "splay") {
            Err(Error::MeasurementParse { row, field, value }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "op_index");
                assert_eq!(value, "1.5");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn bad_value() {
        let log = "splay,0,fast\n";
        assert!(matches!(
            load_series(log.as_bytes(), "splay"),
            Err(Error::MeasurementParse { field: "value", .. })
        ));
    }

    #[test]
    fn short_row() {
        let log = "splay,0\n";
        assert!(matches!(
            load_series(log.as_bytes(), "splay"),
            Err(Error::MeasurementParse { row: 1, field: "value", .. })
        ));
    }

    #[test]
    fn header_is_skipped_on_request() {
        let log = "type,op_num,time\nsplay,0,1.0\n";
        let series = load_classified(log.as_bytes(), &Classifier::binary("splay"), true).unwrap();
        assert_eq!(series[0].len(), 1);
        assert!(load_series(log.as_bytes(), "splay").is_err());
    }

    #[test]
    fn classifier_routes() {
        let mut classifier = Classifier::new(0);
        classifier.route("read", 1).route("write", 2);
        assert_eq!(classifier.series(), 3);
        assert_eq!(classifier.classify("write"), 2);
        assert_eq!(classifier.classify("scan"), 0);

        let log = "read,0,1\nwrite,1,2\nscan,2,3\n";
        let series = load_classified(log.as_bytes(), &classifier, false).unwrap();
        assert_eq!(series.iter().map(Series::len).collect::<Vec<_>>(), vec![1, 1, 1]);
    }

    #[test]
    fn rows_are_conserved() {
        let log: String = (0..100)
            .map(|i| format!("{},{},{}\n", if i % 3 == 0 { "splay" } else { "lsm" }, i, i))
            .collect();
        let (a, b) = load_series(log.as_bytes(), "splay").unwrap();
        assert_eq!(a.len() + b.len(), 100);
        assert!(a.xs().windows(2).all(|w| w[0] < w[1]));
        assert!(b.xs().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn max_y_skips_non_finite() {
        let mut series = Series::new();
        assert_eq!(series.max_y(), None);
        series.push(0, 1.0);
        series.push(1, f64::NAN);
        series.push(2, 3.0);
        assert_eq!(series.max_y(), Some(3.0));
        assert_eq!(series.last_x(), Some(2));
    }
}
