// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Error, Result};
use crate::measurement::Series;

use plotters::prelude::*;

use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            (($colour & 0x0000FF) >> 0) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0xAA0000),
    hexcolour!(0x0000FF),
    hexcolour!(0x888888),
];

// each boundary marker is drawn as this many dash/gap periods
const DASH_PERIODS: usize = 48;
const DASH_FILL: f64 = 0.6;

/// Headroom added above the tallest point
const Y_MARGIN: f64 = 0.05;

/// Appearance of the comparison chart
#[derive(Clone, Debug)]
pub struct PlotConfig {
    caption: String,
    x_desc: String,
    y_desc: String,
    labels: [String; 2],
    size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            caption: String::new(),
            x_desc: "Operation Number (in 1000s)".to_owned(),
            y_desc: "Disk I/O per Operation".to_owned(),
            labels: ["LSM+Cache".to_owned(), "?Splay".to_owned()],
            size: (1080, 720),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn primary_label(&mut self, label: impl AsRef<str>) -> &mut Self {
        self.labels[0] = label.as_ref().to_owned();
        self
    }

    pub fn secondary_label(&mut self, label: impl AsRef<str>) -> &mut Self {
        self.labels[1] = label.as_ref().to_owned();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    /// Draws both series and the workload boundaries into an SVG at
    /// `filename`, replacing any existing file. Nothing is written unless the
    /// whole chart was drawn.
    pub fn render(
        &self,
        primary: &Series,
        secondary: &Series,
        boundaries: &[i64],
        filename: impl AsRef<Path>,
    ) -> Result<()> {
        let x_max = x_bound(primary, &self.labels[0], secondary, &self.labels[1])?;
        let y_max = y_bound(primary, secondary);

        let mut svg = String::new();
        self.draw(&mut svg, primary, secondary, boundaries, x_max, y_max)
            .map_err(|e| Error::Render(e.to_string()))?;

        let filename = filename.as_ref();
        std::fs::write(filename, svg).map_err(|e| Error::io(filename, e))?;
        info!(
            "wrote {} ({} + {} points, {} boundaries)",
            filename.display(),
            primary.len(),
            secondary.len(),
            boundaries.len()
        );

        Ok(())
    }

    fn draw(
        &self,
        svg: &mut String,
        primary: &Series,
        secondary: &Series,
        boundaries: &[i64],
        x_max: f64,
        y_max: f64,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::with_string(svg, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 80)
            .set_label_area_size(LabelAreaPosition::Bottom, 50);
        if !self.caption.is_empty() {
            builder.caption(&self.caption, ("sans-serif", 30));
        }
        let mut chart = builder.build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .draw()?;

        for (i, series) in [primary, secondary].iter().enumerate() {
            let colour = COLOURS[i];
            chart
                .draw_series(LineSeries::new(series.points(), colour.stroke_width(2)))?
                .label(self.labels[i].as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
        }

        for boundary in boundaries {
            chart.draw_series(
                dashes(*boundary as f64, y_max)
                    .into_iter()
                    .map(|(from, to)| {
                        PathElement::new(vec![from, to], COLOURS[2].stroke_width(1))
                    }),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.filled())
            .border_style(BLACK)
            .draw()?;

        root.present()?;

        Ok(())
    }
}

/// Renders with the default chart appearance.
pub fn render(
    primary: &Series,
    secondary: &Series,
    boundaries: &[i64],
    filename: impl AsRef<Path>,
) -> Result<()> {
    PlotConfig::default().render(primary, secondary, boundaries, filename)
}

/// Right edge of the x-axis: the larger of the two final operation indices.
fn x_bound(
    primary: &Series,
    primary_label: &str,
    secondary: &Series,
    secondary_label: &str,
) -> Result<f64> {
    let last = |series: &Series, label: &str| {
        series.last_x().ok_or_else(|| Error::EmptySeries {
            label: label.to_owned(),
        })
    };
    let max = last(primary, primary_label)?.max(last(secondary, secondary_label)?);

    // a zero width axis cannot be mapped
    if max > 0 {
        Ok(max as f64)
    } else {
        Ok(1.0)
    }
}

fn y_bound(primary: &Series, secondary: &Series) -> f64 {
    let max = match (primary.max_y(), secondary.max_y()) {
        (Some(a), Some(b)) => a.max(b),
        (Some(m), None) | (None, Some(m)) => m,
        (None, None) => 0.0,
    };

    if max > 0.0 {
        max * (1.0 + Y_MARGIN)
    } else {
        1.0
    }
}

/// Segments of a dashed vertical line at `x` running from 0 to `top`.
fn dashes(x: f64, top: f64) -> Vec<((f64, f64), (f64, f64))> {
    let period = top / DASH_PERIODS as f64;
    (0..DASH_PERIODS)
        .map(|i| {
            let start = i as f64 * period;
            ((x, start), (x, start + period * DASH_FILL))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> Series {
        let mut series = Series::new();
        for (x, y) in points {
            series.push(*x, *y);
        }
        series
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("splaygraph-{}-{}", std::process::id(), name))
    }

    #[test]
    fn x_bound_is_largest_last_index() {
        let a = series(&[(0, 1.0), (5, 2.0)]);
        let b = series(&[(0, 1.5), (9, 1.0), (3, 1.0)]);
        assert_eq!(x_bound(&a, "a", &b, "b").unwrap(), 5.0);
        assert_eq!(x_bound(&b, "b", &a, "a").unwrap(), 5.0);
    }

    #[test]
    fn x_bound_requires_points() {
        let a = series(&[(0, 1.0)]);
        match x_bound(&a, "a", &Series::new(), "b") {
            Err(Error::EmptySeries { label }) => assert_eq!(label, "b"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn y_bound_has_headroom() {
        let a = series(&[(0, 1.0), (5, 2.0)]);
        let b = series(&[(0, 4.0)]);
        assert!((y_bound(&a, &b) - 4.2).abs() < 1e-9);
        let flat = series(&[(0, 0.0)]);
        assert_eq!(y_bound(&flat, &flat), 1.0);
    }

    #[test]
    fn dashes_span_the_axis() {
        let segments = dashes(10.0, 2.0);
        assert_eq!(segments.len(), DASH_PERIODS);
        assert!(segments.iter().all(|(from, to)| from.0 == 10.0 && to.0 == 10.0));
        assert_eq!((segments[0].0).1, 0.0);
        let last = segments[DASH_PERIODS - 1];
        assert!(((last.0).1 - (2.0 - 2.0 / DASH_PERIODS as f64)).abs() < 1e-9);
        assert!(segments.iter().all(|(from, to)| to.1 > from.1));
    }

    #[test]
    fn empty_series_writes_nothing() {
        let path = scratch("empty.svg");
        let _ = std::fs::remove_file(&path);
        let result = render(&Series::new(), &Series::new(), &[], &path);
        assert!(matches!(result, Err(Error::EmptySeries { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn renders_svg() {
        let path = scratch("render.svg");
        let a = series(&[(0, 1.0), (5, 2.0), (10, 1.5)]);
        let b = series(&[(0, 1.5), (5, 1.0), (10, 0.5)]);

        let mut config = PlotConfig::new();
        config.caption("splay").size((640, 480));
        config.render(&a, &b, &[5], &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("LSM+Cache"));
        assert!(svg.contains("?Splay"));
        let _ = std::fs::remove_file(&path);
    }
}
