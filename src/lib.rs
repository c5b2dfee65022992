use csv::ReaderBuilder;
use log::{debug, info, warn};
use plotters::prelude::*;
use std::fs::File;
use std::path::Path;
pub mod error;
pub mod mq2;
pub mod plot;

pub use error::{PpmError, Result};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// default input, read from the working directory
pub const DEFAULT_CSV: &str = "ppm.csv";

/// number of columns in the reshaped table
pub const COLUMNS: usize = 2;

/// The main struct for the ppm time series,
/// two row-aligned columns indexed 0..len
#[derive(Debug, Clone, PartialEq)]
pub struct TimePpm {
    pub timestamp: Vec<f64>,
    pub ppm_log: Vec<f64>,
}

impl TimePpm {
    pub fn new(capacity: usize) -> TimePpm {
        TimePpm {
            timestamp: Vec::with_capacity(capacity),
            ppm_log: Vec::with_capacity(capacity),
        }
    }

    /// Reshape the single logged column into (timestamp, ppm_log) pairs.
    ///
    /// The logger writes readings and timestamps on alternating rows:
    /// ppm_log takes positions 1, 3, 5, ... and timestamp takes 2, 4, 6, ...
    /// Position 0 belongs to neither column.
    /// The pairs are zipped, so a trailing unmatched value is dropped.
    pub fn from_column(values: &[f64]) -> TimePpm {
        let ppm_log = values.iter().skip(1).step_by(2);
        let timestamp = values.iter().skip(2).step_by(2);
        let (n_ppm, n_time) = (ppm_log.len(), timestamp.len());
        if n_ppm != n_time {
            warn!(
                "uneven pairing: {} ppm_log and {} timestamp values, keeping {} rows",
                n_ppm,
                n_time,
                n_ppm.min(n_time)
            );
        }
        let mut timeppm = TimePpm::new(n_ppm.min(n_time));
        for (&t, &p) in timestamp.zip(ppm_log) {
            timeppm.timestamp.push(t);
            timeppm.ppm_log.push(p);
        }
        timeppm
    }

    /// Init a TimePpm from a csv with a header row and one data column.
    /// Empty fields become NAN, any other non-numeric field is an error.
    /// Columns after the first are ignored.
    pub fn from_csv<P: AsRef<Path>>(fin: P) -> Result<TimePpm> {
        let path = fin.as_ref();
        let file = File::open(path).map_err(|source| PpmError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let n_columns = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .len();
        if n_columns == 0 {
            return Err(PpmError::MalformedInput(format!(
                "{} has no header and no column",
                path.display()
            )));
        }
        if n_columns > 1 {
            warn!(
                "{} has {} columns, only the first one is used",
                path.display(),
                n_columns
            );
        }

        let mut values: Vec<f64> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            let line = record.position().map_or(0, |p| p.line());
            let field = record.get(0).unwrap_or("").trim();
            if field.is_empty() {
                warn!("line {}: missing reading, set to NAN", line);
                values.push(f64::NAN);
                continue;
            }
            match field.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    return Err(PpmError::MalformedInput(format!(
                        "line {}: '{}' is not a number",
                        line, field
                    )))
                }
            }
        }

        if values.is_empty() {
            return Err(PpmError::MalformedInput(format!(
                "{} has no data rows after the header",
                path.display()
            )));
        }
        debug!("read {} data rows from {}", values.len(), path.display());
        Ok(TimePpm::from_column(&values))
    }

    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), COLUMNS)
    }

    /// first n rows, fewer if the table is shorter
    pub fn head(&self, n: usize) -> Rows<'_> {
        self.rows(0, n.min(self.len()))
    }

    /// last n rows, keeping their index in the full table
    pub fn tail(&self, n: usize) -> Rows<'_> {
        self.rows(self.len().saturating_sub(n), self.len())
    }

    fn rows(&self, start: usize, end: usize) -> Rows<'_> {
        Rows {
            start,
            timestamp: &self.timestamp[start..end],
            ppm_log: &self.ppm_log[start..end],
        }
    }

    /// contiguous runs of rows where both values are finite,
    /// a NAN in either column ends the current run
    pub fn finite_segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (&t, &p) in self.timestamp.iter().zip(self.ppm_log.iter()) {
            if t.is_finite() && p.is_finite() {
                current.push((t, p));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// plots ppm_log against timestamp to svg
    pub fn plot<P: AsRef<Path>>(&self, fout: P) -> Result<()> {
        let segments = self.finite_segments();
        let points: Vec<(f64, f64)> = segments.iter().flatten().copied().collect();
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let (xmin, xmax) = min_and_max(&xs).ok_or(PpmError::EmptyTable)?;
        let (ymin, ymax) = min_and_max(&ys).ok_or(PpmError::EmptyTable)?;
        let (xmin, xmax) = padded_range(xmin, xmax, 20.);
        let (ymin, ymax) = padded_range(ymin, ymax, 10.);

        let fout = fout.as_ref();
        let root = SVGBackend::new(fout, (1600, 800)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(xmin..xmax, ymin..ymax)
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 24))
            .x_desc("timestamp")
            .y_desc("ppm_log [ppm]")
            .x_labels(14) // max number of labels
            .x_label_formatter(&|x: &f64| axis_label(*x))
            .y_label_formatter(&|y: &f64| format!("{:5}", y))
            .draw()
            .map_err(plot_error)?;

        for segment in segments {
            let line = LineSeries::new(segment, RGBColor(180, 10, 180).stroke_width(2));
            chart.draw_series(line).map_err(plot_error)?;
        }
        root.present().map_err(plot_error)?;
        info!("plotted {} rows to {}", points.len(), fout.display());
        Ok(())
    }
}

/// read failures are unreadable input, anything else the csv reader
/// rejects is malformed input
fn csv_error(path: &Path, e: csv::Error) -> PpmError {
    let msg = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => PpmError::InputNotFound {
            path: path.to_path_buf(),
            source,
        },
        _ => PpmError::MalformedInput(format!("{}: {}", path.display(), msg)),
    }
}

/// fixed precision tick label
pub fn axis_label(x: f64) -> String {
    format!("{:.1}", x)
}

fn plot_error<E: std::error::Error>(e: E) -> PpmError {
    PpmError::Plot(e.to_string())
}

/// A window of consecutive rows of a TimePpm
#[derive(Debug, Clone, Copy)]
pub struct Rows<'a> {
    start: usize,
    timestamp: &'a [f64],
    ppm_log: &'a [f64],
}

impl<'a> Rows<'a> {
    /// index of the first row in the full table
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    /// (index, timestamp, ppm_log)
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64, f64)> + 'a {
        let (start, timestamp, ppm_log) = (self.start, self.timestamp, self.ppm_log);
        timestamp
            .iter()
            .zip(ppm_log.iter())
            .enumerate()
            .map(move |(i, (&t, &p))| (start + i, t, p))
    }
}

impl std::fmt::Display for Rows<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "index,timestamp,ppm_log")?;
        for (i, t, p) in self.iter() {
            writeln!(f, "{},{},{}", i, t, p)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for TimePpm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rows(0, self.len()))
    }
}

/// min and max of a slice, NAN values are skipped;
/// None when nothing comparable is left
pub fn min_and_max(s: &[f64]) -> Option<(f64, f64)> {
    let mut finite = s.iter().copied().filter(|v| !v.is_nan());
    let first = finite.next()?;
    let (mut min, mut max) = (first, first);
    for v in finite {
        if v > max {
            max = v
        }
        if v < min {
            min = v
        }
    }
    Some((min, max))
}

/// widens [min, max] by span / divisor on each side,
/// or by 1 when min == max
pub fn padded_range(min: f64, max: f64, divisor: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0. {
        let margin = span / divisor;
        (min - margin, max + margin)
    } else {
        (min - 1., max + 1.)
    }
}
