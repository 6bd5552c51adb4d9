//! Delimited-table export of calibrated series.
//!
//! One table per label, named after the input file:
//! `plot.svg` + `"A"` → `plot_A.csv`. The header row is a `#` comment line
//! and values are written in scientific notation with 18 fractional digits.
//! Header names are quoted by the `csv` writer when they need it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::calibrate::Digitized;
use crate::config::Headers;
use crate::log::info;
use crate::types::Series;

/// Format a value the way C's `%.18e` does (`1.500000000000000000e+00`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{value:.18e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Write one series as a table: header row, then one `x,y` row per point.
pub fn write_series<W: Write>(writer: W, series: &Series, headers: &Headers) -> io::Result<()> {
    let mut table = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    let x_header = format!("# {}", headers.x);
    table.write_record([x_header.as_str(), headers.y.as_str()])?;
    for point in series.points() {
        table.write_record([format_value(point.x), format_value(point.y)])?;
    }
    table.flush()
}

/// Table path for `label`, next to `input`.
pub fn output_path(input: &Path, label: &str) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("_{label}.csv"));
    input.with_file_name(name)
}

/// Write every non-empty series next to `input`; returns the files written.
pub fn write_all(input: &Path, digitized: &Digitized, headers: &Headers) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (label, series) in digitized.series.iter() {
        if series.is_empty() {
            continue;
        }
        let path = output_path(input, label);
        let file = File::create(&path)?;
        write_series(BufWriter::new(file), series, headers)?;
        info!(label, path = %path.display(), points = series.len(), "series written");
        written.push(path);
    }
    Ok(written)
}
