//! Recover numeric (x, y) series from plots exported as SVG.
//!
//! Paths in the markup are identified by their `label` attribute (the one
//! Inkscape writes as `inkscape:label`). Two of them are reference axes whose
//! labels carry the real-world values at their endpoints; the others are the
//! data series to recover.
//!
//! ```
//! use svg_digitize::{DigitizeOptions, digitize_str};
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
//!   <path label="xref 0 10" d="M 0,0 L 100,0" />
//!   <path label="yref 0 1" d="M 0,100 V 0" />
//!   <path label="A" d="M 50,50 L 100,0" />
//! </svg>"#;
//!
//! let options = DigitizeOptions::new(["A"]);
//! let digitized = digitize_str(svg, &options)?;
//! let a = digitized.series.get("A").unwrap();
//! assert_eq!(a.points()[0].x, 5.0);
//! assert_eq!(a.points()[1].y, 1.0);
//! # Ok::<(), svg_digitize::DigitizeError>(())
//! ```

use pest_derive::Parser;

pub mod calibrate;
pub mod config;
pub mod errors;
pub mod export;
pub mod log;
pub mod path;
pub mod scan;
pub mod transform;
pub mod types;
pub mod walker;

pub use calibrate::Digitized;
pub use config::{DigitizeOptions, Headers, Mode};
pub use errors::DigitizeError;
pub use types::{Axis, ReferenceAxis, Series, SeriesMap};

#[derive(Parser)]
#[grammar = "digitize.pest"]
pub struct DigitizeParser;

/// Digitize markup given as a sequence of lines.
///
/// Fails when the markup is not well-formed, when a reference label is
/// malformed, or when either reference axis is missing or degenerate.
pub fn digitize<I>(lines: I, options: &DigitizeOptions) -> Result<Digitized, DigitizeError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let collected = walker::collect(lines, options)?;
    calibrate::calibrate(collected)
}

/// Digitize markup held in a single string.
pub fn digitize_str(markup: &str, options: &DigitizeOptions) -> Result<Digitized, DigitizeError> {
    digitize(markup.lines(), options)
}
