//! Error types with rich diagnostics using miette
//!
//! Label and markup errors carry the offending text so the report can point
//! at it.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::Axis;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (label, filename or "<markup>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based row/column position, clamped to the source.
    pub fn offset_of(&self, row: u32, col: u32) -> usize {
        offset_in(&self.source, row, col)
    }
}

/// Byte offset of a 1-based row/column position in `source`, clamped to it.
pub fn offset_in(source: &str, row: u32, col: u32) -> usize {
    let mut offset = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index + 1 == row as usize {
            let col = (col as usize).saturating_sub(1);
            return (offset + col).min(source.len());
        }
        offset += line.len();
    }
    source.len()
}

/// Everything that can stop a digitization run.
#[derive(Error, Diagnostic, Debug)]
pub enum DigitizeError {
    #[error("unknown mode: {mode}")]
    #[diagnostic(
        code(svg_digitize::config::invalid_mode),
        help("mode must be either `path` or `group`")
    )]
    InvalidMode { mode: String },

    #[error("reference {axis} path '{prefix}' not found")]
    #[diagnostic(
        code(svg_digitize::calibrate::missing_reference_axis),
        help("label a path whose endpoints span a known range, e.g. `{prefix} 0 100`")
    )]
    MissingReferenceAxis { axis: Axis, prefix: String },

    #[error("reference label must contain exactly two numbers, found {count}")]
    #[diagnostic(
        code(svg_digitize::walker::malformed_reference_label),
        help("the first number is the value at the path's start, the second at its end")
    )]
    MalformedReferenceLabel {
        count: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("real-world range read from here")]
        span: SourceSpan,
    },

    #[error("reference {axis} path has zero length on its axis (both ends at {canvas})")]
    #[diagnostic(
        code(svg_digitize::calibrate::degenerate_reference_axis),
        help("the reference path must run along the axis it calibrates")
    )]
    DegenerateReferenceAxis { axis: Axis, canvas: f64 },

    #[error("malformed markup: {message}")]
    #[diagnostic(code(svg_digitize::walker::markup))]
    Markup {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

impl DigitizeError {
    pub(crate) fn malformed_label(label: &str, range_start: usize, count: usize) -> Self {
        let ctx = SourceContext::new("reference label", label);
        let range_start = range_start.min(label.len());
        DigitizeError::MalformedReferenceLabel {
            count,
            src: ctx.named_source(),
            span: (range_start, label.len() - range_start).into(),
        }
    }

    pub(crate) fn markup(ctx: &SourceContext, err: &roxmltree::Error) -> Self {
        let pos = err.pos();
        DigitizeError::Markup {
            message: err.to_string(),
            src: ctx.named_source(),
            span: (ctx.offset_of(pos.row, pos.col), 0).into(),
        }
    }
}
