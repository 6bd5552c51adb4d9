//! Options for a digitization run.

use std::fmt;
use std::str::FromStr;

use crate::errors::DigitizeError;

/// Default label prefix of the x reference path.
pub const DEFAULT_X_REFERENCE: &str = "xref";
/// Default label prefix of the y reference path.
pub const DEFAULT_Y_REFERENCE: &str = "yref";
/// Default column headers of exported tables.
pub const DEFAULT_X_HEADER: &str = "x";
pub const DEFAULT_Y_HEADER: &str = "y";

/// How labeled elements turn into series points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Each labeled path is a whole series; its anchor points are the data.
    #[default]
    Path,
    /// Each drawable inside a labeled group is one data point (a marker).
    Group,
}

impl FromStr for Mode {
    type Err = DigitizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Mode::Path),
            "group" => Ok(Mode::Group),
            _ => Err(DigitizeError::InvalidMode { mode: s.to_string() }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Path => write!(f, "path"),
            Mode::Group => write!(f, "group"),
        }
    }
}

/// Which series to recover and how to find the reference axes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitizeOptions {
    /// Requested series labels, in output order.
    pub labels: Vec<String>,
    pub mode: Mode,
    /// Label prefix that marks the x reference path.
    pub x_reference: String,
    /// Label prefix that marks the y reference path.
    pub y_reference: String,
}

impl DigitizeOptions {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DigitizeOptions {
            labels: labels.into_iter().map(Into::into).collect(),
            mode: Mode::default(),
            x_reference: DEFAULT_X_REFERENCE.to_string(),
            y_reference: DEFAULT_Y_REFERENCE.to_string(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_x_reference(mut self, prefix: impl Into<String>) -> Self {
        self.x_reference = prefix.into();
        self
    }

    pub fn with_y_reference(mut self, prefix: impl Into<String>) -> Self {
        self.y_reference = prefix.into();
        self
    }
}

/// Column names written in the header row of exported tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headers {
    pub x: String,
    pub y: String,
}

impl Default for Headers {
    fn default() -> Self {
        Headers {
            x: DEFAULT_X_HEADER.to_string(),
            y: DEFAULT_Y_HEADER.to_string(),
        }
    }
}
