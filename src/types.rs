//! Domain types shared by the walker, calibration and export stages.

use std::fmt;

use glam::DVec2;
use indexmap::IndexMap;

/// One of the two plot axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The component of `point` that lies along this axis.
    #[inline]
    pub fn component(self, point: DVec2) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// A calibration path: where it starts and ends on the canvas along its axis,
/// and which real-world values those two ends stand for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceAxis {
    pub axis: Axis,
    pub canvas_start: f64,
    pub canvas_end: f64,
    pub real_start: f64,
    pub real_end: f64,
}

impl ReferenceAxis {
    /// Build an axis from the first and last anchor point of a reference path.
    pub fn from_endpoints(axis: Axis, first: DVec2, last: DVec2, real: [f64; 2]) -> Self {
        ReferenceAxis {
            axis,
            canvas_start: axis.component(first),
            canvas_end: axis.component(last),
            real_start: real[0],
            real_end: real[1],
        }
    }
}

/// An ordered run of points belonging to one label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    points: Vec<DVec2>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [DVec2] {
        &mut self.points
    }

    pub fn push(&mut self, point: DVec2) {
        self.points.push(point);
    }

    /// Replace every point (path mode: the last path with a label wins).
    pub fn replace(&mut self, points: Vec<DVec2>) {
        self.points = points;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stable sort by x; equal x values keep their collection order.
    pub fn sort_by_x(&mut self) {
        self.points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
}

impl From<Vec<DVec2>> for Series {
    fn from(points: Vec<DVec2>) -> Self {
        Series { points }
    }
}

/// Label → series, in the order the labels were requested.
///
/// Every requested label has an entry from the start, so a label that never
/// matched shows up as an empty series rather than going missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesMap {
    entries: IndexMap<String, Series>,
}

impl SeriesMap {
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = labels
            .into_iter()
            .map(|label| (label.into(), Series::new()))
            .collect();
        SeriesMap { entries }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn get(&self, label: &str) -> Option<&Series> {
        self.entries.get(label)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut Series> {
        self.entries.get_mut(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.entries.iter().map(|(label, series)| (label.as_str(), series))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Series)> {
        self.entries
            .iter_mut()
            .map(|(label, series)| (label.as_str(), series))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Midpoint of the axis-aligned bounding box around `points`.
///
/// Returns `None` for an empty slice.
pub fn bbox_midpoint(points: &[DVec2]) -> Option<DVec2> {
    let (first, rest) = points.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
    Some((min + max) / 2.0)
}
