//! Canvas → real-world calibration.

use glam::{DVec2, dvec2};

use crate::errors::DigitizeError;
use crate::log::debug;
use crate::types::{Axis, ReferenceAxis, SeriesMap};
use crate::walker::Collected;

/// Linear map from canvas coordinates to real units along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisMapping {
    canvas_start: f64,
    canvas_span: f64,
    real_start: f64,
    real_span: f64,
}

impl AxisMapping {
    /// Derive the mapping from a reference axis.
    ///
    /// Fails when the reference path has no extent along its axis.
    pub fn new(reference: &ReferenceAxis) -> Result<Self, DigitizeError> {
        let canvas_span = reference.canvas_end - reference.canvas_start;
        if canvas_span == 0.0 {
            return Err(DigitizeError::DegenerateReferenceAxis {
                axis: reference.axis,
                canvas: reference.canvas_start,
            });
        }
        Ok(AxisMapping {
            canvas_start: reference.canvas_start,
            canvas_span,
            real_start: reference.real_start,
            real_span: reference.real_end - reference.real_start,
        })
    }

    #[inline]
    pub fn map(&self, canvas: f64) -> f64 {
        (canvas - self.canvas_start) / self.canvas_span * self.real_span + self.real_start
    }
}

/// Both axis mappings of a plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub x: AxisMapping,
    pub y: AxisMapping,
}

impl Calibration {
    pub fn new(x_axis: &ReferenceAxis, y_axis: &ReferenceAxis) -> Result<Self, DigitizeError> {
        Ok(Calibration {
            x: AxisMapping::new(x_axis)?,
            y: AxisMapping::new(y_axis)?,
        })
    }

    #[inline]
    pub fn map(&self, canvas: DVec2) -> DVec2 {
        dvec2(self.x.map(canvas.x), self.y.map(canvas.y))
    }
}

/// Calibrated series together with the reference axes they were mapped by.
#[derive(Clone, Debug, PartialEq)]
pub struct Digitized {
    pub series: SeriesMap,
    pub x_axis: ReferenceAxis,
    pub y_axis: ReferenceAxis,
}

/// Map every collected series to real units and sort it by x.
///
/// Both axes must be present. Their extent is only checked when some series
/// has points to map.
pub fn calibrate(collected: Collected) -> Result<Digitized, DigitizeError> {
    let Collected {
        mut series,
        x_axis,
        y_axis,
        x_reference,
        y_reference,
    } = collected;

    let x_axis = x_axis.ok_or(DigitizeError::MissingReferenceAxis {
        axis: Axis::X,
        prefix: x_reference,
    })?;
    let y_axis = y_axis.ok_or(DigitizeError::MissingReferenceAxis {
        axis: Axis::Y,
        prefix: y_reference,
    })?;
    if series.iter().all(|(_, points)| points.is_empty()) {
        debug!("no series points collected; nothing to calibrate");
        return Ok(Digitized {
            series,
            x_axis,
            y_axis,
        });
    }
    let calibration = Calibration::new(&x_axis, &y_axis)?;

    for (label, points) in series.iter_mut() {
        if points.is_empty() {
            debug!("{}: no points collected", label);
            continue;
        }
        for point in points.points_mut() {
            *point = calibration.map(*point);
        }
        points.sort_by_x();
        debug!("{}: {} points calibrated", label, points.len());
    }

    Ok(Digitized {
        series,
        x_axis,
        y_axis,
    })
}
