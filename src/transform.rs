//! Transform attribute resolution and the nested transform stack.
//!
//! A transform is a 3×3 homogeneous matrix (`DMat3`, column-major). Nested
//! coordinate systems compose outer-to-inner: the stack `[g0, g1, local]`
//! maps a point as `g0 · g1 · local · p`.

use glam::{DMat3, DVec2, DVec3, dvec2};
use pest::Parser;
use pest::iterators::Pair;

use crate::log::{debug, warn};
use crate::scan::number_value;
use crate::{DigitizeParser, Rule};

/// The transform kinds that resolve to a matrix, in evaluation order.
///
/// When one attribute names several of them, the one latest in this order
/// wins; the others are dropped rather than composed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransformKind {
    Matrix,
    Translate,
    Scale,
    Rotate,
}

impl TransformKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "matrix" => Some(TransformKind::Matrix),
            "translate" => Some(TransformKind::Translate),
            "scale" => Some(TransformKind::Scale),
            "rotate" => Some(TransformKind::Rotate),
            _ => None,
        }
    }

    /// Build the matrix for this kind from its argument list.
    ///
    /// Returns `None` when the arguments do not fit the form.
    pub fn matrix(self, args: &[f64]) -> Option<DMat3> {
        match (self, args) {
            (TransformKind::Matrix, &[a, b, c, d, e, f]) => Some(DMat3::from_cols(
                DVec3::new(a, b, 0.0),
                DVec3::new(c, d, 0.0),
                DVec3::new(e, f, 1.0),
            )),
            (TransformKind::Matrix, _) => None,
            (TransformKind::Translate, &[tx, ty]) => Some(DMat3::from_translation(dvec2(tx, ty))),
            (TransformKind::Translate, &[tx, ..]) => Some(DMat3::from_translation(dvec2(tx, 0.0))),
            (TransformKind::Scale, &[s]) => Some(DMat3::from_scale(dvec2(s, s))),
            (TransformKind::Scale, &[sx, sy, ..]) => Some(DMat3::from_scale(dvec2(sx, sy))),
            (TransformKind::Rotate, &[angle, cx, cy]) => Some(rotation_about(angle, dvec2(cx, cy))),
            (TransformKind::Rotate, &[angle, ..]) => Some(rotation_about(angle, DVec2::ZERO)),
            _ => None,
        }
    }
}

/// Rotation by `degrees` about `pivot`: `T(pivot) · R · T(-pivot)`.
pub fn rotation_about(degrees: f64, pivot: DVec2) -> DMat3 {
    DMat3::from_translation(pivot)
        * DMat3::from_angle(degrees.to_radians())
        * DMat3::from_translation(-pivot)
}

/// Resolve a `transform` attribute value to a single matrix.
///
/// Returns `None` when no matrix/translate/scale/rotate form is recognized.
pub fn resolve(attr: &str) -> Option<DMat3> {
    let pairs = match DigitizeParser::parse(Rule::transform_list, attr) {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!("transform scan failed: {}", e);
            return None;
        }
    };

    let mut resolved: Option<(TransformKind, DMat3)> = None;
    for func in pairs.flatten().filter(|p| p.as_rule() == Rule::transform_fn) {
        let (name, args) = transform_parts(func);
        let Some(kind) = TransformKind::from_name(name) else {
            debug!(name, "unsupported transform ignored");
            continue;
        };
        let Some(matrix) = kind.matrix(&args) else {
            warn!(name, args = args.len(), "transform arguments do not fit");
            continue;
        };
        if resolved.is_none_or(|(winner, _)| kind >= winner) {
            resolved = Some((kind, matrix));
        }
    }
    resolved.map(|(_, matrix)| matrix)
}

fn transform_parts(func: Pair<'_, Rule>) -> (&str, Vec<f64>) {
    let mut name = "";
    let mut args = Vec::new();
    for inner in func.into_inner() {
        match inner.as_rule() {
            Rule::transform_name => name = inner.as_str(),
            Rule::transform_args => {
                args = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::number)
                    .map(|p| number_value(&p))
                    .collect();
            }
            _ => {}
        }
    }
    (name, args)
}

/// Active transforms, outermost first.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    entries: Vec<DMat3>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, matrix: DMat3) {
        self.entries.push(matrix);
    }

    /// Pop the innermost transform. Popping an empty stack does nothing.
    pub fn pop(&mut self) -> Option<DMat3> {
        self.entries.pop()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// The product of all entries, outermost on the left.
    pub fn composed(&self) -> DMat3 {
        self.entries
            .iter()
            .fold(DMat3::IDENTITY, |acc, matrix| acc * *matrix)
    }

    /// Map canvas points through every active transform.
    pub fn apply(&self, points: &mut [DVec2]) {
        let matrix = self.composed();
        for point in points {
            *point = matrix.transform_point2(*point);
        }
    }
}
