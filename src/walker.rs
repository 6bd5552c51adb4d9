//! Markup tree walker.
//!
//! Parses the markup into a tree and visits it depth-first, keeping one
//! transform on the stack per open `<g>` and routing each `<path>`'s
//! canvas-space points to a reference axis or a series.

use std::ops::Range;

use glam::{DMat3, DVec2};
use roxmltree::{Document, Node, ParsingOptions};

use crate::config::{DigitizeOptions, Mode};
use crate::errors::{DigitizeError, SourceContext, offset_in};
use crate::log::{debug, info, warn};
use crate::path;
use crate::scan;
use crate::transform::{self, TransformStack};
use crate::types::{Axis, ReferenceAxis, SeriesMap, bbox_midpoint};

/// What one pass over the markup found, still in canvas units.
#[derive(Clone, Debug)]
pub struct Collected {
    pub series: SeriesMap,
    pub x_axis: Option<ReferenceAxis>,
    pub y_axis: Option<ReferenceAxis>,
    /// Label prefixes that were searched for, kept for error reporting.
    pub x_reference: String,
    pub y_reference: String,
}

impl Collected {
    fn new(options: &DigitizeOptions) -> Self {
        Collected {
            series: SeriesMap::with_labels(options.labels.iter().cloned()),
            x_axis: None,
            y_axis: None,
            x_reference: options.x_reference.clone(),
            y_reference: options.y_reference.clone(),
        }
    }
}

/// Walk the markup given as lines and collect reference axes and series.
pub fn collect<I>(lines: I, options: &DigitizeOptions) -> Result<Collected, DigitizeError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut markup = String::new();
    for line in lines {
        let line = line.as_ref();
        markup.push_str(line);
        if !line.ends_with('\n') {
            markup.push('\n');
        }
    }
    blank_unmatched_group_closes(&mut markup);
    let ctx = SourceContext::new("<markup>", markup);

    let doc = Document::parse_with_options(&ctx.source, parsing_options())
        .map_err(|e| DigitizeError::markup(&ctx, &e))?;

    let mut walker = Walker::new(options);
    walker.visit_children(doc.root(), None)?;
    info!(
        x_axis = walker.collected.x_axis.is_some(),
        y_axis = walker.collected.y_axis.is_some(),
        series = walker.collected.series.len(),
        "markup walked"
    );
    Ok(walker.collected)
}

fn parsing_options() -> ParsingOptions {
    let mut parsing = ParsingOptions::default();
    parsing.allow_dtd = true;
    parsing
}

/// Overwrite `</g>` tags that close no open group with spaces, one parse
/// error at a time. Rows and columns of the remaining markup are unchanged.
fn blank_unmatched_group_closes(markup: &mut String) {
    loop {
        let err = match Document::parse_with_options(markup.as_str(), parsing_options()) {
            Ok(_) => return,
            Err(err) => err,
        };
        if !matches!(err, roxmltree::Error::UnexpectedCloseTag { .. }) {
            return;
        }
        let pos = err.pos();
        let Some(tag) = close_tag_near(markup, offset_in(markup, pos.row, pos.col)) else {
            return;
        };
        if markup[tag.clone()].trim_start_matches("</").trim_end_matches('>').trim() != "g" {
            return;
        }
        warn!(row = pos.row, col = pos.col, "unmatched group close ignored");
        let blank = " ".repeat(tag.len());
        markup.replace_range(tag, &blank);
    }
}

/// Byte range of the close tag that starts at or just before `offset`.
fn close_tag_near(markup: &str, offset: usize) -> Option<Range<usize>> {
    let mut limit = (offset + 2).min(markup.len());
    while !markup.is_char_boundary(limit) {
        limit += 1;
    }
    let start = markup[..limit].rfind("</")?;
    let end = start + markup[start..].find('>')? + 1;
    Some(start..end)
}

/// The `label` attribute in any namespace (`inkscape:label` in practice).
fn label<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == "label")
        .map(|attr| attr.value())
}

struct Walker<'o> {
    options: &'o DigitizeOptions,
    stack: TransformStack,
    collected: Collected,
}

impl<'o> Walker<'o> {
    fn new(options: &'o DigitizeOptions) -> Self {
        Walker {
            options,
            stack: TransformStack::new(),
            collected: Collected::new(options),
        }
    }

    /// Visit the element children of `node`. `group` is the requested label
    /// of the innermost enclosing group, if any (group mode only).
    fn visit_children<'a>(
        &mut self,
        node: Node<'a, '_>,
        group: Option<&'a str>,
    ) -> Result<(), DigitizeError> {
        for child in node.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "g" => self.visit_group(child)?,
                "path" => self.visit_path(child, group)?,
                _ => self.visit_children(child, group)?,
            }
        }
        Ok(())
    }

    fn visit_group(&mut self, node: Node<'_, '_>) -> Result<(), DigitizeError> {
        let transform = node.attribute("transform").and_then(transform::resolve);
        self.stack.push(transform.unwrap_or(DMat3::IDENTITY));

        // The current group is scoped to this element: once it closes, the
        // caller's `group` applies again to the remaining siblings.
        let group = match self.options.mode {
            Mode::Group => label(node).filter(|name| self.collected.series.contains(name)),
            Mode::Path => None,
        };
        debug!(
            depth = self.stack.depth(),
            group,
            transformed = transform.is_some(),
            "enter group"
        );

        let result = self.visit_children(node, group);
        self.stack.pop();
        result
    }

    fn visit_path(&mut self, node: Node<'_, '_>, group: Option<&str>) -> Result<(), DigitizeError> {
        let Some(d) = node.attribute("d") else {
            debug!(id = node.attribute("id"), "path without data skipped");
            return Ok(());
        };
        let mut points = path::anchor_points(d);
        if points.is_empty() {
            debug!(id = node.attribute("id"), "path without anchor points skipped");
            return Ok(());
        }

        let local = node.attribute("transform").and_then(transform::resolve);
        if let Some(matrix) = local {
            self.stack.push(matrix);
        }
        self.stack.apply(&mut points);
        if local.is_some() {
            self.stack.pop();
        }

        self.dispatch(label(node), group, points)
    }

    fn dispatch(
        &mut self,
        label: Option<&str>,
        group: Option<&str>,
        points: Vec<DVec2>,
    ) -> Result<(), DigitizeError> {
        let options = self.options;
        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Ok(());
        };
        if let Some(label) = label {
            if let Some(range) = label.strip_prefix(options.x_reference.as_str()) {
                let axis = reference_axis(Axis::X, label, range, first, last)?;
                debug!(?axis, "x reference axis");
                self.collected.x_axis = Some(axis);
                return Ok(());
            }
            if let Some(range) = label.strip_prefix(options.y_reference.as_str()) {
                let axis = reference_axis(Axis::Y, label, range, first, last)?;
                debug!(?axis, "y reference axis");
                self.collected.y_axis = Some(axis);
                return Ok(());
            }
        }

        match (options.mode, group, label) {
            (Mode::Group, Some(group), _) => {
                if let (Some(series), Some(point)) =
                    (self.collected.series.get_mut(group), bbox_midpoint(&points))
                {
                    debug!(group, ?point, "group point");
                    series.push(point);
                }
            }
            (Mode::Path, _, Some(label)) => {
                if let Some(series) = self.collected.series.get_mut(label) {
                    debug!(label, points = points.len(), "path series");
                    series.replace(points);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Build a reference axis from the ends of a reference path and the range
/// text that follows the label prefix.
fn reference_axis(
    axis: Axis,
    label: &str,
    range: &str,
    first: DVec2,
    last: DVec2,
) -> Result<ReferenceAxis, DigitizeError> {
    let values = scan::numbers(range);
    let real: [f64; 2] = values
        .as_slice()
        .try_into()
        .map_err(|_| DigitizeError::malformed_label(label, label.len() - range.len(), values.len()))?;
    Ok(ReferenceAxis::from_endpoints(axis, first, last, real))
}
