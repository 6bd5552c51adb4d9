//! Path data interpreter.
//!
//! Walks the command stream of a `d` attribute and records the anchor point
//! reached after each command application. Curve control points are skipped,
//! so a curved path comes back as the polyline through its endpoints.

use glam::{DVec2, dvec2};
use pest::Parser;

use crate::log::warn;
use crate::scan::number_value;
use crate::{DigitizeParser, Rule};

/// A lexical unit of path data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathToken {
    Command(char),
    Number(f64),
}

/// Split path data into command letters and numbers.
pub fn tokenize(d: &str) -> Vec<PathToken> {
    let pairs = match DigitizeParser::parse(Rule::path_data, d) {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!("path data scan failed: {}", e);
            return Vec::new();
        }
    };
    pairs
        .flatten()
        .filter_map(|p| match p.as_rule() {
            Rule::command => p.as_str().chars().next().map(PathToken::Command),
            Rule::number => Some(PathToken::Number(number_value(&p))),
            _ => None,
        })
        .collect()
}

/// How a command letter consumes its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    /// Skip `skip` leading values, then read an (x, y) destination.
    Point { skip: usize },
    Horizontal,
    Vertical,
    /// Close-path and anything unrecognized: the position does not move.
    Stationary,
}

impl Shape {
    fn of(command: char) -> Shape {
        match command.to_ascii_lowercase() {
            'm' | 'l' | 't' => Shape::Point { skip: 0 },
            's' | 'q' => Shape::Point { skip: 2 },
            'c' => Shape::Point { skip: 4 },
            'a' => Shape::Point { skip: 5 },
            'h' => Shape::Horizontal,
            'v' => Shape::Vertical,
            _ => Shape::Stationary,
        }
    }
}

/// Cursor over the token stream.
struct Interpreter<'a> {
    tokens: &'a [PathToken],
    index: usize,
    current: DVec2,
    command: char,
    points: Vec<DVec2>,
}

impl<'a> Interpreter<'a> {
    fn new(tokens: &'a [PathToken]) -> Self {
        Interpreter {
            tokens,
            index: 0,
            current: DVec2::ZERO,
            command: 'm',
            points: Vec::new(),
        }
    }

    /// Take the next `n` numbers, or `None` if the stream runs out of them.
    fn take_numbers<const N: usize>(&mut self) -> Option<[f64; N]> {
        let mut values = [0.0; N];
        for value in &mut values {
            match self.tokens.get(self.index) {
                Some(PathToken::Number(n)) => *value = *n,
                _ => return None,
            }
            self.index += 1;
        }
        Some(values)
    }

    fn skip_numbers(&mut self, count: usize) -> Option<()> {
        for _ in 0..count {
            self.take_numbers::<1>()?;
        }
        Some(())
    }

    /// Apply the active command once. `None` means the arguments ran out.
    fn apply(&mut self) -> Option<()> {
        let relative = self.command.is_ascii_lowercase();
        match Shape::of(self.command) {
            Shape::Point { skip } => {
                self.skip_numbers(skip)?;
                let [x, y] = self.take_numbers::<2>()?;
                let target = dvec2(x, y);
                self.current = if relative { self.current + target } else { target };
            }
            Shape::Horizontal => {
                let [x] = self.take_numbers::<1>()?;
                self.current.x = if relative { self.current.x + x } else { x };
            }
            Shape::Vertical => {
                let [y] = self.take_numbers::<1>()?;
                self.current.y = if relative { self.current.y + y } else { y };
            }
            Shape::Stationary => {
                // A stray number after a stationary command is used up so the
                // cursor keeps moving; the point is repeated either way.
                if let Some(PathToken::Number(_)) = self.tokens.get(self.index) {
                    self.index += 1;
                }
            }
        }
        self.points.push(self.current);
        Some(())
    }

    fn run(mut self) -> Vec<DVec2> {
        while self.index < self.tokens.len() {
            if let PathToken::Command(command) = self.tokens[self.index] {
                self.command = command;
                self.index += 1;
            }
            if self.apply().is_none() {
                warn!(
                    command = %self.command,
                    points = self.points.len(),
                    "path data ended inside a command; keeping the points read so far"
                );
                break;
            }
        }
        self.points
    }
}

/// Anchor points visited by the path data `d`.
pub fn anchor_points(d: &str) -> Vec<DVec2> {
    let tokens = tokenize(d);
    Interpreter::new(&tokens).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<DVec2> {
        coords.iter().map(|&(x, y)| dvec2(x, y)).collect()
    }

    #[test]
    fn absolute_lines() {
        assert_eq!(
            anchor_points("M0,0 L10,0 L10,10"),
            pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
        );
    }

    #[test]
    fn relative_lines() {
        assert_eq!(
            anchor_points("m0,0 l10,0 l0,10"),
            pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
        );
    }

    #[test]
    fn bare_numbers_start_as_relative_move() {
        assert_eq!(anchor_points("5,5 1,1"), pts(&[(5.0, 5.0), (6.0, 6.0)]));
    }

    #[test]
    fn implicit_repetition() {
        assert_eq!(
            anchor_points("M 1 1 2 2 3 3"),
            pts(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])
        );
        assert_eq!(
            anchor_points("m 1,1 1,0 0,1"),
            pts(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0)])
        );
    }

    #[test]
    fn horizontal_and_vertical() {
        assert_eq!(
            anchor_points("M1,1 H5 v2 h-1 V0"),
            pts(&[(1.0, 1.0), (5.0, 1.0), (5.0, 3.0), (4.0, 3.0), (4.0, 0.0)])
        );
    }

    #[test]
    fn curves_keep_only_endpoints() {
        assert_eq!(
            anchor_points("M0,0 C1,1 2,2 3,0 S5,5 6,0 Q7,7 8,0 T10,0"),
            pts(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0), (8.0, 0.0), (10.0, 0.0)])
        );
        assert_eq!(
            anchor_points("m0,0 c1,1 2,2 3,0 q1,1 2,0"),
            pts(&[(0.0, 0.0), (3.0, 0.0), (5.0, 0.0)])
        );
    }

    #[test]
    fn arcs_skip_radii_and_flags() {
        assert_eq!(
            anchor_points("M0,0 A5,5 0 0,1 10,0 a5 5 0 1 0 -10 0"),
            pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn close_path_repeats_current_point() {
        assert_eq!(
            anchor_points("M0,0 L1,0 L1,1 Z"),
            pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (1.0, 1.0)])
        );
        // A move after a close still lands.
        assert_eq!(
            anchor_points("M0,0 z m2,2"),
            pts(&[(0.0, 0.0), (0.0, 0.0), (2.0, 2.0)])
        );
    }

    #[test]
    fn unknown_command_repeats_point_per_stray_number() {
        assert_eq!(
            anchor_points("M3,4 B 1 2"),
            pts(&[(3.0, 4.0), (3.0, 4.0), (3.0, 4.0)])
        );
    }

    #[test]
    fn truncated_arguments_keep_earlier_points() {
        assert_eq!(anchor_points("M0,0 L10"), pts(&[(0.0, 0.0)]));
        assert_eq!(anchor_points("M0,0 C1,1 2,2"), pts(&[(0.0, 0.0)]));
        assert_eq!(anchor_points("M0,0 L"), pts(&[(0.0, 0.0)]));
    }

    #[test]
    fn compact_number_forms() {
        assert_eq!(
            anchor_points("M10-5l.5.5"),
            pts(&[(10.0, -5.0), (10.5, -4.5)])
        );
        assert_eq!(anchor_points("M1e1,2E0"), pts(&[(10.0, 2.0)]));
    }

    #[test]
    fn empty_path_data() {
        assert!(anchor_points("").is_empty());
    }
}
