//! Numeric literal scanner.
//!
//! Pulls every number out of a piece of free text: reference labels such as
//! `"xref 0 to 1e3"`, transform argument lists, path data.

use pest::Parser;
use pest::iterators::Pair;

use crate::log::warn;
use crate::{DigitizeParser, Rule};

/// All numeric literals in `text`, in order of appearance.
pub fn numeric_literals(text: &str) -> Vec<&str> {
    match DigitizeParser::parse(Rule::number_stream, text) {
        Ok(pairs) => pairs
            .flatten()
            .filter(|p| p.as_rule() == Rule::number)
            .map(|p| p.as_str())
            .collect(),
        Err(e) => {
            warn!("number scan failed: {}", e);
            Vec::new()
        }
    }
}

/// All numbers in `text`, converted to `f64`.
pub fn numbers(text: &str) -> Vec<f64> {
    numeric_literals(text).into_iter().map(literal_value).collect()
}

/// Value of a literal matched by the `number` rule.
///
/// The grammar lets an exponent marker stand without digits (`"2e"`,
/// `"2e-"`); such a marker contributes nothing to the value.
pub fn literal_value(literal: &str) -> f64 {
    if let Ok(value) = literal.parse::<f64>() {
        return value;
    }
    let mantissa = literal.trim_end_matches(['+', '-']).trim_end_matches(['e', 'E']);
    mantissa.parse().unwrap_or(0.0)
}

pub(crate) fn number_value(pair: &Pair<'_, Rule>) -> f64 {
    literal_value(pair.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_in_label() {
        assert_eq!(numeric_literals("xref -1.5 to 2e3"), ["-1.5", "2e3"]);
        assert_eq!(numeric_literals("no numbers here"), Vec::<&str>::new());
    }

    #[test]
    fn fraction_without_leading_digit() {
        assert_eq!(numbers("scale(.5)"), [0.5]);
        assert_eq!(numbers("1.5.5"), [1.5, 0.5]);
    }

    #[test]
    fn dangling_exponent_is_ignored() {
        assert_eq!(numeric_literals("2e and 3E-"), ["2e", "3E-"]);
        assert_eq!(numbers("2e and 3E-"), [2.0, 3.0]);
    }

    #[test]
    fn signed_exponent() {
        assert_eq!(numbers("1e-2,+4E+1"), [0.01, 40.0]);
    }
}
