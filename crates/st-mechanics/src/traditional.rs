//! Traditional `XdY+N` rolls.
//!
//! An expression is a sequence of terms joined by `+`. Each term is either a
//! literal non-negative integer or `<repeat>d<faces>`. Whitespace is ignored.
//! The whole expression is validated before any die is rolled.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::DieSource;
use crate::error::RollError;

/// Most dice a single term may roll.
pub const MAX_REPEAT: u32 = 1_000;

/// Most faces a single die may have.
pub const MAX_FACES: u32 = 10_000;

/// One `+`-separated term of a dice expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    /// A flat number added to the total.
    Literal(i32),
    /// `repeat` dice with `faces` sides each.
    Dice {
        /// How many dice to roll.
        repeat: u32,
        /// Sides per die.
        faces: u32,
    },
}

impl Term {
    fn parse(raw: &str) -> Result<Self, RollError> {
        if raw.is_empty() {
            return Err(RollError::InvalidExpression("empty term".into()));
        }

        match raw.split_once(['d', 'D']) {
            Some((repeat, faces)) => {
                let repeat = parse_digits(repeat, raw)?;
                let faces = parse_digits(faces, raw)?;
                if !(1..=MAX_REPEAT as i32).contains(&repeat) {
                    return Err(RollError::InvalidExpression(format!(
                        "`{raw}` must roll between 1 and {MAX_REPEAT} dice"
                    )));
                }
                if !(1..=MAX_FACES as i32).contains(&faces) {
                    return Err(RollError::InvalidExpression(format!(
                        "`{raw}` must use dice with 1 to {MAX_FACES} faces"
                    )));
                }
                Ok(Self::Dice {
                    repeat: repeat as u32,
                    faces: faces as u32,
                })
            }
            None => Ok(Self::Literal(parse_digits(raw, raw)?)),
        }
    }

    /// The largest value this term can contribute.
    fn max_value(self) -> i64 {
        match self {
            Self::Literal(n) => i64::from(n),
            Self::Dice { repeat, faces } => i64::from(repeat) * i64::from(faces),
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{n}"),
            Self::Dice { repeat, faces } => write!(f, "{repeat}d{faces}"),
        }
    }
}

/// Parse an unsigned decimal that must fit in an `i32`.
fn parse_digits(digits: &str, term: &str) -> Result<i32, RollError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RollError::InvalidExpression(format!(
            "`{term}` is not a number or XdY term"
        )));
    }
    digits
        .parse::<i32>()
        .map_err(|_| RollError::InvalidExpression(format!("`{term}` is too large")))
}

/// A validated dice expression, ready to roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    terms: Vec<Term>,
}

impl DiceExpression {
    /// Parse and validate an expression such as `3d6 + 2`.
    pub fn parse(input: &str) -> Result<Self, RollError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(RollError::InvalidExpression("empty expression".into()));
        }

        let terms = compact
            .split('+')
            .map(Term::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let ceiling: i64 = terms.iter().map(|t| t.max_value()).sum();
        if ceiling > i64::from(i32::MAX) {
            return Err(RollError::InvalidExpression(format!(
                "`{input}` could exceed the largest total"
            )));
        }

        Ok(Self { terms })
    }

    /// The parsed terms, in order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// True iff the expression is exactly one `1d10` and one literal.
    ///
    /// Only a hint for the caller; it never changes the math.
    pub fn looks_like_initiative(&self) -> bool {
        match self.terms.as_slice() {
            [a, b] => {
                let is_d10 = |t: &Term| {
                    matches!(
                        t,
                        Term::Dice {
                            repeat: 1,
                            faces: 10
                        }
                    )
                };
                let is_literal = |t: &Term| matches!(t, Term::Literal(_));
                (is_d10(a) && is_literal(b)) || (is_literal(a) && is_d10(b))
            }
            _ => false,
        }
    }

    /// Roll every dice term and total the expression.
    pub fn evaluate(&self, dice: &mut impl DieSource) -> TraditionalRollResult {
        let mut components = Vec::new();
        for term in &self.terms {
            match *term {
                Term::Literal(n) => components.push(n),
                Term::Dice { repeat, faces } => components.extend(
                    dice.roll(repeat, faces)
                        .into_iter()
                        .map(|face| face as i32),
                ),
            }
        }
        let total = components.iter().sum();

        TraditionalRollResult {
            components,
            total,
            looks_like_initiative: self.looks_like_initiative(),
        }
    }
}

impl FromStr for DiceExpression {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(Term::to_string).collect();
        write!(f, "{}", terms.join("+"))
    }
}

/// The result of a traditional roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraditionalRollResult {
    /// Every rolled face and literal, in expression order.
    pub components: Vec<i32>,
    /// Sum of all components.
    pub total: i32,
    /// Whether the expression looks like a `1d10+N` initiative roll.
    pub looks_like_initiative: bool,
}

impl std::fmt::Display for TraditionalRollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.components.len() > 1 {
            let parts: Vec<String> = self.components.iter().map(i32::to_string).collect();
            write!(f, "{} = {}", parts.join("+"), self.total)
        } else {
            write!(f, "{}", self.total)
        }
    }
}

/// Parse and roll a traditional expression in one step.
pub fn evaluate_traditional(
    expression: &str,
    dice: &mut impl DieSource,
) -> Result<TraditionalRollResult, RollError> {
    Ok(DiceExpression::parse(expression)?.evaluate(dice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RngDieSource, ScriptedDice};
    use proptest::prelude::*;

    #[test]
    fn initiative_scenario() {
        let mut dice = ScriptedDice::new([7]);
        let result = evaluate_traditional("1d10+5", &mut dice).unwrap();
        assert_eq!(result.total, 12);
        assert_eq!(result.components, vec![7, 5]);
        assert!(result.looks_like_initiative);
    }

    #[test]
    fn initiative_hint_is_order_independent() {
        let expr = DiceExpression::parse("5 + 1d10").unwrap();
        assert!(expr.looks_like_initiative());
    }

    #[test]
    fn not_initiative() {
        for input in ["1d10", "2d10+5", "1d10+1d6", "1d10+2+3", "1d6+2"] {
            let expr = DiceExpression::parse(input).unwrap();
            assert!(!expr.looks_like_initiative(), "{input}");
        }
    }

    #[test]
    fn components_keep_expression_order() {
        let mut dice = ScriptedDice::new([4, 1, 6, 3]);
        let result = evaluate_traditional("3d6 + 2 + 1d4", &mut dice).unwrap();
        assert_eq!(result.components, vec![4, 1, 6, 2, 3]);
        assert_eq!(result.total, 16);
        assert!(!result.looks_like_initiative);
    }

    #[test]
    fn whitespace_and_uppercase() {
        let expr = DiceExpression::parse(" 2D8 +\t3 ").unwrap();
        assert_eq!(
            expr.terms(),
            &[
                Term::Dice {
                    repeat: 2,
                    faces: 8
                },
                Term::Literal(3)
            ]
        );
        assert_eq!(expr.to_string(), "2d8+3");
    }

    #[test]
    fn literal_only_expression() {
        let mut dice = ScriptedDice::default();
        let result = evaluate_traditional("17", &mut dice).unwrap();
        assert_eq!(result.total, 17);
        assert_eq!(result.to_string(), "17");
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn rejects_malformed_expressions() {
        for input in [
            "", "   ", "3d6+", "+2", "3d", "d6", "-1d6", "3d6-2", "abc", "3d6++2", "0d6", "2d0",
            "1001d6", "1d10001", "99999999999",
        ] {
            let err = DiceExpression::parse(input).unwrap_err();
            assert!(
                matches!(err, RollError::InvalidExpression(_)),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_possible_overflow() {
        let input = vec!["1000d10000"; 300].join("+");
        assert!(DiceExpression::parse(&input).is_err());
    }

    #[test]
    fn invalid_expression_rolls_nothing() {
        let mut dice = ScriptedDice::new([3]);
        assert!(evaluate_traditional("2d6+x", &mut dice).is_err());
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn display_shows_breakdown() {
        let mut dice = ScriptedDice::new([3, 5]);
        let result = evaluate_traditional("2d6+2", &mut dice).unwrap();
        assert_eq!(result.to_string(), "3+5+2 = 10");
    }

    proptest! {
        #[test]
        fn total_is_sum_of_components(
            repeat in 1u32..20,
            faces in 1u32..30,
            bonus in 0i32..50,
            seed in any::<u64>(),
        ) {
            let mut dice = RngDieSource::seeded(seed);
            let expression = format!("{repeat}d{faces}+{bonus}");
            let result = evaluate_traditional(&expression, &mut dice).unwrap();
            prop_assert_eq!(result.components.len(), repeat as usize + 1);
            prop_assert_eq!(result.total, result.components.iter().sum::<i32>());
            for face in &result.components[..repeat as usize] {
                prop_assert!((1..=faces as i32).contains(face));
            }
        }
    }
}
