//! Checking submitted answers.
//!
//! [`parse_submission`] turns learner text into a [`Submission`] of the shape
//! the problem expects; [`evaluate`] compares it to the canonical answer.
//! Both are pure. A shape mismatch is an error, never a wrong answer.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::numtheory::is_prime;
use crate::problem::{Answer, AnswerKind, Fraction, Operands, Problem};

/// Tolerance for decimal entries when the fraction answer is a whole number.
pub const DECIMAL_TOLERANCE: f64 = 1e-6;

/// A learner's answer, already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Submission {
    Integer(i64),
    QuotientRemainder { quotient: i64, remainder: i64 },
    Fraction { numerator: i64, denominator: i64 },
    Decimal(f64),
    Factors(Vec<u64>),
    Choice(usize),
}

/// Parse raw text into the submission shape `problem` expects.
pub fn parse_submission(problem: &Problem, input: &str) -> Result<Submission, EngineError> {
    let kind = problem.answer_kind();
    let text = input.trim();
    let shape_error = || EngineError::input_shape(kind.hint(), text);
    if text.is_empty() {
        return Err(shape_error());
    }

    match kind {
        AnswerKind::Integer => text
            .parse::<i64>()
            .map(Submission::Integer)
            .map_err(|_| shape_error()),
        AnswerKind::QuotientRemainder => {
            let normalized = text
                .to_lowercase()
                .replace("remainder", " ")
                .replace(['r', ','], " ");
            let parts: Vec<&str> = normalized.split_whitespace().collect();
            match parts.as_slice() {
                [q, r] => match (q.parse::<i64>(), r.parse::<i64>()) {
                    (Ok(quotient), Ok(remainder)) => Ok(Submission::QuotientRemainder {
                        quotient,
                        remainder,
                    }),
                    _ => Err(shape_error()),
                },
                _ => Err(shape_error()),
            }
        }
        AnswerKind::Fraction => {
            if let Some((num, den)) = text.split_once('/') {
                let numerator = num.trim().parse::<i64>().map_err(|_| shape_error())?;
                let denominator = den.trim().parse::<i64>().map_err(|_| shape_error())?;
                if denominator == 0 {
                    return Err(shape_error());
                }
                Ok(Submission::Fraction {
                    numerator,
                    denominator,
                })
            } else if let Ok(whole) = text.parse::<i64>() {
                Ok(Submission::Integer(whole))
            } else {
                text.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Submission::Decimal)
                    .ok_or_else(shape_error)
            }
        }
        AnswerKind::Factors => {
            let normalized = text.replace([',', 'x', 'X', '×', '*'], " ");
            let factors = normalized
                .split_whitespace()
                .map(|p| p.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| shape_error())?;
            if factors.is_empty() {
                return Err(shape_error());
            }
            Ok(Submission::Factors(factors))
        }
        AnswerKind::Choice => {
            let options = match problem.operands() {
                Operands::Diagram { options, .. } => options.len(),
                _ => 0,
            };
            let index = match text.chars().collect::<Vec<_>>().as_slice() {
                [c] if c.is_ascii_alphabetic() => {
                    Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
                }
                _ => text.parse::<usize>().ok().and_then(|n| n.checked_sub(1)),
            };
            match index {
                Some(i) if i < options => Ok(Submission::Choice(i)),
                _ => Err(shape_error()),
            }
        }
    }
}

/// Whether `submission` is a correct answer to `problem`.
pub fn evaluate(problem: &Problem, submission: &Submission) -> Result<bool, EngineError> {
    let mismatch = || EngineError::input_shape(problem.answer_kind().hint(), describe(submission));

    let correct = match (problem.answer(), submission) {
        (Answer::Integer(expected), Submission::Integer(given)) => expected == given,

        (
            Answer::QuotientRemainder {
                quotient,
                remainder,
            },
            Submission::QuotientRemainder {
                quotient: q,
                remainder: r,
            },
        ) => quotient == q && remainder == r,

        (
            Answer::Fraction(expected),
            Submission::Fraction {
                numerator,
                denominator,
            },
        ) => {
            if *denominator == 0 {
                return Err(mismatch());
            }
            fractions_equal(expected, *numerator, *denominator)
        }
        (Answer::Fraction(expected), Submission::Integer(whole)) => {
            fractions_equal(expected, *whole, 1)
        }
        // Proper fractions must be written as a/b.
        (Answer::Fraction(expected), Submission::Decimal(value)) => {
            expected.is_whole() && (expected.value() - value).abs() < DECIMAL_TOLERANCE
        }

        (Answer::Factors(expected), Submission::Factors(given)) => {
            factor_multisets_equal(expected, given)
        }

        (Answer::Choice(expected), Submission::Choice(given)) => expected == given,

        _ => return Err(mismatch()),
    };

    tracing::debug!(
        topic = %problem.topic(),
        correct,
        "evaluated submission"
    );
    Ok(correct)
}

/// Parse and evaluate in one step.
pub fn check_text(problem: &Problem, input: &str) -> Result<bool, EngineError> {
    let submission = parse_submission(problem, input)?;
    evaluate(problem, &submission)
}

/// Cross-multiplication, so unreduced but equal fractions match.
fn fractions_equal(expected: &Fraction, numerator: i64, denominator: i64) -> bool {
    (expected.numerator as i128) * (denominator as i128)
        == (numerator as i128) * (expected.denominator as i128)
}

/// Order-independent and multiplicity-sensitive; every value must be prime.
///
/// Primality is only checked once the multisets match, so it only ever runs
/// on the canonical factors.
fn factor_multisets_equal(expected: &[u64], given: &[u64]) -> bool {
    let mut a = expected.to_vec();
    let mut b = given.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b && b.iter().all(|&f| is_prime(f))
}

fn describe(submission: &Submission) -> String {
    match submission {
        Submission::Integer(v) => v.to_string(),
        Submission::QuotientRemainder {
            quotient,
            remainder,
        } => format!("{quotient} r {remainder}"),
        Submission::Fraction {
            numerator,
            denominator,
        } => format!("{numerator}/{denominator}"),
        Submission::Decimal(v) => v.to_string(),
        Submission::Factors(f) => f
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        Submission::Choice(i) => crate::problem::choice_letter(*i).to_string(),
    }
}

/// The canonical answer expressed as a submission. Always evaluates correct.
pub fn canonical_submission(problem: &Problem) -> Submission {
    match problem.answer() {
        Answer::Integer(v) => Submission::Integer(*v),
        Answer::QuotientRemainder {
            quotient,
            remainder,
        } => Submission::QuotientRemainder {
            quotient: *quotient,
            remainder: *remainder,
        },
        Answer::Fraction(f) => Submission::Fraction {
            numerator: f.numerator,
            denominator: f.denominator,
        },
        Answer::Factors(f) => Submission::Factors(f.clone()),
        Answer::Choice(i) => Submission::Choice(*i),
    }
}
