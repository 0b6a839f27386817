//! Problem values.
//!
//! A `Problem` is built from its operands by one of the constructors below,
//! which compute the canonical answer. Nothing about it changes afterwards;
//! attempts and submitted answers live in the session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numtheory::{gcd, gcd_all, lcm_all, prime_factors};
use crate::topic::{DifficultyLevel, Topic};

/// A fraction with a positive denominator. Not reduced unless built with
/// [`Fraction::reduced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Lowest-terms form of `numerator / denominator`.
    pub fn reduced(numerator: i64, denominator: i64) -> Self {
        let sign = if (numerator < 0) != (denominator < 0) { -1 } else { 1 };
        let (n, d) = (numerator.unsigned_abs(), denominator.unsigned_abs());
        let g = gcd(n, d).max(1);
        Self {
            numerator: sign * (n / g) as i64,
            denominator: (d / g) as i64,
        }
    }

    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_whole(&self) -> bool {
        self.denominator == 1
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Which kind of fraction exercise a problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionMode {
    LikeSum,
    UnlikeSum,
    Simplify,
    MultipleChoice,
}

impl FractionMode {
    pub const ALL: [FractionMode; 4] = [
        FractionMode::LikeSum,
        FractionMode::UnlikeSum,
        FractionMode::Simplify,
        FractionMode::MultipleChoice,
    ];
}

/// How an LCM solution is explained after the question closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LcmMethod {
    ListingMultiples,
    PrimeFactorization,
    DivisionMethod,
}

impl LcmMethod {
    pub const ALL: [LcmMethod; 3] = [
        LcmMethod::ListingMultiples,
        LcmMethod::PrimeFactorization,
        LcmMethod::DivisionMethod,
    ];
}

impl fmt::Display for LcmMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcmMethod::ListingMultiples => write!(f, "listing multiples"),
            LcmMethod::PrimeFactorization => write!(f, "prime factorization"),
            LcmMethod::DivisionMethod => write!(f, "division method"),
        }
    }
}

/// The operands a problem was built from. Shape depends on the topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Operands {
    Pair { x: i64, y: i64 },
    FractionSum { left: Fraction, right: Fraction },
    Simplify { fraction: Fraction, factor: i64 },
    Diagram { shaded: i64, parts: i64, options: Vec<Fraction> },
    Single { n: u64 },
    Set { values: Vec<u64> },
}

/// Extra data kept for feedback rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detail {
    Divisors {
        divisors: Vec<u64>,
        is_prime: bool,
        twin_primes: Vec<u64>,
    },
    Lcm { method: LcmMethod },
}

/// The canonical answer of a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Integer(i64),
    QuotientRemainder { quotient: i64, remainder: i64 },
    Fraction(Fraction),
    Factors(Vec<u64>),
    Choice(usize),
}

impl Answer {
    pub fn kind(&self) -> AnswerKind {
        match self {
            Answer::Integer(_) => AnswerKind::Integer,
            Answer::QuotientRemainder { .. } => AnswerKind::QuotientRemainder,
            Answer::Fraction(_) => AnswerKind::Fraction,
            Answer::Factors(_) => AnswerKind::Factors,
            Answer::Choice(_) => AnswerKind::Choice,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Integer(v) => write!(f, "{v}"),
            Answer::QuotientRemainder {
                quotient,
                remainder,
            } => write!(f, "{quotient} remainder {remainder}"),
            Answer::Fraction(frac) if frac.is_whole() => write!(f, "{}", frac.numerator),
            Answer::Fraction(frac) => write!(f, "{frac}"),
            Answer::Factors(factors) => write!(f, "{}", join(factors, " × ")),
            Answer::Choice(index) => write!(f, "{}", choice_letter(*index)),
        }
    }
}

/// The shape of answer a problem expects from the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Integer,
    QuotientRemainder,
    Fraction,
    Factors,
    Choice,
}

impl AnswerKind {
    /// Short instruction shown next to the prompt.
    pub fn hint(self) -> &'static str {
        match self {
            AnswerKind::Integer => "a whole number",
            AnswerKind::QuotientRemainder => "the quotient and remainder, like 12 r 3",
            AnswerKind::Fraction => "a fraction like 3/4 (or a whole number)",
            AnswerKind::Factors => "prime factors separated by spaces, like 2 2 3",
            AnswerKind::Choice => "the letter of your choice, A to D",
        }
    }
}

/// One generated practice problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    topic: Topic,
    level: DifficultyLevel,
    question: String,
    operands: Operands,
    answer: Answer,
    #[serde(default)]
    detail: Option<Detail>,
}

impl Problem {
    fn build(
        topic: Topic,
        level: DifficultyLevel,
        question: String,
        operands: Operands,
        answer: Answer,
        detail: Option<Detail>,
    ) -> Self {
        Self {
            topic,
            level,
            question,
            operands,
            answer,
            detail,
        }
    }

    pub fn add(level: DifficultyLevel, x: i64, y: i64) -> Self {
        Self::build(
            Topic::Add,
            level,
            format!("What is {x} + {y}?"),
            Operands::Pair { x, y },
            Answer::Integer(x + y),
            None,
        )
    }

    pub fn subtract(level: DifficultyLevel, x: i64, y: i64) -> Self {
        Self::build(
            Topic::Subtract,
            level,
            format!("What is {x} - {y}?"),
            Operands::Pair { x, y },
            Answer::Integer(x - y),
            None,
        )
    }

    pub fn multiply(level: DifficultyLevel, x: i64, y: i64) -> Self {
        Self::build(
            Topic::Multiply,
            level,
            format!("What is {x} × {y}?"),
            Operands::Pair { x, y },
            Answer::Integer(x * y),
            None,
        )
    }

    /// `y` must be non-zero.
    pub fn divide(level: DifficultyLevel, x: i64, y: i64) -> Self {
        Self::build(
            Topic::Divide,
            level,
            format!("What is {x} ÷ {y}? Give the quotient and the remainder."),
            Operands::Pair { x, y },
            Answer::QuotientRemainder {
                quotient: x.div_euclid(y),
                remainder: x.rem_euclid(y),
            },
            None,
        )
    }

    /// Sum of two fractions, reduced.
    pub fn fraction_sum(level: DifficultyLevel, left: Fraction, right: Fraction) -> Self {
        let answer = if left.denominator == right.denominator {
            Fraction::reduced(left.numerator + right.numerator, left.denominator)
        } else {
            Fraction::reduced(
                left.numerator * right.denominator + right.numerator * left.denominator,
                left.denominator * right.denominator,
            )
        };
        Self::build(
            Topic::Fraction,
            level,
            format!("What is {left} + {right}? Write the answer in lowest terms."),
            Operands::FractionSum { left, right },
            Answer::Fraction(answer),
            None,
        )
    }

    /// Simplification of `base` scaled up by `factor`.
    pub fn fraction_simplify(level: DifficultyLevel, base: Fraction, factor: i64) -> Self {
        let shown = Fraction::new(base.numerator * factor, base.denominator * factor);
        Self::build(
            Topic::Fraction,
            level,
            format!("Simplify {shown} to its lowest terms."),
            Operands::Simplify {
                fraction: shown,
                factor,
            },
            Answer::Fraction(Fraction::reduced(shown.numerator, shown.denominator)),
            None,
        )
    }

    /// "Which fraction is shaded?" with four options over the same
    /// denominator. The correct option is the one whose numerator is `shaded`.
    pub fn fraction_choice(
        level: DifficultyLevel,
        shaded: i64,
        parts: i64,
        options: Vec<Fraction>,
    ) -> Self {
        let index = options
            .iter()
            .position(|o| o.numerator == shaded && o.denominator == parts)
            .unwrap_or(0);
        Self::build(
            Topic::Fraction,
            level,
            format!("The bar is split into {parts} equal parts. What fraction is shaded?"),
            Operands::Diagram {
                shaded,
                parts,
                options,
            },
            Answer::Choice(index),
            None,
        )
    }

    pub fn factors(level: DifficultyLevel, n: u64) -> Self {
        let divisors = crate::numtheory::divisors(n);
        let count = divisors.len() as i64;
        Self::build(
            Topic::FactorsPrimes,
            level,
            format!("How many factors does {n} have?"),
            Operands::Single { n },
            Answer::Integer(count),
            Some(Detail::Divisors {
                is_prime: divisors.len() == 2,
                twin_primes: crate::numtheory::twin_primes(n),
                divisors,
            }),
        )
    }

    pub fn prime_factorization(level: DifficultyLevel, n: u64) -> Self {
        Self::build(
            Topic::PrimeFactorization,
            level,
            format!("Write {n} as a product of prime factors."),
            Operands::Single { n },
            Answer::Factors(prime_factors(n)),
            None,
        )
    }

    pub fn hcf(level: DifficultyLevel, values: &[u64]) -> Self {
        Self::build(
            Topic::Hcf,
            level,
            format!(
                "What is the highest common factor of {}?",
                join_spoken(values)
            ),
            Operands::Set {
                values: values.to_vec(),
            },
            Answer::Integer(gcd_all(values) as i64),
            None,
        )
    }

    pub fn lcm(level: DifficultyLevel, values: &[u64], method: LcmMethod) -> Self {
        Self::build(
            Topic::Lcm,
            level,
            format!(
                "What is the lowest common multiple of {}?",
                join_spoken(values)
            ),
            Operands::Set {
                values: values.to_vec(),
            },
            Answer::Integer(lcm_all(values) as i64),
            Some(Detail::Lcm { method }),
        )
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn level(&self) -> DifficultyLevel {
        self.level
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn answer_kind(&self) -> AnswerKind {
        self.answer.kind()
    }

    /// Sub-mode of a fraction problem; `None` for other topics.
    pub fn fraction_mode(&self) -> Option<FractionMode> {
        match &self.operands {
            Operands::FractionSum { left, right } if left.denominator == right.denominator => {
                Some(FractionMode::LikeSum)
            }
            Operands::FractionSum { .. } => Some(FractionMode::UnlikeSum),
            Operands::Simplify { .. } => Some(FractionMode::Simplify),
            Operands::Diagram { .. } => Some(FractionMode::MultipleChoice),
            _ => None,
        }
    }

    /// Full text shown to the learner: question, diagram and options.
    pub fn render(&self) -> String {
        match &self.operands {
            Operands::Diagram {
                shaded,
                parts,
                options,
            } => {
                let mut out = format!("{}\n  {}\n", self.question, shaded_bar(*shaded, *parts));
                let line = options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| format!("{}) {o}", choice_letter(i)))
                    .collect::<Vec<_>>()
                    .join("   ");
                out.push_str("  ");
                out.push_str(&line);
                out
            }
            _ => self.question.clone(),
        }
    }

    /// The canonical answer written out for feedback.
    pub fn answer_text(&self) -> String {
        match (&self.answer, &self.operands) {
            (Answer::Choice(index), Operands::Diagram { options, .. }) => match options.get(*index)
            {
                Some(option) => format!("{} ({option})", choice_letter(*index)),
                None => self.answer.to_string(),
            },
            _ => self.answer.to_string(),
        }
    }

    /// Worked explanation shown once the question closes, where one exists.
    pub fn explanation(&self) -> Option<String> {
        match (&self.detail, &self.operands) {
            (Some(Detail::Lcm { method }), Operands::Set { values }) => {
                Some(lcm_explanation(values, *method))
            }
            (
                Some(Detail::Divisors {
                    divisors,
                    is_prime,
                    twin_primes,
                }),
                Operands::Single { n },
            ) => {
                let mut text = format!("The factors of {n} are {}.", join(divisors, ", "));
                if *is_prime {
                    text.push_str(&format!(" {n} is prime."));
                    if !twin_primes.is_empty() {
                        text.push_str(&format!(
                            " Its twin prime partner: {}.",
                            join(twin_primes, " and ")
                        ));
                    }
                } else if *n > 1 {
                    text.push_str(&format!(" {n} is not prime."));
                }
                Some(text)
            }
            _ => None,
        }
    }
}

/// Prose walkthrough of an LCM using the given method.
pub fn lcm_explanation(values: &[u64], method: LcmMethod) -> String {
    let result = lcm_all(values);
    match method {
        LcmMethod::ListingMultiples => {
            let mut lines = Vec::new();
            for &v in values {
                if v == 0 {
                    continue;
                }
                let count = result / v;
                let shown: Vec<String> = (1..=count.min(12)).map(|k| (k * v).to_string()).collect();
                let tail = if count > 12 {
                    format!(", ..., {result}")
                } else {
                    String::new()
                };
                lines.push(format!("Multiples of {v}: {}{tail}", shown.join(", ")));
            }
            lines.push(format!("The first multiple they share is {result}."));
            lines.join("\n")
        }
        LcmMethod::PrimeFactorization => {
            let mut lines = Vec::new();
            let mut highest: Vec<(u64, u32)> = Vec::new();
            for &v in values {
                let factors = prime_factors(v);
                let shown = if factors.is_empty() {
                    v.to_string()
                } else {
                    join(&factors, " × ")
                };
                lines.push(format!("{v} = {shown}"));
                let mut i = 0;
                while i < factors.len() {
                    let p = factors[i];
                    let power = factors[i..].iter().take_while(|&&f| f == p).count() as u32;
                    match highest.iter_mut().find(|(q, _)| *q == p) {
                        Some(entry) => entry.1 = entry.1.max(power),
                        None => highest.push((p, power)),
                    }
                    i += power as usize;
                }
            }
            highest.sort_unstable();
            let terms: Vec<String> = highest
                .iter()
                .map(|&(p, k)| if k == 1 { p.to_string() } else { format!("{p}^{k}") })
                .collect();
            lines.push(format!(
                "Take every prime at its highest power: {} = {result}",
                terms.join(" × ")
            ));
            lines.join("\n")
        }
        LcmMethod::DivisionMethod => {
            let mut lines = Vec::new();
            let mut row = values.to_vec();
            let mut used = Vec::new();
            while row.iter().any(|&v| v > 1) {
                let Some(p) = row
                    .iter()
                    .filter(|&&v| v > 1)
                    .filter_map(|&v| prime_factors(v).first().copied())
                    .min()
                else {
                    break;
                };
                lines.push(format!("{p:>3} | {}", join(&row, ", ")));
                for v in row.iter_mut() {
                    if *v % p == 0 {
                        *v /= p;
                    }
                }
                used.push(p);
            }
            lines.push(format!("    | {}", join(&row, ", ")));
            lines.push(format!(
                "Multiply the divisors: {} = {result}",
                join(&used, " × ")
            ));
            lines.join("\n")
        }
    }
}

/// `A`, `B`, `C`, ... for option indices.
pub fn choice_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

fn shaded_bar(shaded: i64, parts: i64) -> String {
    let filled = shaded.clamp(0, parts) as usize;
    let empty = (parts as usize).saturating_sub(filled);
    format!("[{}{}]", "■".repeat(filled), "□".repeat(empty))
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// "12, 18 and 30"
fn join_spoken(values: &[u64]) -> String {
    match values {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {last}", join(init, ", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: DifficultyLevel = DifficultyLevel::Medium;

    #[test]
    fn hcf_of_twelve_and_eighteen() {
        let p = Problem::hcf(M, &[12, 18]);
        assert_eq!(p.answer(), &Answer::Integer(6));
        assert_eq!(
            p.question(),
            "What is the highest common factor of 12 and 18?"
        );
    }

    #[test]
    fn lcm_of_four_and_six() {
        let p = Problem::lcm(M, &[4, 6], LcmMethod::ListingMultiples);
        assert_eq!(p.answer(), &Answer::Integer(12));
        assert_eq!(
            p.detail(),
            Some(&Detail::Lcm {
                method: LcmMethod::ListingMultiples
            })
        );
    }

    #[test]
    fn divide_answer_has_remainder() {
        let p = Problem::divide(M, 1234, 7);
        assert_eq!(
            p.answer(),
            &Answer::QuotientRemainder {
                quotient: 176,
                remainder: 2
            }
        );
        assert_eq!(p.answer_text(), "176 remainder 2");
    }

    #[test]
    fn fraction_sums_reduce() {
        let like = Problem::fraction_sum(M, Fraction::new(1, 4), Fraction::new(1, 4));
        assert_eq!(like.answer(), &Answer::Fraction(Fraction::new(1, 2)));
        assert_eq!(like.fraction_mode(), Some(FractionMode::LikeSum));

        let unlike = Problem::fraction_sum(M, Fraction::new(1, 6), Fraction::new(1, 3));
        assert_eq!(unlike.answer(), &Answer::Fraction(Fraction::new(1, 2)));
        assert_eq!(unlike.fraction_mode(), Some(FractionMode::UnlikeSum));
    }

    #[test]
    fn simplify_scales_then_reduces() {
        let p = Problem::fraction_simplify(M, Fraction::new(2, 3), 4);
        assert_eq!(p.question(), "Simplify 8/12 to its lowest terms.");
        assert_eq!(p.answer(), &Answer::Fraction(Fraction::new(2, 3)));

        let whole = Problem::fraction_simplify(M, Fraction::new(3, 1), 2);
        assert_eq!(whole.answer_text(), "3");
    }

    #[test]
    fn choice_finds_correct_index() {
        let options = vec![
            Fraction::new(1, 6),
            Fraction::new(4, 6),
            Fraction::new(2, 6),
            Fraction::new(5, 6),
        ];
        let p = Problem::fraction_choice(M, 2, 6, options);
        assert_eq!(p.answer(), &Answer::Choice(2));
        assert_eq!(p.answer_text(), "C (2/6)");
        assert!(p.render().contains("[■■□□□□]"));
        assert!(p.render().contains("D) 5/6"));
    }

    #[test]
    fn factors_detail() {
        let p = Problem::factors(M, 5);
        assert_eq!(p.answer(), &Answer::Integer(2));
        match p.detail() {
            Some(Detail::Divisors {
                is_prime,
                twin_primes,
                ..
            }) => {
                assert!(*is_prime);
                assert_eq!(twin_primes, &vec![3, 7]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        assert!(p.explanation().unwrap().contains("twin prime"));
    }

    #[test]
    fn lcm_explanations_end_with_result() {
        for method in LcmMethod::ALL {
            let text = lcm_explanation(&[4, 6], method);
            assert!(text.trim_end_matches('.').ends_with("12"), "{method}: {text}");
        }
        let ladder = lcm_explanation(&[4, 6], LcmMethod::DivisionMethod);
        assert!(ladder.contains("2 | 4, 6"));
        assert!(ladder.contains("Multiply the divisors: 2 × 2 × 3 = 12"));
    }

    #[test]
    fn prime_factorization_answer_sorted() {
        let p = Problem::prime_factorization(M, 360);
        assert_eq!(p.answer(), &Answer::Factors(vec![2, 2, 2, 3, 3, 5]));
        assert_eq!(p.answer_text(), "2 × 2 × 2 × 3 × 3 × 5");
    }

    #[test]
    fn problem_serde_roundtrip() {
        let p = Problem::lcm(M, &[3, 5, 7], LcmMethod::DivisionMethod);
        let json = serde_json::to_string(&p).unwrap();
        let back: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
