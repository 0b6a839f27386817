//! Randomized problem generation.
//!
//! Each topic maps the slot's level to a numeric tier, then draws operands
//! until the topic's constraint holds. Every draw loop is capped; running out
//! of draws is reported as [`EngineError::GenerationExhausted`].

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::EngineError;
use crate::numtheory::{distinct_prime_count, gcd, gcd_all};
use crate::plan::PlanSlot;
use crate::problem::{Fraction, FractionMode, LcmMethod, Problem};
use crate::topic::{DifficultyLevel, Topic};

/// Default cap on draws per problem.
pub const DEFAULT_MAX_DRAWS: u32 = 5000;

/// Produces one validated problem per plan slot.
#[derive(Debug, Clone)]
pub struct ProblemGenerator {
    max_draws: u32,
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DRAWS)
    }
}

impl ProblemGenerator {
    pub fn new(max_draws: u32) -> Self {
        Self {
            max_draws: max_draws.max(1),
        }
    }

    pub fn max_draws(&self) -> u32 {
        self.max_draws
    }

    /// Generate a problem for `slot`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        slot: PlanSlot,
        rng: &mut R,
    ) -> Result<Problem, EngineError> {
        let PlanSlot { topic, level } = slot;
        let problem = match topic {
            Topic::Add => {
                let range = arithmetic_range(level);
                self.sample(slot, rng, |rng| {
                    let x = rng.gen_range(range.clone());
                    let y = rng.gen_range(range.clone());
                    Some(Problem::add(level, x, y))
                })
            }
            Topic::Subtract => {
                let range = arithmetic_range(level);
                self.sample(slot, rng, |rng| {
                    let x = rng.gen_range(range.clone());
                    let y = rng.gen_range(range.clone());
                    (x > y).then(|| Problem::subtract(level, x, y))
                })
            }
            Topic::Multiply => {
                let (xs, ys) = multiply_ranges(level);
                self.sample(slot, rng, |rng| {
                    let x = rng.gen_range(xs.clone());
                    let y = rng.gen_range(ys.clone());
                    Some(Problem::multiply(level, x, y))
                })
            }
            Topic::Divide => {
                let (xs, ys) = divide_ranges(level);
                self.sample(slot, rng, |rng| {
                    let x = rng.gen_range(xs.clone());
                    let y = rng.gen_range(ys.clone());
                    (y >= 2 && x % y != 0).then(|| Problem::divide(level, x, y))
                })
            }
            Topic::Fraction => {
                let mode = *FractionMode::ALL
                    .choose(rng)
                    .unwrap_or(&FractionMode::LikeSum);
                self.generate_fraction(level, mode, rng)
            }
            Topic::FactorsPrimes => {
                let range = factors_range(level);
                self.sample(slot, rng, |rng| {
                    Some(Problem::factors(level, rng.gen_range(range.clone())))
                })
            }
            Topic::PrimeFactorization => {
                let (range, min_distinct) = factorization_tier(level);
                self.sample(slot, rng, |rng| {
                    let n = rng.gen_range(range.clone());
                    (distinct_prime_count(n) >= min_distinct)
                        .then(|| Problem::prime_factorization(level, n))
                })
            }
            Topic::Hcf => {
                let (counts, range) = hcf_tier(level);
                self.sample(slot, rng, |rng| {
                    let values = draw_set(rng, counts.clone(), range.clone());
                    (gcd_all(&values) > 1 && !all_equal(&values))
                        .then(|| Problem::hcf(level, &values))
                })
            }
            Topic::Lcm => {
                let (counts, range) = lcm_tier(level);
                self.sample(slot, rng, |rng| {
                    let values = draw_set(rng, counts.clone(), range.clone());
                    if all_equal(&values) {
                        return None;
                    }
                    let method = *LcmMethod::ALL
                        .choose(rng)
                        .unwrap_or(&LcmMethod::ListingMultiples);
                    Some(Problem::lcm(level, &values, method))
                })
            }
        }?;

        tracing::debug!(
            topic = %topic,
            level = %level,
            question = problem.question(),
            "generated problem"
        );
        Ok(problem)
    }

    /// Generate a fraction problem of a specific sub-mode.
    pub fn generate_fraction<R: Rng + ?Sized>(
        &self,
        level: DifficultyLevel,
        mode: FractionMode,
        rng: &mut R,
    ) -> Result<Problem, EngineError> {
        let slot = PlanSlot {
            topic: Topic::Fraction,
            level,
        };
        let dens = fraction_denominators(level);
        match mode {
            FractionMode::LikeSum => self.sample(slot, rng, |rng| {
                let d = rng.gen_range(dens.clone());
                let a = rng.gen_range(1..d);
                let c = rng.gen_range(1..d);
                Some(Problem::fraction_sum(
                    level,
                    Fraction::new(a, d),
                    Fraction::new(c, d),
                ))
            }),
            FractionMode::UnlikeSum => self.sample(slot, rng, |rng| {
                let b = rng.gen_range(dens.clone());
                let d = rng.gen_range(dens.clone());
                if b == d {
                    return None;
                }
                let a = rng.gen_range(1..b);
                let c = rng.gen_range(1..d);
                Some(Problem::fraction_sum(
                    level,
                    Fraction::new(a, b),
                    Fraction::new(c, d),
                ))
            }),
            FractionMode::Simplify => {
                let max_den = *dens.end();
                let factors = simplify_factors(level);
                self.sample(slot, rng, |rng| {
                    let q = rng.gen_range(1..=max_den);
                    let p = if q == 1 {
                        rng.gen_range(2..=9)
                    } else {
                        rng.gen_range(1..q)
                    };
                    if gcd(p as u64, q as u64) != 1 {
                        return None;
                    }
                    let k = rng.gen_range(factors.clone());
                    Some(Problem::fraction_simplify(level, Fraction::new(p, q), k))
                })
            }
            FractionMode::MultipleChoice => {
                let parts_range = choice_parts(level);
                self.sample(slot, rng, |rng| {
                    let parts = rng.gen_range(parts_range.clone());
                    let shaded = rng.gen_range(1..parts);
                    let pool: Vec<i64> = (1..parts).filter(|&n| n != shaded).collect();
                    let decoys: Vec<i64> = pool.choose_multiple(rng, 3).copied().collect();
                    if decoys.len() < 3 {
                        return None;
                    }
                    let mut options: Vec<Fraction> = decoys
                        .into_iter()
                        .chain(std::iter::once(shaded))
                        .map(|n| Fraction::new(n, parts))
                        .collect();
                    options.shuffle(rng);
                    Some(Problem::fraction_choice(level, shaded, parts, options))
                })
            }
        }
    }

    fn sample<T, R, F>(&self, slot: PlanSlot, rng: &mut R, mut draw: F) -> Result<T, EngineError>
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Option<T>,
    {
        for _ in 0..self.max_draws {
            if let Some(value) = draw(rng) {
                return Ok(value);
            }
        }
        tracing::error!(
            topic = %slot.topic,
            level = %slot.level,
            draws = self.max_draws,
            "problem generation exhausted"
        );
        Err(EngineError::GenerationExhausted {
            topic: slot.topic,
            level: slot.level,
            draws: self.max_draws,
        })
    }
}

fn arithmetic_range(level: DifficultyLevel) -> RangeInclusive<i64> {
    match level {
        DifficultyLevel::Easy => 10..=99,
        DifficultyLevel::Medium => 100..=999,
        DifficultyLevel::Hard => 1000..=9999,
    }
}

fn multiply_ranges(level: DifficultyLevel) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
    match level {
        DifficultyLevel::Easy => (10..=99, 2..=9),
        DifficultyLevel::Medium => (100..=999, 2..=9),
        DifficultyLevel::Hard => (1000..=9999, 10..=99),
    }
}

fn divide_ranges(level: DifficultyLevel) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
    match level {
        DifficultyLevel::Easy => (10..=99, 2..=9),
        DifficultyLevel::Medium => (100..=999, 2..=9),
        DifficultyLevel::Hard => (1000..=9999, 2..=12),
    }
}

fn fraction_denominators(level: DifficultyLevel) -> RangeInclusive<i64> {
    match level {
        DifficultyLevel::Easy => 2..=6,
        DifficultyLevel::Medium => 2..=10,
        DifficultyLevel::Hard => 2..=20,
    }
}

fn simplify_factors(level: DifficultyLevel) -> RangeInclusive<i64> {
    match level {
        DifficultyLevel::Easy => 2..=3,
        DifficultyLevel::Medium => 2..=5,
        DifficultyLevel::Hard => 2..=9,
    }
}

// At least five parts so four distinct proper numerators exist.
fn choice_parts(level: DifficultyLevel) -> RangeInclusive<i64> {
    match level {
        DifficultyLevel::Easy => 5..=8,
        DifficultyLevel::Medium => 5..=12,
        DifficultyLevel::Hard => 8..=20,
    }
}

fn factors_range(level: DifficultyLevel) -> RangeInclusive<u64> {
    match level {
        DifficultyLevel::Easy => 2..=50,
        DifficultyLevel::Medium => 20..=200,
        DifficultyLevel::Hard => 100..=1000,
    }
}

fn factorization_tier(level: DifficultyLevel) -> (RangeInclusive<u64>, usize) {
    match level {
        DifficultyLevel::Easy => (12..=100, 2),
        DifficultyLevel::Medium => (100..=1000, 2),
        DifficultyLevel::Hard => (1000..=10000, 3),
    }
}

fn hcf_tier(level: DifficultyLevel) -> (RangeInclusive<usize>, RangeInclusive<u64>) {
    match level {
        DifficultyLevel::Easy => (2..=2, 4..=40),
        DifficultyLevel::Medium => (2..=3, 10..=120),
        DifficultyLevel::Hard => (3..=3, 20..=300),
    }
}

fn lcm_tier(level: DifficultyLevel) -> (RangeInclusive<usize>, RangeInclusive<u64>) {
    match level {
        DifficultyLevel::Easy => (2..=2, 2..=12),
        DifficultyLevel::Medium => (2..=3, 2..=20),
        DifficultyLevel::Hard => (3..=3, 5..=40),
    }
}

fn draw_set<R: Rng + ?Sized>(
    rng: &mut R,
    counts: RangeInclusive<usize>,
    range: RangeInclusive<u64>,
) -> Vec<u64> {
    let count = rng.gen_range(counts);
    (0..count).map(|_| rng.gen_range(range.clone())).collect()
}

fn all_equal(values: &[u64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
