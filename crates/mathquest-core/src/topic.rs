//! Topics, difficulty levels and the per-topic score map.
//!
//! These are the identifiers every other component keys its data by.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A practice category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    #[serde(alias = "+")]
    Add,
    #[serde(alias = "-")]
    Subtract,
    #[serde(alias = "*")]
    Multiply,
    #[serde(alias = "/")]
    Divide,
    Fraction,
    FactorsPrimes,
    PrimeFactorization,
    Hcf,
    Lcm,
}

impl Topic {
    /// Every topic, in declaration order.
    pub const ALL: [Topic; 9] = [
        Topic::Add,
        Topic::Subtract,
        Topic::Multiply,
        Topic::Divide,
        Topic::Fraction,
        Topic::FactorsPrimes,
        Topic::PrimeFactorization,
        Topic::Hcf,
        Topic::Lcm,
    ];

    /// Canonical snake_case name, as used in stored score maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Add => "add",
            Topic::Subtract => "subtract",
            Topic::Multiply => "multiply",
            Topic::Divide => "divide",
            Topic::Fraction => "fraction",
            Topic::FactorsPrimes => "factors_primes",
            Topic::PrimeFactorization => "prime_factorization",
            Topic::Hcf => "hcf",
            Topic::Lcm => "lcm",
        }
    }

    /// Starting difficulty score for a learner with no stored data.
    ///
    /// Multiplication starts easier than everything else.
    pub fn default_score(self) -> f64 {
        match self {
            Topic::Multiply => 0.8,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "addition" | "+" => Ok(Topic::Add),
            "subtract" | "subtraction" | "-" => Ok(Topic::Subtract),
            "multiply" | "multiplication" | "*" => Ok(Topic::Multiply),
            "divide" | "division" | "/" => Ok(Topic::Divide),
            "fraction" | "fractions" => Ok(Topic::Fraction),
            "factors_primes" | "factors" => Ok(Topic::FactorsPrimes),
            "prime_factorization" | "factorization" => Ok(Topic::PrimeFactorization),
            "hcf" | "gcd" => Ok(Topic::Hcf),
            "lcm" => Ok(Topic::Lcm),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

/// Parse a comma-separated topic list. `all` selects every topic.
pub fn parse_topic_list(s: &str) -> Result<Vec<Topic>, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(Topic::ALL.to_vec());
    }
    let mut topics = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let topic: Topic = part.parse()?;
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    Ok(topics)
}

/// Relative difficulty of a topic for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyLevel::Easy => write!(f, "easy"),
            DifficultyLevel::Medium => write!(f, "medium"),
            DifficultyLevel::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(DifficultyLevel::Easy),
            "medium" | "m" => Ok(DifficultyLevel::Medium),
            "hard" | "h" => Ok(DifficultyLevel::Hard),
            other => Err(format!("unknown difficulty level: {other}")),
        }
    }
}

/// Difficulty score per topic. Higher means harder for this learner.
pub type ScoreMap = BTreeMap<Topic, f64>;

/// A score map holding every topic's default.
pub fn default_scores() -> ScoreMap {
    Topic::ALL.iter().map(|&t| (t, t.default_score())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_display_and_parse() {
        assert_eq!(Topic::FactorsPrimes.to_string(), "factors_primes");
        assert_eq!("+".parse::<Topic>().unwrap(), Topic::Add);
        assert_eq!("Division".parse::<Topic>().unwrap(), Topic::Divide);
        assert_eq!("gcd".parse::<Topic>().unwrap(), Topic::Hcf);
        assert!("calculus".parse::<Topic>().is_err());
    }

    #[test]
    fn topic_serde_accepts_symbol_aliases() {
        let map: BTreeMap<Topic, f64> = serde_json::from_str(r#"{"+": 2.0, "lcm": 1.5}"#).unwrap();
        assert_eq!(map.get(&Topic::Add), Some(&2.0));
        assert_eq!(map.get(&Topic::Lcm), Some(&1.5));

        let json = serde_json::to_string(&Topic::PrimeFactorization).unwrap();
        assert_eq!(json, "\"prime_factorization\"");
    }

    #[test]
    fn topic_list_dedups_and_expands_all() {
        let topics = parse_topic_list("add, +, lcm").unwrap();
        assert_eq!(topics, vec![Topic::Add, Topic::Lcm]);
        assert_eq!(parse_topic_list("all").unwrap().len(), 9);
        assert!(parse_topic_list("add,nope").is_err());
    }

    #[test]
    fn defaults_cover_every_topic() {
        let scores = default_scores();
        assert_eq!(scores.len(), Topic::ALL.len());
        assert!(scores[&Topic::Multiply] < scores[&Topic::Add]);
    }

    #[test]
    fn level_parse() {
        assert_eq!("Hard".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Easy.to_string(), "easy");
        assert!("extreme".parse::<DifficultyLevel>().is_err());
    }
}
