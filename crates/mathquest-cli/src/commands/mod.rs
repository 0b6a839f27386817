pub mod generate;
pub mod history;
pub mod init;
pub mod levels;
pub mod practice;

use std::path::Path;

use anyhow::Result;
use mathquest_core::config::{load_config_from, MathquestConfig};
use mathquest_core::topic::{parse_topic_list, Topic};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Load config from `--config` or the default search path.
pub fn config(path: Option<&Path>) -> Result<MathquestConfig> {
    load_config_from(path)
}

/// Parse a `--topics` value, defaulting to every topic.
pub fn topics(list: Option<&str>) -> Result<Vec<Topic>> {
    match list {
        Some(list) => parse_topic_list(list).map_err(anyhow::Error::msg),
        None => Ok(Topic::ALL.to_vec()),
    }
}

/// Seeded RNG when `--seed` is given, OS entropy otherwise.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
