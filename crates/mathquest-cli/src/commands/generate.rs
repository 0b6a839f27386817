//! The `mathquest generate` command.

use std::path::PathBuf;

use anyhow::Result;

use mathquest_core::generator::ProblemGenerator;
use mathquest_core::plan::PlanSlot;
use mathquest_core::topic::{DifficultyLevel, Topic};

pub fn execute(
    topic: String,
    level: String,
    count: usize,
    seed: Option<u64>,
    answers: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::config(config_path.as_deref())?;
    let topic: Topic = topic.parse().map_err(anyhow::Error::msg)?;
    let level: DifficultyLevel = level.parse().map_err(anyhow::Error::msg)?;
    let generator = ProblemGenerator::new(config.max_generation_draws);
    let mut rng = super::rng(seed);
    let slot = PlanSlot { topic, level };

    for i in 1..=count {
        let problem = generator.generate(slot, &mut rng)?;
        println!("{i}. {}", problem.render());
        if answers {
            println!("   Answer: {}", problem.answer_text());
            if let Some(explanation) = problem.explanation() {
                println!("   {explanation}");
            }
        }
    }
    Ok(())
}
