//! The `mathquest levels` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathquest_core::engine::Engine;

pub fn execute(topics: Option<String>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::config(config_path.as_deref())?;
    let topics = super::topics(topics.as_deref())?;
    let engine = Engine::open(config);
    let standings = engine.standings(&topics);

    match format.as_str() {
        "json" => {
            let list: Vec<_> = standings.values().collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        _ => {
            let mut table = Table::new();
            table.set_header(vec!["Topic", "Score", "Mean", "Std Dev", "Sessions", "Level"]);
            for standing in standings.values() {
                table.add_row(vec![
                    Cell::new(standing.topic),
                    Cell::new(format!("{:.3}", standing.score)),
                    Cell::new(format!("{:.3}", standing.threshold.mean)),
                    Cell::new(format!("{:.3}", standing.threshold.std_dev)),
                    Cell::new(standing.threshold.samples),
                    Cell::new(standing.level),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
