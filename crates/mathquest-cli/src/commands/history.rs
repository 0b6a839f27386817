//! The `mathquest history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathquest_core::engine::Engine;
use mathquest_core::topic::Topic;

pub fn execute(limit: Option<usize>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::config(config_path.as_deref())?;
    let engine = Engine::open(config);
    let history = engine.history();
    let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
    let entries = &history[skip..];

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No sessions recorded yet. Run `mathquest practice` to start one.");
        return Ok(());
    }

    let mut table = Table::new();
    let mut header = vec!["#".to_string(), "Recorded".to_string(), "Questions".to_string()];
    header.extend(Topic::ALL.iter().map(|t| t.to_string()));
    table.set_header(header);

    for (i, entry) in entries.iter().enumerate() {
        let mut row = vec![
            Cell::new(skip + i + 1),
            Cell::new(entry.recorded_at.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.question_count),
        ];
        row.extend(Topic::ALL.iter().map(|t| match entry.scores.get(t) {
            Some(score) => Cell::new(format!("{score:.2}")),
            None => Cell::new("-"),
        }));
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}
