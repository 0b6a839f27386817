//! The `mathquest init` command.

use std::path::Path;

use anyhow::{Context, Result};

use mathquest_core::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    let path = Path::new("mathquest.toml");
    if path.exists() {
        println!("mathquest.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG).context("failed to write mathquest.toml")?;
        println!("Created mathquest.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust mathquest.toml if you like");
    println!("  2. Run: mathquest levels");
    println!("  3. Run: mathquest practice --topics add,fraction --questions 10");

    Ok(())
}
