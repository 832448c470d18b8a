//! Init command - write an example vaguereq.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use vaguereq::config::{CONFIG_FILE_NAME, EXAMPLE_CONFIG};

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nEdit {} to match the column names and answers of your batches.",
        style(CONFIG_FILE_NAME).bold()
    );
    Ok(())
}
