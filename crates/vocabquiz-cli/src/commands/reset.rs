//! The `vocabquiz reset` command.

use std::path::PathBuf;

use anyhow::Result;

pub async fn execute(yes: bool, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(yes, "refusing to delete all statistics without --yes");

    let (config, _) = super::load(config_path)?;
    let engine = super::engine(&config, None).await?;
    engine.reset_all().await?;

    println!("All attempts and statistics cleared.");
    Ok(())
}
