//! Write the default configuration file.

use anyhow::{Context, Result};
use std::path::Path;
use stochastic_config::default_config_toml;
use tracing::info;

use crate::cli::InitConfigArgs;

pub async fn run(args: InitConfigArgs, config_path: &Path) -> Result<()> {
    let path = args.path.as_deref().unwrap_or(config_path);

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let text = default_config_toml()?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Default configuration written to {:?}", path);
    println!("Wrote {}", path.display());
    Ok(())
}
