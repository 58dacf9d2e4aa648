//! Show or create the configuration file.

use anyhow::Context;

use airpoint_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, print_default: bool, init: bool, force: bool) -> anyhow::Result<()> {
    if print_default {
        println!("{}", serde_json::to_string_pretty(&AppConfig::default())?);
        return Ok(());
    }

    if init {
        let path = config_file_path();
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists; pass --force to overwrite it",
                path.display()
            );
        }
        let written = AppConfig::default()
            .save()
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote default config to {}", written.display());
        return Ok(());
    }

    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
