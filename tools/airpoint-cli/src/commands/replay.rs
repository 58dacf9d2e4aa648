//! Replay a recorded landmark session.
//!
//! Frames keep their recorded timestamps, so gesture timing matches the
//! recorded session regardless of how fast the file is read. Unless another
//! injector is chosen, commands are written as JSONL instead of moving the
//! real pointer, and speech stays off.

use std::path::PathBuf;

use anyhow::Context;

use airpoint_common::config::{AppConfig, InjectorKind};
use airpoint_control_loop::JsonlLandmarkSource;

use super::run::{apply_overrides, drive, print_summary};
use crate::SessionArgs;

pub async fn run(mut config: AppConfig, path: PathBuf, args: SessionArgs) -> anyhow::Result<()> {
    config.injector.backend = InjectorKind::Record;
    config.notifier.enabled = false;
    apply_overrides(&mut config, &args);

    let source = JsonlLandmarkSource::open(&path)
        .with_context(|| format!("failed to open recording {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        injector = ?config.injector.backend,
        "Replaying landmark session"
    );

    let summary = drive(&config, Box::new(source), &args).await?;
    print_summary(&summary);
    Ok(())
}
