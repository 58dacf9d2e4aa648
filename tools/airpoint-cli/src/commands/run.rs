//! Drive the pointer from a live landmark stream.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Context;
use tokio::runtime::Handle;

use airpoint_common::config::AppConfig;
use airpoint_control_loop::notifier::build_notifier;
use airpoint_control_loop::{
    ControlLoop, JsonlLandmarkSource, LandmarkSource, SessionSummary, TracingOverlay,
};
use airpoint_pointer_injector::build_injector;

use crate::SessionArgs;

pub async fn run(
    mut config: AppConfig,
    input: Option<PathBuf>,
    args: SessionArgs,
) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);

    let source: Box<dyn LandmarkSource> = match &input {
        Some(path) => Box::new(
            JsonlLandmarkSource::open(path)
                .with_context(|| format!("failed to open landmark stream {}", path.display()))?,
        ),
        None => Box::new(JsonlLandmarkSource::stdin()),
    };

    eprintln!("Airpoint gesture control");
    eprintln!("  Source: {}", source.name());
    eprintln!("  Screen: {}x{}", config.screen.width, config.screen.height);
    eprintln!("  Keys: q/Esc quit, m toggle mouse, v toggle overlay (in the preview window)");
    eprintln!("{}", stop_hint(input.is_none()));

    let summary = drive(&config, source, &args).await?;
    print_summary(&summary);
    Ok(())
}

/// How Ctrl+C behaves for this source. A blocked stdin read only sees the
/// stop flag once the next line arrives.
pub fn stop_hint(reading_stdin: bool) -> &'static str {
    if reading_stdin {
        "Press Ctrl+C to stop (takes effect when the next frame arrives; closing the detector ends the session at once)..."
    } else {
        "Press Ctrl+C to stop..."
    }
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(config: &mut AppConfig, args: &SessionArgs) {
    if let Some(kind) = args.injector {
        config.injector.backend = kind.into();
    }
    if let Some(width) = args.screen_width {
        config.screen.width = width;
    }
    if let Some(height) = args.screen_height {
        config.screen.height = height;
    }
    if let Some(smoothing) = args.smoothing {
        config.gesture.smoothing = smoothing;
    }
    if args.no_speech {
        config.notifier.enabled = false;
    }
    if args.no_overlay {
        config.overlay.visible = false;
    }
}

/// Build the collaborators, run the loop on a blocking thread, and stop it
/// on Ctrl+C.
pub async fn drive(
    config: &AppConfig,
    source: Box<dyn LandmarkSource>,
    args: &SessionArgs,
) -> anyhow::Result<SessionSummary> {
    config.validate().context("invalid configuration")?;

    let injector =
        build_injector(config, args.output.clone()).context("failed to set up pointer injection")?;
    tracing::info!(injector = %injector.name(), "Pointer injector ready");

    let notifier = build_notifier(&config.notifier, &Handle::current());
    // Always installed; the session's overlay toggle decides what is shown.
    let overlay = Box::new(TracingOverlay::new(&config.overlay));

    let mut control = ControlLoop::new(config, source, injector)
        .context("failed to start control loop")?
        .with_notifier(notifier)
        .with_overlay(overlay)
        .with_mouse_enabled(!args.mouse_off);

    let stop_flag = control.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received; stopping after the current frame");
            stop_flag.store(true, Ordering::SeqCst);
        }
    });

    let summary = tokio::task::spawn_blocking(move || control.run())
        .await
        .context("control loop thread panicked")?
        .context("control loop failed")?;
    Ok(summary)
}

pub fn print_summary(summary: &SessionSummary) {
    eprintln!();
    eprintln!("Session finished");
    eprintln!(
        "  Frames: {} ({} with a hand)",
        summary.frames, summary.frames_with_hand
    );
    eprintln!(
        "  Events: {} emitted, {} injected, {} failed",
        summary.events_emitted, summary.events_injected, summary.injection_failures
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InjectorArg;
    use airpoint_common::config::InjectorKind;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = AppConfig::default();
        let args = SessionArgs {
            injector: Some(InjectorArg::Record),
            screen_width: Some(2560),
            smoothing: Some(3.0),
            no_speech: true,
            ..SessionArgs::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.injector.backend, InjectorKind::Record);
        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.screen.height, 1080);
        assert_eq!(config.gesture.smoothing, 3.0);
        assert!(!config.notifier.enabled);
        assert!(config.overlay.visible);
    }

    #[test]
    fn test_stdin_hint_mentions_next_frame() {
        assert!(stop_hint(true).contains("next frame"));
        assert!(!stop_hint(false).contains("next frame"));
    }
}
