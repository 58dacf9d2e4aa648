//! Airpoint Pointer Injector
//!
//! Delivers pointer commands to the desktop. Uses a pluggable backend
//! architecture so the gesture loop never depends on a platform API:
//!
//! - **Uinput:** Kernel virtual pointer device (Linux, needs /dev/uinput access)
//! - **Xdotool:** Shells out to `xdotool` (X11 sessions)
//! - **Recording:** Writes commands as JSONL without touching the desktop
//! - **Null:** Discards everything
//!
//! Every call is fire-and-forget: a failed injection is reported to the
//! caller but never retried.

pub mod capabilities;
pub mod recording;
pub mod writer;
pub mod xdotool;

#[cfg(target_os = "linux")]
pub mod backends;

#[cfg(not(target_os = "linux"))]
#[path = "backends/non_linux.rs"]
pub mod backends;

use std::path::PathBuf;

use airpoint_common::clock::TimestampNs;
use airpoint_common::config::{AppConfig, InjectorKind};
use airpoint_common::error::AirpointResult;
use airpoint_hand_model::event::InjectorCommand;

pub use recording::{CollectingInjector, NullInjector, RecordingInjector};
pub use writer::CommandWriter;
pub use xdotool::XdotoolInjector;

/// Trait for pointer injection backends.
pub trait PointerInjector: Send {
    /// Deliver one command issued at session time `now`.
    fn inject(&mut self, now: TimestampNs, command: &InjectorCommand) -> AirpointResult<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend can deliver commands on this system.
    fn is_available(&self) -> bool;
}

/// Build the injector the configuration asks for.
///
/// `record_output` is where the recording backend writes; `None` means
/// stdout.
pub fn build_injector(
    config: &AppConfig,
    record_output: Option<PathBuf>,
) -> AirpointResult<Box<dyn PointerInjector>> {
    match config.injector.backend {
        InjectorKind::Auto => Ok(backends::detect_best_injector(config)),
        InjectorKind::Xdotool => {
            let injector = XdotoolInjector::new(&config.injector.xdotool_path);
            if !injector.is_available() {
                tracing::warn!(
                    path = %config.injector.xdotool_path,
                    "xdotool not found; injected commands will fail"
                );
            }
            Ok(Box::new(injector))
        }
        InjectorKind::Uinput => backends::uinput_injector(config),
        InjectorKind::Record => {
            let writer = match record_output {
                Some(path) => CommandWriter::to_file(path, &config.screen)?,
                None => CommandWriter::to_stdout(&config.screen)?,
            };
            Ok(Box::new(RecordingInjector::new(writer)))
        }
        InjectorKind::None => Ok(Box::new(NullInjector)),
    }
}
