//! Non-Linux injection backends.

use airpoint_common::config::AppConfig;
use airpoint_common::error::{AirpointError, AirpointResult};

use crate::recording::NullInjector;
use crate::xdotool::XdotoolInjector;
use crate::PointerInjector;

pub fn uinput_injector(_config: &AppConfig) -> AirpointResult<Box<dyn PointerInjector>> {
    Err(AirpointError::unsupported(
        "uinput injection is only available on Linux",
    ))
}

pub fn detect_best_injector(config: &AppConfig) -> Box<dyn PointerInjector> {
    let xdotool = XdotoolInjector::new(&config.injector.xdotool_path);
    if xdotool.is_available() {
        tracing::info!("Using xdotool injector");
        return Box::new(xdotool);
    }

    tracing::warn!(
        "Pointer injection for this platform is not implemented yet; using null injector"
    );
    Box::new(NullInjector)
}

pub fn uinput_writable() -> bool {
    false
}

pub fn uinput_diagnostic() -> String {
    "uinput is a Linux kernel interface".to_string()
}
