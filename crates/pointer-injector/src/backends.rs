//! Linux injection backends.
//!
//! The uinput backend registers a virtual absolute pointer sized to the
//! configured screen, so `MoveTo` lands on exact pixels without having to
//! track the real cursor.

use std::os::unix::fs::MetadataExt;
use std::path::Path;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
    UinputAbsSetup,
};

use airpoint_common::clock::TimestampNs;
use airpoint_common::config::{AppConfig, ScreenConfig};
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::event::{InjectorCommand, MouseButton};

use crate::recording::NullInjector;
use crate::xdotool::XdotoolInjector;
use crate::PointerInjector;

const UINPUT_PATH: &str = "/dev/uinput";

pub struct UinputInjector {
    device: VirtualDevice,
    screen: ScreenConfig,
}

impl UinputInjector {
    pub fn new(name: &str, screen: ScreenConfig) -> AirpointResult<Self> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let mut wheel = AttributeSet::<RelativeAxisType>::new();
        wheel.insert(RelativeAxisType::REL_WHEEL);

        let max_x = screen.width.saturating_sub(1) as i32;
        let max_y = screen.height.saturating_sub(1) as i32;
        let abs_x = UinputAbsSetup::new(AbsoluteAxisType::ABS_X, AbsInfo::new(0, 0, max_x, 0, 0, 1));
        let abs_y = UinputAbsSetup::new(AbsoluteAxisType::ABS_Y, AbsInfo::new(0, 0, max_y, 0, 0, 1));

        let device = VirtualDeviceBuilder::new()
            .and_then(|b| b.name(name).with_keys(&keys))
            .and_then(|b| b.with_relative_axes(&wheel))
            .and_then(|b| b.with_absolute_axis(&abs_x))
            .and_then(|b| b.with_absolute_axis(&abs_y))
            .and_then(|b| b.build())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => AirpointError::permission_denied(format!(
                    "cannot create uinput device: {}",
                    uinput_diagnostic()
                )),
                _ => AirpointError::injection(format!("Failed to create uinput device: {e}")),
            })?;

        Ok(Self { device, screen })
    }

    pub fn is_supported() -> bool {
        std::fs::OpenOptions::new()
            .write(true)
            .open(UINPUT_PATH)
            .is_ok()
    }

    fn emit(&mut self, events: &[InputEvent]) -> AirpointResult<()> {
        self.device
            .emit(events)
            .map_err(|e| AirpointError::injection(format!("uinput write failed: {e}")))
    }

    fn button(&mut self, key: Key, down: bool) -> AirpointResult<()> {
        self.emit(&[InputEvent::new(EventType::KEY, key.code(), down as i32)])
    }

    fn click(&mut self, key: Key) -> AirpointResult<()> {
        self.button(key, true)?;
        self.button(key, false)
    }
}

fn button_key(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
    }
}

impl PointerInjector for UinputInjector {
    fn inject(&mut self, _now: TimestampNs, command: &InjectorCommand) -> AirpointResult<()> {
        match *command {
            InjectorCommand::MoveTo { x, y } => {
                let x = x.round().clamp(0.0, self.screen.width.saturating_sub(1) as f64) as i32;
                let y = y.round().clamp(0.0, self.screen.height.saturating_sub(1) as f64) as i32;
                self.emit(&[
                    InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, x),
                    InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_Y.0, y),
                ])
            }
            InjectorCommand::MouseDown => self.button(Key::BTN_LEFT, true),
            InjectorCommand::MouseUp => self.button(Key::BTN_LEFT, false),
            InjectorCommand::Click { button } => self.click(button_key(button)),
            InjectorCommand::DoubleClick => {
                self.click(Key::BTN_LEFT)?;
                self.click(Key::BTN_LEFT)
            }
            InjectorCommand::Scroll { amount } => self.emit(&[InputEvent::new(
                EventType::RELATIVE,
                RelativeAxisType::REL_WHEEL.0,
                amount,
            )]),
        }
    }

    fn name(&self) -> &str {
        "uinput"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Create the uinput backend or explain why it cannot be created.
pub fn uinput_injector(config: &AppConfig) -> AirpointResult<Box<dyn PointerInjector>> {
    let injector = UinputInjector::new(&config.injector.uinput_device_name, config.screen)?;
    Ok(Box::new(injector))
}

/// Whether the current process may open /dev/uinput for writing.
pub fn uinput_writable() -> bool {
    UinputInjector::is_supported()
}

/// Detect the best available injector for the current system.
pub fn detect_best_injector(config: &AppConfig) -> Box<dyn PointerInjector> {
    if UinputInjector::is_supported() {
        match uinput_injector(config) {
            Ok(injector) => {
                tracing::info!("Using uinput injector");
                return injector;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize uinput injector");
            }
        }
    }

    let xdotool = XdotoolInjector::new(&config.injector.xdotool_path);
    if xdotool.is_available() && std::env::var_os("DISPLAY").is_some() {
        tracing::info!("Using xdotool injector");
        return Box::new(xdotool);
    }

    tracing::warn!(
        details = %uinput_diagnostic(),
        "No pointer injector available; gestures will be detected but not delivered"
    );
    Box::new(NullInjector)
}

/// Human-readable reason /dev/uinput is not usable.
pub fn uinput_diagnostic() -> String {
    let path = UINPUT_PATH;
    // SAFETY: geteuid/getegid have no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(Path::new(path)) {
        Ok(meta) => {
            let mode = meta.mode() & 0o777;
            let owner = meta.uid();
            let group = meta.gid();
            format!(
                "device={path} mode={mode:o} owner_uid={owner} owner_gid={group} process_uid={uid} process_gid={gid}; likely missing 'input' group membership or udev rule. Fix: sudo usermod -aG input $USER && log out/in"
            )
        }
        Err(err) => format!(
            "device={path} unavailable ({err}); load the module with: sudo modprobe uinput"
        ),
    }
}
