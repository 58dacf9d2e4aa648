//! Capability detection and guidance.
//!
//! Airpoint needs at least one way to deliver pointer input; speech and a
//! camera device are optional.

use airpoint_common::config::AppConfig;

use crate::xdotool::{find_executable, XdotoolInjector};
use crate::PointerInjector;

/// A system capability that Airpoint may use.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities(config: &AppConfig) -> Vec<Capability> {
    let uinput = check_uinput_access();
    let xdotool = check_xdotool(config);

    let any_injector = uinput.available || xdotool.available;
    let injection = Capability {
        name: "Pointer Injection".to_string(),
        description: "At least one backend able to move and click the pointer".to_string(),
        available: any_injector,
        required: true,
        fix_instructions: (!any_injector)
            .then(|| "Enable uinput access or install xdotool (see below)".to_string()),
    };

    vec![
        injection,
        uinput,
        xdotool,
        check_speech(config),
        check_camera_device(),
    ]
}

fn check_uinput_access() -> Capability {
    let available = crate::backends::uinput_writable();

    Capability {
        name: "uinput".to_string(),
        description: "Kernel virtual pointer device (Wayland and X11)".to_string(),
        available,
        required: false,
        fix_instructions: (!available).then(crate::backends::uinput_diagnostic),
    }
}

fn check_xdotool(config: &AppConfig) -> Capability {
    let installed = XdotoolInjector::new(&config.injector.xdotool_path).is_available();
    let has_display = std::env::var_os("DISPLAY").is_some();

    let fix_instructions = match (installed, has_display) {
        (true, true) => None,
        (false, _) => Some("Install xdotool: sudo apt install xdotool".to_string()),
        (true, false) => Some("xdotool needs an X11 session (DISPLAY is unset)".to_string()),
    };

    Capability {
        name: "xdotool".to_string(),
        description: "X11 pointer control through the xdotool command".to_string(),
        available: installed && has_display,
        required: false,
        fix_instructions,
    }
}

fn check_speech(config: &AppConfig) -> Capability {
    let available = config.notifier.enabled && find_executable(&config.notifier.command).is_some();

    Capability {
        name: "Spoken Feedback".to_string(),
        description: format!("Speech command '{}'", config.notifier.command),
        available,
        required: false,
        fix_instructions: if !config.notifier.enabled {
            Some("Spoken feedback is disabled in the config".to_string())
        } else if !available {
            Some(format!(
                "Install {} or set notifier.command in the config",
                config.notifier.command
            ))
        } else {
            None
        },
    }
}

fn check_camera_device() -> Capability {
    let has_camera = (0..16)
        .map(|idx| format!("/dev/video{idx}"))
        .any(|path| std::path::Path::new(&path).exists());

    Capability {
        name: "Camera Device".to_string(),
        description: "Video device for the external landmark detector".to_string(),
        available: has_camera,
        required: false,
        fix_instructions: if has_camera {
            None
        } else {
            Some("Connect a camera and verify /dev/video* exists (v4l2-ctl --list-devices)".to_string())
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Airpoint System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
