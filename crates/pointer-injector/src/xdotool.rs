//! `xdotool` backend for X11 sessions.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use airpoint_common::clock::TimestampNs;
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::event::{InjectorCommand, MouseButton};

use crate::PointerInjector;

/// X11 button numbers for the wheel.
const WHEEL_UP: &str = "4";
const WHEEL_DOWN: &str = "5";

/// Runs one `xdotool` process per command.
pub struct XdotoolInjector {
    program: String,
}

impl XdotoolInjector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one command. `None` for commands with no effect.
    pub fn args_for(command: &InjectorCommand) -> Option<Vec<String>> {
        let args: Vec<String> = match command {
            InjectorCommand::MoveTo { x, y } => vec![
                "mousemove".into(),
                format!("{}", x.round().max(0.0) as i64),
                format!("{}", y.round().max(0.0) as i64),
            ],
            InjectorCommand::MouseDown => vec!["mousedown".into(), "1".into()],
            InjectorCommand::MouseUp => vec!["mouseup".into(), "1".into()],
            InjectorCommand::Click { button } => {
                vec!["click".into(), button_number(*button).into()]
            }
            InjectorCommand::DoubleClick => vec![
                "click".into(),
                "--repeat".into(),
                "2".into(),
                "--delay".into(),
                "50".into(),
                "1".into(),
            ],
            InjectorCommand::Scroll { amount } => {
                if *amount == 0 {
                    return None;
                }
                let button = if *amount > 0 { WHEEL_UP } else { WHEEL_DOWN };
                vec![
                    "click".into(),
                    "--repeat".into(),
                    amount.unsigned_abs().to_string(),
                    button.into(),
                ]
            }
        };
        Some(args)
    }
}

fn button_number(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "1",
        MouseButton::Right => "3",
    }
}

impl PointerInjector for XdotoolInjector {
    fn inject(&mut self, _now: TimestampNs, command: &InjectorCommand) -> AirpointResult<()> {
        let Some(args) = Self::args_for(command) else {
            return Ok(());
        };

        let status = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                AirpointError::injection(format!("Failed to execute {}: {e}", self.program))
            })?;

        if !status.success() {
            return Err(AirpointError::injection(format!(
                "{} {} exited with {status}",
                self.program,
                args.join(" ")
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "xdotool"
    }

    fn is_available(&self) -> bool {
        find_executable(&self.program).is_some()
    }
}

/// Resolve a program name against `PATH`. Names containing a separator are
/// checked as paths.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}
