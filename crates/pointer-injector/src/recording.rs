//! Injectors that do not touch the desktop.

use std::sync::{Arc, Mutex};

use airpoint_common::clock::TimestampNs;
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::event::{InjectorCommand, TimedCommand};

use crate::writer::CommandWriter;
use crate::PointerInjector;

/// Writes every command to a JSONL stream.
pub struct RecordingInjector {
    writer: CommandWriter,
}

impl RecordingInjector {
    pub fn new(writer: CommandWriter) -> Self {
        Self { writer }
    }

    pub fn commands_written(&self) -> u64 {
        self.writer.commands_written()
    }
}

impl PointerInjector for RecordingInjector {
    fn inject(&mut self, now: TimestampNs, command: &InjectorCommand) -> AirpointResult<()> {
        self.writer.write_command(&TimedCommand::new(now, *command))
    }

    fn name(&self) -> &str {
        "record"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Discards every command.
pub struct NullInjector;

impl PointerInjector for NullInjector {
    fn inject(&mut self, _now: TimestampNs, _command: &InjectorCommand) -> AirpointResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Keeps commands in memory behind a shared handle, for tests and
/// embedding. Can be told to fail every call after recording it.
pub struct CollectingInjector {
    commands: Arc<Mutex<Vec<TimedCommand>>>,
    fail: bool,
}

impl CollectingInjector {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Record each attempt, then report it as denied.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Shared view of every command attempted so far.
    pub fn handle(&self) -> Arc<Mutex<Vec<TimedCommand>>> {
        self.commands.clone()
    }
}

impl Default for CollectingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerInjector for CollectingInjector {
    fn inject(&mut self, now: TimestampNs, command: &InjectorCommand) -> AirpointResult<()> {
        self.commands
            .lock()
            .map_err(|_| AirpointError::injection("command log poisoned"))?
            .push(TimedCommand::new(now, *command));
        if self.fail {
            return Err(AirpointError::injection("synthetic input denied"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "collect"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_injector_shares_log() {
        let mut injector = CollectingInjector::new();
        let log = injector.handle();
        injector.inject(5, &InjectorCommand::MouseDown).unwrap();
        injector.inject(9, &InjectorCommand::MouseUp).unwrap();
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], TimedCommand::new(9, InjectorCommand::MouseUp));
    }

    #[test]
    fn test_failing_injector_still_records_attempt() {
        let mut injector = CollectingInjector::failing();
        let log = injector.handle();
        assert!(injector.inject(0, &InjectorCommand::DoubleClick).is_err());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_null_injector_accepts_everything() {
        let mut injector = NullInjector;
        assert!(injector
            .inject(0, &InjectorCommand::Scroll { amount: 3 })
            .is_ok());
        assert_eq!(injector.name(), "null");
    }
}
