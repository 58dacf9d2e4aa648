//! Append-only JSONL writer for injector commands.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use airpoint_common::config::ScreenConfig;
use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::event::TimedCommand;

/// First line of a command stream, written as a `#` comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Screen the `move_to` coordinates refer to.
    pub screen_width: u32,
    pub screen_height: u32,
}

/// Writes timed commands to a file or stdout, one JSON object per line.
pub struct CommandWriter {
    writer: BufWriter<Box<dyn Write + Send>>,
    path: Option<PathBuf>,
    commands_written: u64,
}

impl CommandWriter {
    /// Create (truncating) a file and write the header.
    pub fn to_file(path: impl AsRef<Path>, screen: &ScreenConfig) -> AirpointResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Self::new(Box::new(file), Some(path), screen)
    }

    /// Write to stdout.
    pub fn to_stdout(screen: &ScreenConfig) -> AirpointResult<Self> {
        Self::new(Box::new(std::io::stdout()), None, screen)
    }

    /// Write to any sink.
    pub fn new(
        sink: Box<dyn Write + Send>,
        path: Option<PathBuf>,
        screen: &ScreenConfig,
    ) -> AirpointResult<Self> {
        let mut writer = BufWriter::new(sink);

        let header = CommandStreamHeader {
            schema_version: "1.0".to_string(),
            screen_width: screen.width,
            screen_height: screen.height,
        };
        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| AirpointError::injection(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            commands_written: 0,
        })
    }

    /// Write a single command as a JSONL line.
    pub fn write_command(&mut self, command: &TimedCommand) -> AirpointResult<()> {
        let json = serde_json::to_string(command)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| AirpointError::injection(format!("Failed to write command: {e}")))?;
        self.commands_written += 1;

        // Moves arrive every frame; flush periodically rather than per line.
        if self.commands_written % 64 == 0 {
            self.flush()?;
        }

        Ok(())
    }

    /// Flush buffered writes.
    pub fn flush(&mut self) -> AirpointResult<()> {
        self.writer
            .flush()
            .map_err(|e| AirpointError::injection(format!("Failed to flush commands: {e}")))?;
        Ok(())
    }

    /// Number of commands written.
    pub fn commands_written(&self) -> u64 {
        self.commands_written
    }

    /// Output file, if not writing to stdout.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for CommandWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airpoint_hand_model::event::{parse_commands, InjectorCommand, MouseButton};

    #[test]
    fn test_command_writer_roundtrip() {
        let dir = std::env::temp_dir().join("airpoint_test_writer");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("commands.jsonl");
        let commands = vec![
            TimedCommand::new(0, InjectorCommand::MoveTo { x: 960.0, y: 540.0 }),
            TimedCommand::new(33_000_000, InjectorCommand::MouseDown),
            TimedCommand::new(
                66_000_000,
                InjectorCommand::Click {
                    button: MouseButton::Right,
                },
            ),
        ];

        {
            let mut writer = CommandWriter::to_file(&path, &ScreenConfig::default()).unwrap();
            for command in &commands {
                writer.write_command(command).unwrap();
            }
            assert_eq!(writer.commands_written(), 3);
            assert_eq!(writer.path(), Some(path.as_path()));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4); // 1 header + 3 commands
        assert!(lines[0].starts_with("# "));
        assert!(lines[0].contains("\"screen_width\":1920"));

        assert_eq!(parse_commands(&content).unwrap(), commands);

        std::fs::remove_dir_all(&dir).ok();
    }
}
