//! Landmark sources.
//!
//! The hand-landmark model runs out of process and streams one JSON object
//! per camera frame (see `airpoint_hand_model::capture`). Reads block, which
//! sets the loop cadence.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Stdin};
use std::path::Path;

use airpoint_common::error::{AirpointError, AirpointResult};
use airpoint_hand_model::capture::{parse_capture_line, Capture};

/// Trait for landmark sources.
pub trait LandmarkSource: Send {
    /// Block until the next capture. `Ok(None)` means the stream ended.
    fn next_capture(&mut self) -> AirpointResult<Option<Capture>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Reads captures from a JSONL stream.
pub struct JsonlLandmarkSource<R> {
    reader: R,
    name: String,
    line_no: u64,
    buf: String,
}

impl<R: BufRead + Send> JsonlLandmarkSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far, including skipped comments.
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}

impl JsonlLandmarkSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()), "stdin")
    }
}

impl JsonlLandmarkSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> AirpointResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AirpointError::source(format!("Failed to open {}: {e}", path.display()))
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead + Send> LandmarkSource for JsonlLandmarkSource<R> {
    fn next_capture(&mut self) -> AirpointResult<Option<Capture>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).map_err(|e| {
                AirpointError::source(format!("{}: read failed: {e}", self.name))
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            match parse_capture_line(&self.buf) {
                Ok(Some(capture)) => return Ok(Some(capture)),
                Ok(None) => continue,
                Err(AirpointError::Json(e)) => {
                    return Err(AirpointError::source(format!(
                        "{} line {}: unreadable frame: {e}",
                        self.name, self.line_no
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replays captures held in memory.
pub struct ScriptedSource {
    captures: VecDeque<Capture>,
}

impl ScriptedSource {
    pub fn new(captures: Vec<Capture>) -> Self {
        Self {
            captures: captures.into(),
        }
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_capture(&mut self) -> AirpointResult<Option<Capture>> {
        Ok(self.captures.pop_front())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
