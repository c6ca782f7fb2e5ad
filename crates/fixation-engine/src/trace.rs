//! JSON-lines debug trace.
//!
//! One line per character per frame, each holding the registry's
//! [`DebugSnapshot`] plus the composed gaze.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fixation_core::runner::FrameCallback;
use fixation_core::{CharacterId, GazeArena, GazeFrame};
use fixation_poi::{DebugSnapshot, SceneSnapshot};
use serde::Serialize;
use tracing::warn;

use crate::error::EngineError;

#[derive(Serialize)]
struct TraceLine<'a> {
    frame: u64,
    character: CharacterId,
    name: &'a str,
    gaze: &'a GazeFrame,
    selection: DebugSnapshot,
}

/// Frame callback that writes a debug trace file.
///
/// Write errors do not abort the run: the first one is kept, writing stops,
/// and [`finish`](Self::finish) reports it.
pub struct TraceCallback<'a, W: Write = BufWriter<File>> {
    scene: &'a SceneSnapshot,
    writer: W,
    lines: u64,
    error: Option<EngineError>,
}

impl<'a> TraceCallback<'a> {
    /// Create (or truncate) the trace file at `path`.
    pub fn create(path: &Path, scene: &'a SceneSnapshot) -> Result<Self, EngineError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), scene))
    }
}

impl<'a, W: Write> TraceCallback<'a, W> {
    /// Trace into an arbitrary writer.
    pub const fn new(writer: W, scene: &'a SceneSnapshot) -> Self {
        Self {
            scene,
            writer,
            lines: 0,
            error: None,
        }
    }

    /// Flush the writer and return the number of lines written.
    pub fn finish(mut self) -> Result<u64, EngineError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.lines)
    }

    fn write_frame(
        &mut self,
        frame: u64,
        frames: &[(CharacterId, GazeFrame)],
        arena: &GazeArena,
    ) -> Result<(), EngineError> {
        for (id, gaze) in frames {
            let Some(character) = arena.get(*id) else {
                continue;
            };
            let line = TraceLine {
                frame,
                character: *id,
                name: character.name(),
                gaze,
                selection: character.poi().debug_snapshot(character.base(), self.scene),
            };
            serde_json::to_writer(&mut self.writer, &line)?;
            self.writer.write_all(b"\n")?;
            self.lines = self.lines.saturating_add(1);
        }
        Ok(())
    }
}

impl<W: Write> FrameCallback for TraceCallback<'_, W> {
    fn on_frame(&mut self, frame: u64, frames: &[(CharacterId, GazeFrame)], arena: &GazeArena) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.write_frame(frame, frames, arena) {
            warn!(frame, error = %error, "Debug trace write failed, tracing stopped");
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fixation_core::{FixationConfig, run_frames};
    use fixation_poi::BasePose;

    use super::*;

    #[test]
    fn writes_one_json_line_per_character_frame() {
        let scene = SceneSnapshot::default();
        let mut arena = GazeArena::new(FixationConfig::default()).unwrap();
        arena.create("aoi", BasePose::IDENTITY).unwrap();
        arena.create("ren", BasePose::IDENTITY).unwrap();

        let mut buffer = Vec::new();
        let mut trace = TraceCallback::new(&mut buffer, &scene);
        run_frames(&mut arena, &scene, 5, 0.1, &mut trace);
        assert_eq!(trace.finish().unwrap(), 10);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines.last().and_then(|line| line.get("frame")), Some(&4.into()));
        assert!(lines.iter().all(|line| {
            line.pointer("/selection/candidates")
                .is_some_and(serde_json::Value::is_array)
        }));
    }
}
