use std::{collections::VecDeque, path::Path};

use crate::{Inference, PoseFrame, PoseSource, Result, SquatError};

/// [`PoseSource`] over a recorded session: a JSON array of pose frames as
/// emitted by the pose engine. Each call to
/// [`latest_timestamp`](PoseSource::latest_timestamp) shows the next recorded
/// frame, the way a camera advances between display refreshes.
#[derive(Debug, Default)]
pub struct ReplaySource {
    pending: VecDeque<PoseFrame>,
    current: Option<PoseFrame>,
}

impl ReplaySource {
    /// Fails when a frame carries a non-finite timestamp, which would stall
    /// the pump's staleness check.
    pub fn new(frames: Vec<PoseFrame>) -> Result<Self> {
        if frames.iter().any(|frame| !frame.timestamp.is_finite()) {
            return Err(SquatError::InvalidInput(
                "recorded frames must carry finite timestamps",
            ));
        }

        Ok(Self {
            pending: frames.into(),
            current: None,
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let frames: Vec<PoseFrame> = serde_json::from_str(contents)?;
        Self::new(frames)
    }

    /// Frames not yet shown.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl PoseSource for ReplaySource {
    fn latest_timestamp(&mut self) -> Option<f64> {
        self.current = self.pending.pop_front();
        self.current.as_ref().map(|frame| frame.timestamp)
    }

    fn request(&mut self, timestamp: f64) -> Result<Inference> {
        match self.current.take() {
            Some(frame) if frame.timestamp == timestamp => Ok(Inference::Complete(Some(frame))),
            _ => Err(SquatError::engine(format!(
                "no recorded frame at timestamp {timestamp}"
            ))),
        }
    }
}
