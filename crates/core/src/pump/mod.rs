//! Frame-driven scheduler that feeds pose detections through the depth
//! estimator and the rep counter.
//!
//! The pump is meant to be ticked once per display refresh. It never runs
//! two inference requests at the same time and never processes the same
//! source frame twice, so the counter always sees depths in arrival order.

use serde::{Deserialize, Serialize};

use crate::{
    estimate_depth, AppConfig, DepthReading, PoseFrame, RepCounterState, RepStep, Result,
    SkeletonOverlay, SquatStatus,
};

/// Answer from the pose engine for a requested frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    /// The request is still running.
    Pending,
    /// Inference finished; `None` means nobody was found in the frame.
    Complete(Option<PoseFrame>),
}

/// Camera plus pose engine, seen from the pump.
pub trait PoseSource {
    /// Timestamp of the newest frame the source can offer, or `None` once
    /// the source has ended.
    fn latest_timestamp(&mut self) -> Option<f64>;

    /// Starts inference on the frame with the given timestamp. Engines that
    /// answer synchronously return [`Inference::Complete`] straight away.
    fn request(&mut self, timestamp: f64) -> Result<Inference>;

    /// Checks on a request that previously answered [`Inference::Pending`].
    fn poll(&mut self) -> Result<Inference> {
        Ok(Inference::Pending)
    }
}

/// UI collaborator receiving the skeleton and the per-frame feedback.
pub trait FeedbackSink {
    fn present(
        &mut self,
        frame: &PoseFrame,
        overlay: &SkeletonOverlay,
        feedback: &Feedback,
    ) -> Result<()>;
}

impl FeedbackSink for Vec<Feedback> {
    fn present(
        &mut self,
        _frame: &PoseFrame,
        _overlay: &SkeletonOverlay,
        feedback: &Feedback,
    ) -> Result<()> {
        self.push(feedback.clone());
        Ok(())
    }
}

/// Everything the UI shows for one processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub timestamp: f64,
    pub depth_percent: u8,
    pub knee_angle_degrees: f32,
    pub hip_angle_degrees: f32,
    pub rep_count: u32,
    pub status: SquatStatus,
    /// The user stood back up on this frame.
    pub rep_completed: bool,
    /// ...and the rep was deep enough to count.
    pub rep_counted: bool,
    /// Knee angle sits inside the configured target band.
    pub in_target_band: bool,
}

impl Feedback {
    fn new(timestamp: f64, reading: &DepthReading, step: &RepStep, in_target_band: bool) -> Self {
        Self {
            timestamp,
            depth_percent: reading.depth,
            knee_angle_degrees: reading.knee_angle.round(),
            hip_angle_degrees: reading.hip_angle.round(),
            rep_count: step.state.rep_count,
            status: SquatStatus::classify(reading.depth),
            rep_completed: step.rep_completed,
            rep_counted: step.rep_counted,
            in_target_band,
        }
    }
}

/// Result of a single [`FramePump::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The source has ended and nothing is in flight.
    Exhausted,
    /// No frame newer than the last one taken.
    Stale,
    /// Waiting on an in-flight inference request.
    Awaiting,
    /// A new frame arrived while a request was in flight and was dropped.
    Busy,
    /// The frame held no usable pose; the counter was left untouched.
    NoPose,
    Processed(Feedback),
}

/// Frame accounting for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub frames_stale: u64,
    pub frames_dropped_busy: u64,
    pub frames_without_pose: u64,
    pub rep_count: u32,
}

/// Drives the measurement pipeline from a [`PoseSource`] into a
/// [`FeedbackSink`].
#[derive(Debug)]
pub struct FramePump<S, K> {
    source: S,
    sink: K,
    config: AppConfig,
    state: RepCounterState,
    last_timestamp: Option<f64>,
    in_flight: bool,
    summary: SessionSummary,
}

impl<S: PoseSource, K: FeedbackSink> FramePump<S, K> {
    pub fn new(source: S, sink: K, config: AppConfig) -> Self {
        Self {
            source,
            sink,
            config,
            state: RepCounterState::new(),
            last_timestamp: None,
            in_flight: false,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> RepCounterState {
        self.state
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            rep_count: self.state.rep_count,
            ..self.summary.clone()
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Advances the pump by one refresh cycle.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.in_flight {
            self.in_flight = false;
            return match self.source.poll()? {
                Inference::Complete(frame) => self.complete(frame),
                Inference::Pending => {
                    self.in_flight = true;
                    Ok(self.drop_if_new())
                }
            };
        }

        let Some(timestamp) = self.source.latest_timestamp() else {
            return Ok(TickOutcome::Exhausted);
        };

        if !timestamp.is_finite() {
            self.summary.frames_stale += 1;
            tracing::warn!(timestamp, "ignoring frame with non-finite timestamp");
            return Ok(TickOutcome::Stale);
        }

        if !self.is_new(timestamp) {
            self.summary.frames_stale += 1;
            tracing::trace!(timestamp, "frame already taken");
            return Ok(TickOutcome::Stale);
        }
        self.last_timestamp = Some(timestamp);

        match self.source.request(timestamp)? {
            Inference::Complete(frame) => self.complete(frame),
            Inference::Pending => {
                self.in_flight = true;
                Ok(TickOutcome::Awaiting)
            }
        }
    }

    /// Ticks until the source is exhausted and returns the session summary.
    /// Any source or sink error ends the session.
    pub fn run(&mut self) -> Result<SessionSummary> {
        while self.tick()? != TickOutcome::Exhausted {}

        let summary = self.summary();
        tracing::info!(
            reps = summary.rep_count,
            processed = summary.frames_processed,
            without_pose = summary.frames_without_pose,
            dropped = summary.frames_dropped_busy,
            "session finished"
        );
        Ok(summary)
    }

    fn is_new(&self, timestamp: f64) -> bool {
        timestamp.is_finite() && self.last_timestamp.map_or(true, |last| timestamp > last)
    }

    fn drop_if_new(&mut self) -> TickOutcome {
        match self.source.latest_timestamp() {
            Some(timestamp) if self.is_new(timestamp) => {
                self.last_timestamp = Some(timestamp);
                self.summary.frames_dropped_busy += 1;
                tracing::warn!(timestamp, "inference still running, dropping frame");
                TickOutcome::Busy
            }
            _ => TickOutcome::Awaiting,
        }
    }

    fn complete(&mut self, frame: Option<PoseFrame>) -> Result<TickOutcome> {
        let Some(frame) = frame.filter(PoseFrame::has_pose) else {
            self.summary.frames_without_pose += 1;
            return Ok(TickOutcome::NoPose);
        };

        let Some(reading) = estimate_depth(&frame.landmarks, &self.config.depth) else {
            self.summary.frames_without_pose += 1;
            tracing::debug!(
                timestamp = frame.timestamp,
                landmarks = frame.landmarks.len(),
                "pose unusable for depth"
            );
            return Ok(TickOutcome::NoPose);
        };

        let step = self.state.step(reading.depth, &self.config.counting);
        self.state = step.state;

        tracing::debug!(
            timestamp = frame.timestamp,
            depth = reading.depth,
            knee_angle = reading.knee_angle,
            squatting = step.state.is_squatting,
            "frame measured"
        );
        if step.rep_counted {
            tracing::info!(reps = step.state.rep_count, "rep completed");
        } else if step.rep_completed {
            tracing::debug!("rep too shallow, not counted");
        }

        let in_band = self.config.depth.in_target_band(reading.knee_angle);
        let feedback = Feedback::new(frame.timestamp, &reading, &step, in_band);
        let overlay = SkeletonOverlay::project(
            &frame.landmarks,
            self.config.capture.width,
            self.config.capture.height,
            self.config.render.visibility_cutoff,
        );

        self.sink.present(&frame, &overlay, &feedback)?;
        self.summary.frames_processed += 1;

        Ok(TickOutcome::Processed(feedback))
    }
}
