//! Core library for the Squat Counter application.
//!
//! Turns a stream of per-frame body landmarks into a squat depth score and a
//! debounced repetition count. The measurement modules (`geometry`, `depth`,
//! `reps`) are pure; [`FramePump`] is the only piece that holds state across
//! frames and talks to the pose engine and the UI through the
//! [`PoseSource`] and [`FeedbackSink`] traits.

pub mod config;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod pump;
pub mod render;
pub mod replay;
pub mod reps;

pub use config::{AppConfig, CaptureConfig, RenderConfig};
pub use depth::{depth_from_knee_angle, estimate_depth, DepthConfig, DepthReading, SidePolicy};
pub use error::{Result, SquatError};
pub use geometry::{angle_at, Point2};
pub use pose::{BodyLandmark, BodySide, Landmark, LegChain, PoseFrame};
pub use pump::{
    Feedback, FeedbackSink, FramePump, Inference, PoseSource, SessionSummary, TickOutcome,
};
pub use render::{PixelPoint, Segment, SkeletonOverlay};
pub use replay::ReplaySource;
pub use reps::{RepCounterState, RepStep, RepThresholds, SquatStatus, StatusTone};
