use serde::{Deserialize, Serialize};

use crate::{angle_at, BodySide, Landmark, LegChain, Result, SquatError};

/// Knee angle treated as a full-depth squat.
pub const TARGET_KNEE_ANGLE: f32 = 90.0;
/// Knee angle of a fully upright stance.
pub const STANDING_KNEE_ANGLE: f32 = 180.0;
/// Acceptable knee-angle band around the target. Informational only; the
/// counting logic does not consult it.
pub const TARGET_DEPTH_BAND: (f32, f32) = (85.0, 95.0);

/// How the estimator picks the body side it measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePolicy {
    /// Always read the same side, whatever the camera sees.
    Fixed(BodySide),
    /// Read whichever side has the higher summed joint visibility.
    MostVisible,
}

impl Default for SidePolicy {
    fn default() -> Self {
        Self::Fixed(BodySide::Left)
    }
}

/// Tunables for converting a pose into a depth score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    pub target_knee_angle: f32,
    pub depth_band: (f32, f32),
    pub side: SidePolicy,
    /// When set, frames whose measured joints fall below this visibility
    /// are rejected instead of producing a reading.
    pub min_visibility: Option<f32>,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            target_knee_angle: TARGET_KNEE_ANGLE,
            depth_band: TARGET_DEPTH_BAND,
            side: SidePolicy::default(),
            min_visibility: None,
        }
    }
}

impl DepthConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.target_knee_angle > 0.0 && self.target_knee_angle < STANDING_KNEE_ANGLE) {
            return Err(SquatError::config(format!(
                "target knee angle {} must lie strictly between 0 and {STANDING_KNEE_ANGLE}",
                self.target_knee_angle
            )));
        }

        let (low, high) = self.depth_band;
        if low > high {
            return Err(SquatError::config(format!(
                "depth band ({low}, {high}) is inverted"
            )));
        }

        if let Some(min) = self.min_visibility {
            if !(0.0..=1.0).contains(&min) {
                return Err(SquatError::config(format!(
                    "minimum visibility {min} must lie within [0, 1]"
                )));
            }
        }

        Ok(())
    }

    /// Whether a knee angle sits inside the informational target band.
    pub fn in_target_band(&self, knee_angle: f32) -> bool {
        let (low, high) = self.depth_band;
        (low..=high).contains(&knee_angle)
    }
}

/// Per-frame squat measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthReading {
    /// 0 = standing tall, 100 = full squat.
    pub depth: u8,
    pub knee_angle: f32,
    pub hip_angle: f32,
    pub side: BodySide,
    /// Lowest visibility among the four joints the reading was taken from.
    pub min_visibility: f32,
}

/// Linear map from knee angle to depth, clamped to [0, 100] and rounded.
pub fn depth_from_knee_angle(knee_angle: f32, target_knee_angle: f32) -> u8 {
    let span = STANDING_KNEE_ANGLE - target_knee_angle;
    let depth = ((STANDING_KNEE_ANGLE - knee_angle) / span * 100.0).clamp(0.0, 100.0);
    depth.round() as u8
}

/// Measures squat depth from one frame's landmarks.
///
/// Returns `None` when the frame is too short to contain the measured leg
/// or, with a visibility gate configured, when any of its joints is too
/// uncertain. Callers treat `None` as "no usable detection this frame".
pub fn estimate_depth(landmarks: &[Landmark], config: &DepthConfig) -> Option<DepthReading> {
    let side = select_side(landmarks, config.side)?;
    let chain = side.chain();
    let [shoulder, hip, knee, ankle] = chain_landmarks(landmarks, &chain)?;

    let min_visibility = [shoulder, hip, knee, ankle]
        .iter()
        .map(|landmark| landmark.visibility)
        .fold(f32::INFINITY, f32::min);

    if let Some(gate) = config.min_visibility {
        if min_visibility < gate {
            return None;
        }
    }

    let knee_angle = angle_at(hip, knee, ankle);
    let hip_angle = angle_at(shoulder, hip, knee);

    Some(DepthReading {
        depth: depth_from_knee_angle(knee_angle, config.target_knee_angle),
        knee_angle,
        hip_angle,
        side,
        min_visibility,
    })
}

fn chain_landmarks<'a>(landmarks: &'a [Landmark], chain: &LegChain) -> Option<[&'a Landmark; 4]> {
    if landmarks.len() < chain.required_len() {
        return None;
    }

    Some([
        &landmarks[chain.shoulder.index()],
        &landmarks[chain.hip.index()],
        &landmarks[chain.knee.index()],
        &landmarks[chain.ankle.index()],
    ])
}

fn select_side(landmarks: &[Landmark], policy: SidePolicy) -> Option<BodySide> {
    match policy {
        SidePolicy::Fixed(side) => Some(side),
        SidePolicy::MostVisible => {
            let score = |side: BodySide| -> Option<f32> {
                chain_landmarks(landmarks, &side.chain())
                    .map(|joints| joints.iter().map(|landmark| landmark.visibility).sum())
            };

            match (score(BodySide::Left), score(BodySide::Right)) {
                (Some(left), Some(right)) if right > left => Some(BodySide::Right),
                (Some(_), _) => Some(BodySide::Left),
                (None, Some(_)) => Some(BodySide::Right),
                (None, None) => None,
            }
        }
    }
}
