use serde::{Deserialize, Serialize};

/// Number of landmarks produced by the full-body pose model.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// A single body-joint estimate in normalised frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge, 1 = right edge.
    pub x: f32,
    /// Vertical position, 0 = top edge, 1 = bottom edge.
    pub y: f32,
    /// Relative depth, when the engine provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Confidence that the joint is visible, in [0, 1].
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = Some(z);
        self
    }

    /// Whether the joint clears the given visibility cutoff (strictly).
    pub fn is_visible(&self, cutoff: f32) -> bool {
        self.visibility > cutoff
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// One detection cycle worth of landmarks plus the source timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Source frame time in milliseconds. Strictly increasing across frames
    /// of a session.
    pub timestamp: f64,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp,
            landmarks,
        }
    }

    /// An empty landmark list means the engine found nobody in the frame.
    pub fn has_pose(&self) -> bool {
        !self.landmarks.is_empty()
    }

    pub fn landmark(&self, index: BodyLandmark) -> Option<&Landmark> {
        self.landmarks.get(index.index())
    }
}

/// Anatomical numbering of the 33-point body model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which half of the body the depth measurement reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    #[default]
    Left,
    Right,
}

/// The four joints of one body side that the squat measurement needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegChain {
    pub shoulder: BodyLandmark,
    pub hip: BodyLandmark,
    pub knee: BodyLandmark,
    pub ankle: BodyLandmark,
}

impl LegChain {
    pub fn joints(&self) -> [BodyLandmark; 4] {
        [self.shoulder, self.hip, self.knee, self.ankle]
    }

    /// Minimum landmark count a frame needs for this chain to be readable.
    pub fn required_len(&self) -> usize {
        self.joints()
            .iter()
            .map(|joint| joint.index() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl BodySide {
    pub fn chain(self) -> LegChain {
        match self {
            BodySide::Left => LegChain {
                shoulder: BodyLandmark::LeftShoulder,
                hip: BodyLandmark::LeftHip,
                knee: BodyLandmark::LeftKnee,
                ankle: BodyLandmark::LeftAnkle,
            },
            BodySide::Right => LegChain {
                shoulder: BodyLandmark::RightShoulder,
                hip: BodyLandmark::RightHip,
                knee: BodyLandmark::RightKnee,
                ankle: BodyLandmark::RightAnkle,
            },
        }
    }
}

/// Synthetic frames for unit tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a full landmark set with the given side's leg bent to
    /// `knee_angle` degrees; every other joint is parked at the centre.
    pub(crate) fn leg_landmarks(side: BodySide, knee_angle: f32, visibility: f32) -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, visibility); POSE_LANDMARK_COUNT];
        let chain = side.chain();
        let theta = knee_angle.to_radians();
        let (knee_x, knee_y) = (0.5, 0.7);

        landmarks[chain.shoulder.index()] = Landmark::new(0.5, 0.3, visibility);
        landmarks[chain.hip.index()] = Landmark::new(0.5, 0.5, visibility);
        landmarks[chain.knee.index()] = Landmark::new(knee_x, knee_y, visibility);
        landmarks[chain.ankle.index()] = Landmark::new(
            knee_x + 0.2 * theta.sin(),
            knee_y - 0.2 * theta.cos(),
            visibility,
        );
        landmarks
    }

    pub(crate) fn leg_frame(timestamp: f64, knee_angle: f32) -> PoseFrame {
        PoseFrame::new(timestamp, leg_landmarks(BodySide::Left, knee_angle, 0.9))
    }
}
