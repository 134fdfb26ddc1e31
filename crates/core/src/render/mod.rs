use serde::{Deserialize, Serialize};

use crate::Landmark;

/// Joints at or below this visibility are not drawn.
pub const VISIBILITY_CUTOFF: f32 = 0.5;

/// Bones of the drawn skeleton as pairs of landmark indices.
pub const POSE_CONNECTIONS: [(usize, usize); 25] = [
    // head
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    // mouth
    (9, 10),
    // arms
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
    // legs
    (23, 25),
    (25, 27),
    (27, 29),
    (29, 31),
    (24, 26),
    (26, 28),
    (28, 30),
    (30, 32),
    // torso
    (11, 12),
    (11, 23),
    (12, 24),
    (23, 24),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: PixelPoint,
    pub to: PixelPoint,
}

/// Pixel-space skeleton for the rendering collaborator. Only joints above
/// the visibility cutoff are included, and a bone only when both of its
/// ends are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonOverlay {
    pub segments: Vec<Segment>,
    pub points: Vec<PixelPoint>,
}

impl SkeletonOverlay {
    pub fn project(landmarks: &[Landmark], width: u32, height: u32, cutoff: f32) -> Self {
        let to_pixels = |landmark: &Landmark| PixelPoint {
            x: landmark.x * width as f32,
            y: landmark.y * height as f32,
        };

        let segments = POSE_CONNECTIONS
            .iter()
            .filter_map(|&(start, end)| {
                let from = landmarks.get(start)?;
                let to = landmarks.get(end)?;
                (from.is_visible(cutoff) && to.is_visible(cutoff)).then(|| Segment {
                    from: to_pixels(from),
                    to: to_pixels(to),
                })
            })
            .collect();

        let points = landmarks
            .iter()
            .filter(|landmark| landmark.is_visible(cutoff))
            .map(to_pixels)
            .collect();

        Self { segments, points }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.points.is_empty()
    }
}
