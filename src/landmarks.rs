use serde::{Deserialize, Serialize};

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// One skeletal joint in normalized image coordinates (smaller y is higher up)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

impl From<(f32, f32)> for LandmarkPoint {
    fn from(v: (f32, f32)) -> Self {
        LandmarkPoint::new(v.0, v.1)
    }
}

/// The full 21-point skeleton of one detected hand.
///
/// Indices follow the usual hand-tracking convention: 0 is the wrist, then
/// four joints per digit from the thumb to the pinky, tips at 4, 8, 12, 16, 20.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [LandmarkPoint; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }
}
