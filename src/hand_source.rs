//! Stand-ins for the camera and landmark detector.
//!
//! The game only ever sees `HandLandmarks`. Where they come from is up to a
//! `HandSource`: a pose held on the keyboard, or frames recorded earlier by a
//! real detector and saved as JSON Lines.

use crate::landmarks::*;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Produces the hands detected in the next frame (possibly none)
pub trait HandSource {
    fn next_frame(&mut self) -> Vec<HandLandmarks>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Pose {
    Fist,
    Flat,
    Vee,
    Point,
}

impl Pose {
    /// thumb, index, middle, ring, pinky
    pub fn extended(self) -> [bool; 5] {
        match self {
            Pose::Fist => [false, false, false, false, false],
            Pose::Flat => [true, true, true, true, true],
            Pose::Vee => [false, true, true, false, false],
            Pose::Point => [false, true, false, false, false],
        }
    }

    pub fn hand(self) -> HandLandmarks {
        synthetic_hand(self.extended())
    }
}

const WRIST_AT: (f32, f32) = (0.5, 0.9);

// (mcp joint index, knuckle position) for the four fingers
const KNUCKLES: [(usize, (f32, f32)); 4] = [
    (INDEX_MCP, (0.42, 0.60)),
    (MIDDLE_MCP, (0.50, 0.58)),
    (RING_MCP, (0.57, 0.60)),
    (PINKY_MCP, (0.63, 0.64)),
];

/// Build a plausible right hand, palm to camera, with the given digits
/// (thumb first) straightened and the rest curled into the palm.
pub fn synthetic_hand(extended: [bool; 5]) -> HandLandmarks {
    let mut points = [LandmarkPoint::default(); LANDMARK_COUNT];
    points[WRIST] = WRIST_AT.into();

    points[THUMB_CMC] = (0.42, 0.82).into();
    points[THUMB_MCP] = (0.36, 0.75).into();
    if extended[0] {
        points[THUMB_IP] = (0.32, 0.67).into();
        points[THUMB_TIP] = (0.29, 0.59).into();
    } else {
        points[THUMB_IP] = (0.38, 0.72).into();
        points[THUMB_TIP] = (0.43, 0.73).into();
    }

    for (finger, (mcp, (x, y))) in KNUCKLES.into_iter().enumerate() {
        // pip, dip, tip offsets from the knuckle
        let offsets: [f32; 3] = if extended[finger + 1] {
            [-0.08, -0.14, -0.20]
        } else {
            [-0.04, 0.0, 0.03]
        };
        points[mcp] = (x, y).into();
        for (joint, dy) in offsets.into_iter().enumerate() {
            points[mcp + joint + 1] = (x, y + dy).into();
        }
    }

    HandLandmarks::new(points)
}

/// A single hand held in a fixed pose, or no hand at all
#[derive(Debug, Clone, Default)]
pub struct PoseSource {
    pose: Option<Pose>,
}

impl PoseSource {
    pub fn new(pose: Option<Pose>) -> Self {
        Self { pose }
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Option<Pose>) {
        self.pose = pose;
    }
}

impl HandSource for PoseSource {
    fn next_frame(&mut self) -> Vec<HandLandmarks> {
        self.pose.map(|p| vec![p.hand()]).unwrap_or_default()
    }
}

/// Replays recorded detector output, looping at the end.
///
/// One frame per line. A frame is a JSON array of hands, each hand an array
/// of 21 `{"x", "y", "z"}` points. Blank lines and `null` are frames with no
/// hand.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<Vec<HandLandmarks>>,
    cursor: usize,
}

impl ReplaySource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("opening replay {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("reading replay {}", path.display()))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut frames = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                frames.push(Vec::new());
                continue;
            }
            let hands: Option<Vec<HandLandmarks>> = serde_json::from_str(line)
                .with_context(|| format!("bad frame on line {}", n + 1))?;
            frames.push(hands.unwrap_or_default());
        }
        log::info!("loaded {} replay frames", frames.len());
        Ok(Self { frames, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl HandSource for ReplaySource {
    fn next_frame(&mut self) -> Vec<HandLandmarks> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        frame
    }
}
