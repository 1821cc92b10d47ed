use crate::landmarks::*;
use serde::{Deserialize, Serialize};

/// Default margin a fingertip must clear above its knuckle to count as extended
pub const EXTENSION_THRESHOLD: f32 = 0.05;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// (tip, base) landmark indices
    pub fn joints(self) -> (usize, usize) {
        match self {
            Finger::Thumb => (THUMB_TIP, THUMB_MCP),
            Finger::Index => (INDEX_TIP, INDEX_MCP),
            Finger::Middle => (MIDDLE_TIP, MIDDLE_MCP),
            Finger::Ring => (RING_TIP, RING_MCP),
            Finger::Pinky => (PINKY_TIP, PINKY_MCP),
        }
    }
}

pub fn is_finger_extended(hand: &HandLandmarks, finger: Finger, threshold: f32) -> bool {
    let (tip, base) = finger.joints();
    hand.point(tip).y < hand.point(base).y - threshold
}

/// Extension state of every digit on one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn measure(hand: &HandLandmarks, threshold: f32) -> Self {
        Self {
            thumb: is_finger_extended(hand, Finger::Thumb, threshold),
            index: is_finger_extended(hand, Finger::Index, threshold),
            middle: is_finger_extended(hand, Finger::Middle, threshold),
            ring: is_finger_extended(hand, Finger::Ring, threshold),
            pinky: is_finger_extended(hand, Finger::Pinky, threshold),
        }
    }

    /// Map the four non-thumb fingers onto a move. The thumb never participates.
    pub fn to_move(self) -> Option<Move> {
        match (self.index, self.middle, self.ring, self.pinky) {
            (false, false, false, false) => Some(Move::Rock),
            (true, true, true, true) => Some(Move::Paper),
            (true, true, false, false) => Some(Move::Scissors),
            _ => None,
        }
    }
}

fn label(extended: bool) -> &'static str {
    if extended {
        "Extended"
    } else {
        "Folded"
    }
}

pub fn classify(hand: &HandLandmarks) -> Option<Move> {
    classify_with_threshold(hand, EXTENSION_THRESHOLD)
}

pub fn classify_with_threshold(hand: &HandLandmarks, threshold: f32) -> Option<Move> {
    let states = FingerStates::measure(hand, threshold);

    log::debug!(
        "Thumb: {}, Index: {}, Middle: {}, Ring: {}, Pinky: {}",
        label(states.thumb),
        label(states.index),
        label(states.middle),
        label(states.ring),
        label(states.pinky),
    );

    states.to_move()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand_source::synthetic_hand;

    const FINGERS: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    fn expected(index: bool, middle: bool, ring: bool, pinky: bool) -> Option<Move> {
        if !index && !middle && !ring && !pinky {
            Some(Move::Rock)
        } else if index && middle && ring && pinky {
            Some(Move::Paper)
        } else if index && middle && !ring && !pinky {
            Some(Move::Scissors)
        } else {
            None
        }
    }

    #[test]
    fn every_finger_combination_follows_priority_table() {
        for mask in 0..16u8 {
            let bits = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0];
            for thumb in [false, true] {
                let hand = synthetic_hand([thumb, bits[0], bits[1], bits[2], bits[3]]);
                assert_eq!(
                    classify(&hand),
                    expected(bits[0], bits[1], bits[2], bits[3]),
                    "mask {:04b}, thumb {}",
                    mask,
                    thumb
                );
            }
        }
    }

    #[test]
    fn synthetic_fingers_measure_as_requested() {
        let hand = synthetic_hand([true, false, true, false, true]);
        let states = FingerStates::measure(&hand, EXTENSION_THRESHOLD);
        assert!(states.thumb);
        assert!(!states.index);
        assert!(states.middle);
        assert!(!states.ring);
        assert!(states.pinky);
        for finger in FINGERS {
            let (tip, base) = finger.joints();
            assert!(tip > base);
        }
    }

    #[test]
    fn extension_is_strict_against_threshold() {
        let mut points = *synthetic_hand([false; 5]).points();
        points[INDEX_MCP] = LandmarkPoint::new(0.5, 0.6);
        // exactly at the margin is still folded
        points[INDEX_TIP] = LandmarkPoint::new(0.5, 0.6 - 0.25);
        let hand = HandLandmarks::new(points);

        assert!(!is_finger_extended(&hand, Finger::Index, 0.25));
        assert!(is_finger_extended(&hand, Finger::Index, 0.2));
    }

    #[test]
    fn larger_threshold_folds_marginal_fingers() {
        let paper = synthetic_hand([false, true, true, true, true]);
        assert_eq!(classify(&paper), Some(Move::Paper));
        assert_eq!(classify_with_threshold(&paper, 1.0), Some(Move::Rock));
    }

    #[test]
    fn classify_is_deterministic() {
        let hand = synthetic_hand([false, true, true, false, false]);
        let first = classify(&hand);
        for _ in 0..10 {
            assert_eq!(classify(&hand), first);
        }
        assert_eq!(first, Some(Move::Scissors));
    }

    #[test]
    fn move_display_matches_labels() {
        assert_eq!(Move::Rock.to_string(), "Rock");
        assert_eq!(Move::Scissors.to_string(), "Scissors");
        assert_eq!(Move::ALL.len(), 3);
    }
}
