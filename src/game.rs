use crate::gesture::Move;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
    #[strum(serialize = "No hand detected")]
    NoHandDetected,
}

impl Move {
    /// The move this one defeats
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }
}

/// Outcome from the player's point of view
pub fn determine_winner(player: Move, ai: Move) -> Outcome {
    if player == ai {
        Outcome::Tie
    } else if player.beats() == ai {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}
