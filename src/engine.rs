use crate::config::GameConfig;
use crate::game::{determine_winner, Outcome};
use crate::gesture::{classify_with_threshold, Move};
use crate::landmarks::HandLandmarks;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    CountingDown,
    Resolved,
    Cooldown,
}

/// Everything the engine remembers between frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundState {
    pub active: bool,
    pub phase: RoundPhase,
    pub countdown_started_at: Option<Instant>,
    pub next_round_at: Option<Instant>,
    pub last_result_at: Option<Instant>,
    pub player_move: Option<Move>,
    pub ai_move: Option<Move>,
    pub outcome: Option<Outcome>,
}

impl RoundState {
    fn clear_result(&mut self) {
        self.player_move = None;
        self.ai_move = None;
        self.outcome = None;
    }
}

/// Snapshot handed to whatever draws the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderModel {
    pub countdown_display: Option<u64>,
    pub player_move: Option<Move>,
    pub ai_move: Option<Move>,
    pub outcome: Option<Outcome>,
    pub active: bool,
}

impl RenderModel {
    pub fn instructions(&self) -> String {
        format!(
            "Press 's' to {} game, 'q' to quit",
            if self.active { "stop" } else { "start" }
        )
    }
}

/// Drives the countdown / resolve / cooldown cycle of the game.
///
/// The engine never reads a clock. Every mutation takes the current instant
/// from the caller, so a test can replay any timeline it likes.
#[derive(Debug)]
pub struct RoundEngine<R: Rng = StdRng> {
    config: GameConfig,
    state: RoundState,
    rng: R,
}

impl RoundEngine<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            config,
            state: RoundState::default(),
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn toggle(&mut self, now: Instant) {
        self.state.active = !self.state.active;

        if self.state.active {
            log::info!("game started");
            self.start_countdown(now);
            self.state.last_result_at = None;
        } else {
            log::info!("game stopped");
            // results stay on screen until they expire
            self.state.phase = RoundPhase::Idle;
            self.state.countdown_started_at = None;
            self.state.next_round_at = None;
        }
    }

    /// Advance the game by one processed frame.
    ///
    /// `hand` is the first detected hand of the frame, if any. It is only
    /// looked at on the frame where the countdown runs out.
    pub fn tick(&mut self, now: Instant, hand: Option<&HandLandmarks>) -> RenderModel {
        if self.state.active
            && self.state.phase == RoundPhase::CountingDown
            && self.countdown_remaining(now) == 0
        {
            self.resolve(now, hand);
        }

        if self.state.active
            && self.state.phase != RoundPhase::CountingDown
            && self.state.next_round_at.is_some_and(|at| now >= at)
        {
            self.start_countdown(now);
        }

        self.expire_result(now);

        self.render(now)
    }

    /// Current presentation state without advancing anything
    pub fn render(&self, now: Instant) -> RenderModel {
        let countdown_display = if self.state.active && self.state.phase == RoundPhase::CountingDown
        {
            Some(self.countdown_remaining(now)).filter(|n| *n > 0)
        } else {
            None
        };

        RenderModel {
            countdown_display,
            player_move: self.state.player_move,
            ai_move: self.state.ai_move,
            outcome: self.state.outcome,
            active: self.state.active,
        }
    }

    /// Whole seconds left on the countdown, counting down from the configured length
    fn countdown_remaining(&self, now: Instant) -> u64 {
        let elapsed = self
            .state
            .countdown_started_at
            .map_or(0, |start| now.saturating_duration_since(start).as_secs());
        self.config.countdown_secs.saturating_sub(elapsed)
    }

    fn start_countdown(&mut self, now: Instant) {
        log::debug!("countdown started");
        self.state.phase = RoundPhase::CountingDown;
        self.state.countdown_started_at = Some(now);
        self.state.next_round_at = Some(now + self.config.round_interval());
        self.state.clear_result();
    }

    fn resolve(&mut self, now: Instant, hand: Option<&HandLandmarks>) {
        let player = hand.and_then(|h| classify_with_threshold(h, self.config.extension_threshold));

        match player {
            Some(player) => {
                let ai = Move::ALL[self.rng.gen_range(0..Move::ALL.len())];
                let outcome = determine_winner(player, ai);
                log::info!("player {} vs ai {}: {}", player, ai, outcome);
                self.state.player_move = Some(player);
                self.state.ai_move = Some(ai);
                self.state.outcome = Some(outcome);
            }
            None => {
                log::info!("{}", Outcome::NoHandDetected);
                self.state.player_move = None;
                self.state.ai_move = None;
                self.state.outcome = Some(Outcome::NoHandDetected);
            }
        }

        self.state.last_result_at = Some(now);
        self.state.countdown_started_at = None;
        self.state.phase = RoundPhase::Resolved;
    }

    fn expire_result(&mut self, now: Instant) {
        let Some(at) = self.state.last_result_at else {
            return;
        };
        if self.state.outcome.is_some()
            && now.saturating_duration_since(at) > self.config.result_display()
        {
            log::debug!("result display expired");
            self.state.clear_result();
            if self.state.phase == RoundPhase::Resolved {
                self.state.phase = RoundPhase::Cooldown;
            }
        }
    }
}
