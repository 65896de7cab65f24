// Game orchestration
//
// GameService owns one hosted session: it builds the players and the AI
// strategy, validates and applies moves, and asks the strategy for AI
// moves. Finished games with an AI opponent are reported to a
// ResultRecorder. The search itself is CPU bound, so callers on a
// latency-sensitive path should use `get_ai_move_async`, which runs the
// strategy on tokio's blocking pool. AI moves and rollout estimates carry
// separate cancel tokens so stopping one never affects the other.

use chrono::{DateTime, Utc};
use log::{error, info};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::GameError;
use crate::estimator::{self, ColumnEstimate, WinProbabilityEstimator};
use crate::state::GameState;
use crate::strategy::{create_strategy, DecisionStrategy};
use crate::types::{AiDifficulty, AiPersonality, GameStatus, Player, PlayerId};

/// Strategy handle that a blocking task can own
pub type SharedStrategy = Arc<Mutex<Box<dyn DecisionStrategy>>>;

/// Result of a finished game from player 1's point of view
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    Draw,
}

/// Record handed to the statistics/leaderboard collaborator
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub player_name: String,
    pub difficulty: Option<AiDifficulty>,
    pub result: GameOutcome,
    pub duration_secs: i64,
}

/// Receives finished games. Implementations must not fail the game flow.
pub trait ResultRecorder: Send + Sync {
    fn record(&self, result: &GameResult);
}

/// Default recorder: writes each result to the log as JSON
pub struct LogRecorder;

impl ResultRecorder for LogRecorder {
    fn record(&self, result: &GameResult) {
        match serde_json::to_string(result) {
            Ok(json) => info!("Game result: {}", json),
            Err(e) => error!("Failed to serialize game result: {}", e),
        }
    }
}

pub struct GameService {
    config: Config,
    strategy: Option<SharedStrategy>,
    difficulty: Option<AiDifficulty>,
    recorder: Box<dyn ResultRecorder>,
    ai_cancel: CancelToken,
    estimate_cancel: CancelToken,
    seed: Option<u64>,
    games_started: u64,
    estimators_built: u64,
    started_at: DateTime<Utc>,
}

impl GameService {
    /// Creates a new service with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the service's lifetime
    pub fn new(config: Config) -> Self {
        GameService {
            config,
            strategy: None,
            difficulty: None,
            recorder: Box::new(LogRecorder),
            ai_cancel: CancelToken::new(),
            estimate_cancel: CancelToken::new(),
            seed: None,
            games_started: 0,
            estimators_built: 0,
            started_at: Utc::now(),
        }
    }

    /// Makes every random choice of later games reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_recorder(mut self, recorder: Box<dyn ResultRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generator for the next game's strategy: seeded per game when a seed
    /// is set, OS entropy otherwise
    fn next_game_rng(&mut self) -> StdRng {
        self.games_started += 1;
        self.derive_rng(self.games_started)
    }

    /// Generator for the next rollout estimator, drawn from a stream
    /// separate from the games so estimates never shift game seeds
    fn next_estimator_rng(&mut self) -> StdRng {
        self.estimators_built += 1;
        self.derive_rng(self.estimators_built | (1 << 63))
    }

    fn derive_rng(&self, index: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Starts a game. Player 2 is the AI when `is_ai_opponent` is set, in
    /// which case `difficulty` is required; `personality` only affects Hard.
    pub fn start_new_game(
        &mut self,
        player1_name: &str,
        player2_name: &str,
        is_ai_opponent: bool,
        difficulty: Option<AiDifficulty>,
        personality: Option<AiPersonality>,
    ) -> Result<GameState, GameError> {
        let player1 = Player::human(PlayerId::One, player1_name);

        let player2 = if is_ai_opponent {
            let difficulty = difficulty.ok_or(GameError::MissingDifficulty)?;
            let rng = self.next_game_rng();
            let strategy = create_strategy(
                difficulty,
                personality,
                &self.config,
                rng,
                self.ai_cancel.clone(),
            );
            self.strategy = Some(Arc::new(Mutex::new(strategy)));
            self.difficulty = Some(difficulty);
            Player::ai(PlayerId::Two, player2_name, difficulty)
        } else {
            self.strategy = None;
            self.difficulty = None;
            Player::human(PlayerId::Two, player2_name)
        };

        self.started_at = Utc::now();
        info!(
            "GAME START: {} vs {} ({})",
            player1.name,
            player2.name,
            self.difficulty.map_or("human", |d| d.as_str())
        );

        Ok(GameState::new(player1, player2))
    }

    /// Plays `column` for the current player and returns the next state
    pub fn make_move(&self, state: &GameState, column: usize) -> Result<GameState, GameError> {
        let next = state.apply_move(column)?;

        if next.is_terminal() {
            info!(
                "GAME OVER: {:?} after {} moves",
                next.status(),
                next.board().piece_count()
            );
            self.report(&next);
        }

        Ok(next)
    }

    fn report(&self, state: &GameState) {
        if self.difficulty.is_none() {
            return;
        }

        let result = match state.status() {
            GameStatus::Player1Won => GameOutcome::Won,
            GameStatus::Player2Won => GameOutcome::Lost,
            GameStatus::Draw | GameStatus::InProgress => GameOutcome::Draw,
        };

        self.recorder.record(&GameResult {
            player_name: state.player1().name.clone(),
            difficulty: self.difficulty,
            result,
            duration_secs: (Utc::now() - self.started_at).num_seconds(),
        });
    }

    /// Checks that an AI move may be requested and returns the strategy
    fn ai_strategy(&self, state: &GameState) -> Result<SharedStrategy, GameError> {
        let strategy = self.strategy.as_ref().ok_or(GameError::NoAiConfigured)?;

        if !state.current_player().is_ai() {
            return Err(GameError::NotAiTurn {
                player: state.current_player_id(),
            });
        }

        self.ai_cancel.reset();
        Ok(Arc::clone(strategy))
    }

    /// Column chosen by the configured AI, computed on the calling thread
    pub fn get_ai_move(&self, state: &GameState) -> Result<usize, GameError> {
        let strategy = self.ai_strategy(state)?;
        let column = strategy.lock().next_move(state);
        Ok(column)
    }

    /// Same as `get_ai_move` but runs the strategy on the blocking pool
    pub async fn get_ai_move_async(&self, state: &GameState) -> Result<usize, GameError> {
        let strategy = self.ai_strategy(state)?;
        let state = state.clone();

        tokio::task::spawn_blocking(move || strategy.lock().next_move(&state))
            .await
            .map_err(|e| GameError::AiTaskFailed(e.to_string()))
    }

    /// Asks a running AI move to stop early
    pub fn cancel_ai_move(&self) {
        self.ai_cancel.cancel();
    }

    /// Asks a running rollout estimate to stop early
    pub fn cancel_estimate(&self) {
        self.estimate_cancel.cancel();
    }

    /// Rollout estimator wired to the estimate cancel token
    pub fn estimator(&mut self) -> WinProbabilityEstimator {
        let rng = self.next_estimator_rng();
        WinProbabilityEstimator::new(
            self.config.estimator.clone(),
            rng,
            self.estimate_cancel.clone(),
        )
    }

    /// Fast win-probability estimate for the player to move
    pub fn win_probability(&self, state: &GameState) -> f64 {
        estimator::estimate_current(&self.config.estimator, state)
    }

    /// Monte-Carlo estimate per playable column, best first
    pub fn column_estimates(&mut self, state: &GameState, simulations: usize) -> Vec<ColumnEstimate> {
        self.estimate_cancel.reset();
        self.estimator().estimate_by_rollout(state, simulations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ai_game(service: &mut GameService) -> GameState {
        let state = service
            .start_new_game("Alice", "Computer", true, Some(AiDifficulty::Easy), None)
            .unwrap();
        service.make_move(&state, 4).unwrap()
    }

    #[test]
    fn test_estimate_requests_leave_ai_cancel_alone() {
        let mut service = GameService::new(Config::default_hardcoded()).with_seed(1);
        let state = ai_game(&mut service);

        service.cancel_ai_move();
        let estimates = service.column_estimates(&state, 18);
        assert_eq!(estimates.len(), 9);
        assert!(service.ai_cancel.is_cancelled());
        assert!(!service.estimate_cancel.is_cancelled());
    }

    #[test]
    fn test_ai_requests_leave_estimate_cancel_alone() {
        let mut service = GameService::new(Config::default_hardcoded()).with_seed(1);
        let state = ai_game(&mut service);

        service.cancel_estimate();
        let col = service.get_ai_move(&state).unwrap();
        assert!(state.board().is_valid_move(col));
        assert!(service.estimate_cancel.is_cancelled());
        assert!(service.estimator().estimate_by_rollout(&state, 18).is_empty());
    }

    #[test]
    fn test_estimates_do_not_advance_game_seeds() {
        let mut plain = GameService::new(Config::default_hardcoded()).with_seed(9);
        let mut busy = GameService::new(Config::default_hardcoded()).with_seed(9);

        let first = ai_game(&mut busy);
        busy.win_probability(&first);
        busy.column_estimates(&first, 9);
        busy.estimator();
        assert_eq!(busy.games_started, 1);
        assert_eq!(busy.estimators_built, 2);

        ai_game(&mut plain);
        let a = ai_game(&mut plain);
        let b = ai_game(&mut busy);
        let picks = |service: &GameService, state: &GameState| -> Vec<usize> {
            (0..10).map(|_| service.get_ai_move(state).unwrap()).collect()
        };
        assert_eq!(picks(&plain, &a), picks(&busy, &b));
    }
}
