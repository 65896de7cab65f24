// Win-probability estimation
//
// Two independent queries over any game state: a Monte-Carlo estimate per
// candidate column from random playouts, and a fast line-scan estimate of the
// current position.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::board::Board;
use crate::cancel::CancelToken;
use crate::config::EstimatorConfig;
use crate::eval::WindowCounts;
use crate::state::GameState;
use crate::types::PlayerId;

/// Rollout result for one candidate column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnEstimate {
    pub column: usize,
    /// Percentage of rollouts won by the player to move, 0..=100
    pub probability: f64,
    /// Rollouts completed for this column
    pub simulations: usize,
}

pub struct WinProbabilityEstimator {
    config: EstimatorConfig,
    rng: StdRng,
    cancel: CancelToken,
}

impl WinProbabilityEstimator {
    pub fn new(config: EstimatorConfig, rng: StdRng, cancel: CancelToken) -> Self {
        WinProbabilityEstimator {
            config,
            rng,
            cancel,
        }
    }

    /// Monte-Carlo estimate for every playable column, best first.
    ///
    /// The request is capped at `max_simulations` in total and at
    /// `max_simulations_per_column` per column, with at least one rollout per
    /// column. Terminal states and zero-simulation requests yield no entries.
    pub fn estimate_by_rollout(&mut self, state: &GameState, simulations: usize) -> Vec<ColumnEstimate> {
        let board = state.board();
        let valid = board.valid_columns();
        let total = simulations.min(self.config.max_simulations);

        if state.is_terminal() || valid.is_empty() || total == 0 {
            return Vec::new();
        }

        let per_column = (total / valid.len()).clamp(1, self.config.max_simulations_per_column);
        let mover = state.current_player_id();
        let mut estimates = Vec::with_capacity(valid.len());

        'columns: for col in valid {
            let mut wins = 0;
            let mut played = 0;

            for _ in 0..per_column {
                if self.cancel.is_cancelled() {
                    if played > 0 {
                        estimates.push(Self::estimate(col, wins, played));
                    }
                    info!("Rollout estimate cancelled after column {}", col);
                    break 'columns;
                }
                if self.rollout(board, col, mover) == Some(mover) {
                    wins += 1;
                }
                played += 1;
            }

            estimates.push(Self::estimate(col, wins, played));
        }

        estimates.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        debug!(
            "Rollout estimate: {} columns, {} rollouts each",
            estimates.len(),
            per_column
        );
        estimates
    }

    fn estimate(column: usize, wins: usize, played: usize) -> ColumnEstimate {
        ColumnEstimate {
            column,
            probability: wins as f64 / played as f64 * 100.0,
            simulations: played,
        }
    }

    /// Plays `first` for `mover`, then random moves for both sides until
    /// someone wins, the board fills or the ply cap is hit. Returns the winner.
    fn rollout(&mut self, board: &Board, first: usize, mover: PlayerId) -> Option<PlayerId> {
        let placement = board.place_piece(first, mover).ok()?;
        if placement.board.check_win(placement.row, first, mover) {
            return Some(mover);
        }

        let mut board = placement.board;
        let mut to_move = mover.other();

        for _ in 0..self.config.max_rollout_plies {
            let valid = board.valid_columns();
            if valid.is_empty() {
                return None;
            }

            let col = valid[self.rng.random_range(0..valid.len())];
            let placement = board.place_piece(col, to_move).ok()?;
            if placement.board.check_win(placement.row, col, to_move) {
                return Some(to_move);
            }

            board = placement.board;
            to_move = to_move.other();
        }

        None
    }

    /// Quick estimate for the player to move; see [`estimate_current`]
    pub fn estimate_current(&self, state: &GameState) -> f64 {
        estimate_current(&self.config, state)
    }
}

/// Quick estimate for the player to move, as a percentage.
///
/// Finished games give 100 to the winner and 0 otherwise (draws included).
/// Running games map the line-scan difference onto a linear scale and
/// clamp it to `[min_probability, max_probability]`. Needs no random source.
pub fn estimate_current(config: &EstimatorConfig, state: &GameState) -> f64 {
    let player = state.current_player_id();

    if state.is_terminal() {
        return match state.winner() {
            Some(winner) if winner == player => 100.0,
            _ => 0.0,
        };
    }

    let board = state.board();
    let diff = line_score(config, board, player) - line_score(config, board, player.other());
    let probability = config.scale_center + diff as f64 / config.scale_divisor * config.scale_factor;

    probability.clamp(config.min_probability, config.max_probability)
}

/// Light window scan: own open lines count up, the opponent's count down
fn line_score(config: &EstimatorConfig, board: &Board, player: PlayerId) -> i32 {
    board
        .windows()
        .map(|window| {
            let counts = WindowCounts::of(&window, player);
            if counts.is_blocked() {
                0
            } else if counts.own > 0 {
                light_weight(config, counts.own, counts.empty)
            } else {
                -light_weight(config, counts.opponent, counts.empty)
            }
        })
        .sum()
}

fn light_weight(config: &EstimatorConfig, count: usize, empty: usize) -> i32 {
    match (count, empty) {
        (4, 1) => config.four_weight,
        (3, 2) => config.three_weight,
        (2, 3) => config.two_weight,
        _ => 0,
    }
}
