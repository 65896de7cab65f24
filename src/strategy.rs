// Per-difficulty move selection
//
// Every tier implements `DecisionStrategy`. Easy and Medium react to
// immediate wins and threats and otherwise play randomly; Hard runs the
// minimax search in `search.rs`. Strategies keep no state between calls
// apart from their random generator.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::eval::Evaluator;
use crate::search::SearchStrategy;
use crate::state::GameState;
use crate::types::{AiDifficulty, AiPersonality, PlayerId};

/// Universal interface for all AI tiers
pub trait DecisionStrategy: Send {
    /// Column to play for the current player of `state`.
    /// Falls back to column 0 when no column is playable.
    fn next_move(&mut self, state: &GameState) -> usize;

    /// Display name used in logs and match reports
    fn name(&self) -> &str;
}

/// Builds the strategy for a difficulty. `personality` only matters for
/// Hard and defaults to Balanced.
pub fn create_strategy(
    difficulty: AiDifficulty,
    personality: Option<AiPersonality>,
    config: &Config,
    mut rng: StdRng,
    cancel: CancelToken,
) -> Box<dyn DecisionStrategy> {
    match difficulty {
        AiDifficulty::Easy => Box::new(ReactiveStrategy::easy(config, rng)),
        AiDifficulty::Medium => Box::new(ReactiveStrategy::medium(rng)),
        AiDifficulty::Hard => {
            let personality = personality.unwrap_or_default();
            let evaluator = Evaluator::new(personality, config, StdRng::from_rng(&mut rng));
            Box::new(SearchStrategy::new(
                evaluator,
                config.search.clone(),
                rng,
                cancel,
            ))
        }
    }
}

/// Winning column for `mover`, else a column that stops the opponent's
/// immediate win
pub fn win_or_block(board: &Board, mover: PlayerId) -> Option<usize> {
    board
        .winning_move(mover)
        .or_else(|| board.winning_move(mover.other()))
}

/// Easy and Medium tiers: take a win, block a loss, otherwise play a
/// (possibly centre-weighted) random column
pub struct ReactiveStrategy {
    name: &'static str,
    center_columns: Vec<usize>,
    center_weight: usize,
    rng: StdRng,
}

impl ReactiveStrategy {
    /// Easy enters each centre column `center_weight` times into the pool
    pub fn easy(config: &Config, rng: StdRng) -> Self {
        ReactiveStrategy {
            name: "Easy",
            center_columns: Board::center_columns(config.reactive.center_columns),
            center_weight: config.reactive.center_weight,
            rng,
        }
    }

    /// Medium picks uniformly among valid columns
    pub fn medium(rng: StdRng) -> Self {
        ReactiveStrategy {
            name: "Medium",
            center_columns: Vec::new(),
            center_weight: 1,
            rng,
        }
    }

    /// Candidate pool with centre columns duplicated
    fn selection_pool(&self, valid: &[usize]) -> Vec<usize> {
        valid
            .iter()
            .flat_map(|&col| {
                let entries = if self.center_columns.contains(&col) {
                    self.center_weight
                } else {
                    1
                };
                std::iter::repeat(col).take(entries)
            })
            .collect()
    }
}

impl DecisionStrategy for ReactiveStrategy {
    fn next_move(&mut self, state: &GameState) -> usize {
        let board = state.board();
        let mover = state.current_player_id();

        if let Some(col) = win_or_block(board, mover) {
            debug!("{}: immediate win/block at column {}", self.name, col);
            return col;
        }

        let pool = self.selection_pool(&board.valid_columns());
        if pool.is_empty() {
            warn!("{}: no valid columns, falling back to column 0", self.name);
            return 0;
        }

        pool[self.rng.random_range(0..pool.len())]
    }

    fn name(&self) -> &str {
        self.name
    }
}
