// Minimax search with alpha-beta pruning for the Hard tier
//
// The root takes any immediate win outright. Otherwise candidates are tried
// centre-first and each is searched to a fixed depth with alternating
// maximizing (AI) and minimizing (opponent) layers. Leaves are scored by the
// configured personality's Evaluator. A forced win scores
// `win_score + remaining depth`, so a faster win outranks a slower one.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

use crate::board::Board;
use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::eval::Evaluator;
use crate::state::GameState;
use crate::strategy::DecisionStrategy;
use crate::types::{AiPersonality, PlayerId};

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited below the root
    pub nodes: u64,
    /// Leaf evaluations
    pub evaluations: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
}

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub column: usize,
    pub score: i32,
    pub stats: SearchStats,
    /// True when the column came from the random fallback rather than search
    pub fallback: bool,
}

pub struct SearchStrategy {
    evaluator: Evaluator,
    config: SearchConfig,
    rng: StdRng,
    cancel: CancelToken,
}

impl SearchStrategy {
    pub fn new(evaluator: Evaluator, config: SearchConfig, rng: StdRng, cancel: CancelToken) -> Self {
        SearchStrategy {
            evaluator,
            config,
            rng,
            cancel,
        }
    }

    pub fn personality(&self) -> AiPersonality {
        self.evaluator.personality()
    }

    /// Searches the position for the current player of `state`
    pub fn search(&mut self, state: &GameState) -> SearchOutcome {
        let start_time = Instant::now();
        let board = state.board();
        let ai = state.current_player_id();
        let valid = board.valid_columns();
        let mut stats = SearchStats::default();

        if valid.is_empty() {
            warn!("Hard: no valid columns, falling back to column 0");
            return SearchOutcome {
                column: 0,
                score: 0,
                stats,
                fallback: true,
            };
        }

        if let Some(col) = valid.iter().copied().find(|&c| board.is_winning_move(c, ai)) {
            debug!("Hard: immediate win at column {}", col);
            return SearchOutcome {
                column: col,
                score: self.config.win_score + self.config.depth as i32,
                stats,
                fallback: false,
            };
        }

        let remaining = self.config.depth.saturating_sub(1);
        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<(usize, i32)> = None;

        for col in Board::center_order(&valid) {
            if self.cancel.is_cancelled() && best.is_some() {
                info!("Hard: search cancelled, keeping best candidate so far");
                break;
            }

            let Ok(placement) = board.place_piece(col, ai) else {
                continue;
            };
            let Some(score) = self.minimax(&placement.board, remaining, alpha, beta, false, ai, &mut stats)
            else {
                // A cut-short subtree never competes with fully searched candidates
                if best.is_none() {
                    stats.evaluations += 1;
                    let score = self.evaluator.evaluate(&placement.board, ai);
                    info!("Hard: search cancelled before any candidate finished, column {} by static score", col);
                    best = Some((col, score));
                } else {
                    info!("Hard: search cancelled, discarding unfinished column {}", col);
                }
                break;
            };
            debug!("Hard: column {} scored {}", col, score);

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                stats.cutoffs += 1;
                break;
            }
        }

        let outcome = match best {
            Some((column, score)) => SearchOutcome {
                column,
                score,
                stats,
                fallback: false,
            },
            None => {
                let column = valid[self.rng.random_range(0..valid.len())];
                warn!("Hard: no candidate improved on the sentinel, random column {}", column);
                SearchOutcome {
                    column,
                    score: i32::MIN,
                    stats,
                    fallback: true,
                }
            }
        };

        info!(
            "Hard ({}): chose column {} (score: {}, nodes: {}, cutoffs: {}, time: {}ms)",
            self.personality().as_str(),
            outcome.column,
            outcome.score,
            outcome.stats.nodes,
            outcome.stats.cutoffs,
            start_time.elapsed().as_millis()
        );

        outcome
    }

    /// Alpha-beta minimax. `ai` is the maximizing seat throughout.
    /// Returns `None` when the cancel token tripped before the subtree was
    /// fully searched.
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ai: PlayerId,
        stats: &mut SearchStats,
    ) -> Option<i32> {
        stats.nodes += 1;

        if self.cancel.is_cancelled() {
            return None;
        }

        let valid = board.valid_columns();
        if depth == 0 || valid.is_empty() {
            stats.evaluations += 1;
            return Some(self.evaluator.evaluate(board, ai));
        }

        let forced_win = self.config.win_score + depth as i32;
        let mover = if maximizing { ai } else { ai.other() };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for col in Board::center_order(&valid) {
            let Ok(placement) = board.place_piece(col, mover) else {
                continue;
            };
            if placement.board.check_win(placement.row, col, mover) {
                return Some(if maximizing { forced_win } else { -forced_win });
            }

            let score = self.minimax(&placement.board, depth - 1, alpha, beta, !maximizing, ai, stats)?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }

            if beta <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }

        Some(best)
    }
}

impl DecisionStrategy for SearchStrategy {
    fn next_move(&mut self, state: &GameState) -> usize {
        self.search(state).column
    }

    fn name(&self) -> &str {
        "Hard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Player;
    use rand::SeedableRng;

    fn hard(depth: u8, personality: AiPersonality) -> SearchStrategy {
        let mut config = Config::default_hardcoded();
        config.search.depth = depth;
        SearchStrategy::new(
            Evaluator::new(personality, &config, StdRng::seed_from_u64(3)),
            config.search.clone(),
            StdRng::seed_from_u64(4),
            CancelToken::new(),
        )
    }

    fn game(moves: &[usize]) -> GameState {
        GameState::new(
            Player::human(PlayerId::One, "Human"),
            Player::ai(PlayerId::Two, "Bot", crate::types::AiDifficulty::Hard),
        )
        .apply_moves(moves)
        .unwrap()
    }

    #[test]
    fn test_immediate_win_skips_search() {
        // AI (player 2) has four stacked in column 8 and is to move
        let state = game(&[0, 8, 1, 8, 0, 8, 1, 8, 2]);
        let outcome = hard(5, AiPersonality::Balanced).search(&state);
        assert_eq!(outcome.column, 8);
        assert_eq!(outcome.stats.nodes, 0);
        assert!(!outcome.fallback);
    }

    #[test]
    fn test_blocks_open_four_threat() {
        // Player 1 holds columns 2..=4 on the bottom row plus 5 would make
        // an open four; the AI must stop it before it becomes unstoppable.
        let state = game(&[2, 2, 3, 3, 4]);
        let outcome = hard(3, AiPersonality::Balanced).search(&state);
        assert!(
            outcome.column == 1 || outcome.column == 5,
            "expected a block next to the three, got {}",
            outcome.column
        );
    }

    #[test]
    fn test_forced_loss_is_scored_negative() {
        // Player 1 threatens to win at both 0 and 5 on the bottom row
        let state = game(&[1, 1, 2, 2, 3, 3, 4]);
        let outcome = hard(3, AiPersonality::Balanced).search(&state);
        // Every reply loses, so the first centre-ordered candidate is kept
        assert_eq!(outcome.column, 4);
        assert!(outcome.score <= -100_000);
    }

    #[test]
    fn test_search_is_reproducible() {
        let state = game(&[4, 3, 5]);
        let a = hard(3, AiPersonality::Balanced).search(&state);
        let b = hard(3, AiPersonality::Balanced).search(&state);
        assert_eq!(a, b);
        assert!(a.stats.nodes > 0);
        assert!(a.stats.evaluations > 0);
    }

    #[test]
    fn test_cancelled_search_still_returns_a_valid_column() {
        let state = game(&[4]);
        let mut strategy = hard(5, AiPersonality::Balanced);
        strategy.cancel.cancel();
        let outcome = strategy.search(&state);
        assert!(state.board().is_valid_move(outcome.column));
        // Only the first root candidate is examined, and it stops right away
        assert_eq!(outcome.column, 4);
        assert_eq!(outcome.stats.nodes, 1);
    }

    #[test]
    fn test_cancelled_subtree_is_not_scored() {
        // Player 1 has four stacked in column 0; the AI plays 4 instead of blocking
        let state = game(&[0, 8, 0, 8, 0, 7, 0]);
        let blunder = state.board().place_piece(4, PlayerId::Two).unwrap().board;

        let mut strategy = hard(5, AiPersonality::Balanced);
        let mut stats = SearchStats::default();
        let full = strategy.minimax(&blunder, 4, i32::MIN, i32::MAX, false, PlayerId::Two, &mut stats);
        assert_eq!(full, Some(-100_004));

        strategy.cancel.cancel();
        let cut = strategy.minimax(&blunder, 4, i32::MIN, i32::MAX, false, PlayerId::Two, &mut stats);
        assert_eq!(cut, None);
    }

    #[test]
    fn test_blocks_vertical_four() {
        let state = game(&[0, 8, 0, 8, 0, 7, 0]);
        let outcome = hard(3, AiPersonality::Balanced).search(&state);
        assert_eq!(outcome.column, 0);
        assert!(outcome.score > -100_000);
    }

    #[test]
    fn test_two_move_win_scores_two_below_immediate_win() {
        // AI (player 2) holds row 8 columns 2..=4 with both ends open; playing
        // 5 (or 1) makes an open four that wins on the AI's next move
        let state = game(&[8, 2, 8, 3, 7, 4, 7]);
        let outcome = hard(5, AiPersonality::Balanced).search(&state);
        assert_eq!(outcome.column, 5);
        assert_eq!(outcome.score, 100_000 + 3);
    }

    #[test]
    fn test_deeper_win_scores_lower() {
        // AI (player 2) can complete column 8 right now
        let state = game(&[0, 8, 1, 8, 0, 8, 1, 8, 2]);
        let mut strategy = hard(5, AiPersonality::Balanced);
        let root = strategy.search(&state);
        assert_eq!(root.score, 100_000 + 5);

        // The same win found two plies below the root
        let mut stats = SearchStats::default();
        let deeper = strategy.minimax(state.board(), 3, i32::MIN, i32::MAX, true, PlayerId::Two, &mut stats);
        assert_eq!(deeper, Some(root.score - 2));
    }
}
