// Heuristic scoring of non-terminal positions
//
// All personalities share one window scan: every five-cell window in the four
// orientations is classified by how many AI and opponent pieces it holds.
// Mixed windows are dead and score nothing. Each personality then plugs in
// its own weight table, positional bonus and (for Tricky) random jitter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, COLUMNS, ROWS, WIN_LENGTH};
use crate::config::{Config, PersonalityWeights};
use crate::types::{AiPersonality, PlayerId};

/// Piece counts for one window, seen from a given player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounts {
    pub own: usize,
    pub opponent: usize,
    pub empty: usize,
}

impl WindowCounts {
    pub fn of(cells: &[Option<PlayerId>; WIN_LENGTH], player: PlayerId) -> Self {
        let own = cells.iter().filter(|&&c| c == Some(player)).count();
        let opponent = cells.iter().filter(|&&c| c == Some(player.other())).count();
        WindowCounts {
            own,
            opponent,
            empty: WIN_LENGTH - own - opponent,
        }
    }

    /// Both sides present, so neither can ever complete this window
    pub fn is_blocked(&self) -> bool {
        self.own > 0 && self.opponent > 0
    }
}

/// Board evaluator for one personality.
///
/// Scores are from the AI seat's point of view: positive favours the AI.
/// Balanced, Aggressive and Defensive are deterministic; Tricky draws from
/// its own seeded generator.
pub struct Evaluator {
    personality: AiPersonality,
    weights: PersonalityWeights,
    center_columns: Vec<usize>,
    rng: StdRng,
}

impl Evaluator {
    pub fn new(personality: AiPersonality, config: &Config, rng: StdRng) -> Self {
        Evaluator {
            personality,
            weights: config.evaluator.for_personality(personality).clone(),
            center_columns: Board::center_columns(config.evaluator.center_columns),
            rng,
        }
    }

    /// Balanced evaluator with the built-in weights
    pub fn balanced() -> Self {
        Self::new(
            AiPersonality::Balanced,
            &Config::default_hardcoded(),
            StdRng::seed_from_u64(0),
        )
    }

    pub fn personality(&self) -> AiPersonality {
        self.personality
    }

    /// Scores `board` for the `ai` seat
    pub fn evaluate(&mut self, board: &Board, ai: PlayerId) -> i32 {
        let mut base = 0;
        let mut window_noise = 0;

        for window in board.windows() {
            let counts = WindowCounts::of(&window, ai);
            let score = self.window_score(counts);
            if score != 0 && self.weights.window_jitter > 0 {
                let jitter = self.weights.window_jitter;
                window_noise += self.rng.random_range(-jitter..=jitter);
            }
            base += score;
        }

        base += self.positional_bonus(board, ai);

        base + window_noise + self.final_jitter(base)
    }

    /// Weight for one window; zero for empty or blocked windows
    fn window_score(&self, counts: WindowCounts) -> i32 {
        if counts.is_blocked() {
            return 0;
        }
        match (counts.own, counts.opponent) {
            (0, 0) => 0,
            (own, 0) => self.weights.ai[own - 1],
            (0, opponent) => self.weights.opponent[opponent - 1],
            _ => 0,
        }
    }

    /// Bonus for AI pieces on preferred columns. Opponent pieces never earn one.
    fn positional_bonus(&self, board: &Board, ai: PlayerId) -> i32 {
        let per_piece = |cols: &[usize], bonus: i32| -> i32 {
            let pieces = cols
                .iter()
                .map(|&col| (0..ROWS).filter(|&row| board.get(row, col) == Some(ai)).count())
                .sum::<usize>();
            pieces as i32 * bonus
        };

        match self.personality {
            AiPersonality::Balanced | AiPersonality::Aggressive => {
                per_piece(&self.center_columns, self.weights.center_bonus)
            }
            AiPersonality::Defensive => 0,
            AiPersonality::Tricky => per_piece(&[0, COLUMNS - 1], self.weights.edge_bonus),
        }
    }

    /// Perturbation of up to `score_jitter_percent` of the unperturbed total
    fn final_jitter(&mut self, base: i32) -> i32 {
        if self.weights.score_jitter_percent == 0 {
            return 0;
        }
        let spread = base.abs() / 100 * self.weights.score_jitter_percent;
        if spread == 0 {
            return 0;
        }
        self.rng.random_range(-spread..=spread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(moves: &[(usize, PlayerId)]) -> Board {
        moves.iter().fold(Board::new(), |b, &(col, player)| {
            b.place_piece(col, player).unwrap().board
        })
    }

    fn evaluator(personality: AiPersonality, seed: u64) -> Evaluator {
        Evaluator::new(
            personality,
            &Config::default_hardcoded(),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_window_counts() {
        let window = [
            Some(PlayerId::One),
            None,
            Some(PlayerId::One),
            Some(PlayerId::Two),
            None,
        ];
        let counts = WindowCounts::of(&window, PlayerId::One);
        assert_eq!(counts.own, 2);
        assert_eq!(counts.opponent, 1);
        assert_eq!(counts.empty, 2);
        assert!(counts.is_blocked());
    }

    #[test]
    fn test_empty_board_is_zero() {
        let mut eval = Evaluator::balanced();
        assert_eq!(eval.evaluate(&Board::new(), PlayerId::One), 0);
        assert_eq!(eval.evaluate(&Board::new(), PlayerId::Two), 0);
    }

    #[test]
    fn test_five_in_a_row_scores_above_threshold() {
        let board = board_with(&(0..5).map(|c| (c, PlayerId::One)).collect::<Vec<_>>());
        let mut eval = Evaluator::balanced();
        assert!(eval.evaluate(&board, PlayerId::One) > 90_000);
        assert!(eval.evaluate(&board, PlayerId::Two) < -70_000);
    }

    #[test]
    fn test_balanced_is_deterministic() {
        let board = board_with(&[(4, PlayerId::One), (3, PlayerId::Two), (4, PlayerId::One)]);
        let first = evaluator(AiPersonality::Balanced, 1).evaluate(&board, PlayerId::One);
        let second = evaluator(AiPersonality::Balanced, 99).evaluate(&board, PlayerId::One);
        assert_eq!(first, second);
    }

    #[test]
    fn test_center_piece_beats_edge_piece() {
        let mut eval = Evaluator::balanced();
        let center = eval.evaluate(&board_with(&[(4, PlayerId::One)]), PlayerId::One);
        let edge = eval.evaluate(&board_with(&[(0, PlayerId::One)]), PlayerId::One);
        assert!(center > edge, "center {} should beat edge {}", center, edge);
    }

    #[test]
    fn test_positional_bonus_is_asymmetric() {
        // A lone opponent piece in the centre earns no positional bonus for it
        let mut eval = Evaluator::balanced();
        let own = eval.evaluate(&board_with(&[(4, PlayerId::One)]), PlayerId::One);
        let theirs = eval.evaluate(&board_with(&[(4, PlayerId::Two)]), PlayerId::One);
        // Windows: own side +5 each, opponent side -4 each, plus +1 bonus for own
        assert!(own > 0 && theirs < 0);
        assert_eq!(own - 1, theirs.abs() / 4 * 5);
    }

    #[test]
    fn test_defensive_fears_threats_more_than_balanced() {
        let board = board_with(&(0..3).map(|c| (c, PlayerId::Two)).collect::<Vec<_>>());
        let balanced = evaluator(AiPersonality::Balanced, 0).evaluate(&board, PlayerId::One);
        let defensive = evaluator(AiPersonality::Defensive, 0).evaluate(&board, PlayerId::One);
        assert!(defensive < balanced);
    }

    #[test]
    fn test_aggressive_values_own_lines_more() {
        let board = board_with(&(0..3).map(|c| (c, PlayerId::One)).collect::<Vec<_>>());
        let balanced = evaluator(AiPersonality::Balanced, 0).evaluate(&board, PlayerId::One);
        let aggressive = evaluator(AiPersonality::Aggressive, 0).evaluate(&board, PlayerId::One);
        assert!(aggressive > balanced);
    }

    #[test]
    fn test_tricky_jitter_is_bounded_and_seeded() {
        let board = board_with(&[
            (4, PlayerId::One),
            (4, PlayerId::Two),
            (3, PlayerId::One),
            (0, PlayerId::Two),
            (5, PlayerId::One),
        ]);

        let mut calm_config = Config::default_hardcoded();
        calm_config.evaluator.tricky.window_jitter = 0;
        calm_config.evaluator.tricky.score_jitter_percent = 0;
        let base = Evaluator::new(AiPersonality::Tricky, &calm_config, StdRng::seed_from_u64(0))
            .evaluate(&board, PlayerId::One);

        let windows = Board::new().windows().count() as i32;
        let max_noise = base.abs() / 10 + windows * 3;

        for seed in 0..20 {
            let score = evaluator(AiPersonality::Tricky, seed).evaluate(&board, PlayerId::One);
            assert!(
                (score - base).abs() <= max_noise,
                "seed {}: {} too far from {}",
                seed,
                score,
                base
            );
        }

        let a = evaluator(AiPersonality::Tricky, 7).evaluate(&board, PlayerId::One);
        let b = evaluator(AiPersonality::Tricky, 7).evaluate(&board, PlayerId::One);
        assert_eq!(a, b);
    }

    #[test]
    fn test_center_columns_come_from_evaluator_section() {
        let board = board_with(&[(2, PlayerId::One)]);
        let baseline = evaluator(AiPersonality::Balanced, 0).evaluate(&board, PlayerId::One);

        // The Easy tier's setting does not move the evaluator's centre
        let mut config = Config::default_hardcoded();
        config.reactive.center_columns = 1;
        let reactive_changed = Evaluator::new(AiPersonality::Balanced, &config, StdRng::seed_from_u64(0))
            .evaluate(&board, PlayerId::One);
        assert_eq!(reactive_changed, baseline);

        // Narrowing the evaluator's centre drops the bonus for column 2
        let mut config = Config::default_hardcoded();
        config.evaluator.center_columns = 1;
        let narrowed = Evaluator::new(AiPersonality::Balanced, &config, StdRng::seed_from_u64(0))
            .evaluate(&board, PlayerId::One);
        assert_eq!(narrowed, baseline - config.evaluator.balanced.center_bonus);
    }

    #[test]
    fn test_tricky_prefers_edges() {
        let mut calm_config = Config::default_hardcoded();
        calm_config.evaluator.tricky.window_jitter = 0;
        calm_config.evaluator.tricky.score_jitter_percent = 0;
        let mut eval =
            Evaluator::new(AiPersonality::Tricky, &calm_config, StdRng::seed_from_u64(0));

        // One horizontal, one vertical and one "/" window cover the corner
        let edge = eval.evaluate(&board_with(&[(0, PlayerId::One)]), PlayerId::One);
        assert_eq!(edge, 3 * 4 + 5);
    }
}
