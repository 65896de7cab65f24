// Game state: a Board plus turn and status metadata
//
// States are values. Applying a move produces a new state and leaves the
// previous one intact, so any number of readers can hold older states.

use crate::board::Board;
use crate::error::GameError;
use crate::types::{GameStatus, Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    player1: Player,
    player2: Player,
    current_player: PlayerId,
    status: GameStatus,
    winning_column: Option<usize>,
}

impl GameState {
    /// Fresh game on an empty board with player 1 to move
    pub fn new(player1: Player, player2: Player) -> Self {
        GameState {
            board: Board::new(),
            player1,
            player2,
            current_player: PlayerId::One,
            status: GameStatus::InProgress,
            winning_column: None,
        }
    }

    /// Analysis position built from an arbitrary board. The status is
    /// `Draw` for a full board and `InProgress` otherwise; wins already on
    /// the board are not detected because the last move is unknown.
    pub fn from_board(board: Board, player1: Player, player2: Player, to_move: PlayerId) -> Self {
        let status = if board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };

        GameState {
            board,
            player1,
            player2,
            current_player: to_move,
            status,
            winning_column: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> &Player {
        &self.player2
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }

    /// Seat to move; frozen at the last mover once the game is over
    pub fn current_player_id(&self) -> PlayerId {
        self.current_player
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.current_player)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Column of the winning move, set only when the game ended in a win
    pub fn winning_column(&self) -> Option<usize> {
        self.winning_column
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.status.winner()
    }

    /// Plays `column` for the current player and returns the resulting state
    pub fn apply_move(&self, column: usize) -> Result<GameState, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver {
                status: self.status,
            });
        }
        if !self.board.is_valid_move(column) {
            return Err(GameError::InvalidMove { column });
        }

        let mover = self.current_player;
        let placement = self.board.place_piece(column, mover)?;

        let is_win = placement.board.check_win(placement.row, column, mover);
        let is_draw = !is_win && placement.board.is_full();

        let status = if is_win {
            GameStatus::won_by(mover)
        } else if is_draw {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };

        let current_player = if status.is_terminal() {
            mover
        } else {
            mover.other()
        };

        Ok(GameState {
            board: placement.board,
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            current_player,
            status,
            winning_column: if is_win { Some(column) } else { None },
        })
    }

    /// Applies a sequence of moves, stopping at the first error
    pub fn apply_moves(&self, columns: &[usize]) -> Result<GameState, GameError> {
        columns
            .iter()
            .try_fold(self.clone(), |state, &col| state.apply_move(col))
    }
}
