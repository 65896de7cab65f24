// Core game types shared by every module
// Players, seats and the enumerations exposed to collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat identifier, also used as the cell marker on the board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    /// Integer id of the seat (1 or 2)
    pub fn id(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// The opposing seat
    pub fn other(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Who controls a seat
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerType {
    Human,
    AI,
}

/// AI strength tier
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
}

impl AiDifficulty {
    pub fn all() -> [AiDifficulty; 3] {
        [AiDifficulty::Easy, AiDifficulty::Medium, AiDifficulty::Hard]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiDifficulty::Easy => "easy",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
        }
    }

    /// Case-insensitive parse, used by the binaries
    pub fn parse(s: &str) -> Option<AiDifficulty> {
        match s.to_lowercase().as_str() {
            "easy" => Some(AiDifficulty::Easy),
            "medium" => Some(AiDifficulty::Medium),
            "hard" => Some(AiDifficulty::Hard),
            _ => None,
        }
    }
}

/// Evaluator flavour used by the Hard tier
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiPersonality {
    #[default]
    Balanced,
    Aggressive,
    Defensive,
    Tricky,
}

impl AiPersonality {
    pub fn all() -> [AiPersonality; 4] {
        [
            AiPersonality::Balanced,
            AiPersonality::Aggressive,
            AiPersonality::Defensive,
            AiPersonality::Tricky,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiPersonality::Balanced => "balanced",
            AiPersonality::Aggressive => "aggressive",
            AiPersonality::Defensive => "defensive",
            AiPersonality::Tricky => "tricky",
        }
    }

    pub fn parse(s: &str) -> Option<AiPersonality> {
        match s.to_lowercase().as_str() {
            "balanced" => Some(AiPersonality::Balanced),
            "aggressive" => Some(AiPersonality::Aggressive),
            "defensive" => Some(AiPersonality::Defensive),
            "tricky" => Some(AiPersonality::Tricky),
            _ => None,
        }
    }
}

/// Lifecycle of a game; anything but `InProgress` is terminal
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    Player1Won,
    Player2Won,
    Draw,
}

impl GameStatus {
    /// Status recording a win for the given seat
    pub fn won_by(player: PlayerId) -> GameStatus {
        match player {
            PlayerId::One => GameStatus::Player1Won,
            PlayerId::Two => GameStatus::Player2Won,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != GameStatus::InProgress
    }

    /// Winning seat, if the game ended in a win
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameStatus::Player1Won => Some(PlayerId::One),
            GameStatus::Player2Won => Some(PlayerId::Two),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

/// A participant in a game
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerType,
    pub difficulty: Option<AiDifficulty>,
}

impl Player {
    pub fn human(id: PlayerId, name: &str) -> Self {
        Player {
            id,
            name: name.to_string(),
            kind: PlayerType::Human,
            difficulty: None,
        }
    }

    pub fn ai(id: PlayerId, name: &str, difficulty: AiDifficulty) -> Self {
        Player {
            id,
            name: name.to_string(),
            kind: PlayerType::AI,
            difficulty: Some(difficulty),
        }
    }

    pub fn is_ai(&self) -> bool {
        self.kind == PlayerType::AI
    }
}
