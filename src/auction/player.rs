// Player entities and position-specific stat lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions a pool player can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Forward,
    Defence,
    Goalkeeper,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Accepts the full names plus common short forms:
    /// - "FWD"/"F" -> Forward, "DEF"/"D" -> Defence, "GK"/"G" -> Goalkeeper
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "FORWARD" | "FWD" | "F" => Some(Position::Forward),
            "DEFENCE" | "DEFENSE" | "DEF" | "D" => Some(Position::Defence),
            "GOALKEEPER" | "GK" | "G" => Some(Position::Goalkeeper),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Forward => "Forward",
            Position::Defence => "Defence",
            Position::Goalkeeper => "Goalkeeper",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Position-specific stat line. The variant tag always matches the player's
/// position; `Player::new` enforces this at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerStats {
    Forward {
        goals: u32,
        assists: u32,
        pace: u32,
    },
    Defence {
        tackles: u32,
        interceptions: u32,
        strength: u32,
    },
    Goalkeeper {
        saves: u32,
        clean_sheets: u32,
        reflexes: u32,
    },
}

impl PlayerStats {
    /// The position this stat line belongs to.
    pub fn position(&self) -> Position {
        match self {
            PlayerStats::Forward { .. } => Position::Forward,
            PlayerStats::Defence { .. } => Position::Defence,
            PlayerStats::Goalkeeper { .. } => Position::Goalkeeper,
        }
    }

    /// Stat names and values in display order.
    pub fn entries(&self) -> [(&'static str, u32); 3] {
        match *self {
            PlayerStats::Forward {
                goals,
                assists,
                pace,
            } => [("goals", goals), ("assists", assists), ("pace", pace)],
            PlayerStats::Defence {
                tackles,
                interceptions,
                strength,
            } => [
                ("tackles", tackles),
                ("interceptions", interceptions),
                ("strength", strength),
            ],
            PlayerStats::Goalkeeper {
                saves,
                clean_sheets,
                reflexes,
            } => [
                ("saves", saves),
                ("clean_sheets", clean_sheets),
                ("reflexes", reflexes),
            ],
        }
    }
}

/// A player in the auction pool.
///
/// Immutable once the pool is set up, except for `purchase_amount` which the
/// settlement engine writes exactly once when the player is sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier (e.g. "player_3").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Playing position. Always agrees with the `stats` variant.
    pub position: Position,
    /// Optional image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Position-specific numeric attributes.
    pub stats: PlayerStats,
    /// Final hammer price once sold. None while available/unsold.
    #[serde(default)]
    pub purchase_amount: Option<u32>,
}

impl Player {
    /// Create a new pool player. The position is derived from the stat line
    /// so the two can never disagree.
    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: PlayerStats) -> Self {
        Player {
            id: id.into(),
            name: name.into(),
            position: stats.position(),
            image: None,
            stats,
            purchase_amount: None,
        }
    }
}
