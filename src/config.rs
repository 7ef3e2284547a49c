// Configuration loading and parsing (auction.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auction::{BidIncrementRule, Player, PlayerStats, Position, Team};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// auction.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire auction.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AuctionFile {
    auction: AuctionSection,
    settings: SettingsSection,
    #[serde(default)]
    rules: Vec<RuleSection>,
    #[serde(default)]
    teams: Vec<TeamSection>,
    #[serde(default)]
    players: Vec<PlayerSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuctionSection {
    name: String,
    min_player_price: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct SettingsSection {
    db_path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RuleSection {
    min_amount: u32,
    max_amount: u32,
    increment: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamSection {
    name: String,
    budget: u32,
    min_players: usize,
    #[serde(default)]
    max_players: Option<usize>,
}

/// One `[[players]]` entry. Stat fields are all optional at parse time;
/// which ones are required depends on the position and is checked during
/// validation.
#[derive(Debug, Clone, Deserialize)]
struct PlayerSection {
    name: String,
    position: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    goals: Option<u32>,
    #[serde(default)]
    assists: Option<u32>,
    #[serde(default)]
    pace: Option<u32>,
    #[serde(default)]
    tackles: Option<u32>,
    #[serde(default)]
    interceptions: Option<u32>,
    #[serde(default)]
    strength: Option<u32>,
    #[serde(default)]
    saves: Option<u32>,
    #[serde(default)]
    clean_sheets: Option<u32>,
    #[serde(default)]
    reflexes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

/// Validated auction setup, ready to hand to the auction house.
#[derive(Debug, Clone)]
pub struct Config {
    pub auction_name: String,
    pub min_player_price: u32,
    pub db_path: String,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub rules: Vec<BidIncrementRule>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/auction.toml` relative to the given `base_dir`.
/// Team and player ids are assigned sequentially in file order (`team_1`,
/// `player_1`, ...).
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("auction.toml");
    let text = read_file(&path)?;
    let file: AuctionFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&file)?;

    let teams = file
        .teams
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut team = Team::new(format!("team_{}", i + 1), &t.name, t.budget, t.min_players);
            team.max_players = t.max_players;
            team
        })
        .collect();

    let players = file
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // Positions were checked during validation.
            let stats = player_stats(p).ok_or_else(|| ConfigError::ValidationError {
                field: format!("players[{i}]"),
                message: "incomplete stats".into(),
            })?;
            let mut player = Player::new(format!("player_{}", i + 1), &p.name, stats);
            player.image = p.image.clone();
            Ok(player)
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let rules = file
        .rules
        .iter()
        .map(|r| BidIncrementRule {
            min_amount: r.min_amount,
            max_amount: r.max_amount,
            increment: r.increment,
        })
        .collect();

    Ok(Config {
        auction_name: file.auction.name,
        min_player_price: file.auction.min_player_price,
        db_path: file.settings.db_path,
        teams,
        players,
        rules,
    })
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Build the position-specific stat block for a player entry, if all of the
/// fields that position requires are present.
fn player_stats(p: &PlayerSection) -> Option<PlayerStats> {
    match Position::from_str_pos(&p.position)? {
        Position::Forward => Some(PlayerStats::Forward {
            goals: p.goals?,
            assists: p.assists?,
            pace: p.pace?,
        }),
        Position::Defence => Some(PlayerStats::Defence {
            tackles: p.tackles?,
            interceptions: p.interceptions?,
            strength: p.strength?,
        }),
        Position::Goalkeeper => Some(PlayerStats::Goalkeeper {
            saves: p.saves?,
            clean_sheets: p.clean_sheets?,
            reflexes: p.reflexes?,
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(file: &AuctionFile) -> Result<(), ConfigError> {
    if file.auction.min_player_price == 0 {
        return Err(ConfigError::ValidationError {
            field: "auction.min_player_price".into(),
            message: "must be greater than 0".into(),
        });
    }

    for (i, team) in file.teams.iter().enumerate() {
        if team.budget == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("teams[{i}].budget"),
                message: "must be greater than 0".into(),
            });
        }
        if team.min_players == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("teams[{i}].min_players"),
                message: "must be greater than 0".into(),
            });
        }
        if let Some(max) = team.max_players {
            if max < team.min_players {
                return Err(ConfigError::ValidationError {
                    field: format!("teams[{i}].max_players"),
                    message: format!(
                        "must be at least min_players ({}), got {max}",
                        team.min_players
                    ),
                });
            }
        }
    }

    for (i, player) in file.players.iter().enumerate() {
        if Position::from_str_pos(&player.position).is_none() {
            return Err(ConfigError::ValidationError {
                field: format!("players[{i}].position"),
                message: format!("unknown position `{}`", player.position),
            });
        }
        if player_stats(player).is_none() {
            return Err(ConfigError::ValidationError {
                field: format!("players[{i}]"),
                message: format!(
                    "missing stat fields for position `{}`",
                    player.position
                ),
            });
        }
    }

    for (i, rule) in file.rules.iter().enumerate() {
        if rule.increment == 0 {
            return Err(ConfigError::ValidationError {
                field: format!("rules[{i}].increment"),
                message: "must be greater than 0".into(),
            });
        }
        if rule.min_amount > rule.max_amount {
            return Err(ConfigError::ValidationError {
                field: format!("rules[{i}]"),
                message: format!(
                    "min_amount {} exceeds max_amount {}",
                    rule.min_amount, rule.max_amount
                ),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
