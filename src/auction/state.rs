// The Auction aggregate: lifecycle status, current bidding sub-state, and
// the append-only event history.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::rules::BidIncrementRule;
use super::team::Team;

/// Auction lifecycle. Strictly forward-moving: Upcoming -> Active ->
/// Completed, no reverse transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Upcoming,
    Active,
    Completed,
}

/// The leading bid on the player currently under the hammer. Exists only
/// while a player is being bid on; cleared on settlement or an unsold call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentBid {
    /// Team holding the bid.
    pub team_id: String,
    /// Bid amount.
    pub amount: u32,
    /// When the bid was admitted.
    pub timestamp: DateTime<Utc>,
}

/// A single entry in the auction's append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuctionEvent {
    /// An admitted bid.
    Bid {
        player_id: String,
        team_id: String,
        amount: u32,
        timestamp: DateTime<Utc>,
    },
    /// A player went unsold and returned to availability.
    Unsold {
        player_id: String,
        timestamp: DateTime<Utc>,
    },
    /// A confirmed sale.
    Sale {
        player_id: String,
        team_id: String,
        amount: u32,
        timestamp: DateTime<Utc>,
    },
}

/// A bidding session over a pool of players among a fixed set of teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    /// Auction identifier (e.g. "auction_1"), assigned by the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: AuctionStatus,
    /// Floor price for every player in the pool.
    pub min_player_price: u32,
    /// Participating teams, in configured order.
    pub teams: Vec<Team>,
    /// The player pool, in configured order.
    pub players: Vec<Player>,
    /// The player currently under the hammer, if any.
    pub current_player_id: Option<String>,
    /// The leading bid on the current player, if any.
    pub current_bid: Option<CurrentBid>,
    /// Append-only log of bid/unsold/sale events.
    pub history: Vec<AuctionEvent>,
    /// Players passed without a sale. Cleared when the auction starts.
    pub unsold_player_ids: BTreeSet<String>,
    /// Players settled to a team.
    pub sold_player_ids: BTreeSet<String>,
    /// Ordered increment rules for one-click raises.
    pub bid_increment_rules: Vec<BidIncrementRule>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Auction {
    /// Create a new Upcoming auction with empty history and bookkeeping.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        min_player_price: u32,
        teams: Vec<Team>,
        players: Vec<Player>,
        bid_increment_rules: Vec<BidIncrementRule>,
    ) -> Self {
        Auction {
            id: id.into(),
            name: name.into(),
            status: AuctionStatus::Upcoming,
            min_player_price,
            teams,
            players,
            current_player_id: None,
            current_bid: None,
            history: Vec::new(),
            unsold_player_ids: BTreeSet::new(),
            sold_player_ids: BTreeSet::new(),
            bid_increment_rules,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Look up a team by id.
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Mutable team lookup.
    pub fn team_mut(&mut self, team_id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == team_id)
    }

    /// Look up a pool player by id.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Mutable pool player lookup.
    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// The player currently under the hammer, if one is selected.
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_id
            .as_deref()
            .and_then(|id| self.player(id))
    }

    pub fn is_sold(&self, player_id: &str) -> bool {
        self.sold_player_ids.contains(player_id)
    }

    pub fn is_unsold(&self, player_id: &str) -> bool {
        self.unsold_player_ids.contains(player_id)
    }

    /// The first pool player that is neither sold nor under the hammer.
    /// Used when the auction starts to put a player up automatically.
    pub fn first_available_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| {
            !self.sold_player_ids.contains(&p.id)
                && self.current_player_id.as_deref() != Some(p.id.as_str())
        })
    }

    /// Whether every pool player has been settled to a team.
    pub fn all_players_sold(&self) -> bool {
        self.players
            .iter()
            .all(|p| self.sold_player_ids.contains(&p.id))
    }

    /// Invariant check: a player id is in at most one of {sold, unsold,
    /// current}.
    pub fn player_states_disjoint(&self) -> bool {
        if self
            .sold_player_ids
            .intersection(&self.unsold_player_ids)
            .next()
            .is_some()
        {
            return false;
        }
        match self.current_player_id.as_deref() {
            Some(id) => !self.is_sold(id) && !self.is_unsold(id),
            None => true,
        }
    }
}
