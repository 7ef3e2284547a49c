// Team state: roster acquisitions, budget bookkeeping, and the budget
// reservation calculator.

use serde::{Deserialize, Serialize};

/// A player won at auction, as recorded on the winning team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
    /// Id of the purchased player.
    pub player_id: String,
    /// Hammer price paid.
    pub purchase_amount: u32,
}

/// A team participating in an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier (e.g. "team_2").
    pub id: String,
    /// Display name of the team.
    pub name: String,
    /// Total budget, fixed at creation.
    pub budget: u32,
    /// Budget not yet committed to purchases.
    pub remaining_budget: u32,
    /// Roster floor the team must reach before the auction ends.
    pub min_players: usize,
    /// Optional roster ceiling.
    #[serde(default)]
    pub max_players: Option<usize>,
    /// Players won so far, in purchase order.
    pub players: Vec<Acquisition>,
}

impl Team {
    /// Create a new team with its full budget unspent and no acquisitions.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        budget: u32,
        min_players: usize,
    ) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            budget,
            remaining_budget: budget,
            min_players,
            max_players: None,
            players: Vec::new(),
        }
    }

    /// How many more players this team needs to reach its roster floor.
    pub fn players_needed(&self) -> usize {
        self.min_players.saturating_sub(self.players.len())
    }

    /// Whether the team's roster ceiling (if any) has been reached.
    pub fn roster_full(&self) -> bool {
        self.max_players
            .is_some_and(|max| self.players.len() >= max)
    }

    /// Maximum bid this team may place on the current player.
    ///
    /// A team that still needs N players after this one must keep
    /// `N * min_player_price` unspent, or it can never reach its roster
    /// floor. The slot under the hammer itself is not reserved for: with
    /// one slot left the whole remaining budget is in play.
    pub fn max_bid(&self, min_player_price: u32) -> u32 {
        let needed = self.players_needed();
        if needed <= 1 {
            return self.remaining_budget;
        }
        let reserved = (needed as u32 - 1) * min_player_price;
        self.remaining_budget.saturating_sub(reserved)
    }

    /// Record a settled purchase: append the acquisition and deduct the
    /// price from the remaining budget.
    pub fn record_purchase(&mut self, player_id: impl Into<String>, amount: u32) {
        self.players.push(Acquisition {
            player_id: player_id.into(),
            purchase_amount: amount,
        });
        self.remaining_budget = self.remaining_budget.saturating_sub(amount);
    }

    /// Total spent across all acquisitions.
    pub fn total_spent(&self) -> u32 {
        self.players.iter().map(|a| a.purchase_amount).sum()
    }

    /// Budget identity check: `remaining_budget = budget - total_spent`.
    /// Holds at all times outside an in-flight bid.
    pub fn budget_consistent(&self) -> bool {
        self.budget == self.remaining_budget + self.total_spent()
    }
}
