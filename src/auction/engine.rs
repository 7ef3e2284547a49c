// Auction operations: lifecycle transitions, bid admission, and settlement.
//
// Every operation is a synchronous read-modify-write over the in-memory
// auction aggregate. On any error the aggregate is untouched and the reason
// is surfaced to the caller; nothing here is fatal.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::notify::Notifier;
use crate::store::AuctionStore;

use super::bid::{validate_bid, BidRejection};
use super::player::Player;
use super::rules::{next_bid, next_increment, BidIncrementRule};
use super::state::{Auction, AuctionEvent, AuctionStatus, CurrentBid};
use super::team::Team;

/// Errors raised by auction operations. All are recoverable rejections;
/// the auction remains usable after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    // --- configuration errors (raised at create, block creation) ---
    #[error("an auction needs at least 2 teams (got {count})")]
    InsufficientTeams { count: usize },

    #[error("player pool of {available} cannot satisfy the combined roster floor of {required}")]
    InsufficientPlayers { required: usize, available: usize },

    #[error("teams cannot afford their minimum roster at the minimum price: {teams:?}")]
    InvalidTeamBudget { teams: Vec<String> },

    // --- state errors (operation attempted outside its valid state) ---
    #[error("auction not found: {id}")]
    AuctionNotFound { id: String },

    #[error("no auction is currently selected")]
    NoCurrentAuction,

    #[error("auction is not active")]
    AuctionNotActive,

    #[error("auction is not upcoming")]
    AuctionNotUpcoming,

    #[error("no player is currently up for bidding")]
    NoCurrentPlayer,

    #[error("no current bid to settle")]
    NoCurrentBid,

    #[error("player not found: {id}")]
    PlayerNotFound { id: String },

    #[error("player already sold: {id}")]
    PlayerAlreadySold { id: String },

    #[error("admin privileges required")]
    AdminRequired,

    // --- bid rejections (from the validator) ---
    #[error(transparent)]
    Bid(#[from] BidRejection),
}

/// Per-team roster/budget snapshot for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub team_id: String,
    pub name: String,
    pub players_bought: usize,
    pub spent: u32,
    pub remaining_budget: u32,
    pub players_needed: usize,
    pub max_bid: u32,
}

/// The auction state machine. Owns the auction store and the notification
/// sink; all mutations of auction state go through here.
pub struct AuctionHouse {
    store: AuctionStore,
    notifier: Box<dyn Notifier>,
    current_auction_id: Option<String>,
    admin: bool,
}

impl AuctionHouse {
    /// Create an auction house with an empty store. The admin flag starts
    /// on; `set_admin(false)` drops to participant-only operations.
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        AuctionHouse {
            store: AuctionStore::new(),
            notifier,
            current_auction_id: None,
            admin: true,
        }
    }

    /// Create an auction house over a pre-populated store (restart
    /// recovery).
    pub fn with_store(store: AuctionStore, notifier: Box<dyn Notifier>) -> Self {
        AuctionHouse {
            store,
            notifier,
            current_auction_id: None,
            admin: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }

    fn require_admin(&self) -> Result<(), AuctionError> {
        if self.admin {
            Ok(())
        } else {
            Err(AuctionError::AdminRequired)
        }
    }

    // -----------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------

    /// All auctions in the store.
    pub fn auctions(&self) -> &[Auction] {
        self.store.list()
    }

    /// Look up an auction by id.
    pub fn auction(&self, id: &str) -> Option<&Auction> {
        self.store.get(id)
    }

    /// The auction operations currently target, if one is selected.
    pub fn current_auction(&self) -> Option<&Auction> {
        self.current_auction_id
            .as_deref()
            .and_then(|id| self.store.get(id))
    }

    fn current(&self) -> Result<&Auction, AuctionError> {
        self.current_auction().ok_or(AuctionError::NoCurrentAuction)
    }

    fn current_mut(&mut self) -> Result<&mut Auction, AuctionError> {
        let id = self
            .current_auction_id
            .clone()
            .ok_or(AuctionError::NoCurrentAuction)?;
        self.store
            .get_mut(&id)
            .ok_or(AuctionError::AuctionNotFound { id })
    }

    /// The most a team may bid on the current player while still able to
    /// fill its roster floor at the minimum price.
    pub fn max_permissible_bid(&self, team_id: &str) -> Result<u32, AuctionError> {
        let auction = self.current()?;
        let team = auction
            .team(team_id)
            .ok_or_else(|| BidRejection::UnknownTeam {
                team_id: team_id.to_string(),
            })?;
        Ok(team.max_bid(auction.min_player_price))
    }

    /// The increment a one-click raise would apply right now.
    pub fn next_increment(&self) -> Result<u32, AuctionError> {
        let auction = self.current()?;
        let base = auction
            .current_bid
            .as_ref()
            .map(|b| b.amount)
            .unwrap_or(auction.min_player_price);
        Ok(next_increment(base, &auction.bid_increment_rules))
    }

    /// The next proposed bid amount: current bid plus the rule increment,
    /// or the opening price when no bid stands.
    pub fn proposed_bid(&self) -> Result<u32, AuctionError> {
        let auction = self.current()?;
        Ok(match &auction.current_bid {
            Some(bid) => next_bid(bid.amount, &auction.bid_increment_rules),
            None => auction.min_player_price,
        })
    }

    /// Roster/budget snapshot for every team in the current auction.
    pub fn team_summaries(&self) -> Result<Vec<TeamSummary>, AuctionError> {
        let auction = self.current()?;
        Ok(auction
            .teams
            .iter()
            .map(|team| TeamSummary {
                team_id: team.id.clone(),
                name: team.name.clone(),
                players_bought: team.players.len(),
                spent: team.total_spent(),
                remaining_budget: team.remaining_budget,
                players_needed: team.players_needed(),
                max_bid: team.max_bid(auction.min_player_price),
            })
            .collect())
    }

    // -----------------------------------------------------------------
    // Lifecycle operations
    // -----------------------------------------------------------------

    /// Validate and create a new Upcoming auction. Returns its id.
    pub fn create_auction(
        &mut self,
        name: impl Into<String>,
        min_player_price: u32,
        teams: Vec<Team>,
        players: Vec<Player>,
        bid_increment_rules: Vec<BidIncrementRule>,
    ) -> Result<String, AuctionError> {
        self.require_admin()?;

        if teams.len() < 2 {
            return Err(AuctionError::InsufficientTeams { count: teams.len() });
        }

        let required: usize = teams.iter().map(|t| t.min_players).sum();
        if players.len() < required {
            return Err(AuctionError::InsufficientPlayers {
                required,
                available: players.len(),
            });
        }

        let underfunded: Vec<String> = teams
            .iter()
            .filter(|t| t.budget < min_player_price * t.min_players as u32)
            .map(|t| t.name.clone())
            .collect();
        if !underfunded.is_empty() {
            return Err(AuctionError::InvalidTeamBudget { teams: underfunded });
        }

        let name = name.into();
        let id = self.store.allocate_id();
        let auction = Auction::new(
            id.clone(),
            name.clone(),
            min_player_price,
            teams,
            players,
            bid_increment_rules,
        );
        info!(auction_id = %id, "auction created: {name}");
        self.store.upsert(auction);
        self.notifier.success(
            "Auction Created",
            &format!("{name} has been created successfully."),
        );
        Ok(id)
    }

    /// Point subsequent operations at the given auction.
    pub fn set_current_auction(&mut self, id: &str) -> Result<(), AuctionError> {
        if self.store.get(id).is_none() {
            return Err(AuctionError::AuctionNotFound { id: id.to_string() });
        }
        self.current_auction_id = Some(id.to_string());
        Ok(())
    }

    /// Transition Upcoming -> Active. Stamps `started_at`, clears the
    /// unsold set, and puts the first pool player under the hammer.
    pub fn start_auction(&mut self, id: &str) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self
            .store
            .get_mut(id)
            .ok_or_else(|| AuctionError::AuctionNotFound { id: id.to_string() })?;
        if auction.status != AuctionStatus::Upcoming {
            return Err(AuctionError::AuctionNotUpcoming);
        }

        auction.status = AuctionStatus::Active;
        auction.started_at = Some(Utc::now());
        auction.unsold_player_ids.clear();
        auction.current_player_id = auction.first_available_player().map(|p| p.id.clone());
        info!(auction_id = %id, "auction started");

        self.notifier.success(
            "Auction Started",
            "The auction has begun! First player is up for bidding.",
        );
        Ok(())
    }

    /// Transition Active -> Completed. Manual completion is allowed at any
    /// point while active; completing a completed auction is an error, not
    /// a duplicate completion.
    pub fn complete_auction(&mut self, id: &str) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self
            .store
            .get_mut(id)
            .ok_or_else(|| AuctionError::AuctionNotFound { id: id.to_string() })?;
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }

        Self::finish(auction);
        info!(auction_id = %id, "auction completed");
        self.notifier.success(
            "Auction Completed",
            "The auction has been marked as complete.",
        );
        Ok(())
    }

    /// Stamp completion on an active auction. Shared by manual completion
    /// and the sold-out auto-complete path.
    fn finish(auction: &mut Auction) {
        auction.status = AuctionStatus::Completed;
        auction.completed_at = Some(Utc::now());
        auction.current_player_id = None;
        auction.current_bid = None;
    }

    // -----------------------------------------------------------------
    // Bidding operations (on the current auction)
    // -----------------------------------------------------------------

    /// Put a player under the hammer. Rejects sold players; clears any
    /// stale bid from a previously selected player.
    pub fn select_player(&mut self, player_id: &str) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self.current_mut()?;
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }
        if auction.player(player_id).is_none() {
            return Err(AuctionError::PlayerNotFound {
                id: player_id.to_string(),
            });
        }
        if auction.is_sold(player_id) {
            return Err(AuctionError::PlayerAlreadySold {
                id: player_id.to_string(),
            });
        }

        auction.current_player_id = Some(player_id.to_string());
        auction.current_bid = None;
        info!(player_id, "player up for bidding");
        Ok(())
    }

    /// Admit a bid from a team on the current player. Delegates admission
    /// to the validator; on success replaces the current bid and appends a
    /// bid event, on rejection mutates nothing.
    pub fn place_bid(&mut self, team_id: &str, amount: u32) -> Result<(), AuctionError> {
        let auction = self.current_mut()?;

        let mut outcome: Option<(String, String)> = None;
        let result = match validate_bid(auction, team_id, amount) {
            Ok(()) => {
                // Safe after validation: an admissible bid implies an
                // active player and a known team.
                let player_id = auction
                    .current_player_id
                    .clone()
                    .ok_or(AuctionError::NoCurrentPlayer)?;
                let team_name = auction
                    .team(team_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| team_id.to_string());
                let now = Utc::now();

                auction.current_bid = Some(CurrentBid {
                    team_id: team_id.to_string(),
                    amount,
                    timestamp: now,
                });
                auction.history.push(AuctionEvent::Bid {
                    player_id,
                    team_id: team_id.to_string(),
                    amount,
                    timestamp: now,
                });
                info!(team_id, amount, "bid admitted");
                outcome = Some((
                    "Bid Placed".to_string(),
                    format!("{team_name} placed a bid of {amount}."),
                ));
                Ok(())
            }
            Err(rejection) => {
                warn!(team_id, amount, %rejection, "bid rejected");
                self.notifier.failure("Bid Error", &rejection.to_string());
                Err(rejection.into())
            }
        };
        if let Some((title, message)) = outcome {
            self.notifier.success(&title, &message);
        }
        result
    }

    /// Admin correction of the current bid amount, keeping the bidding
    /// team. Re-validates against the minimum price and the leader's max
    /// bid, then rewrites the latest matching history entry in place.
    pub fn edit_bid(&mut self, amount: u32) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self.current_mut()?;
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }
        let (leader_id, old_amount) = match &auction.current_bid {
            Some(bid) => (bid.team_id.clone(), bid.amount),
            None => return Err(AuctionError::NoCurrentBid),
        };

        if amount < auction.min_player_price {
            return Err(BidRejection::BelowMinimumPrice {
                amount,
                minimum: auction.min_player_price,
            }
            .into());
        }
        let max_bid = auction
            .team(&leader_id)
            .map(|t| t.max_bid(auction.min_player_price))
            .unwrap_or(0);
        if amount > max_bid {
            return Err(BidRejection::ExceedsRosterReserve { amount, max_bid }.into());
        }

        let player_id = auction.current_player_id.clone();
        if let Some(bid) = auction.current_bid.as_mut() {
            bid.amount = amount;
        }
        // Rewrite the most recent bid event for this player/team pair;
        // history length is unchanged.
        for event in auction.history.iter_mut().rev() {
            if let AuctionEvent::Bid {
                player_id: event_player,
                team_id: event_team,
                amount: event_amount,
                ..
            } = event
            {
                if player_id.as_deref() == Some(event_player.as_str())
                    && *event_team == leader_id
                {
                    *event_amount = amount;
                    break;
                }
            }
        }
        info!(team_id = %leader_id, old_amount, new_amount = amount, "bid amount corrected");
        self.notifier.success(
            "Bid Updated",
            &format!("Current bid corrected from {old_amount} to {amount}."),
        );
        Ok(())
    }

    /// Pass on the current player without a sale: record an unsold event
    /// and return the player to availability for a later round.
    pub fn mark_unsold(&mut self) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self.current_mut()?;
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }
        let player_id = auction
            .current_player_id
            .clone()
            .ok_or(AuctionError::NoCurrentPlayer)?;

        auction.history.push(AuctionEvent::Unsold {
            player_id: player_id.clone(),
            timestamp: Utc::now(),
        });
        auction.unsold_player_ids.insert(player_id.clone());
        auction.current_player_id = None;
        auction.current_bid = None;
        let player_name = auction
            .player(&player_id)
            .map(|p| p.name.clone())
            .unwrap_or(player_id.clone());
        info!(player_id = %player_id, "player went unsold");

        self.notifier.success(
            "Player Unsold",
            &format!("{player_name} received no sale and returns to the pool."),
        );
        Ok(())
    }

    /// Close the sale on the current player at the current bid: settle the
    /// purchase onto the winning team, then clear the bidding sub-state.
    /// Completes the auction automatically once every pool player is sold.
    ///
    /// Settlement never re-validates the bid; admission was the
    /// validator's job when the bid was placed.
    pub fn confirm_sale(&mut self) -> Result<(), AuctionError> {
        self.require_admin()?;
        let auction = self.current_mut()?;
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive);
        }
        let player_id = auction
            .current_player_id
            .clone()
            .ok_or(AuctionError::NoCurrentPlayer)?;
        let bid = auction
            .current_bid
            .clone()
            .ok_or(AuctionError::NoCurrentBid)?;

        // Settlement proper.
        if let Some(team) = auction.team_mut(&bid.team_id) {
            team.record_purchase(&player_id, bid.amount);
        }
        if let Some(player) = auction.player_mut(&player_id) {
            player.purchase_amount = Some(bid.amount);
        }
        auction.sold_player_ids.insert(player_id.clone());
        // A player passed earlier and later sold is sold, full stop.
        auction.unsold_player_ids.remove(&player_id);
        auction.history.push(AuctionEvent::Sale {
            player_id: player_id.clone(),
            team_id: bid.team_id.clone(),
            amount: bid.amount,
            timestamp: Utc::now(),
        });
        auction.current_player_id = None;
        auction.current_bid = None;

        let player_name = auction
            .player(&player_id)
            .map(|p| p.name.clone())
            .unwrap_or(player_id.clone());
        let team_name = auction
            .team(&bid.team_id)
            .map(|t| t.name.clone())
            .unwrap_or(bid.team_id.clone());
        info!(
            player_id = %player_id,
            team_id = %bid.team_id,
            amount = bid.amount,
            "player sold"
        );

        let sold_out = auction.all_players_sold();
        if sold_out {
            Self::finish(auction);
            info!(auction_id = %auction.id, "all players sold; auction completed");
        }

        self.notifier.success(
            "Player Sold",
            &format!("{player_name} goes to {team_name} for {}.", bid.amount),
        );
        if sold_out {
            self.notifier.success(
                "Auction Complete",
                "All players have been sold. The auction is now complete.",
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::player::PlayerStats;
    use crate::notify::LogNotifier;

    fn forward(id: &str, name: &str) -> Player {
        Player::new(
            id,
            name,
            PlayerStats::Forward {
                goals: 5,
                assists: 2,
                pace: 70,
            },
        )
    }

    fn pool(count: usize) -> Vec<Player> {
        (1..=count)
            .map(|i| forward(&format!("player_{i}"), &format!("Player {i}")))
            .collect()
    }

    fn two_teams() -> Vec<Team> {
        vec![
            Team::new("team_a", "Team A", 1000, 2),
            Team::new("team_b", "Team B", 1000, 2),
        ]
    }

    fn house() -> AuctionHouse {
        AuctionHouse::new(Box::new(LogNotifier))
    }

    /// Create + start a 2-team, 5-player auction and select it.
    fn running_house() -> (AuctionHouse, String) {
        let mut house = house();
        let id = house
            .create_auction("Test Auction", 50, two_teams(), pool(5), vec![])
            .unwrap();
        house.set_current_auction(&id).unwrap();
        house.start_auction(&id).unwrap();
        (house, id)
    }

    // --- creation validation ---

    #[test]
    fn create_rejects_single_team() {
        let mut house = house();
        let result = house.create_auction(
            "Solo",
            50,
            vec![Team::new("team_a", "Team A", 1000, 2)],
            pool(5),
            vec![],
        );
        assert_eq!(result, Err(AuctionError::InsufficientTeams { count: 1 }));
        assert!(house.auctions().is_empty());
    }

    #[test]
    fn create_rejects_short_player_pool() {
        let mut house = house();
        let result = house.create_auction("Short", 50, two_teams(), pool(3), vec![]);
        assert_eq!(
            result,
            Err(AuctionError::InsufficientPlayers {
                required: 4,
                available: 3
            })
        );
    }

    #[test]
    fn create_rejects_underfunded_teams_by_name() {
        let mut house = house();
        let teams = vec![
            Team::new("team_a", "Team A", 1000, 2),
            Team::new("team_b", "Broke FC", 80, 2), // needs 2 * 50
        ];
        let result = house.create_auction("Budget", 50, teams, pool(5), vec![]);
        assert_eq!(
            result,
            Err(AuctionError::InvalidTeamBudget {
                teams: vec!["Broke FC".into()]
            })
        );
    }

    #[test]
    fn create_produces_upcoming_auction() {
        let mut house = house();
        let id = house
            .create_auction("Ok", 50, two_teams(), pool(5), vec![])
            .unwrap();
        let auction = house.auction(&id).unwrap();
        assert_eq!(auction.status, AuctionStatus::Upcoming);
        assert!(auction.history.is_empty());
    }

    // --- lifecycle ---

    #[test]
    fn start_activates_and_selects_first_player() {
        let (house, id) = running_house();
        let auction = house.auction(&id).unwrap();
        assert_eq!(auction.status, AuctionStatus::Active);
        assert!(auction.started_at.is_some());
        assert_eq!(auction.current_player_id.as_deref(), Some("player_1"));
        assert!(auction.unsold_player_ids.is_empty());
    }

    #[test]
    fn start_rejects_non_upcoming() {
        let (mut house, id) = running_house();
        assert_eq!(
            house.start_auction(&id),
            Err(AuctionError::AuctionNotUpcoming)
        );
    }

    #[test]
    fn complete_is_not_idempotent_event_wise() {
        let (mut house, id) = running_house();
        house.complete_auction(&id).unwrap();
        let completed_at = house.auction(&id).unwrap().completed_at;
        assert!(completed_at.is_some());

        // Second completion errors and does not re-stamp.
        assert_eq!(
            house.complete_auction(&id),
            Err(AuctionError::AuctionNotActive)
        );
        assert_eq!(house.auction(&id).unwrap().completed_at, completed_at);
    }

    #[test]
    fn admin_gate_blocks_lifecycle_operations() {
        let (mut house, id) = running_house();
        house.set_admin(false);
        assert_eq!(house.select_player("player_2"), Err(AuctionError::AdminRequired));
        assert_eq!(house.mark_unsold(), Err(AuctionError::AdminRequired));
        assert_eq!(house.confirm_sale(), Err(AuctionError::AdminRequired));
        assert_eq!(house.complete_auction(&id), Err(AuctionError::AdminRequired));
        // Bidding stays open to participants.
        assert!(house.place_bid("team_a", 60).is_ok());
    }

    // --- bidding ---

    #[test]
    fn place_bid_records_current_bid_and_history() {
        let (mut house, id) = running_house();
        house.place_bid("team_a", 60).unwrap();

        let auction = house.auction(&id).unwrap();
        let bid = auction.current_bid.as_ref().unwrap();
        assert_eq!(bid.team_id, "team_a");
        assert_eq!(bid.amount, 60);
        assert_eq!(auction.history.len(), 1);
        assert!(matches!(
            auction.history[0],
            AuctionEvent::Bid { ref team_id, amount: 60, .. } if team_id == "team_a"
        ));
    }

    #[test]
    fn rejected_bid_mutates_nothing() {
        let (mut house, id) = running_house();
        house.place_bid("team_a", 60).unwrap();
        let before = house.auction(&id).unwrap().clone();

        let result = house.place_bid("team_b", 55);
        assert_eq!(
            result,
            Err(AuctionError::Bid(BidRejection::MustExceedCurrentBid {
                amount: 55,
                current: 60
            }))
        );
        let after = house.auction(&id).unwrap();
        assert_eq!(after.history.len(), before.history.len());
        assert_eq!(after.current_bid, before.current_bid);
    }

    #[test]
    fn successive_bids_strictly_increase() {
        let (mut house, id) = running_house();
        house.place_bid("team_a", 50).unwrap();
        house.place_bid("team_b", 51).unwrap();
        house.place_bid("team_a", 60).unwrap();

        let auction = house.auction(&id).unwrap();
        let amounts: Vec<u32> = auction
            .history
            .iter()
            .filter_map(|e| match e {
                AuctionEvent::Bid { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(amounts, vec![50, 51, 60]);
        assert!(amounts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn self_bid_is_rejected() {
        let (mut house, _id) = running_house();
        house.place_bid("team_a", 60).unwrap();
        assert_eq!(
            house.place_bid("team_a", 70),
            Err(AuctionError::Bid(BidRejection::SelfBidNotAllowed))
        );
    }

    // --- edit bid ---

    #[test]
    fn edit_bid_rewrites_history_in_place() {
        let (mut house, id) = running_house();
        house.place_bid("team_a", 60).unwrap();
        house.place_bid("team_b", 70).unwrap();

        house.edit_bid(75).unwrap();

        let auction = house.auction(&id).unwrap();
        assert_eq!(auction.current_bid.as_ref().unwrap().amount, 75);
        assert_eq!(auction.current_bid.as_ref().unwrap().team_id, "team_b");
        // History length unchanged; team_b's entry rewritten, team_a's kept.
        assert_eq!(auction.history.len(), 2);
        assert!(matches!(
            auction.history[1],
            AuctionEvent::Bid { ref team_id, amount: 75, .. } if team_id == "team_b"
        ));
        assert!(matches!(
            auction.history[0],
            AuctionEvent::Bid { amount: 60, .. }
        ));
    }

    #[test]
    fn edit_bid_revalidates_bounds() {
        let (mut house, _id) = running_house();
        house.place_bid("team_a", 60).unwrap();

        assert_eq!(
            house.edit_bid(40),
            Err(AuctionError::Bid(BidRejection::BelowMinimumPrice {
                amount: 40,
                minimum: 50
            }))
        );
        // team_a: budget 1000, needs 2 players -> max 1000 - 50 = 950.
        assert_eq!(
            house.edit_bid(960),
            Err(AuctionError::Bid(BidRejection::ExceedsRosterReserve {
                amount: 960,
                max_bid: 950
            }))
        );
        assert!(house.edit_bid(80).is_ok());
    }

    #[test]
    fn edit_bid_requires_a_current_bid() {
        let (mut house, _id) = running_house();
        assert_eq!(house.edit_bid(60), Err(AuctionError::NoCurrentBid));
    }

    // --- settlement ---

    #[test]
    fn confirm_sale_settles_player_to_team() {
        let (mut house, id) = running_house();
        house.place_bid("team_a", 75).unwrap();
        house.confirm_sale().unwrap();

        let auction = house.auction(&id).unwrap();
        let team = auction.team("team_a").unwrap();
        assert_eq!(team.players.len(), 1);
        assert_eq!(team.players[0].player_id, "player_1");
        assert_eq!(team.players[0].purchase_amount, 75);
        assert_eq!(team.remaining_budget, 925);
        assert!(team.budget_consistent());

        assert!(auction.is_sold("player_1"));
        assert_eq!(
            auction.player("player_1").unwrap().purchase_amount,
            Some(75)
        );
        assert!(auction.current_player_id.is_none());
        assert!(auction.current_bid.is_none());
        assert!(matches!(
            auction.history.last().unwrap(),
            AuctionEvent::Sale { amount: 75, .. }
        ));
        assert!(auction.player_states_disjoint());
    }

    #[test]
    fn confirm_sale_requires_player_and_bid() {
        let (mut house, _id) = running_house();
        // Player selected but no bid yet.
        assert_eq!(house.confirm_sale(), Err(AuctionError::NoCurrentBid));

        house.mark_unsold().unwrap();
        // No player selected at all.
        assert_eq!(house.confirm_sale(), Err(AuctionError::NoCurrentPlayer));
    }

    #[test]
    fn selecting_sold_player_is_rejected() {
        let (mut house, _id) = running_house();
        house.place_bid("team_a", 60).unwrap();
        house.confirm_sale().unwrap();
        assert_eq!(
            house.select_player("player_1"),
            Err(AuctionError::PlayerAlreadySold {
                id: "player_1".into()
            })
        );
    }

    // --- unsold flow ---

    #[test]
    fn unsold_then_resold_clears_unsold_flag() {
        let (mut house, id) = running_house();
        house.mark_unsold().unwrap();
        assert!(house.auction(&id).unwrap().is_unsold("player_1"));

        house.select_player("player_1").unwrap();
        house.place_bid("team_b", 55).unwrap();
        house.confirm_sale().unwrap();

        let auction = house.auction(&id).unwrap();
        assert!(auction.is_sold("player_1"));
        assert!(!auction.is_unsold("player_1"));
        assert!(auction.player_states_disjoint());
    }

    #[test]
    fn mark_unsold_without_player_is_rejected() {
        let (mut house, _id) = running_house();
        house.mark_unsold().unwrap();
        assert_eq!(house.mark_unsold(), Err(AuctionError::NoCurrentPlayer));
    }

    // --- history monotonicity ---

    #[test]
    fn history_only_grows() {
        let (mut house, id) = running_house();
        let mut last_len = 0;
        let mut assert_grew = |house: &AuctionHouse| {
            let len = house.auction(&id).unwrap().history.len();
            assert!(len >= last_len);
            last_len = len;
        };

        house.place_bid("team_a", 60).unwrap();
        assert_grew(&house);
        let _ = house.place_bid("team_b", 50); // rejected
        assert_grew(&house);
        house.edit_bid(65).unwrap(); // in-place rewrite
        assert_grew(&house);
        house.confirm_sale().unwrap();
        assert_grew(&house);
        house.select_player("player_2").unwrap();
        house.mark_unsold().unwrap();
        assert_grew(&house);
    }

    // --- auto-completion ---

    #[test]
    fn auction_completes_when_pool_is_sold_out() {
        let mut house = house();
        let teams = vec![
            Team::new("team_a", "Team A", 1000, 1),
            Team::new("team_b", "Team B", 1000, 1),
        ];
        let id = house
            .create_auction("Small", 50, teams, pool(2), vec![])
            .unwrap();
        house.set_current_auction(&id).unwrap();
        house.start_auction(&id).unwrap();

        house.place_bid("team_a", 60).unwrap();
        house.confirm_sale().unwrap();
        assert_eq!(house.auction(&id).unwrap().status, AuctionStatus::Active);

        house.select_player("player_2").unwrap();
        house.place_bid("team_b", 55).unwrap();
        house.confirm_sale().unwrap();

        let auction = house.auction(&id).unwrap();
        assert_eq!(auction.status, AuctionStatus::Completed);
        assert!(auction.completed_at.is_some());
        assert!(auction.current_player_id.is_none());
    }

    // --- read accessors ---

    #[test]
    fn max_permissible_bid_accessor() {
        let mut house = house();
        let teams = vec![
            Team::new("team_a", "Team A", 200, 2),
            Team::new("team_b", "Team B", 1000, 2),
        ];
        let id = house
            .create_auction("Reserve", 50, teams, pool(4), vec![])
            .unwrap();
        house.set_current_auction(&id).unwrap();
        assert_eq!(house.max_permissible_bid("team_a").unwrap(), 150);
        assert!(matches!(
            house.max_permissible_bid("team_z"),
            Err(AuctionError::Bid(BidRejection::UnknownTeam { .. }))
        ));
    }

    #[test]
    fn proposed_bid_follows_increment_rules() {
        let mut house = house();
        let rules = vec![
            BidIncrementRule {
                min_amount: 1,
                max_amount: 99,
                increment: 5,
            },
            BidIncrementRule {
                min_amount: 100,
                max_amount: 500,
                increment: 25,
            },
        ];
        let id = house
            .create_auction("Rules", 50, two_teams(), pool(4), rules)
            .unwrap();
        house.set_current_auction(&id).unwrap();
        house.start_auction(&id).unwrap();

        // No bid yet: proposal is the opening price.
        assert_eq!(house.proposed_bid().unwrap(), 50);
        house.place_bid("team_a", 60).unwrap();
        assert_eq!(house.next_increment().unwrap(), 5);
        assert_eq!(house.proposed_bid().unwrap(), 65);
        house.place_bid("team_b", 120).unwrap();
        assert_eq!(house.proposed_bid().unwrap(), 145);
    }

    #[test]
    fn team_summaries_reflect_purchases() {
        let (mut house, _id) = running_house();
        house.place_bid("team_a", 100).unwrap();
        house.confirm_sale().unwrap();

        let summaries = house.team_summaries().unwrap();
        let a = summaries.iter().find(|s| s.team_id == "team_a").unwrap();
        assert_eq!(a.players_bought, 1);
        assert_eq!(a.spent, 100);
        assert_eq!(a.remaining_budget, 900);
        assert_eq!(a.players_needed, 1);
        assert_eq!(a.max_bid, 900);

        let b = summaries.iter().find(|s| s.team_id == "team_b").unwrap();
        assert_eq!(b.players_bought, 0);
        assert_eq!(b.max_bid, 950);
    }
}
