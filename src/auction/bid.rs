// Pure bid admission logic. Decides whether a proposed bid is admissible
// against the current auction and team state; never mutates anything.

use thiserror::Error;

use super::state::{Auction, AuctionStatus};

/// Why a proposed bid was turned away. Every variant is a recoverable
/// rejection: the auction state is untouched and the reason is surfaced to
/// the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidRejection {
    #[error("no active player is up for bidding")]
    NoActivePlayer,

    #[error("unknown team: {team_id}")]
    UnknownTeam { team_id: String },

    #[error("team roster is already full ({max} players)")]
    RosterFull { max: usize },

    #[error("bid of {amount} is below the minimum player price of {minimum}")]
    BelowMinimumPrice { amount: u32, minimum: u32 },

    #[error("team already holds the leading bid and cannot raise over itself")]
    SelfBidNotAllowed,

    #[error("bid of {amount} must exceed the current bid of {current}")]
    MustExceedCurrentBid { amount: u32, current: u32 },

    #[error("bid of {amount} exceeds the team's remaining budget of {remaining}")]
    InsufficientBudget { amount: u32, remaining: u32 },

    #[error(
        "bid of {amount} exceeds the maximum of {max_bid} the team can \
         commit while still filling its roster at the minimum price"
    )]
    ExceedsRosterReserve { amount: u32, max_bid: u32 },
}

/// Validate a proposed bid. Checks run in a fixed order and the first
/// failure wins; `Ok(())` means the bid may be admitted.
pub fn validate_bid(auction: &Auction, team_id: &str, amount: u32) -> Result<(), BidRejection> {
    if auction.status != AuctionStatus::Active || auction.current_player_id.is_none() {
        return Err(BidRejection::NoActivePlayer);
    }

    let team = auction
        .team(team_id)
        .ok_or_else(|| BidRejection::UnknownTeam {
            team_id: team_id.to_string(),
        })?;

    if team.roster_full() {
        return Err(BidRejection::RosterFull {
            max: team.max_players.unwrap_or(team.players.len()),
        });
    }

    if amount < auction.min_player_price {
        return Err(BidRejection::BelowMinimumPrice {
            amount,
            minimum: auction.min_player_price,
        });
    }

    if let Some(current) = &auction.current_bid {
        // Open ascending auction with strictly alternating leaders: the
        // leading team cannot outbid itself.
        if current.team_id == team_id {
            return Err(BidRejection::SelfBidNotAllowed);
        }
        if amount <= current.amount {
            return Err(BidRejection::MustExceedCurrentBid {
                amount,
                current: current.amount,
            });
        }
    }

    if amount > team.remaining_budget {
        return Err(BidRejection::InsufficientBudget {
            amount,
            remaining: team.remaining_budget,
        });
    }

    let max_bid = team.max_bid(auction.min_player_price);
    if amount > max_bid {
        return Err(BidRejection::ExceedsRosterReserve { amount, max_bid });
    }

    Ok(())
}
