// Auction domain: entities, bid validation, and the bidding state machine.

pub mod bid;
pub mod engine;
pub mod player;
pub mod rules;
pub mod state;
pub mod team;

pub use bid::{validate_bid, BidRejection};
pub use engine::{AuctionError, AuctionHouse, TeamSummary};
pub use player::{Player, PlayerStats, Position};
pub use rules::{next_bid, next_increment, BidIncrementRule};
pub use state::{Auction, AuctionEvent, AuctionStatus, CurrentBid};
pub use team::{Acquisition, Team};
