// In-memory auction repository.
//
// An owned store object rather than module-level mutable state:
// constructed at process start, torn down at process end, exposing
// get/list/upsert.

use crate::auction::Auction;

/// Owns every auction known to the process and hands out sequential ids.
#[derive(Debug, Default)]
pub struct AuctionStore {
    auctions: Vec<Auction>,
    next_id: u64,
}

impl AuctionStore {
    pub fn new() -> Self {
        AuctionStore {
            auctions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate the next auction id (e.g. "auction_3").
    pub fn allocate_id(&mut self) -> String {
        let id = format!("auction_{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Look up an auction by id.
    pub fn get(&self, id: &str) -> Option<&Auction> {
        self.auctions.iter().find(|a| a.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Auction> {
        self.auctions.iter_mut().find(|a| a.id == id)
    }

    /// All auctions in insertion order.
    pub fn list(&self) -> &[Auction] {
        &self.auctions
    }

    /// Insert a new auction or replace the stored one with the same id.
    pub fn upsert(&mut self, auction: Auction) {
        match self.auctions.iter_mut().find(|a| a.id == auction.id) {
            Some(existing) => *existing = auction,
            None => self.auctions.push(auction),
        }
    }

    /// Replace the store contents with recovered auctions (restart
    /// recovery). The id counter resumes past the highest recovered suffix
    /// so newly created auctions never collide.
    pub fn restore(&mut self, auctions: Vec<Auction>) {
        let max_suffix = auctions
            .iter()
            .filter_map(|a| a.id.strip_prefix("auction_"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_suffix + 1);
        self.auctions = auctions;
    }

    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}
