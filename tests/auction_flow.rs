// End-to-end auction flow: create, start, bid, settle, recover, complete.

use auction_desk::auction::{
    AuctionEvent, AuctionHouse, AuctionStatus, BidIncrementRule, Player, PlayerStats, Team,
};
use auction_desk::db::Database;
use auction_desk::notify::{LogNotifier, MemoryNotifier, Notifier, Severity};
use auction_desk::store::AuctionStore;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn squad() -> Vec<Player> {
    vec![
        Player::new(
            "player_1",
            "Alex Hunter",
            PlayerStats::Forward {
                goals: 24,
                assists: 11,
                pace: 91,
            },
        ),
        Player::new(
            "player_2",
            "Chris Larsen",
            PlayerStats::Defence {
                tackles: 74,
                interceptions: 41,
                strength: 87,
            },
        ),
        Player::new(
            "player_3",
            "Robin Shaw",
            PlayerStats::Goalkeeper {
                saves: 112,
                clean_sheets: 14,
                reflexes: 90,
            },
        ),
        Player::new(
            "player_4",
            "Jordan Vale",
            PlayerStats::Forward {
                goals: 18,
                assists: 7,
                pace: 88,
            },
        ),
    ]
}

fn teams() -> Vec<Team> {
    vec![
        Team::new("team_1", "Thunder FC", 1000, 2),
        Team::new("team_2", "Lightning United", 1200, 2),
    ]
}

fn rules() -> Vec<BidIncrementRule> {
    vec![
        BidIncrementRule {
            min_amount: 1,
            max_amount: 199,
            increment: 10,
        },
        BidIncrementRule {
            min_amount: 200,
            max_amount: 10000,
            increment: 25,
        },
    ]
}

/// A started two-team auction over the four-player squad.
fn started_house() -> (AuctionHouse, String) {
    let mut house = AuctionHouse::new(Box::new(LogNotifier));
    let id = house
        .create_auction("Premier Player Auction", 50, teams(), squad(), rules())
        .expect("auction should be valid");
    house.set_current_auction(&id).unwrap();
    house.start_auction(&id).unwrap();
    (house, id)
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_auction_lifecycle() {
    let (mut house, id) = started_house();

    // player_1 went up automatically at start.
    assert_eq!(
        house.auction(&id).unwrap().current_player_id.as_deref(),
        Some("player_1")
    );

    // A bidding war settled by the auctioneer.
    house.place_bid("team_1", 50).unwrap();
    house.place_bid("team_2", 60).unwrap();
    let raise = house.proposed_bid().unwrap();
    assert_eq!(raise, 70);
    house.place_bid("team_1", raise).unwrap();
    house.confirm_sale().unwrap();

    {
        let auction = house.auction(&id).unwrap();
        let thunder = auction.team("team_1").unwrap();
        assert_eq!(thunder.remaining_budget, 930);
        assert_eq!(thunder.players.len(), 1);
        assert!(auction.is_sold("player_1"));
        assert!(auction.current_player_id.is_none());
    }

    // player_2 finds no takers, player_3 sells after a re-selection round.
    house.select_player("player_2").unwrap();
    house.mark_unsold().unwrap();

    house.select_player("player_3").unwrap();
    house.place_bid("team_2", 200).unwrap();
    assert_eq!(house.proposed_bid().unwrap(), 225);
    house.confirm_sale().unwrap();

    // The passed defender comes back around and sells.
    house.select_player("player_2").unwrap();
    house.place_bid("team_1", 55).unwrap();
    house.confirm_sale().unwrap();

    // Last player goes to the other side; the pool is then sold out and the
    // auction completes on its own.
    house.select_player("player_4").unwrap();
    house.place_bid("team_2", 90).unwrap();
    house.confirm_sale().unwrap();

    let auction = house.auction(&id).unwrap();
    assert_eq!(auction.status, AuctionStatus::Completed);
    assert!(auction.completed_at.is_some());
    assert!(auction.all_players_sold());
    assert!(auction.player_states_disjoint());
    assert!(!auction.is_unsold("player_2"));

    // Budget identity holds for every team after all settlements.
    for team in &auction.teams {
        assert!(team.budget_consistent(), "{} budget drifted", team.name);
    }
    let thunder = auction.team("team_1").unwrap();
    assert_eq!(thunder.total_spent(), 70 + 55);
    let lightning = auction.team("team_2").unwrap();
    assert_eq!(lightning.total_spent(), 200 + 90);

    // History ends with the final sale and contains one unsold entry.
    assert!(matches!(
        auction.history.last().unwrap(),
        AuctionEvent::Sale { amount: 90, .. }
    ));
    let unsold_events = auction
        .history
        .iter()
        .filter(|e| matches!(e, AuctionEvent::Unsold { .. }))
        .count();
    assert_eq!(unsold_events, 1);
}

// ---------------------------------------------------------------------------
// Persistence round trip
// ---------------------------------------------------------------------------

#[test]
fn auction_survives_restart_mid_bidding() {
    let db = Database::open(":memory:").unwrap();

    let id;
    {
        let (mut house, auction_id) = started_house();
        id = auction_id;
        house.place_bid("team_1", 80).unwrap();
        house.confirm_sale().unwrap();
        house.select_player("player_2").unwrap();
        house.place_bid("team_2", 65).unwrap();
        db.save_auction(house.auction(&id).unwrap()).unwrap();
    }

    // Restart: rebuild the house from the database and keep going.
    let mut store = AuctionStore::new();
    store.restore(db.load_all().unwrap());
    let mut house = AuctionHouse::with_store(store, Box::new(LogNotifier));
    house.set_current_auction(&id).unwrap();

    {
        let auction = house.auction(&id).unwrap();
        assert_eq!(auction.status, AuctionStatus::Active);
        assert_eq!(auction.current_player_id.as_deref(), Some("player_2"));
        assert_eq!(auction.current_bid.as_ref().unwrap().amount, 65);
        assert_eq!(auction.team("team_1").unwrap().remaining_budget, 920);
    }

    // The in-flight bid settles normally after recovery.
    house.confirm_sale().unwrap();
    let auction = house.auction(&id).unwrap();
    assert!(auction.is_sold("player_2"));
    assert_eq!(auction.team("team_2").unwrap().remaining_budget, 1135);

    // New auctions created after recovery get fresh ids.
    let new_id = house
        .create_auction("Second Auction", 50, teams(), squad(), rules())
        .unwrap();
    assert_ne!(new_id, id);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Shared notifier handle so the test can observe what the house emitted.
struct Tap(std::sync::Arc<MemoryNotifier>);

impl Notifier for Tap {
    fn notify(&self, notice: auction_desk::notify::Notice) {
        self.0.notify(notice);
    }
}

#[test]
fn operations_emit_notices() {
    let tap = std::sync::Arc::new(MemoryNotifier::new());
    let mut house = AuctionHouse::new(Box::new(Tap(tap.clone())));

    let id = house
        .create_auction("Premier Player Auction", 50, teams(), squad(), rules())
        .unwrap();
    house.set_current_auction(&id).unwrap();
    house.start_auction(&id).unwrap();
    house.place_bid("team_1", 60).unwrap();
    let _ = house.place_bid("team_2", 40); // rejected
    house.confirm_sale().unwrap();

    let notices = tap.take();
    let titles: Vec<&str> = notices.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Auction Created",
            "Auction Started",
            "Bid Placed",
            "Bid Error",
            "Player Sold"
        ]
    );
    let error = notices.iter().find(|n| n.title == "Bid Error").unwrap();
    assert_eq!(error.severity, Severity::Error);
    assert!(error.message.contains("below the minimum"));
}
