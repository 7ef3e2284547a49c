// Auction desk entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database, recover saved auctions
// 4. Create the auction from config when none was recovered
// 5. Run the interactive command loop, snapshotting after every mutation

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::info;

use auction_desk::auction::{AuctionHouse, AuctionStatus};
use auction_desk::config;
use auction_desk::db::Database;
use auction_desk::notify::LogNotifier;
use auction_desk::store::AuctionStore;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Auction desk starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: auction={}, {} teams, {} players, min price {}",
        config.auction_name,
        config.teams.len(),
        config.players.len(),
        config.min_player_price
    );

    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    // Recover saved auctions, then pick up the most recent unfinished one
    // or create a fresh auction from config.
    let saved = db.load_all().context("failed to load saved auctions")?;
    let recovered = !saved.is_empty();
    let mut store = AuctionStore::new();
    store.restore(saved);
    let mut house = AuctionHouse::with_store(store, Box::new(LogNotifier));

    let resumable = house
        .auctions()
        .iter()
        .rev()
        .find(|a| a.status != AuctionStatus::Completed)
        .map(|a| a.id.clone());

    let auction_id = match resumable {
        Some(id) => {
            info!("Resuming auction {id} from previous session");
            println!("Resuming auction {id} from a previous session.");
            id
        }
        None => {
            if recovered {
                println!("All saved auctions are complete; creating a new one.");
            }
            let id = house
                .create_auction(
                    config.auction_name.clone(),
                    config.min_player_price,
                    config.teams.clone(),
                    config.players.clone(),
                    config.rules.clone(),
                )
                .context("failed to create auction from config")?;
            println!("Created {} ({id}).", config.auction_name);
            id
        }
    };

    house
        .set_current_auction(&auction_id)
        .context("failed to select auction")?;
    save_current(&house, &db)?;

    println!("Type `help` for commands.");
    run_loop(&mut house, &db)?;

    info!("Auction desk shut down cleanly");
    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
fn run_loop(house: &mut AuctionHouse, db: &Database) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    loop {
        print!("> ");
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            continue;
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "status" => print_status(house),
            "teams" => print_teams(house),
            "players" => print_players(house),
            _ => {
                match dispatch(house, command, args) {
                    Ok(()) => save_current(house, db)?,
                    Err(e) => println!("error: {e}"),
                }
            }
        }
    }
    Ok(())
}

/// Run one mutating command against the auction house.
fn dispatch(
    house: &mut AuctionHouse,
    command: &str,
    args: &[&str],
) -> Result<(), anyhow::Error> {
    match command {
        "start" => {
            let id = current_id(house)?;
            house.start_auction(&id)?;
            println!("Auction started.");
            if let Some(player) = house.current_auction().and_then(|a| a.current_player()) {
                println!("Up for bidding: {} ({})", player.name, player.position);
            }
        }
        "select" => {
            let player_id = *args.first().context("usage: select <player_id>")?;
            house.select_player(player_id)?;
            println!("{player_id} is up for bidding.");
        }
        "bid" => {
            let team_id = *args.first().context("usage: bid <team_id> <amount>")?;
            let amount: u32 = args
                .get(1)
                .context("usage: bid <team_id> <amount>")?
                .parse()
                .context("amount must be a number")?;
            house.place_bid(team_id, amount)?;
            println!("Bid of {amount} recorded for {team_id}.");
        }
        "raise" => {
            let team_id = *args.first().context("usage: raise <team_id>")?;
            let amount = house.proposed_bid()?;
            house.place_bid(team_id, amount)?;
            println!("Bid of {amount} recorded for {team_id}.");
        }
        "edit" => {
            let amount: u32 = args
                .first()
                .context("usage: edit <amount>")?
                .parse()
                .context("amount must be a number")?;
            house.edit_bid(amount)?;
            println!("Current bid corrected to {amount}.");
        }
        "unsold" => {
            house.mark_unsold()?;
            println!("Player marked unsold.");
        }
        "sell" => {
            house.confirm_sale()?;
            println!("Sale confirmed.");
        }
        "complete" => {
            let id = current_id(house)?;
            house.complete_auction(&id)?;
            println!("Auction completed.");
        }
        other => println!("unknown command `{other}`; type `help`"),
    }
    Ok(())
}

fn current_id(house: &AuctionHouse) -> Result<String, anyhow::Error> {
    house
        .current_auction()
        .map(|a| a.id.clone())
        .context("no auction selected")
}

/// Snapshot the current auction after a mutation.
fn save_current(house: &AuctionHouse, db: &Database) -> anyhow::Result<()> {
    if let Some(auction) = house.current_auction() {
        db.save_auction(auction)
            .with_context(|| format!("failed to save auction {}", auction.id))?;
    }
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  start               begin the auction (first player goes up)");
    println!("  select <player_id>  put a player up for bidding");
    println!("  bid <team_id> <n>   place a bid of n for a team");
    println!("  raise <team_id>     bid the next increment for a team");
    println!("  edit <n>            correct the current bid amount");
    println!("  sell                confirm the sale at the current bid");
    println!("  unsold              pass on the current player");
    println!("  complete            end the auction");
    println!("  status              show the current player and bid");
    println!("  teams               show team budgets and rosters");
    println!("  players             list the player pool");
    println!("  quit                exit");
}

fn print_status(house: &AuctionHouse) {
    let Some(auction) = house.current_auction() else {
        println!("no auction selected");
        return;
    };
    println!("{} [{:?}]", auction.name, auction.status);
    match auction.current_player() {
        Some(player) => {
            println!("up for bidding: {} ({})", player.name, player.position);
            for (stat, value) in player.stats.entries() {
                println!("  {stat}: {value}");
            }
        }
        None => println!("no player up for bidding"),
    }
    match &auction.current_bid {
        Some(bid) => {
            let team = auction
                .team(&bid.team_id)
                .map(|t| t.name.as_str())
                .unwrap_or(bid.team_id.as_str());
            println!("current bid: {} by {team}", bid.amount);
            if let Ok(next) = house.proposed_bid() {
                println!("next bid: {next}");
            }
        }
        None => println!("no bids yet (minimum {})", auction.min_player_price),
    }
}

fn print_teams(house: &AuctionHouse) {
    match house.team_summaries() {
        Ok(summaries) => {
            for s in summaries {
                println!(
                    "{} ({}): {} bought, spent {}, remaining {}, needs {}, max bid {}",
                    s.name,
                    s.team_id,
                    s.players_bought,
                    s.spent,
                    s.remaining_budget,
                    s.players_needed,
                    s.max_bid
                );
            }
        }
        Err(e) => println!("error: {e}"),
    }
}

fn print_players(house: &AuctionHouse) {
    let Some(auction) = house.current_auction() else {
        println!("no auction selected");
        return;
    };
    for player in &auction.players {
        let state = if auction.is_sold(&player.id) {
            match player.purchase_amount {
                Some(amount) => format!("sold for {amount}"),
                None => "sold".to_string(),
            }
        } else if auction.is_unsold(&player.id) {
            "unsold".to_string()
        } else if auction.current_player_id.as_deref() == Some(player.id.as_str()) {
            "up for bidding".to_string()
        } else {
            "available".to_string()
        };
        println!("{} {} ({}) - {state}", player.id, player.name, player.position);
    }
}

/// Initialize tracing to log to a file (keeps the terminal clean for the
/// command prompt).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("auction-desk.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("auction_desk=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
