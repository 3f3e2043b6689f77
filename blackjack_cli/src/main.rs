mod console;

use blackjack_core::prelude::*;
use clap::Parser;
use console::Session;
use log::info;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "blackjack")]
#[command(about = "A card-counting blackjack table with automated seats")]
struct Args {
    /// Number of decks in the shoe
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..=8))]
    decks: u32,

    /// Non-dealer seats at the table, including yours
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=5))]
    players: u32,

    /// Percentage of the shoe left that forces a reshuffle
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(10..=80))]
    penetration: u32,

    /// Fix the shuffle order for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Your name at the table
    #[arg(long, default_value = "You")]
    name: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut builder = GameConfig::new();
    builder
        .num_decks(args.decks)
        .num_cpu_players(args.players - 1)
        .penetration(args.penetration as f32 / 100.0)
        .hits_soft_17(true);
    if let Some(seed) = args.seed {
        builder.seed(seed);
    }
    let config = builder.build();
    info!(
        "starting session: {} decks, {} seats, penetration {:.2}",
        config.num_decks,
        config.num_cpu_players + 1,
        config.penetration
    );

    let table = match BlackjackTable::new(config, args.name) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    let mut session = Session::new(table);
    if let Err(err) = session.run() {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
