// Copyright 2024-2026 the nightrider developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use nightrider::variant::SavedGame;
use nightrider::GameState;

#[derive(Debug, StructOpt)]
struct Options {
    /// Path to a saved game JSON document.
    #[structopt(name = "GAME")]
    game: PathBuf,

    /// Print the position after every move instead of only the final one.
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Options::from_args();
    let text = std::fs::read_to_string(&opts.game)
        .with_context(|| format!("reading {}", opts.game.display()))?;
    let saved: SavedGame = serde_json::from_str(&text).context("parsing saved game")?;

    let mut game = GameState::new(&saved.metadata, saved.options.clone())
        .context("setting up the variant")?;

    if opts.verbose {
        for (index, shortmove) in saved.moves.iter().enumerate() {
            let mv = game
                .calculate_move_from_compact(shortmove)
                .with_context(|| format!("move {} is invalid: {}", index, shortmove))?;
            game.make_move(mv);
            println!("after {}:\n{}", shortmove, game);
        }
    } else {
        game.make_all_moves_in_game(&saved.moves)
            .context("replaying the move list")?;
        println!("{}", game);
    }

    println!("to move: player {}", game.whos_turn());
    match game.in_check() {
        Some(royals) => {
            let squares: Vec<String> = royals.iter().map(|c| c.to_string()).collect();
            println!("in check at {}", squares.join(" "));
        }
        None => println!("not in check"),
    }
    println!(
        "moves: {}",
        saved
            .moves
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(())
}
