mod directory;
mod lifecycle;
mod player;
mod shared;
mod ui;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::thread;
use std::time::Duration;

use crate::directory::Station;
use crate::lifecycle::SharedSession;
use crate::shared::{constants, presets};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive station menu (default)
    Menu,
    /// Play a stream URL until interrupted
    Play {
        #[arg(short, long)]
        url: String,
        #[arg(short, long, default_value = "Custom stream")]
        name: String,
    },
    /// Search the online directory by station name
    Search {
        #[arg(short, long)]
        query: String,
        #[arg(short, long, default_value_t = constants::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Search the online directory by genre tag
    Genre {
        #[arg(short, long)]
        genre: String,
        #[arg(short, long, default_value_t = constants::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// List the built-in preset stations
    Presets,
}

fn main() -> Result<()> {
    utils::logger::init();

    // Reset terminal state in case a previous run crashed mid-menu.
    // Errors are ignored because the terminal might not be in raw mode.
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);

    let cli = Cli::parse();

    let session = lifecycle::new_shared_session();
    lifecycle::install(session.clone())?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            ui::menu::run_menu(session.clone())?;
        }
        Commands::Play { url, name } => {
            play_until_interrupted(&session, Station::from_url(&name, &url))?;
        }
        Commands::Search { query, limit } => {
            print_stations(&directory::search_stations(&query, limit));
        }
        Commands::Genre { genre, limit } => {
            print_stations(&directory::search_by_genre(&genre, limit));
        }
        Commands::Presets => {
            print_stations(&presets::all());
        }
    }

    lifecycle::shutdown(&session);
    Ok(())
}

fn play_until_interrupted(session: &SharedSession, station: Station) -> Result<()> {
    let name = station.name.clone();
    match session.lock() {
        Ok(mut guard) => guard.start(station)?,
        Err(poisoned) => poisoned.into_inner().start(station)?,
    }
    println!("Playing {} — press Ctrl-C to stop", name);

    loop {
        thread::sleep(Duration::from_millis(500));
        let playing = match session.lock() {
            Ok(mut guard) => guard.is_playing(),
            Err(_) => false,
        };
        if !playing {
            println!("Playback ended.");
            break;
        }
    }

    Ok(())
}

fn print_stations(stations: &[Station]) {
    if stations.is_empty() {
        println!("No stations found.");
        return;
    }
    for (idx, station) in stations.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, station.summary());
        println!("     {}", station.url);
    }
}
