mod card;
mod game;
mod rng;
mod simulation;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use simulation::engine::{run_simulation, NoopObserver, SimObserver, SimSettings, SpellOutcome};
use simulation::input::parse_input_file;

#[derive(Parser)]
#[command(name = "manabase-sim")]
#[command(about = "Monte Carlo mana base simulator", long_about = None)]
struct Cli {
    /// Input file describing lands, spells and settings
    #[arg(default_value = "inputs.txt")]
    input: String,

    /// Seed for the random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of turns to simulate
    #[arg(short, long, default_value = "10")]
    turns: u32,

    /// Override the trial count from the input file
    #[arg(short, long)]
    cycles: Option<usize>,

    /// Emit results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Suppress the progress bar
    #[arg(short, long)]
    quiet: bool,
}

struct ProgressObserver(ProgressBar);

impl SimObserver for ProgressObserver {
    fn trial_finished(&self) {
        self.0.inc(1);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    cycles: usize,
    on_play: bool,
    seed: Option<u64>,
    spells: &'a [SpellOutcome],
}

fn main() {
    let cli = Cli::parse();

    let (deck, mut settings) = match parse_input_file(&cli.input) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("✗ Failed to parse '{}': {}", cli.input, e);
            std::process::exit(1);
        }
    };
    settings.max_turn = cli.turns;
    if let Some(cycles) = cli.cycles {
        settings.cycles = cycles;
    }

    if !cli.json {
        println!("\n=== Mana Base Simulator ===\n");
        println!("Input: {}", cli.input);
        println!(
            "Lands: {} | Cyclers: {} | Rocks: {} | Deck: {} cards",
            deck.lands.len(),
            deck.cyclers.len(),
            deck.rocks.len(),
            settings.deck_size
        );
        println!(
            "Spells: {} | Trials: {} | Turns: {} | On the {}",
            deck.spells.len(),
            settings.cycles,
            settings.max_turn,
            if settings.on_play { "play" } else { "draw" }
        );
        if let Some(seed) = cli.seed {
            println!("Seed: {}", seed);
        }
        println!();
    }

    let bar = if cli.quiet || cli.json {
        None
    } else {
        let bar = ProgressBar::new(settings.cycles as u64);
        let style = ProgressStyle::with_template("{bar:40} {pos}/{len} trials")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Some(bar)
    };

    let start = std::time::Instant::now();
    let result = match &bar {
        Some(bar) => run_simulation(
            &deck,
            &settings,
            cli.seed,
            &ProgressObserver(bar.clone()),
        ),
        None => run_simulation(&deck, &settings, cli.seed, &NoopObserver),
    };
    let elapsed = start.elapsed();
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let outcomes = match result {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        let report = JsonReport {
            input: &cli.input,
            cycles: settings.cycles,
            on_play: settings.on_play,
            seed: cli.seed,
            spells: &outcomes,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("=== Results ===");
    for (idx, outcome) in outcomes.iter().enumerate() {
        println!("\nSpell {}: {}", idx + 1, outcome.cost);
        if outcome.probability_by_turn.values().all(|&p| p == 0.0) {
            println!("  Never castable within {} turns", settings.max_turn);
            continue;
        }
        for (&turn, &prob) in &outcome.probability_by_turn {
            let pct = prob * 100.0;
            let chart = "█".repeat((pct / 2.0) as usize);
            println!("  Turn {:2}: {:6.2}% {}", turn, pct, chart);
        }
    }

    println!(
        "\nSimulation completed in {:.2?} ({:.0} trials/sec)",
        elapsed,
        settings.cycles as f64 / elapsed.as_secs_f64()
    );
}
