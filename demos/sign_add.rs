//! Prints every example of 4-bit addition over the sign domain, then samples more.
//!
//! ```bash
//! cargo run --example sign_add -- --samples 10 --seed 7
//! ```

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simplelog::LevelFilter;

use xfer_enum::{Bw, Enumerator, SignDomain};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of sampled examples.
    #[clap(long, value_name = "INT", default_value = "10")]
    samples: usize,

    /// Concrete samples per example in the doubly sampled strategy.
    #[clap(long, value_name = "INT", default_value = "4")]
    conc_samples: usize,

    /// Random seed.
    #[clap(long, value_name = "INT", default_value = "42")]
    seed: u64,

    /// Log level (off, error, warn, info, debug, trace).
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let add = Enumerator::<SignDomain, 4, (Bw<4>, Bw<4>)>::new(|&[a, b]: &[u64; 2]| a + b);
    println!("add = {:?}", add);

    println!("\n--- gen_lows ({} evaluations) ---", add.lows_cost());
    for ex in add.gen_lows() {
        println!("{}", ex);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    println!("\n--- gen_mids ---");
    for ex in add.gen_mids(args.samples, &mut rng) {
        println!("{}", ex);
    }

    println!("\n--- gen_highs ---");
    let highs = add.gen_highs(args.samples, args.conc_samples, &mut rng);
    for ex in &highs {
        let best = add.best_abstraction(&ex.args);
        if ex.result == best {
            println!("{}", ex);
        } else {
            println!("{}  (best: {})", ex, best);
        }
    }

    Ok(())
}
