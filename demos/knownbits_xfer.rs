//! Scores known-bits transformers for 8-bit addition on sampled examples.
//!
//! Compares the textbook carry-propagating transformer and the `⊤` baseline
//! against exact and sampled labels.
//!
//! ```bash
//! cargo run --release --example knownbits_xfer -- --samples 1000
//! ```

use clap::Parser;
use simplelog::LevelFilter;

use xfer_enum::{AbstractDomain, ApInt, Bw, EnumConfig, Enumerator, KnownBits, KnownBitsDomain};

const BW: usize = 8;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of sampled examples.
    #[clap(long, value_name = "INT", default_value = "1000")]
    samples: usize,

    /// Concrete samples per example in the doubly sampled strategy.
    #[clap(long, value_name = "INT", default_value = "32")]
    conc_samples: usize,

    /// Random seed.
    #[clap(long, value_name = "INT", default_value = "42")]
    seed: u64,

    /// Sampled examples per parallel work item.
    #[clap(long, value_name = "INT", default_value = "64")]
    chunk: usize,

    /// Log level (off, error, warn, info, debug, trace).
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

/// Known-bits addition. A sum bit is known where both operand bits are known
/// and the smallest and largest possible sums agree on it.
fn kb_add(&(x, y): &(KnownBits<BW>, KnownBits<BW>)) -> KnownBits<BW> {
    if x.is_bottom() || y.is_bottom() {
        return KnownBits::bottom();
    }
    let min = u64::from(x.one()) + u64::from(y.one());
    let max = u64::from(!x.zero()) + u64::from(!y.zero());
    let min = ApInt::<BW>::new(min);
    let max = ApInt::<BW>::new(max);
    let known = x.zero() | x.one();
    let known = known & (y.zero() | y.one()) & !(min ^ max);
    KnownBits::new(known & !min, known & min)
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

    let config = EnumConfig {
        par_chunk: args.chunk,
        ..EnumConfig::default()
    };
    let add = Enumerator::<KnownBitsDomain, BW, (Bw<BW>, Bw<BW>)>::new(|&[a, b]: &[u64; 2]| a + b).with_config(config);
    println!("add = {:?}", add);

    let time_mids = std::time::Instant::now();
    let mids = add.par_gen_mids(args.samples, args.seed);
    println!("gen_mids: {} examples in {:.2?}", mids.len(), time_mids.elapsed());

    let time_highs = std::time::Instant::now();
    let highs = add.par_gen_highs(args.samples, args.conc_samples, args.seed);
    println!("gen_highs: {} examples in {:.2?}", highs.len(), time_highs.elapsed());

    println!("\nexact labels:");
    println!("  kb_add: {}", add.evaluate(&mids, kb_add));
    println!("  top:    {}", add.evaluate_top(&mids));

    println!("\nsampled labels:");
    println!("  kb_add: {}", add.evaluate(&highs, kb_add));
    println!("  top:    {}", add.evaluate_top(&highs));

    Ok(())
}
