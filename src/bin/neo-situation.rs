use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use rand::SeedableRng;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "neo-situation", version)]
struct Cli {
    /// First feed date (YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,

    /// Last feed date (YYYY-MM-DD). The feed picks its default window when omitted.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Settings JSON. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for icon rotations. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the PNG is written to (overrides `export.out_dir`).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => neo_situation::Settings::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => neo_situation::Settings::default(),
    };
    if let Some(dir) = cli.out_dir {
        settings.export.out_dir = dir;
    }

    if let Some(end) = cli.end
        && end < cli.start
    {
        anyhow::bail!("--end {end} is before --start {}", cli.start);
    }

    let seed = cli.seed.unwrap_or_else(rand::random::<u64>);
    tracing::info!(seed, start = %cli.start, end = ?cli.end, "starting report");
    let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);

    let request = neo_situation::FeedRequest::new(cli.start, cli.end);
    let outcome = neo_situation::generate_report(&settings, &request, &mut rng)?;

    for a in &outcome.asteroids {
        eprintln!(
            "#{} {} miss {} km on {}",
            a.rank + 1,
            a.neo.name,
            a.neo.miss_distance_km,
            a.neo.approach_date
        );
    }
    eprintln!("wrote {}", outcome.path.display());
    Ok(())
}
