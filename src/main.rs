use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;

use lowpoly::{Background, Canvas, Entropy, Options, RandomSource};

/// Renders a low-poly triangle background to a PNG.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// JSON options file.
    config: PathBuf,
    /// Output image.
    #[arg(short, long, default_value = "background.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1920)]
    width: u32,
    #[arg(long, default_value_t = 1080)]
    height: u32,
    /// Makes the output reproducible.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = Options::load(&args.config)?;
    let background = Background::new(options)?;
    let mut canvas = Canvas::new(args.width, args.height, background.options().background)?;

    let mut rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(Entropy::seeded(seed)),
        None => Box::new(Entropy::thread()),
    };

    info!("Start drawing ...");
    let now = Instant::now();

    let summary = background.paint(&mut canvas, &mut *rng)?;

    let elapsed = now.elapsed();
    info!(
        "Finished, elapsed: {:.3} ms, {}x{} lattice, {} triangles",
        elapsed.as_secs_f64() * 1000.0,
        summary.lattice.cols,
        summary.lattice.rows,
        summary.triangles
    );

    canvas.save(&args.output)?;
    info!("Saved {}", args.output.display());

    Ok(())
}
