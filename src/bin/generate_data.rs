use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use surge_pricing::application::ml::data_generator::{
    DataGenerator, DatasetSummary, GeneratorConfig, save_csv,
};
use surge_pricing::infrastructure::observability::init_tracing;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate synthetic delivery pricing data", long_about = None)]
struct Args {
    /// Number of rows to generate
    #[arg(long, default_value_t = 5000)]
    samples: usize,

    /// Seed of the random generator; equal seeds give identical files
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output CSV path
    #[arg(long, default_value = "data/delivery_data.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let generator = DataGenerator::new(GeneratorConfig {
        samples: args.samples,
        seed: args.seed,
        ..Default::default()
    });
    let samples = generator.generate()?;
    save_csv(&samples, &args.output)?;
    info!("Wrote {} rows to {}", samples.len(), args.output.display());

    println!("{}", DatasetSummary::from_samples(&samples));
    Ok(())
}
