use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mpmc_latency::harness::{run_sweep, SweepConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Queueing-latency sweep over a bounded producer/consumer pipeline")]
struct Args {
   /// Number of producer threads
   #[arg(short = 'p', long, default_value_t = 6)]
   producers: usize,

   /// Items each producer enqueues
   #[arg(short = 'i', long, default_value_t = 10_000)]
   items_per_producer: usize,

   /// Ring buffer capacity
   #[arg(short = 's', long, default_value_t = 10)]
   capacity: usize,

   /// Largest consumer count in the doubling sweep
   #[arg(short = 'c', long, default_value_t = 128)]
   max_consumers: usize,

   /// Output file, one CSV row of latencies per consumer count
   #[arg(short = 'o', long, default_value = "latency_sweep.csv")]
   output: PathBuf,
}

fn main() -> mpmc_latency::Result<()> {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .init();

   let args = Args::parse();
   let cfg = SweepConfig {
      capacity: args.capacity,
      producers: args.producers,
      items_per_producer: args.items_per_producer,
      max_consumers: args.max_consumers,
      settle: Duration::from_millis(100),
   };

   let file = File::create(&args.output)?;
   let mut out = BufWriter::new(file);
   run_sweep(&cfg, &mut out)?;

   info!(path = %args.output.display(), "sweep complete");
   Ok(())
}
