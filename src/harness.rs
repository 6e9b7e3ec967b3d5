// One experiment run, and the consumer-count sweep around it.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::agent::{run_consumer, run_producer};
use crate::error::{Error, Result};
use crate::item::WorkItem;
use crate::latency::LatencyLog;
use crate::mpmc::RingQueue;

/// Parameters for a single run with a fixed consumer pool.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
   pub capacity: usize,
   pub producers: usize,
   pub items_per_producer: usize,
   pub consumers: usize,
}

impl PipelineConfig {
   pub fn total_items(&self) -> usize {
      self.producers * self.items_per_producer
   }

   fn validate(&self) -> Result<()> {
      if self.capacity == 0 {
         return Err(Error::Config("queue capacity must be at least 1".into()));
      }
      if self.producers == 0 {
         return Err(Error::Config("need at least one producer".into()));
      }
      if self.consumers == 0 {
         return Err(Error::Config("need at least one consumer".into()));
      }
      Ok(())
   }
}

/// Run one experiment: a fresh ring and log, `consumers` + `producers`
/// worker threads, all joined before the latencies are read back.
pub fn run_pipeline(cfg: &PipelineConfig) -> Result<Vec<u64>> {
   cfg.validate()?;
   let total = cfg.total_items();
   let queue: RingQueue<WorkItem> = RingQueue::new(cfg.capacity, total);
   let log = LatencyLog::new(total);

   debug!(
      producers = cfg.producers,
      consumers = cfg.consumers,
      total,
      capacity = cfg.capacity,
      "starting pipeline"
   );

   crossbeam::thread::scope(|s| {
      for _ in 0..cfg.consumers {
         s.spawn(|_| run_consumer(&queue, &log));
      }
      for _ in 0..cfg.producers {
         s.spawn(|_| run_producer(&queue, cfg.items_per_producer));
      }
   })
   .map_err(|_| Error::WorkerPanic)?;

   if queue.len() != 0 {
      return Err(Error::Invariant(format!(
         "{} items left in the ring after every worker joined",
         queue.len()
      )));
   }
   if queue.claimed() != total {
      return Err(Error::Invariant(format!(
         "only {} of {} claims were handed out",
         queue.claimed(),
         total
      )));
   }
   log.into_micros()
}

/// Parameters for the doubling consumer-count sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
   pub capacity: usize,
   pub producers: usize,
   pub items_per_producer: usize,
   /// Largest consumer count; the sweep doubles from 1 up to this bound.
   pub max_consumers: usize,
   /// Pause between sweep points.
   pub settle: Duration,
}

/// Sweep the consumer count from 1 upwards, doubling each step, writing one
/// row of comma-separated microsecond latencies per step. A failed run
/// aborts the sweep with its row discarded.
pub fn run_sweep<W: Write>(cfg: &SweepConfig, out: &mut W) -> Result<()> {
   if cfg.max_consumers == 0 {
      return Err(Error::Config("sweep needs at least one consumer".into()));
   }

   let mut consumers = 1;
   while consumers <= cfg.max_consumers {
      let run = PipelineConfig {
         capacity: cfg.capacity,
         producers: cfg.producers,
         items_per_producer: cfg.items_per_producer,
         consumers,
      };
      let started = Instant::now();
      let latencies = run_pipeline(&run)?;
      info!(
         consumers,
         elapsed_ms = started.elapsed().as_millis() as u64,
         mean_wait_us = mean(&latencies),
         "sweep point finished"
      );
      write_row(out, &latencies)?;

      consumers *= 2;
      if consumers <= cfg.max_consumers {
         thread::sleep(cfg.settle);
      }
   }
   out.flush()?;
   Ok(())
}

fn write_row<W: Write>(out: &mut W, latencies: &[u64]) -> std::io::Result<()> {
   for (i, micros) in latencies.iter().enumerate() {
      if i > 0 {
         out.write_all(b",")?;
      }
      write!(out, "{micros}")?;
   }
   out.write_all(b"\n")
}

fn mean(latencies: &[u64]) -> u64 {
   if latencies.is_empty() {
      return 0;
   }
   latencies.iter().sum::<u64>() / latencies.len() as u64
}
