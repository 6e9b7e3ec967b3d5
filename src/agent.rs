// Producer and consumer loops for the latency pipeline.

use rand::Rng;
use tracing::trace;

use crate::item::{Job, WorkItem};
use crate::latency::LatencyLog;
use crate::mpmc::{Claim, RingQueue};

/// Enqueue `items` randomly sized trigonometric jobs, stamping each one as
/// it is admitted into the ring.
pub fn run_producer(queue: &RingQueue<WorkItem>, items: usize) {
   let mut rng = rand::rng();
   for _ in 0..items {
      let angles = random_angles(&mut rng);
      let job: Job = Box::new(move || sine_sum(&angles));
      queue.put_with(|| WorkItem::new(job));
   }
}

/// Claim, dequeue and execute items until production is exhausted,
/// recording each item's in-queue wait at its claim index.
pub fn run_consumer(queue: &RingQueue<WorkItem>, log: &LatencyLog) {
   loop {
      match queue.claim() {
         Claim::Exhausted => break,
         Claim::Reserved(index) => {
            let item = queue.take();
            log.record(index, item.wait_micros());
            // The job runs with no lock held, so slow work never stalls
            // the ring.
            item.run();
         }
      }
   }
   trace!("production exhausted, consumer exiting");
}

fn random_angles<R: Rng>(rng: &mut R) -> Vec<f64> {
   let count: usize = rng.random_range(10..20);
   (0..count).map(|i| (count + i) as f64).collect()
}

fn sine_sum(angles: &[f64]) {
   let sum: f64 = angles.iter().map(|a| a.sin()).sum();
   std::hint::black_box(sum);
}
