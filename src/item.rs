// A unit of work plus the instant it entered the ring.

use std::fmt;
use std::time::Instant;

/// Opaque callable the queue moves around without looking inside.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A job stamped with its admission time.
pub struct WorkItem {
   job: Job,
   admitted_at: Instant,
}

impl WorkItem {
   /// Stamp `job` with the current instant. Call this at the moment of
   /// admission (see `RingQueue::put_with`).
   pub fn new(job: Job) -> Self {
      Self { job, admitted_at: Instant::now() }
   }

   pub fn admitted_at(&self) -> Instant {
      self.admitted_at
   }

   /// Microseconds this item has spent since admission. The clock is
   /// monotonic, so the result is never negative.
   pub fn wait_micros(&self) -> u64 {
      self.admitted_at.elapsed().as_micros() as u64
   }

   /// Execute the job, consuming the item.
   pub fn run(self) {
      (self.job)();
   }
}

impl fmt::Debug for WorkItem {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("WorkItem")
         .field("admitted_at", &self.admitted_at)
         .finish_non_exhaustive()
   }
}
