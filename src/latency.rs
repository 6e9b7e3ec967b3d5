// Per-run log of in-queue wait times, one cell per claim index.
//
// Cells are atomics because consumers write concurrently, but every index is
// pre-reserved through the claim counter and the log is only read after all
// workers have joined, so Relaxed ordering is enough.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

// u64::MAX doubles as the "never written" sentinel.
const UNSET: u64 = u64::MAX;

pub struct LatencyLog {
   cells: Box<[AtomicU64]>,
}

impl LatencyLog {
   pub fn new(len: usize) -> Self {
      let cells = (0..len)
         .map(|_| AtomicU64::new(UNSET))
         .collect::<Vec<_>>()
         .into_boxed_slice();
      Self { cells }
   }

   pub fn len(&self) -> usize {
      self.cells.len()
   }

   pub fn is_empty(&self) -> bool {
      self.cells.is_empty()
   }

   /// Record the wait time for one claim index. Indices come from the claim
   /// counter, so each cell is written exactly once; a second write or an
   /// out-of-range index means the claim protocol is broken and aborts the
   /// run rather than corrupt the measurements.
   pub fn record(&self, index: usize, micros: u64) {
      assert!(
         index < self.cells.len(),
         "claim index {index} out of bounds for a log of {}",
         self.cells.len()
      );
      let micros = micros.min(UNSET - 1);
      let prev = self.cells[index].swap(micros, Ordering::Relaxed);
      assert_eq!(prev, UNSET, "latency cell {index} written twice");
   }

   /// Read the log back, in claim order. Call only after every worker has
   /// been joined; fails if any cell was never written.
   pub fn into_micros(self) -> Result<Vec<u64>> {
      let mut out = Vec::with_capacity(self.cells.len());
      for (index, cell) in self.cells.iter().enumerate() {
         let micros = cell.load(Ordering::Relaxed);
         if micros == UNSET {
            return Err(Error::Invariant(format!("latency cell {index} never written")));
         }
         out.push(micros);
      }
      Ok(out)
   }
}
