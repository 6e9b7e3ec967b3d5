// mpmc_latency/tests/unit_test.rs

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mpmc_latency::harness::{run_pipeline, run_sweep, PipelineConfig, SweepConfig};
use mpmc_latency::{Claim, ClaimCounter, Error, LatencyLog, RingQueue};

#[test]
fn claim_counter_hands_out_each_index_once() {
   let mut counter = ClaimCounter::new(4);
   for expected in 0..4 {
      assert_eq!(counter.reserve(), Claim::Reserved(expected));
   }
   assert_eq!(counter.reserve(), Claim::Exhausted);
   assert_eq!(counter.reserve(), Claim::Exhausted, "exhaustion must be sticky");
   assert_eq!(counter.claimed(), 4);
}

#[test]
fn claim_counter_with_zero_bound_is_born_exhausted() {
   let mut counter = ClaimCounter::new(0);
   assert_eq!(counter.reserve(), Claim::Exhausted);
   assert_eq!(counter.claimed(), 0);
}

#[test]
fn ring_preserves_fifo_order_under_load() {
   let queue = Arc::new(RingQueue::new(8, 0));

   let producer = {
      let q = Arc::clone(&queue);
      thread::spawn(move || {
         for i in 0..1000u32 {
            q.put(i);
         }
      })
   };
   let consumer = {
      let q = Arc::clone(&queue);
      thread::spawn(move || (0..1000u32).map(|_| q.take()).collect::<Vec<_>>())
   };

   producer.join().unwrap();
   let seen = consumer.join().unwrap();

   assert_eq!(seen, (0..1000).collect::<Vec<u32>>(), "items must come out in admission order");
   assert!(queue.is_empty());
}

#[test]
fn ring_blocks_producers_at_capacity() {
   let queue = Arc::new(RingQueue::new(4, 0));

   let producer = {
      let q = Arc::clone(&queue);
      thread::spawn(move || {
         for i in 0..16u32 {
            q.put(i);
         }
      })
   };

   // Give the producer time to fill the ring and block on the 5th put.
   thread::sleep(Duration::from_millis(50));
   assert_eq!(queue.len(), 4, "resident items must never exceed capacity");

   for expected in 0..16 {
      assert_eq!(queue.take(), expected);
   }
   producer.join().unwrap();
   assert!(queue.is_empty());
}

#[test]
fn claims_and_takes_conserve_every_item() {
   let total = 400usize;
   let queue = Arc::new(RingQueue::new(3, total));

   let consumers: Vec<_> = (0..3)
      .map(|_| {
         let q = Arc::clone(&queue);
         thread::spawn(move || {
            let mut got = Vec::new();
            loop {
               match q.claim() {
                  Claim::Exhausted => break,
                  Claim::Reserved(_) => got.push(q.take()),
               }
            }
            got
         })
      })
      .collect();

   let producers: Vec<_> = (0..4usize)
      .map(|p| {
         let q = Arc::clone(&queue);
         thread::spawn(move || {
            for value in p * 100..(p + 1) * 100 {
               q.put(value);
            }
         })
      })
      .collect();

   for p in producers {
      p.join().unwrap();
   }
   let mut received: Vec<usize> = consumers
      .into_iter()
      .flat_map(|c| c.join().unwrap())
      .collect();
   received.sort_unstable();

   assert_eq!(received, (0..total).collect::<Vec<_>>(), "no item may be lost or duplicated");
   assert!(queue.is_empty());
   assert_eq!(queue.claimed(), total);
}

#[test]
fn latency_log_round_trips_in_claim_order() {
   let log = LatencyLog::new(3);
   log.record(0, 7);
   log.record(2, 0);
   log.record(1, 12);
   assert_eq!(log.into_micros().unwrap(), vec![7, 12, 0]);
}

#[test]
#[should_panic(expected = "written twice")]
fn latency_log_rejects_a_double_write() {
   let log = LatencyLog::new(3);
   log.record(1, 5);
   log.record(1, 9);
}

#[test]
fn latency_log_reports_a_gap() {
   let log = LatencyLog::new(2);
   log.record(0, 1);
   assert!(matches!(log.into_micros(), Err(Error::Invariant(_))));
}

#[test]
fn single_consumer_small_run_records_every_latency() {
   let cfg = PipelineConfig {
      capacity: 10,
      producers: 1,
      items_per_producer: 5,
      consumers: 1,
   };
   let latencies = run_pipeline(&cfg).unwrap();
   assert_eq!(latencies.len(), 5);
}

#[test]
fn more_consumers_than_remaining_work_still_exit() {
   let cfg = PipelineConfig {
      capacity: 2,
      producers: 2,
      items_per_producer: 3,
      consumers: 3,
   };
   // run_pipeline joins every consumer, so returning at all means the
   // surplus consumers exited instead of blocking on an empty ring.
   let latencies = run_pipeline(&cfg).unwrap();
   assert_eq!(latencies.len(), 6);
}

#[test]
fn sweep_of_consumer_counts_terminates() {
   for consumers in [1, 2, 3, 4, 8] {
      let cfg = PipelineConfig {
         capacity: 2,
         producers: 2,
         items_per_producer: 50,
         consumers,
      };
      let latencies = run_pipeline(&cfg).unwrap();
      assert_eq!(latencies.len(), 100, "with {consumers} consumers");
   }
}

#[test]
fn empty_production_run_yields_an_empty_log() {
   let cfg = PipelineConfig {
      capacity: 4,
      producers: 2,
      items_per_producer: 0,
      consumers: 2,
   };
   let latencies = run_pipeline(&cfg).unwrap();
   assert!(latencies.is_empty());
}

#[test]
fn zero_capacity_is_rejected() {
   let cfg = PipelineConfig {
      capacity: 0,
      producers: 1,
      items_per_producer: 1,
      consumers: 1,
   };
   assert!(matches!(run_pipeline(&cfg), Err(Error::Config(_))));
}

#[test]
fn zero_consumers_is_rejected() {
   let cfg = PipelineConfig {
      capacity: 4,
      producers: 1,
      items_per_producer: 1,
      consumers: 0,
   };
   assert!(matches!(run_pipeline(&cfg), Err(Error::Config(_))));
}

#[test]
fn sweep_writes_one_row_per_consumer_count() {
   let cfg = SweepConfig {
      capacity: 4,
      producers: 2,
      items_per_producer: 10,
      max_consumers: 4,
      settle: Duration::ZERO,
   };
   let mut out = Vec::new();
   run_sweep(&cfg, &mut out).unwrap();

   let text = String::from_utf8(out).unwrap();
   let rows: Vec<&str> = text.lines().collect();
   assert_eq!(rows.len(), 3, "consumer counts 1, 2 and 4");
   for row in rows {
      assert_eq!(row.split(',').count(), 20, "one latency per produced item");
   }
}
