//! Queueing-latency measurements for a bounded producer/consumer pipeline.
//!
//! A fixed-capacity mutex/condvar ring carries timestamped jobs from a pool
//! of producers to a pool of consumers. A claim counter living under the
//! ring's own lock tells idle consumers when the known production total has
//! been fully handed out, so any pool size drains and stops without a
//! shutdown signal.

pub mod agent;
pub mod error;
pub mod harness;
pub mod item;
pub mod latency;
pub mod mpmc;

pub use error::Error;
pub use error::Result;
pub use harness::{run_pipeline, run_sweep, PipelineConfig, SweepConfig};
pub use item::{Job, WorkItem};
pub use latency::LatencyLog;
pub use mpmc::{Claim, ClaimCounter, RingQueue};
