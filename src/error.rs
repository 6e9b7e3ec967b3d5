use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
   /// Rejected construction parameters; nothing was run.
   #[error("invalid configuration: {0}")]
   Config(String),

   /// A post-run check found the pipeline in a state it must never reach.
   /// The run's measurements are discarded.
   #[error("pipeline invariant violated: {0}")]
   Invariant(String),

   #[error("a worker thread panicked")]
   WorkerPanic,

   #[error(transparent)]
   Io(#[from] std::io::Error),
}
