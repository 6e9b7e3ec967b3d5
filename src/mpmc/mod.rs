mod claim;
mod ring;

pub use claim::Claim;
pub use claim::ClaimCounter;
pub use ring::RingQueue;
