pub mod math;
mod pool;
mod store;

pub use pool::{EvolvablePool, PoolMetrics, PoolState, SwapOutcome};
pub use store::PoolSet;
