mod factory;

pub use factory::{derive_pool_address, PoolFactory};
