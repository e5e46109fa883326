mod ledger;

pub use ledger::{InMemoryLedger, PoolLedger};
