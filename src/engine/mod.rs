pub mod ledger;
pub mod lifetime;
pub mod metrics;

pub use ledger::{CharacterScore, SessionLedger};
pub use lifetime::LifetimeStats;
pub use metrics::Ratio;
