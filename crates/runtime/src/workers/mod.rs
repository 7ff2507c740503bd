//! Background tasks owned by the runtime.
//!
//! Each worker runs a `select!` loop over its interval tick and a shared
//! shutdown signal; the runtime joins them on shutdown.

mod flush;
mod presence;

pub use flush::FlushWorker;
pub use presence::{PresenceSweeper, sweep_presence};
