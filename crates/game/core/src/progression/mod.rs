//! Progression Accrual Engine - energy regeneration and auto-cultivation.
//!
//! Accrual is lazy: nothing ticks in the background. A caller evaluates
//! [`accrue`] whenever it reads a resource, and a flush worker persists the
//! pending amount according to [`FlushPolicy`]. Displayed values therefore
//! lag real accrual until the next read.

pub mod accrual;
pub mod flush;

pub use accrual::{
    Accrual, AccrualRate, ProgressionClock, ProgressionRates, ResourceKind, accrue,
};
pub use flush::FlushPolicy;
