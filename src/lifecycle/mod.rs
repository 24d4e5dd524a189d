//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber wakes → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the stop signal out to every task
//! - Draining is bounded by `timeouts.shutdown_secs`

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
