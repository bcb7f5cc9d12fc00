// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessBackend` / `ManagedProcess` traits and
//!   the `RealProcessBackend` built on `tokio::process`, which tests can
//!   replace with a fake implementation.
//! - [`runner`] is the per-node execution engine: start, graceful stop with
//!   a grace period, auto-restart, and fan-out to dependents.

pub mod backend;
pub mod runner;

pub use backend::{ManagedProcess, ProcessBackend, ProcessExit, RealProcessBackend};
pub use runner::NodeRunner;
