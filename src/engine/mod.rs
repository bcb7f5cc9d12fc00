// src/engine/mod.rs

//! Orchestration engine for procmgr.
//!
//! The [`Supervisor`] owns the validated process tree and drives one run of
//! it: every root is started concurrently through
//! [`NodeRunner`](crate::exec::NodeRunner), which in turn fans out to
//! dependents. All tasks share a single `CancellationToken`; cancelling it
//! (e.g. on Ctrl-C) stops every running process gracefully.

pub mod manager;

pub use manager::Supervisor;
