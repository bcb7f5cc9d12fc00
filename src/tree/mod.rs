// src/tree/mod.rs

//! Process dependency tree.
//!
//! - [`tokenize`] splits configured command strings into argv tokens.
//! - [`node`] defines the per-process node stored in the arena.
//! - [`validate`] holds the graph checks (duplicates, unresolved `after`,
//!   auto-restart with dependents, cycles).
//! - [`builder`] wires descriptors into a validated [`ProcessTree`].

pub mod builder;
pub mod node;
pub mod tokenize;
pub mod validate;

pub use builder::{ProcessTree, build_tree};
pub use node::{NodeId, ProcessNode};
pub use tokenize::tokenize;
pub use validate::{find_cycle, validate_graph};
