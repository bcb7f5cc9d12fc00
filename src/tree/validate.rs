// src/tree/validate.rs

//! Graph checks run over the wired node arena.
//!
//! Every check scans nodes in declaration order, so for a given config the
//! reported error is always the same one.

use std::collections::HashSet;

use crate::errors::ConfigError;
use crate::tree::node::{NodeId, ProcessNode};

/// Run all graph checks:
///
/// - names are unique
/// - every `after` names an existing process
/// - per node: no auto-restart with dependents, no circular dependency
pub fn validate_graph(nodes: &[ProcessNode]) -> Result<(), ConfigError> {
    validate_no_duplicates(nodes)?;
    validate_dependencies_resolved(nodes)?;

    for (id, node) in nodes.iter().enumerate() {
        validate_no_restart_with_dependents(node)?;
        if let Some(path) = find_cycle(nodes, id) {
            return Err(ConfigError::CircularDependency(path));
        }
    }

    Ok(())
}

/// Fails with the first name (case-sensitive) seen twice.
pub fn validate_no_duplicates(nodes: &[ProcessNode]) -> Result<(), ConfigError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(ConfigError::DuplicateName(node.name.clone()));
        }
    }
    Ok(())
}

/// Fails for an `after` reference that matches no process name.
///
/// Without this check such a process would never be attached to a parent
/// and would silently never run.
pub fn validate_dependencies_resolved(nodes: &[ProcessNode]) -> Result<(), ConfigError> {
    let names: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    for node in nodes {
        if let Some(after) = node.after.as_deref() {
            if !names.contains(after) {
                return Err(ConfigError::UnresolvedDependency {
                    process: node.name.clone(),
                    after: after.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// An auto-restarting process never completes, so nothing may wait for it.
pub fn validate_no_restart_with_dependents(node: &ProcessNode) -> Result<(), ConfigError> {
    if node.auto_restart && !node.before.is_empty() {
        return Err(ConfigError::InvalidAutoRestart(node.name.clone()));
    }
    Ok(())
}

/// Depth-first walk along `before` edges starting at `start`.
///
/// Returns the ancestor path (names joined by `\n`) at the first point where
/// a node shows up again on its own path, or `None` if the walk is acyclic.
pub fn find_cycle(nodes: &[ProcessNode], start: NodeId) -> Option<String> {
    let mut on_path = vec![false; nodes.len()];
    let mut done = vec![false; nodes.len()];

    // (node, index of the next dependent to visit)
    let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
    on_path[start] = true;

    while let Some(frame) = stack.last_mut() {
        let (id, next) = *frame;

        match nodes[id].before.get(next) {
            Some(&child) => {
                frame.1 += 1;

                if on_path[child] {
                    let path: Vec<&str> = stack
                        .iter()
                        .map(|&(id, _)| nodes[id].name.as_str())
                        .collect();
                    return Some(path.join("\n"));
                }

                if !done[child] {
                    on_path[child] = true;
                    stack.push((child, 0));
                }
            }
            None => {
                on_path[id] = false;
                done[id] = true;
                stack.pop();
            }
        }
    }

    None
}
