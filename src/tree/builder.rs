// src/tree/builder.rs

use tracing::debug;

use crate::config::ProcessDescriptor;
use crate::errors::ConfigError;
use crate::tree::node::{NodeId, ProcessNode};
use crate::tree::validate::{validate_graph, validate_no_duplicates};

/// Validated dependency forest.
///
/// Nodes live in an arena indexed by [`NodeId`] (declaration order). The
/// tree is immutable once built and is shared read-only by every runner task.
#[derive(Debug, Clone)]
pub struct ProcessTree {
    nodes: Vec<ProcessNode>,
    roots: Vec<NodeId>,
}

impl ProcessTree {
    /// Root ids (processes without `after`), in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &ProcessNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[ProcessNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Direct dependents of `id`.
    pub fn dependents(&self, id: NodeId) -> impl Iterator<Item = &ProcessNode> {
        self.nodes[id].before.iter().map(|&child| &self.nodes[child])
    }
}

/// Turn a flat descriptor list into a validated [`ProcessTree`].
///
/// 1. tokenize every command into a node
/// 2. reject duplicate names
/// 3. wire each `after` reference into the parent's `before` list
/// 4. run the remaining graph checks
/// 5. collect roots
pub fn build_tree(descriptors: &[ProcessDescriptor]) -> Result<ProcessTree, ConfigError> {
    let mut nodes = descriptors
        .iter()
        .map(ProcessNode::from_descriptor)
        .collect::<Result<Vec<_>, _>>()?;

    validate_no_duplicates(&nodes)?;
    wire_dependents(&mut nodes);
    validate_graph(&nodes)?;

    let roots: Vec<NodeId> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_root())
        .map(|(id, _)| id)
        .collect();

    debug!(
        processes = nodes.len(),
        roots = roots.len(),
        "process tree built"
    );

    Ok(ProcessTree { nodes, roots })
}

/// Single wiring pass: append every node to the `before` list of each node
/// it names in `after`.
fn wire_dependents(nodes: &mut [ProcessNode]) {
    for child in 0..nodes.len() {
        let Some(after) = nodes[child].after.clone() else {
            continue;
        };
        for parent in 0..nodes.len() {
            if nodes[parent].name == after {
                nodes[parent].before.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(name: &str, after: &str) -> ProcessDescriptor {
        ProcessDescriptor {
            name: name.to_string(),
            command: format!("echo {name}"),
            auto_restart: false,
            after: Some(after.to_string()),
            work_dir: None,
        }
    }

    #[test]
    fn roots_are_processes_without_after() {
        let tree = build_tree(&[desc("a", ""), desc("b", "a"), desc("c", "")]).unwrap();

        let roots: Vec<&str> = tree
            .roots()
            .iter()
            .map(|&id| tree.node(id).name.as_str())
            .collect();
        assert_eq!(roots, vec!["a", "c"]);
    }

    #[test]
    fn dependents_keep_declaration_order() {
        let tree = build_tree(&[
            desc("web", "db"),
            desc("db", ""),
            desc("worker", "db"),
        ])
        .unwrap();

        let db = tree.find("db").unwrap();
        let deps: Vec<&str> = tree.dependents(db).map(|n| n.name.as_str()).collect();
        assert_eq!(deps, vec!["web", "worker"]);
        assert_eq!(tree.roots(), &[db]);
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let err = build_tree(&[desc("foo", "bar"), desc("bar", "foo")]).unwrap_err();
        match err {
            ConfigError::CircularDependency(path) => assert_eq!(path, "foo\nbar"),
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn duplicates_fail_before_wiring() {
        let err = build_tree(&[desc("foo", ""), desc("foo", "")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName(name) if name == "foo"));
    }
}
