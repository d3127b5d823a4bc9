//! Inheritance graph over a snapshot, built with petgraph
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `B → D` means "D extends B"
//! - **Nodes**: indices into `MetadataSnapshot::types`
//! - **Edges**: only bases that are themselves in the snapshot
//! - **Order**: topological, so every ancestor is planned before its descendants
//! - **Cycles**: Tarjan SCCs; only types on a loop fail, never types below one
//!
//! A descendant only ever needs its closest ancestor's published shape, never
//! its plan; the graph exists to answer "which shape" and "in what order".

use crate::core::error::NormalizeError;
use crate::metadata::decl::AncestorShape;
use crate::metadata::snapshot::MetadataSnapshot;
use crate::plan::diagnostic::Diagnostic;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Topo;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Resolved ancestor chain for one type
#[derive(Debug, Clone, Default)]
pub struct AncestorChain {
  /// Closest first, ending at the first ancestor that publishes a guarded hook
  pub shapes: Vec<AncestorShape>,
  pub diagnostics: Vec<Diagnostic>,
}

/// Inheritance relationships between snapshot types
pub struct TypeHierarchy<'a> {
  snapshot: &'a MetadataSnapshot,
  graph: DiGraph<usize, ()>,
  name_to_node: HashMap<&'a str, NodeIndex>,
  /// Nodes whose base chain loops back onto themselves
  cyclic: HashSet<NodeIndex>,
}

impl<'a> TypeHierarchy<'a> {
  /// Build the graph; edges only connect types present in the snapshot
  pub fn build(snapshot: &'a MetadataSnapshot) -> Self {
    let mut graph = DiGraph::new();
    let mut name_to_node = HashMap::new();

    for (idx, decl) in snapshot.types.iter().enumerate() {
      let node = graph.add_node(idx);
      name_to_node.insert(decl.name.as_str(), node);
    }

    for decl in &snapshot.types {
      if let Some(base) = decl.base.as_deref()
        && let Some(&base_node) = name_to_node.get(base)
      {
        graph.add_edge(base_node, name_to_node[decl.name.as_str()], ());
      }
    }

    let cyclic = algo::tarjan_scc(&graph)
      .into_iter()
      .filter(|component| component.len() > 1 || graph.contains_edge(component[0], component[0]))
      .flatten()
      .collect();

    Self {
      snapshot,
      graph,
      name_to_node,
      cyclic,
    }
  }

  /// Walk the base chain of `type_name` upward, closest ancestor first.
  ///
  /// The walk stops at the first ancestor that publishes a guarded hook, or at
  /// the first base that is not in the snapshot (with an info diagnostic).
  /// A type that sits on a loop of bases is an `InheritanceCycle`.
  pub fn ancestors(&self, type_name: &str, release_method: &str) -> Result<AncestorChain, NormalizeError> {
    let mut chain = AncestorChain::default();
    let Some(decl) = self.snapshot.find(type_name) else {
      return Ok(chain);
    };

    if let Some(&node) = self.name_to_node.get(type_name)
      && self.cyclic.contains(&node)
    {
      return Err(NormalizeError::InheritanceCycle {
        type_name: type_name.to_string(),
        chain: self.cycle_path(type_name),
      });
    }

    let mut visited = HashSet::from([decl.name.as_str()]);
    let mut next = decl.base.as_deref();

    // Bounded by the number of types: every step visits a new one or stops
    while let Some(base_name) = next {
      let Some(&node) = self.name_to_node.get(base_name) else {
        chain.diagnostics.push(Diagnostic::unresolved_ancestor(type_name, base_name));
        break;
      };
      if !visited.insert(base_name) {
        // A loop above us that published nothing on the way in
        debug!(type_name, ancestor = base_name, "ancestor walk reached a loop");
        break;
      }

      let base = &self.snapshot.types[self.graph[node]];
      let shape = base.shape(release_method);
      let published = shape.published().is_some();
      chain.shapes.push(shape);
      if published {
        break;
      }
      next = base.base.as_deref();
    }

    Ok(chain)
  }

  /// Names around the loop starting and ending at `type_name`
  fn cycle_path(&self, type_name: &str) -> Vec<String> {
    let mut path = vec![type_name.to_string()];
    let mut next = self.snapshot.find(type_name).and_then(|d| d.base.as_deref());

    while let Some(base_name) = next
      && path.len() <= self.snapshot.types.len()
    {
      path.push(base_name.to_string());
      if base_name == type_name {
        break;
      }
      next = self.snapshot.find(base_name).and_then(|d| d.base.as_deref());
    }

    path
  }

  /// Snapshot indices with every ancestor ahead of its descendants.
  ///
  /// Types caught in a cycle are never reached by the topological walk; they
  /// are appended in snapshot order so the driver can report them.
  pub fn generation_order(&self) -> Vec<usize> {
    let mut order = Vec::with_capacity(self.snapshot.types.len());
    let mut seen = vec![false; self.snapshot.types.len()];

    let mut topo = Topo::new(&self.graph);
    while let Some(node) = topo.next(&self.graph) {
      let idx = self.graph[node];
      seen[idx] = true;
      order.push(idx);
    }

    order.extend((0..self.snapshot.types.len()).filter(|&idx| !seen[idx]));
    order
  }
}
