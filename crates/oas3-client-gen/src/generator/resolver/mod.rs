//! Reference resolution: dependency graph, back-edges, cycle report and
//! stable type names.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexSet;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

mod names;
#[cfg(test)]
mod tests;

pub use self::names::NameTable;
pub(crate) use self::names::{default_name, is_success_status};
use self::names::Namer;
use crate::{
  error::{GenerationError, Result},
  generator::{
    loader::{LoadedSpec, pointer::Pointer, schema::SchemaKind},
    metrics::GenerationWarning,
  },
  naming::identifiers::{synthesize_operation_id, to_field_name},
};

/// Per-run state carried from the resolver through composition and type
/// building.
#[derive(Debug, Default)]
pub struct ResolutionContext {
  visiting: IndexSet<Pointer>,
  pub names: NameTable,
  pub forward_declared: IndexSet<Pointer>,
  pub warnings: Vec<GenerationWarning>,
}

impl ResolutionContext {
  #[must_use]
  pub fn is_forward_declared(&self, pointer: &Pointer) -> bool {
    self.forward_declared.contains(pointer)
  }
}

/// The loaded document plus everything learned from walking its schema graph.
#[derive(Debug)]
pub struct ResolvedGraph<'a> {
  pub spec: &'a LoadedSpec,
  /// Reachable nodes in depth-first visiting order.
  pub order: Vec<Pointer>,
  /// Strongly connected components with more than one member or a self-loop.
  pub cycles: Vec<Vec<Pointer>>,
  /// One unique id per entry of `spec.operations`.
  pub operation_ids: Vec<String>,
  back_edges: HashSet<(Pointer, Pointer)>,
}

impl ResolvedGraph<'_> {
  #[must_use]
  pub fn is_back_edge(&self, from: &Pointer, to: &Pointer) -> bool {
    self.back_edges.contains(&(from.clone(), to.clone()))
  }

  #[must_use]
  pub fn back_edge_count(&self) -> usize {
    self.back_edges.len()
  }
}

/// Walks the loaded schema graph from its roots.
pub struct Resolver<'a> {
  spec: &'a LoadedSpec,
  ctx: ResolutionContext,
  visited: HashSet<Pointer>,
  order: Vec<Pointer>,
  back_edges: HashSet<(Pointer, Pointer)>,
  edges: Vec<(Pointer, Pointer)>,
}

impl<'a> Resolver<'a> {
  #[must_use]
  pub fn new(spec: &'a LoadedSpec) -> Self {
    Self {
      spec,
      ctx: ResolutionContext::default(),
      visited: HashSet::new(),
      order: vec![],
      back_edges: HashSet::new(),
      edges: vec![],
    }
  }

  fn visit(&mut self, pointer: &Pointer, referrer: Option<&Pointer>) -> Result<()> {
    if !self.visited.insert(pointer.clone()) {
      return Ok(());
    }
    let spec = self.spec;
    let node = spec.node(pointer).ok_or_else(|| {
      GenerationError::unresolved(
        pointer.to_string(),
        referrer.map(ToString::to_string),
        "schema was not loaded",
      )
    })?;

    self.order.push(pointer.clone());
    self.ctx.visiting.insert(pointer.clone());

    for target in node.kind.references() {
      self.edges.push((pointer.clone(), target.clone()));
      if self.ctx.visiting.contains(target) {
        self.back_edges.insert((pointer.clone(), target.clone()));
        self.ctx.forward_declared.insert(target.clone());
      } else {
        self.visit(target, Some(pointer))?;
      }
    }

    self.ctx.visiting.pop();
    Ok(())
  }

  #[tracing::instrument(skip_all, name = "resolve")]
  pub fn resolve(mut self) -> Result<(ResolvedGraph<'a>, ResolutionContext)> {
    let spec = self.spec;
    for root in spec.roots() {
      self.visit(&root, None)?;
    }

    let cycles = self.strongly_connected();
    for cycle in &cycles {
      let only_refs = cycle
        .iter()
        .all(|pointer| spec.node(pointer).is_some_and(|node| matches!(node.kind, SchemaKind::Ref(_))));
      if only_refs {
        return Err(GenerationError::unsupported(
          cycle[0].to_string(),
          "references form a cycle without a concrete schema",
        ));
      }
    }

    let operation_ids = self.operation_ids();
    Namer::new(spec, &mut self.ctx.names, &mut self.ctx.warnings).run(&operation_ids)?;

    tracing::debug!(
      nodes = self.order.len(),
      back_edges = self.back_edges.len(),
      cycles = cycles.len(),
      names = self.ctx.names.len(),
      "schema graph resolved"
    );

    let graph = ResolvedGraph {
      spec,
      order: self.order,
      cycles,
      operation_ids,
      back_edges: self.back_edges,
    };
    Ok((graph, self.ctx))
  }

  fn strongly_connected(&self) -> Vec<Vec<Pointer>> {
    let index: IndexSet<&Pointer> = self.order.iter().collect();
    let mut graph = DiGraphMap::<usize, ()>::new();
    for i in 0..index.len() {
      graph.add_node(i);
    }
    for (from, to) in &self.edges {
      if let (Some(a), Some(b)) = (index.get_index_of(from), index.get_index_of(to)) {
        graph.add_edge(a, b, ());
      }
    }

    let mut components: Vec<BTreeSet<usize>> = kosaraju_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| scc.into_iter().collect())
      .collect();
    components.sort_by_key(|scc| scc.first().copied());

    components
      .into_iter()
      .map(|scc| {
        scc
          .into_iter()
          .filter_map(|i| index.get_index(i).map(|pointer| (*pointer).clone()))
          .collect()
      })
      .collect()
  }

  /// Declared ids, or `<method>_<path>` when missing, made unique by their
  /// method name.
  fn operation_ids(&mut self) -> Vec<String> {
    let spec = self.spec;
    let mut used = HashSet::new();
    let mut ids = Vec::with_capacity(spec.operations.len());

    for operation in &spec.operations {
      let original = operation
        .operation_id
        .clone()
        .unwrap_or_else(|| synthesize_operation_id(operation.method.as_str(), &operation.path));

      let mut id = original.clone();
      let mut suffix = 2;
      while !used.insert(to_field_name(&id)) {
        id = format!("{original}{suffix}");
        suffix += 1;
      }
      if id != original {
        self.ctx.warnings.push(GenerationWarning::DuplicateOperationId {
          original,
          renamed: id.clone(),
        });
      }
      ids.push(id);
    }

    ids
  }
}
