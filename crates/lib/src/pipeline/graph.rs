//! Stage dependency graph.
//!
//! Stages and their declared predecessors form a DAG. The graph is
//! validated once at construction and yields a single deterministic
//! execution order: a topological order in which ready stages are taken in
//! declaration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::stage::Stage;
use super::types::PipelineError;

pub struct StageGraph {
  graph: DiGraph<Stage, ()>,
  nodes: HashMap<Stage, NodeIndex>,
  order: Vec<Stage>,
}

impl StageGraph {
  /// The fixed theme build graph.
  pub fn new() -> Result<Self, PipelineError> {
    let declarations: Vec<(Stage, &[Stage])> = Stage::ALL.iter().map(|&s| (s, s.predecessors())).collect();
    Self::from_declarations(&declarations)
  }

  /// Build a graph from `(stage, predecessors)` declarations.
  ///
  /// # Errors
  ///
  /// `UndeclaredStage` when a predecessor has no declaration of its own,
  /// `CycleDetected` when the declarations are not acyclic.
  pub fn from_declarations(declarations: &[(Stage, &[Stage])]) -> Result<Self, PipelineError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for (stage, _) in declarations {
      nodes.entry(*stage).or_insert_with(|| graph.add_node(*stage));
    }

    for (stage, preds) in declarations {
      for pred in *preds {
        let Some(&pred_idx) = nodes.get(pred) else {
          return Err(PipelineError::UndeclaredStage {
            stage: *stage,
            missing: *pred,
          });
        };
        // Edge from predecessor to dependent
        graph.update_edge(pred_idx, nodes[stage], ());
      }
    }

    toposort(&graph, None).map_err(|_| PipelineError::CycleDetected)?;

    let order = Self::ordered(&graph);
    Ok(Self { graph, nodes, order })
  }

  /// Kahn's algorithm with a min-heap over node indices, which follow
  /// declaration order.
  fn ordered(graph: &DiGraph<Stage, ()>) -> Vec<Stage> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
      .node_indices()
      .map(|idx| (idx, graph.neighbors_directed(idx, Direction::Incoming).count()))
      .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> =
      in_degree.iter().filter(|&(_, &deg)| deg == 0).map(|(&idx, _)| Reverse(idx)).collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
      order.push(graph[idx]);
      for next in graph.neighbors_directed(idx, Direction::Outgoing) {
        if let Some(deg) = in_degree.get_mut(&next) {
          *deg -= 1;
          if *deg == 0 {
            ready.push(Reverse(next));
          }
        }
      }
    }
    order
  }

  /// Every stage in execution order.
  pub fn order(&self) -> &[Stage] {
    &self.order
  }

  /// Direct predecessors of a stage, in execution order.
  pub fn predecessors(&self, stage: Stage) -> Vec<Stage> {
    let Some(&idx) = self.nodes.get(&stage) else {
      return Vec::new();
    };
    let direct: HashSet<Stage> = self
      .graph
      .neighbors_directed(idx, Direction::Incoming)
      .map(|p| self.graph[p])
      .collect();
    self.order.iter().copied().filter(|s| direct.contains(s)).collect()
  }

  /// The stage plus all of its transitive predecessors, in execution order.
  pub fn closure(&self, target: Stage) -> Vec<Stage> {
    let mut wanted = HashSet::new();
    let mut stack = vec![target];
    while let Some(stage) = stack.pop() {
      if !wanted.insert(stage) {
        continue;
      }
      if let Some(&idx) = self.nodes.get(&stage) {
        stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming).map(|p| self.graph[p]));
      }
    }
    self.sort(&wanted.into_iter().collect::<Vec<_>>())
  }

  /// Order an arbitrary selection of stages for execution, dropping
  /// duplicates and stages the graph does not know.
  pub fn sort(&self, stages: &[Stage]) -> Vec<Stage> {
    let wanted: HashSet<Stage> = stages.iter().copied().collect();
    self.order.iter().copied().filter(|s| wanted.contains(s)).collect()
  }
}
