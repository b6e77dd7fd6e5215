//! Task registry: named tasks with declared prerequisites
//!
//! Tasks form a directed graph (task → prerequisite) held in a petgraph
//! `DiGraph`. The graph is validated once when the registry is built, so every
//! later traversal can assume every prerequisite exists and there are no cycles.
//!
//! A plan is the depth-first post-order over prerequisites, visited in the
//! order each task declares them, with repeats dropped:
//!
//! ```text
//! test -> [lint, check-rules, unit, bundle]
//! plan(["test", "lint"]) = lint, check-rules, unit, bundle, test
//! ```

use crate::core::config::GateConfig;
use crate::core::error::{GateError, GateResult, TaskError};
use crate::release::ReleaseType;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// What a task does once its prerequisites have run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
  /// Nothing of its own; only aggregates prerequisites
  Group,
  Lint,
  CheckRules,
  Unit,
  Bundle,
  Perf,
  Changelog,
  Docs,
  Release(ReleaseType),
}

/// A named unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
  pub name: String,
  pub description: String,
  /// Prerequisites, run in this order before the task body
  pub deps: Vec<String>,
  pub action: TaskAction,
}

impl TaskDef {
  pub fn new(name: impl Into<String>, description: impl Into<String>, action: TaskAction) -> Self {
    Self {
      name: name.into(),
      description: description.into(),
      deps: Vec::new(),
      action,
    }
  }

  pub fn after(mut self, deps: &[&str]) -> Self {
    self.deps.extend(deps.iter().map(|d| d.to_string()));
    self
  }
}

/// Validated set of tasks
#[derive(Debug)]
pub struct TaskRegistry {
  graph: DiGraph<TaskDef, ()>,
  name_to_node: HashMap<String, NodeIndex>,
}

impl TaskRegistry {
  /// Build a registry, rejecting unknown prerequisites and cycles
  pub fn new(tasks: Vec<TaskDef>) -> GateResult<Self> {
    let mut graph = DiGraph::new();
    let mut name_to_node = HashMap::new();

    for task in tasks {
      let name = task.name.clone();
      if name_to_node.contains_key(&name) {
        return Err(GateError::message(format!("Task '{}' is registered twice", name)));
      }
      let idx = graph.add_node(task);
      name_to_node.insert(name, idx);
    }

    let mut edges = Vec::new();
    for idx in graph.node_indices() {
      let task = &graph[idx];
      for dep in &task.deps {
        let dep_idx = name_to_node.get(dep).ok_or_else(|| {
          GateError::Task(TaskError::UnknownDependency {
            task: task.name.clone(),
            dependency: dep.clone(),
          })
        })?;
        edges.push((idx, *dep_idx));
      }
    }
    for (from, to) in edges {
      graph.add_edge(from, to, ());
    }

    algo::toposort(&graph, None).map_err(|cycle| {
      GateError::Task(TaskError::Cycle {
        task: graph[cycle.node_id()].name.clone(),
      })
    })?;

    Ok(Self { graph, name_to_node })
  }

  /// The built-in task set
  pub fn builtin(config: &GateConfig) -> GateResult<Self> {
    let mut test_deps = vec!["lint", "check-rules", "unit", "bundle"];
    if config.perf.in_test_pipeline {
      test_deps.push("perf");
    }

    let mut tasks = vec![
      TaskDef::new("lint", "Style-check rules and tests, validate JSON files", TaskAction::Lint),
      TaskDef::new(
        "check-rules",
        "Check every rule has docs, an index link, a default and tests",
        TaskAction::CheckRules,
      ),
      TaskDef::new("unit", "Run unit tests and enforce coverage thresholds", TaskAction::Unit),
      TaskDef::new("bundle", "Build the browser bundle", TaskAction::Bundle),
      TaskDef::new("perf", "Median-of-three performance regression gate", TaskAction::Perf),
      TaskDef::new("test", "Full validation chain", TaskAction::Group).after(&test_deps),
      TaskDef::new("changelog", "Prepend an entry mined from the two latest tags", TaskAction::Changelog),
      TaskDef::new("docs", "Generate docs and republish the site", TaskAction::Docs),
    ];

    for level in ReleaseType::ALL {
      tasks.push(TaskDef::new(
        format!("release:{}", level),
        format!("Test, bump {} version, changelog, push, publish, republish site", level),
        TaskAction::Release(level),
      ));
    }

    tasks.push(TaskDef::new("all", "Default task (runs test)", TaskAction::Group).after(&["test"]));

    Self::new(tasks)
  }

  /// Tasks in registration order
  pub fn tasks(&self) -> impl Iterator<Item = &TaskDef> {
    self.graph.node_indices().map(move |idx| &self.graph[idx])
  }

  pub fn names(&self) -> Vec<String> {
    self.tasks().map(|t| t.name.clone()).collect()
  }

  /// Execution order for the requested tasks
  ///
  /// Each task appears once, after all of its prerequisites.
  pub fn plan<S: AsRef<str>>(&self, requested: &[S]) -> GateResult<Vec<&TaskDef>> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();

    for name in requested {
      let name = name.as_ref();
      let idx = self.name_to_node.get(name).ok_or_else(|| {
        GateError::Task(TaskError::Unknown {
          name: name.to_string(),
          available: self.names(),
        })
      })?;
      self.visit(*idx, &mut seen, &mut order);
    }

    log::debug!(
      "plan: {}",
      order.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(" -> ")
    );
    Ok(order)
  }

  fn visit<'a>(&'a self, idx: NodeIndex, seen: &mut HashSet<NodeIndex>, order: &mut Vec<&'a TaskDef>) {
    if !seen.insert(idx) {
      return;
    }
    let task = &self.graph[idx];
    for dep in &task.deps {
      // Validated at construction
      if let Some(dep_idx) = self.name_to_node.get(dep) {
        self.visit(*dep_idx, seen, order);
      }
    }
    order.push(task);
  }
}
