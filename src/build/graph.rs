/* src/build/graph.rs */

// Declarative task graph. Each profile maps to a task table with explicit
// dependencies, executed by a small topological scheduler: ready tasks
// spawn concurrently, a task starts only after every dependency finished
// successfully, and a failure skips its dependents while independent
// in-flight branches run to completion.

use std::collections::HashMap;
use std::future::Future;

use anyhow::{Context, Result, bail};
use tokio::task::JoinSet;

use crate::build::profile::BuildProfile;
use crate::ui::{self, DIM, RESET};

/// Pipeline steps, in no particular order. Ordering lives in the
/// dependency table built by `plan_tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
  Clean,
  Revision,
  Constants,
  CopyAssets,
  Stylesheet,
  VendorBundle,
  AppBundle,
  RewriteHtml,
}

impl Task {
  pub fn name(self) -> &'static str {
    match self {
      Self::Clean => "clean",
      Self::Revision => "revision",
      Self::Constants => "constants",
      Self::CopyAssets => "assets",
      Self::Stylesheet => "stylesheets",
      Self::VendorBundle => "vendor bundle",
      Self::AppBundle => "app bundle",
      Self::RewriteHtml => "rewrite html",
    }
  }
}

/// One node: a task plus the tasks that must complete before it.
#[derive(Debug, Clone)]
pub struct TaskNode {
  pub task: Task,
  pub deps: Vec<Task>,
}

/// The profile's task table. The HTML rewrite is the only
/// profile-gated node.
pub fn plan_tasks(profile: &BuildProfile) -> Vec<TaskNode> {
  let mut nodes = vec![
    TaskNode { task: Task::Clean, deps: vec![] },
    TaskNode { task: Task::Revision, deps: vec![Task::Clean] },
    TaskNode { task: Task::Constants, deps: vec![Task::Revision] },
    TaskNode { task: Task::CopyAssets, deps: vec![Task::Revision] },
    TaskNode { task: Task::Stylesheet, deps: vec![Task::Revision, Task::CopyAssets] },
    TaskNode { task: Task::VendorBundle, deps: vec![Task::Revision] },
    TaskNode {
      task: Task::AppBundle,
      deps: vec![Task::Revision, Task::Constants, Task::VendorBundle],
    },
  ];
  if profile.rewrite_html {
    nodes.push(TaskNode {
      task: Task::RewriteHtml,
      deps: vec![Task::CopyAssets, Task::Stylesheet, Task::VendorBundle, Task::AppBundle],
    });
  }
  nodes
}

pub async fn execute_graph<F, Fut>(nodes: &[TaskNode], run: F) -> Result<()>
where
  F: Fn(Task) -> Fut,
  Fut: Future<Output = Result<()>> + Send + 'static,
{
  let total = nodes.len();
  let index_of: HashMap<Task, usize> =
    nodes.iter().enumerate().map(|(idx, node)| (node.task, idx)).collect();

  let mut in_degree = vec![0usize; total];
  let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); total];
  for (idx, node) in nodes.iter().enumerate() {
    for dep in &node.deps {
      let Some(&dep_idx) = index_of.get(dep) else {
        bail!("task {} depends on {}, which is not in the plan", node.task.name(), dep.name());
      };
      in_degree[idx] += 1;
      dependents[dep_idx].push(idx);
    }
  }

  let mut ready: Vec<usize> = (0..total).filter(|&idx| in_degree[idx] == 0).collect();
  let mut skipped = vec![false; total];
  let mut in_flight = JoinSet::new();
  // ran or skipped; the loop ends when every node is accounted for
  let mut resolved = 0usize;
  let mut failures = 0usize;
  let mut first_error: Option<anyhow::Error> = None;

  while resolved < total {
    for idx in ready.drain(..) {
      let fut = run(nodes[idx].task);
      in_flight.spawn(async move { (idx, fut.await) });
    }

    let Some(joined) = in_flight.join_next().await else {
      bail!("task graph cycle: {} of {total} tasks cannot start", total - resolved);
    };
    let (idx, result) = joined.context("build task panicked")?;
    resolved += 1;
    match result {
      Ok(()) => {
        for &dep_idx in &dependents[idx] {
          in_degree[dep_idx] -= 1;
          if in_degree[dep_idx] == 0 && !skipped[dep_idx] {
            ready.push(dep_idx);
          }
        }
      }
      Err(e) => {
        failures += 1;
        ui::fail(&format!("{}: {e:#}", nodes[idx].task.name()));
        if first_error.is_none() {
          first_error = Some(e);
        }
        resolved += skip_dependents(idx, nodes, &dependents, &mut skipped);
      }
    }
  }

  match first_error {
    Some(e) if failures > 1 => Err(e.context(format!("{failures} tasks failed"))),
    Some(e) => Err(e),
    None => Ok(()),
  }
}

/// Mark everything downstream of a failed node as skipped. Returns how
/// many nodes were newly marked.
fn skip_dependents(
  root: usize,
  nodes: &[TaskNode],
  dependents: &[Vec<usize>],
  skipped: &mut [bool],
) -> usize {
  let mut queue = vec![root];
  let mut count = 0;
  while let Some(idx) = queue.pop() {
    for &dep_idx in &dependents[idx] {
      if !skipped[dep_idx] {
        skipped[dep_idx] = true;
        count += 1;
        let name = nodes[dep_idx].task.name();
        ui::detail(&format!("{DIM}skipped {name} (dependency failed){RESET}"));
        queue.push(dep_idx);
      }
    }
  }
  count
}
