//! State-space search over configurations.
//!
//! Four strategies share the same machinery:
//! - a visited set of normalized configurations (`FxHashSet<StateKey>`),
//! - an arena of discovered nodes with index back-links to their parent,
//! - a frontier whose shape depends on the strategy.
//!
//! Depth-first keeps its path on an explicit stack instead of recursing, so
//! deep searches cannot overflow the thread stack. Closed states are never
//! reopened: a configuration popped a second time is skipped.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::configuration::{Configuration, StateKey};
use crate::error::{ChoiceError, SearchError};
use crate::heuristic::{GoalIndex, Heuristic};
use crate::moves::{path_moves, Move};
use crate::problem::Problem;

/// Expansions between progress events.
const PROGRESS_INTERVAL: usize = 10_000;

/// Search strategy selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    AStar,
    BestFirst,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::AStar,
        Strategy::BestFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::DepthFirst => "depth",
            Strategy::BreadthFirst => "breadth",
            Strategy::AStar => "astar",
            Strategy::BestFirst => "best",
        }
    }

    /// Whether the strategy consults the heuristic.
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::AStar | Strategy::BestFirst)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "depth" | "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "breadth" | "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "astar" | "a*" | "a-star" => Ok(Strategy::AStar),
            "best" | "best-first" | "greedy" => Ok(Strategy::BestFirst),
            _ => Err(ChoiceError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Counters for one search invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Configurations whose successors were generated.
    pub expanded: usize,
    /// Successor candidates produced, before visited-set filtering.
    pub generated: usize,
    /// Largest frontier (queue, heap, or stack depth) seen.
    pub max_frontier: usize,
}

impl SearchStats {
    fn observe_frontier(&mut self, size: usize) {
        self.max_frontier = self.max_frontier.max(size);
    }

    fn expanded_one(&mut self, strategy: Strategy, children: usize) {
        self.expanded += 1;
        self.generated += children;
        if self.expanded % PROGRESS_INTERVAL == 0 {
            debug!(
                event = "search_progress",
                strategy = %strategy,
                expanded = self.expanded,
                generated = self.generated,
                max_frontier = self.max_frontier,
            );
        }
    }
}

/// A path from the initial configuration to the goal.
#[derive(Debug, Clone)]
pub struct Solution {
    pub strategy: Strategy,
    /// Configurations from start to goal, inclusive.
    pub path: Vec<Configuration>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl Solution {
    /// Number of moves, one fewer than the number of configurations.
    pub fn move_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// The move behind each step of the path.
    pub fn moves(&self) -> Result<Vec<Move>, SearchError> {
        path_moves(&self.path)
    }

    pub fn final_configuration(&self) -> Option<&Configuration> {
        self.path.last()
    }
}

/// Solves `problem` with `strategy` and the default heuristic.
pub fn solve(problem: &Problem, strategy: Strategy) -> Result<Solution, SearchError> {
    solve_with(problem, strategy, Heuristic::default())
}

/// Solves `problem` with `strategy`, scoring informed searches with `heuristic`.
pub fn solve_with(
    problem: &Problem,
    strategy: Strategy,
    heuristic: Heuristic,
) -> Result<Solution, SearchError> {
    info!(
        event = "search_start",
        strategy = %strategy,
        heuristic = %heuristic,
        blocks = problem.block_count(),
    );
    run(strategy, problem.initial(), problem.goal(), heuristic)
}

fn run(
    strategy: Strategy,
    start: &Configuration,
    goal: &Configuration,
    heuristic: Heuristic,
) -> Result<Solution, SearchError> {
    let started = Instant::now();
    let (path, stats) = match strategy {
        Strategy::DepthFirst => depth_first(start, goal),
        Strategy::BreadthFirst => breadth_first(start, goal),
        Strategy::AStar | Strategy::BestFirst => informed(strategy, start, goal, heuristic),
    };
    let elapsed = started.elapsed();

    match path {
        Some(path) => {
            info!(
                event = "search_end",
                strategy = %strategy,
                moves = path.len().saturating_sub(1),
                expanded = stats.expanded,
                generated = stats.generated,
                max_frontier = stats.max_frontier,
                duration_ms = elapsed.as_millis() as u64,
            );
            Ok(Solution {
                strategy,
                path,
                stats,
                elapsed,
            })
        }
        None => {
            warn!(
                event = "search_exhausted",
                strategy = %strategy,
                expanded = stats.expanded,
                generated = stats.generated,
                duration_ms = elapsed.as_millis() as u64,
            );
            Err(SearchError::Exhausted { strategy, stats })
        }
    }
}

/// The path found, if any, and the counters of the run that found it.
type Outcome = (Option<Vec<Configuration>>, SearchStats);

/// A discovered configuration and the arena index of its predecessor.
struct Node {
    configuration: Configuration,
    parent: Option<usize>,
}

/// Follows parent links from `index` back to the start.
fn trace_path(nodes: &[Node], index: usize) -> Vec<Configuration> {
    let mut path = Vec::new();
    let mut current = Some(index);
    while let Some(i) = current {
        path.push(nodes[i].configuration.clone());
        current = nodes[i].parent;
    }
    path.reverse();
    path
}

/// One level of the depth-first stack: a configuration on the current path
/// and the successors not yet tried from it.
struct Frame {
    configuration: Configuration,
    children: std::vec::IntoIter<Configuration>,
}

fn depth_first(start: &Configuration, goal: &Configuration) -> Outcome {
    let mut stats = SearchStats::default();
    let goal_key = goal.canonical_key();
    let mut visited: FxHashSet<StateKey> = FxHashSet::default();

    let start_key = start.canonical_key();
    if start_key == goal_key {
        return (Some(vec![start.clone()]), stats);
    }
    visited.insert(start_key);

    let children = start.successors();
    stats.expanded_one(Strategy::DepthFirst, children.len());
    let mut stack = vec![Frame {
        configuration: start.clone(),
        children: children.into_iter(),
    }];
    stats.observe_frontier(stack.len());

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.next() else {
            // every successor explored: backtrack
            stack.pop();
            continue;
        };

        let key = child.canonical_key();
        if visited.contains(&key) {
            continue;
        }
        let reached_goal = key == goal_key;
        visited.insert(key);

        if reached_goal {
            let mut path: Vec<Configuration> =
                stack.into_iter().map(|frame| frame.configuration).collect();
            path.push(child);
            return (Some(path), stats);
        }

        let children = child.successors();
        stats.expanded_one(Strategy::DepthFirst, children.len());
        stack.push(Frame {
            configuration: child,
            children: children.into_iter(),
        });
        stats.observe_frontier(stack.len());
    }

    (None, stats)
}

fn breadth_first(start: &Configuration, goal: &Configuration) -> Outcome {
    let mut stats = SearchStats::default();
    let goal_key = goal.canonical_key();
    let mut visited: FxHashSet<StateKey> = FxHashSet::default();

    let mut nodes = vec![Node {
        configuration: start.clone(),
        parent: None,
    }];
    let mut queue = VecDeque::from([0usize]);

    while let Some(index) = queue.pop_front() {
        let key = nodes[index].configuration.canonical_key();
        if visited.contains(&key) {
            continue;
        }
        let reached_goal = key == goal_key;
        visited.insert(key);

        if reached_goal {
            return (Some(trace_path(&nodes, index)), stats);
        }

        let children = nodes[index].configuration.successors();
        stats.expanded_one(Strategy::BreadthFirst, children.len());
        for child in children {
            if visited.contains(&child.canonical_key()) {
                continue;
            }
            nodes.push(Node {
                configuration: child,
                parent: Some(index),
            });
            queue.push_back(nodes.len() - 1);
        }
        stats.observe_frontier(queue.len());
    }

    (None, stats)
}

/// Priority-queue entry; the heap pops the smallest `(priority, tie, sequence)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Queued {
    priority: u32,
    tie: u32,
    sequence: u64,
    node: usize,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.priority, other.tie, other.sequence).cmp(&(self.priority, self.tie, self.sequence))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* orders by `f = g + h` (ties to the lower `h`); best-first orders by
/// `h` alone and never accumulates `g`. Equal keys pop in insertion order.
fn informed(
    strategy: Strategy,
    start: &Configuration,
    goal: &Configuration,
    heuristic: Heuristic,
) -> Outcome {
    let greedy = strategy == Strategy::BestFirst;
    let mut stats = SearchStats::default();
    let goal_key = goal.canonical_key();
    let goal_index = GoalIndex::new(goal);
    let mut visited: FxHashSet<StateKey> = FxHashSet::default();

    let queued = |configuration: &Configuration, sequence: u64, node: usize| {
        if greedy {
            Queued {
                priority: configuration.h(),
                tie: 0,
                sequence,
                node,
            }
        } else {
            Queued {
                priority: configuration.f(),
                tie: configuration.h(),
                sequence,
                node,
            }
        }
    };

    let mut root = start.clone();
    root.set_costs(0, goal_index.estimate(heuristic, start));
    let mut frontier = BinaryHeap::new();
    frontier.push(queued(&root, 0, 0));
    let mut nodes = vec![Node {
        configuration: root,
        parent: None,
    }];
    let mut sequence = 1u64;

    while let Some(entry) = frontier.pop() {
        let index = entry.node;
        let key = nodes[index].configuration.canonical_key();
        if visited.contains(&key) {
            continue;
        }
        let reached_goal = key == goal_key;
        visited.insert(key);

        if reached_goal {
            return (Some(trace_path(&nodes, index)), stats);
        }

        let g = if greedy {
            0
        } else {
            nodes[index].configuration.g() + 1
        };
        let children = nodes[index].configuration.successors();
        stats.expanded_one(strategy, children.len());

        for mut child in children {
            if visited.contains(&child.canonical_key()) {
                continue;
            }
            child.set_costs(g, goal_index.estimate(heuristic, &child));
            frontier.push(queued(&child, sequence, nodes.len()));
            sequence += 1;
            nodes.push(Node {
                configuration: child,
                parent: Some(index),
            });
        }
        stats.observe_frontier(frontier.len());
    }

    (None, stats)
}
