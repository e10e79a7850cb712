// src/graph/cycles.rs

//! Deterministic cycle discovery and removal.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::graph::importance::page_rank;
use crate::graph::symbol_graph::{Symbol, SymbolGraph};

/// A directed edge `(source, destination)`.
pub type Edge = (Symbol, Symbol);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

struct Frame<'a> {
    node: &'a str,
    successors: Vec<&'a str>,
    cursor: usize,
}

/// Find one cycle, returned as the list of edges forming a closed walk.
///
/// The search is a depth-first walk that starts from symbols in ascending
/// order and visits successors in ascending order, so the same graph always
/// yields the same cycle.
pub fn find_cycle(graph: &SymbolGraph) -> Option<Vec<Edge>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for root in graph.symbols() {
        if marks.contains_key(root) {
            continue;
        }

        marks.insert(root, Mark::OnStack);
        let mut stack = vec![Frame {
            node: root,
            successors: graph.successors(root),
            cursor: 0,
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.cursor == frame.successors.len() {
                marks.insert(frame.node, Mark::Done);
                stack.pop();
                continue;
            }

            let next = frame.successors[frame.cursor];
            frame.cursor += 1;

            match marks.get(next) {
                Some(Mark::Done) => {}
                Some(Mark::OnStack) => {
                    let start = stack.iter().position(|f| f.node == next)?;
                    let path: Vec<&str> = stack[start..].iter().map(|f| f.node).collect();
                    let mut cycle: Vec<Edge> = path
                        .windows(2)
                        .map(|w| (w[0].to_string(), w[1].to_string()))
                        .collect();
                    let last = path[path.len() - 1];
                    cycle.push((last.to_string(), next.to_string()));
                    return Some(cycle);
                }
                None => {
                    marks.insert(next, Mark::OnStack);
                    stack.push(Frame {
                        node: next,
                        successors: graph.successors(next),
                        cursor: 0,
                    });
                }
            }
        }
    }

    None
}

/// Result of [`CycleEliminator::eliminate`].
#[derive(Debug, Clone)]
pub struct Elimination {
    /// The acyclic graph.
    pub graph: SymbolGraph,
    /// Edges that were cut, in the order they were cut.
    pub removed: Vec<Edge>,
}

/// Removes edges until a graph is acyclic.
///
/// For every cycle found, the edge pointing into the least important
/// destination is cut. Ties on the minimum score go to the lexicographically
/// smallest `(source, destination)` pair. Symbols without a score count as
/// `0.0`.
#[derive(Debug, Clone, Default)]
pub struct CycleEliminator {
    scores: HashMap<Symbol, f64>,
}

impl CycleEliminator {
    pub fn new(scores: HashMap<Symbol, f64>) -> Self {
        Self { scores }
    }

    pub fn score_of(&self, symbol: &str) -> f64 {
        self.scores.get(symbol).copied().unwrap_or(0.0)
    }

    /// Pick the edge of `cycle` to cut.
    pub fn select_edge<'c>(&self, cycle: &'c [Edge]) -> Option<&'c Edge> {
        cycle.iter().min_by(|a, b| self.compare(a, b))
    }

    fn compare(&self, a: &Edge, b: &Edge) -> Ordering {
        self.score_of(&a.1)
            .total_cmp(&self.score_of(&b.1))
            .then_with(|| a.cmp(b))
    }

    pub fn eliminate(&self, graph: &SymbolGraph) -> Elimination {
        let mut working = graph.clone();
        let mut removed = Vec::new();

        while let Some(cycle) = find_cycle(&working) {
            let Some(edge) = self.select_edge(&cycle).cloned() else {
                break;
            };

            if !working.remove_edge(&edge.0, &edge.1) {
                warn!(src = %edge.0, dst = %edge.1, "cycle edge vanished before removal");
                break;
            }

            debug!(
                src = %edge.0,
                dst = %edge.1,
                cycle_len = cycle.len(),
                score = self.score_of(&edge.1),
                "cut cycle edge"
            );
            removed.push(edge);
        }

        if !removed.is_empty() {
            info!(removed = removed.len(), "removed edges to break cycles");
        }

        Elimination {
            graph: working,
            removed,
        }
    }
}

/// Score `graph` with PageRank and remove its cycles.
pub fn break_cycles(graph: &SymbolGraph) -> Elimination {
    CycleEliminator::new(page_rank(graph)).eliminate(graph)
}
