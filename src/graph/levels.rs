// src/graph/levels.rs

use std::collections::HashMap;

use tracing::debug;

use crate::errors::{DocgraphError, Result};
use crate::graph::symbol_graph::{Symbol, SymbolGraph};

/// Partition of a DAG into dependency levels.
///
/// Group 0 holds every symbol without dependencies; a symbol in group `i`
/// has all of its dependencies in groups `< i` and at least one in group
/// `i - 1`. Symbols inside a group are sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levels {
    groups: Vec<Vec<Symbol>>,
    level_of: HashMap<Symbol, usize>,
}

impl Levels {
    pub fn groups(&self) -> &[Vec<Symbol>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<Symbol>> {
        self.groups
    }

    pub fn level_of(&self, symbol: &str) -> Option<usize> {
        self.level_of.get(symbol).copied()
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of symbols across all levels.
    pub fn symbol_count(&self) -> usize {
        self.level_of.len()
    }
}

/// Layer `graph` from its sinks upwards (Kahn's algorithm on out-degrees).
///
/// Every sink is seeded into the first frontier. Assigning a frontier
/// decrements the remaining out-degree of each predecessor; predecessors
/// reaching zero form the next frontier. The level of a symbol is therefore
/// the length of its longest dependency chain.
///
/// Returns [`DocgraphError::DagCycle`] if some symbols can never be assigned.
pub fn compute_levels(graph: &SymbolGraph) -> Result<Levels> {
    let mut remaining: HashMap<&str, usize> = graph
        .symbols()
        .map(|s| (s, graph.successors(s).len()))
        .collect();

    let mut frontier: Vec<&str> = graph
        .symbols()
        .filter(|s| remaining.get(s).copied() == Some(0))
        .collect();

    let mut levels = Levels::default();

    while !frontier.is_empty() {
        frontier.sort_unstable();
        let current = levels.groups.len();
        let mut next = Vec::new();

        for node in &frontier {
            levels.level_of.insert(node.to_string(), current);

            for pred in graph.predecessors(node) {
                if let Some(count) = remaining.get_mut(pred) {
                    *count -= 1;
                    if *count == 0 {
                        next.push(pred);
                    }
                }
            }
        }

        levels
            .groups
            .push(frontier.iter().map(|s| s.to_string()).collect());
        frontier = next;
    }

    if levels.level_of.len() < graph.node_count() {
        let stuck: Vec<&str> = graph
            .symbols()
            .filter(|s| !levels.level_of.contains_key(*s))
            .take(5)
            .collect();
        return Err(DocgraphError::DagCycle(format!(
            "{} symbols cannot be levelled, involving {:?}",
            graph.node_count() - levels.level_of.len(),
            stuck
        )));
    }

    debug!(
        symbols = graph.node_count(),
        levels = levels.groups.len(),
        "computed dependency levels"
    );

    Ok(levels)
}
