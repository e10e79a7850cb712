// src/graph/symbol_graph.rs

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::errors::{DocgraphError, Result};

/// Stable identity of a unit of work (function, class, module, task).
pub type Symbol = String;

/// Directed reference graph keyed by symbol.
///
/// An edge `u -> v` means "`u` depends on `v`", i.e. `v` must be processed
/// before `u`. The graph never holds self-loops or parallel edges.
///
/// Values are treated as immutable once handed out: every transformation
/// ([`reversed`](Self::reversed), [`sample`](Self::sample), cycle removal)
/// returns a new graph.
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    graph: DiGraph<Symbol, ()>,
    index: BTreeMap<Symbol, NodeIndex>,
}

impl SymbolGraph {
    /// Build a graph from an explicit node list plus edges.
    ///
    /// Nodes may be isolated. Edge endpoints missing from `nodes` are added,
    /// self-loops are dropped and repeated edges collapse into one.
    pub fn from_parts<N, E, A, B>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<Symbol>,
        E: IntoIterator<Item = (A, B)>,
        A: Into<Symbol>,
        B: Into<Symbol>,
    {
        let mut g = Self::default();
        for node in nodes {
            g.ensure_node(node.into());
        }
        for (src, dst) in edges {
            g.insert_edge(src.into(), dst.into());
        }
        g
    }

    pub(crate) fn ensure_node(&mut self, symbol: Symbol) -> NodeIndex {
        if let Some(idx) = self.index.get(&symbol) {
            return *idx;
        }
        let idx = self.graph.add_node(symbol.clone());
        self.index.insert(symbol, idx);
        idx
    }

    /// Returns `false` for self-loops; repeated edges are kept once.
    pub(crate) fn insert_edge(&mut self, src: Symbol, dst: Symbol) -> bool {
        if src == dst {
            return false;
        }
        let a = self.ensure_node(src);
        let b = self.ensure_node(dst);
        self.graph.update_edge(a, b, ());
        true
    }

    /// Remove the edge `src -> dst` from this (privately owned) graph.
    pub(crate) fn remove_edge(&mut self, src: &str, dst: &str) -> bool {
        let (Some(a), Some(b)) = (self.index.get(src), self.index.get(dst)) else {
            return false;
        };
        match self.graph.find_edge(*a, *b) {
            Some(e) => self.graph.remove_edge(e).is_some(),
            None => false,
        }
    }

    pub(crate) fn inner(&self) -> &DiGraph<Symbol, ()> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// All symbols, in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(|s| s.as_str())
    }

    /// All edges as `(source, destination)`, in ascending order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Symbols that `symbol` depends on, in ascending order.
    pub fn successors(&self, symbol: &str) -> Vec<&str> {
        self.neighbors(symbol, Direction::Outgoing)
    }

    /// Symbols that depend on `symbol`, in ascending order.
    pub fn predecessors(&self, symbol: &str) -> Vec<&str> {
        self.neighbors(symbol, Direction::Incoming)
    }

    fn neighbors(&self, symbol: &str, dir: Direction) -> Vec<&str> {
        let Some(idx) = self.index.get(symbol) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(*idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// A new graph with every edge flipped.
    ///
    /// Walking the reversed graph processes callers before callees.
    pub fn reversed(&self) -> Self {
        Self::from_parts(
            self.symbols(),
            self.edges().into_iter().map(|(src, dst)| (dst, src)),
        )
    }

    /// The subgraph induced by every symbol reachable from `starts`.
    pub fn sample<S: AsRef<str>>(&self, starts: &[S]) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for start in starts {
            let start = start.as_ref();
            let Some((known, _)) = self.index.get_key_value(start) else {
                return Err(DocgraphError::ConfigError(format!(
                    "sampling root '{start}' is not a symbol of the graph"
                )));
            };
            if seen.insert(known.as_str()) {
                queue.push_back(known.as_str());
            }
        }

        while let Some(node) = queue.pop_front() {
            for next in self.successors(node) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let edges = self
            .edges()
            .into_iter()
            .filter(|(src, dst)| seen.contains(src) && seen.contains(dst));

        Ok(Self::from_parts(seen.iter().copied(), edges))
    }
}
