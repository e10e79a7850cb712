// src/graph/builder.rs

use std::collections::HashSet;

use tracing::debug;

use crate::graph::symbol_graph::{Symbol, SymbolGraph};

/// Builds a [`SymbolGraph`] from raw `(source, destination)` reference pairs,
/// restricted to an authoritative set of known symbols.
///
/// Malformed input is filtered, never reported:
/// - self-references are dropped
/// - edges touching a symbol outside the known set are dropped
/// - repeated edges collapse into one
///
/// The resulting node set is exactly the known symbols that appear in at
/// least one retained edge, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    known: HashSet<Symbol>,
}

impl GraphBuilder {
    pub fn new<I>(known: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        Self {
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    pub fn build<I, A, B>(&self, edges: I) -> SymbolGraph
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut graph = SymbolGraph::default();
        let mut self_loops = 0usize;
        let mut unknown = 0usize;

        for (src, dst) in edges {
            let (src, dst) = (src.as_ref(), dst.as_ref());
            if src == dst {
                self_loops += 1;
                continue;
            }
            if !self.known.contains(src) || !self.known.contains(dst) {
                unknown += 1;
                continue;
            }
            graph.insert_edge(src.to_string(), dst.to_string());
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            self_loops,
            unknown,
            "built symbol graph"
        );

        graph
    }
}
