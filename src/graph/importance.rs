// src/graph/importance.rs

//! PageRank centrality over a symbol graph.
//!
//! Rank flows along reference edges, so symbols that many others depend on
//! score high. The scores only steer which edge of a cycle gets cut.

use std::collections::HashMap;

use petgraph::visit::EdgeRef;

use crate::graph::symbol_graph::{Symbol, SymbolGraph};

pub const DAMPING: f64 = 0.85;
pub const MAX_ITERATIONS: usize = 100;
/// Per-node convergence tolerance; the run stops once the L1 change of the
/// whole vector drops below `TOLERANCE * n`.
pub const TOLERANCE: f64 = 1.0e-6;

/// PageRank scores keyed by symbol. Scores sum to 1.
///
/// Dangling symbols (no outgoing edges) spread their rank uniformly.
pub fn page_rank(graph: &SymbolGraph) -> HashMap<Symbol, f64> {
    let g = graph.inner();
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let nf = n as f64;
    let out_degree: Vec<usize> = g
        .node_indices()
        .map(|idx| g.neighbors(idx).count())
        .collect();
    let mut ranks = vec![1.0 / nf; n];

    for _ in 0..MAX_ITERATIONS {
        let dangling: f64 = ranks
            .iter()
            .zip(&out_degree)
            .filter(|(_, deg)| **deg == 0)
            .map(|(rank, _)| *rank)
            .sum();

        let base = (1.0 - DAMPING) / nf + DAMPING * dangling / nf;
        let mut next = vec![base; n];

        for edge in g.edge_references() {
            let (src, dst) = (edge.source().index(), edge.target().index());
            next[dst] += DAMPING * ranks[src] / out_degree[src] as f64;
        }

        let delta: f64 = next.iter().zip(&ranks).map(|(a, b)| (a - b).abs()).sum();
        ranks = next;
        if delta < TOLERANCE * nf {
            break;
        }
    }

    g.node_indices()
        .map(|idx| (g[idx].clone(), ranks[idx.index()]))
        .collect()
}
