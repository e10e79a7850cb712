// tests/properties.rs

use std::collections::HashSet;

use proptest::prelude::*;

use docgraph::graph::{GraphBuilder, SymbolGraph, break_cycles, compute_levels};

// Arbitrary edge lists over a small universe, cycles and self-loops included.
fn edges_strategy(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(|n| {
        (
            Just(n),
            proptest::collection::vec((0..n, 0..n), 0..n * 3),
        )
    })
}

// DAGs built by only letting node i reference nodes j < i.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = SymbolGraph> {
    edges_strategy(max_nodes).prop_map(|(n, raw)| {
        let edges = raw
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| if a > b { (a, b) } else { (b, a) })
            .map(|(a, b)| (name(a), name(b)));
        SymbolGraph::from_parts((0..n).map(name), edges)
    })
}

fn name(i: usize) -> String {
    format!("s{i:02}")
}

proptest! {
    #[test]
    fn building_then_eliminating_is_always_acyclic((n, raw) in edges_strategy(12)) {
        // Leave one symbol out of the universe so unknown references are exercised.
        let builder = GraphBuilder::new((1..n).map(name));
        let graph = builder.build(raw.iter().map(|(a, b)| (name(*a), name(*b))));

        let result = break_cycles(&graph);

        prop_assert!(result.graph.is_acyclic());
        prop_assert!(!result.graph.contains(&name(0)));
        prop_assert_eq!(
            result.graph.edge_count() + result.removed.len(),
            graph.edge_count()
        );
        for (src, dst) in result.removed.iter() {
            prop_assert!(graph.successors(src).contains(&dst.as_str()));
        }
    }

    #[test]
    fn elimination_is_reproducible((n, raw) in edges_strategy(10)) {
        let graph = GraphBuilder::new((0..n).map(name))
            .build(raw.iter().map(|(a, b)| (name(*a), name(*b))));

        prop_assert_eq!(break_cycles(&graph).removed, break_cycles(&graph).removed);
    }

    #[test]
    fn levels_partition_every_dag(graph in dag_strategy(15)) {
        let levels = compute_levels(&graph).unwrap();

        let mut seen = HashSet::new();
        for group in levels.groups() {
            prop_assert!(!group.is_empty());
            for symbol in group {
                prop_assert!(seen.insert(symbol.clone()), "{} appears twice", symbol);
            }
        }
        prop_assert_eq!(seen.len(), graph.node_count());

        for (src, dst) in graph.edges() {
            prop_assert!(levels.level_of(src).unwrap() > levels.level_of(dst).unwrap());
        }

        // Longest-chain assignment: every non-sink sits right above one of
        // its dependencies.
        for symbol in graph.symbols() {
            let level = levels.level_of(symbol).unwrap();
            let deps = graph.successors(symbol);
            if deps.is_empty() {
                prop_assert_eq!(level, 0);
            } else {
                prop_assert!(deps.iter().any(|d| levels.level_of(d) == Some(level - 1)));
            }
        }
    }
}
