// tests/levels.rs

use docgraph::errors::DocgraphError;
use docgraph::graph::{SymbolGraph, compute_levels};

fn diamond() -> SymbolGraph {
    SymbolGraph::from_parts(
        ["A", "B", "C", "D"],
        [("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
    )
}

#[test]
fn diamond_levels_from_sinks() {
    let levels = compute_levels(&diamond()).unwrap();

    assert_eq!(
        levels.groups(),
        &[
            vec!["D".to_string()],
            vec!["B".to_string(), "C".to_string()],
            vec!["A".to_string()],
        ]
    );
    assert_eq!(levels.level_of("D"), Some(0));
    assert_eq!(levels.level_of("A"), Some(2));
    assert_eq!(levels.symbol_count(), 4);
}

#[test]
fn level_is_longest_dependency_chain() {
    // top depends on mid and directly on leaf; it must wait for mid.
    let graph = SymbolGraph::from_parts(
        ["top", "mid", "leaf"],
        [("top", "mid"), ("mid", "leaf"), ("top", "leaf")],
    );

    let levels = compute_levels(&graph).unwrap();

    assert_eq!(levels.level_of("leaf"), Some(0));
    assert_eq!(levels.level_of("mid"), Some(1));
    assert_eq!(levels.level_of("top"), Some(2));
}

#[test]
fn isolated_symbols_land_in_first_level() {
    let graph = SymbolGraph::from_parts(["z", "y", "x"], [("x", "y")]);

    let levels = compute_levels(&graph).unwrap();

    assert_eq!(levels.groups()[0], vec!["y".to_string(), "z".to_string()]);
    assert_eq!(levels.groups()[1], vec!["x".to_string()]);
}

#[test]
fn empty_graph_has_no_levels() {
    let levels = compute_levels(&SymbolGraph::default()).unwrap();

    assert!(levels.is_empty());
    assert_eq!(levels.len(), 0);
}

#[test]
fn cyclic_graph_is_rejected() {
    let graph = SymbolGraph::from_parts(["a", "b", "c"], [("a", "b"), ("b", "a"), ("c", "a")]);

    match compute_levels(&graph) {
        Err(DocgraphError::DagCycle(_)) => {}
        other => panic!("expected DagCycle, got {other:?}"),
    }
}

#[test]
fn reversed_diamond_puts_callers_first() {
    let levels = compute_levels(&diamond().reversed()).unwrap();

    assert_eq!(levels.groups()[0], vec!["A".to_string()]);
    assert_eq!(levels.groups()[2], vec!["D".to_string()]);
}
