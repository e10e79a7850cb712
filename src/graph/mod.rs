// src/graph/mod.rs

//! Symbol reference graphs.
//!
//! Pipeline:
//!
//! ```text
//! raw (source, destination) pairs
//!        ↓  builder::GraphBuilder::build()
//! SymbolGraph (may contain cycles)
//!        ↓  cycles::CycleEliminator::eliminate()  (PageRank scores from importance)
//! SymbolGraph (acyclic)
//!        ↓  levels::compute_levels()
//! Levels (groups of mutually independent symbols, sinks first)
//! ```
//!
//! - [`symbol_graph`] holds the immutable graph value and its query surface.
//! - [`builder`] filters raw reference pairs into a graph.
//! - [`importance`] scores symbols by PageRank centrality.
//! - [`cycles`] finds cycles deterministically and cuts them.
//! - [`levels`] partitions a DAG into dependency levels.

pub mod builder;
pub mod cycles;
pub mod importance;
pub mod levels;
pub mod symbol_graph;

pub use builder::GraphBuilder;
pub use cycles::{CycleEliminator, Edge, Elimination, break_cycles, find_cycle};
pub use importance::page_rank;
pub use levels::{Levels, compute_levels};
pub use symbol_graph::{Symbol, SymbolGraph};
