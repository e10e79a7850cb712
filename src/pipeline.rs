// src/pipeline.rs

//! End-to-end planning and execution for a validated config.
//!
//! [`plan`] is pure: it builds the reference graph, breaks its cycles,
//! restricts it to the sampled roots and computes the levels. [`execute`]
//! hands a plan to the dispatcher with the command generator as work.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::dispatch::{DispatchEvent, Dispatcher, RunSummary, WorkerPool};
use crate::errors::Result;
use crate::exec::CommandGenerator;
use crate::graph::{Edge, GraphBuilder, Levels, SymbolGraph, break_cycles, compute_levels};
use crate::store::{ArtifactStore, FileArtifactStore};
use crate::types::Order;

/// Everything decided before any generator runs.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Acyclic graph whose edges point from a task to what it waits for.
    pub graph: SymbolGraph,
    /// References dropped to make the graph acyclic, in removal order.
    pub removed: Vec<Edge>,
    pub levels: Levels,
}

pub fn plan(cfg: &ConfigFile) -> Result<Plan> {
    let builder = GraphBuilder::new(cfg.graph.symbols.iter().cloned());
    let referenced = builder.build(
        cfg.graph
            .edges
            .iter()
            .map(|(src, dst)| (src.as_str(), dst.as_str())),
    );
    // Symbols without retained references still get an artifact.
    let graph = SymbolGraph::from_parts(cfg.graph.symbols.iter().cloned(), referenced.edges());

    let elimination = break_cycles(&graph);
    let mut graph = elimination.graph;

    if !cfg.graph.starts.is_empty() {
        graph = graph.sample(&cfg.graph.starts)?;
        debug!(
            starts = ?cfg.graph.starts,
            symbols = graph.node_count(),
            "restricted graph to symbols reachable from roots"
        );
    }

    // Edges point caller -> callee, so the sinks are the callees.
    if cfg.config.order == Order::CallersFirst {
        graph = graph.reversed();
    }

    let levels = compute_levels(&graph)?;
    info!(
        symbols = graph.node_count(),
        references = graph.edge_count(),
        removed = elimination.removed.len(),
        levels = levels.len(),
        "planned generation"
    );

    Ok(Plan {
        graph,
        removed: elimination.removed,
        levels,
    })
}

/// Run the configured generator for every symbol of `plan`.
///
/// `concurrency` overrides `[config].concurrency` when given.
pub async fn execute(
    cfg: &ConfigFile,
    plan: &Plan,
    concurrency: Option<usize>,
) -> Result<RunSummary> {
    let pool = WorkerPool::new(concurrency.unwrap_or(cfg.config.concurrency))?;
    let store: Arc<dyn ArtifactStore> =
        Arc::new(FileArtifactStore::new(&cfg.config.artifact_dir));
    let generator = Arc::new(CommandGenerator::new(
        cfg.generator.clone(),
        &cfg.config.artifact_dir,
        store,
    ));

    let deps_of = Arc::new(plan.graph.clone());
    let work = move |symbol: String| {
        let generator = Arc::clone(&generator);
        let graph = Arc::clone(&deps_of);
        async move {
            let deps: Vec<String> = graph
                .successors(&symbol)
                .into_iter()
                .map(str::to_string)
                .collect();
            generator.generate(&symbol, &deps).await.map(|_| ())
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let reporter = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            log_event(&event);
        }
    });

    let dispatcher = Dispatcher::from_graph(pool, &plan.graph, work).with_events(tx);
    let result = dispatcher.run().await;

    // Dropping the dispatcher closes the channel and ends the reporter.
    drop(dispatcher);
    if let Err(e) = reporter.await {
        warn!(error = %e, "progress reporter ended abnormally");
    }

    result
}

fn log_event(event: &DispatchEvent) {
    match event {
        DispatchEvent::LevelStarted { level, size } => {
            info!(level, size, "level started");
        }
        DispatchEvent::LevelFinished { level } => {
            debug!(level, "level finished");
        }
        DispatchEvent::TaskSkipped { task, dependency } => {
            warn!(symbol = %task, dependency = %dependency, "skipped: dependency did not succeed");
        }
        _ => {}
    }
}
