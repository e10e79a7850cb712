// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::pipeline::Plan;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - graph building, cycle breaking and leveling
/// - the dispatcher driving the command generator
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config_path();
    let cfg = load_and_validate(&config_path)?;

    let plan = pipeline::plan(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &plan);
        return Ok(());
    }

    let summary = pipeline::execute(&cfg, &plan, args.concurrency).await?;
    info!(
        levels = summary.levels,
        succeeded = summary.succeeded,
        "all symbols generated"
    );
    Ok(())
}

/// Simple dry-run output: print removed references and the level plan.
fn print_dry_run(cfg: &ConfigFile, plan: &Plan) {
    println!("docgraph dry-run");
    println!("  config.concurrency = {}", cfg.config.concurrency);
    println!("  config.order = {:?}", cfg.config.order);
    println!("  config.artifact_dir = {}", cfg.config.artifact_dir.display());
    println!("  generator.cmd = {}", cfg.generator.cmd);
    println!();

    if !plan.removed.is_empty() {
        println!("removed references ({}):", plan.removed.len());
        for (src, dst) in plan.removed.iter() {
            println!("  - {src} -> {dst}");
        }
        println!();
    }

    println!(
        "levels ({}, {} symbols):",
        plan.levels.len(),
        plan.levels.symbol_count()
    );
    for (i, group) in plan.levels.groups().iter().enumerate() {
        println!("  [{i}] {}", group.join(", "));
    }

    debug!("dry-run complete (no execution)");
}
