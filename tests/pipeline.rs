// tests/pipeline.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;

use docgraph::errors::DocgraphError;
use docgraph::pipeline::{execute, plan};
use docgraph::store::{ArtifactStore, FileArtifactStore};
use docgraph::types::Order;

type TestResult = Result<(), Box<dyn Error>>;

fn groups(levels: &docgraph::graph::Levels) -> Vec<Vec<&str>> {
    levels
        .groups()
        .iter()
        .map(|g| g.iter().map(String::as_str).collect())
        .collect()
}

fn diamond(cmd: &str) -> ConfigFileBuilder {
    ConfigFileBuilder::new(cmd)
        .with_symbols(&["A", "B", "C", "D"])
        .with_edge("A", "B")
        .with_edge("A", "C")
        .with_edge("B", "D")
        .with_edge("C", "D")
}

#[test]
fn callees_are_planned_first() -> TestResult {
    init_tracing();

    let plan = plan(&diamond("cat").build())?;

    assert_eq!(groups(&plan.levels), vec![vec!["D"], vec!["B", "C"], vec!["A"]]);
    assert!(plan.removed.is_empty());
    Ok(())
}

#[test]
fn callers_first_reverses_the_plan() -> TestResult {
    let plan = plan(&diamond("cat").order(Order::CallersFirst).build())?;

    assert_eq!(groups(&plan.levels), vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
    assert_eq!(plan.graph.successors("B"), vec!["A"]);
    Ok(())
}

#[test]
fn cycles_are_broken_and_reported() -> TestResult {
    let cfg = ConfigFileBuilder::new("cat")
        .with_symbols(&["even", "odd", "main"])
        .with_edge("main", "even")
        .with_edge("even", "odd")
        .with_edge("odd", "even")
        .build();

    let plan = plan(&cfg)?;

    // `even` is referenced twice, so the edge into `odd` is the one cut.
    assert_eq!(plan.removed, vec![("even".to_string(), "odd".to_string())]);
    assert!(plan.graph.is_acyclic());
    assert_eq!(groups(&plan.levels), vec![vec!["even"], vec!["main", "odd"]]);
    Ok(())
}

#[test]
fn unreferenced_symbols_are_still_planned() -> TestResult {
    let cfg = ConfigFileBuilder::new("cat")
        .with_symbols(&["a", "b", "standalone"])
        .with_edge("a", "b")
        .with_edge("a", "not_configured")
        .build();

    let plan = plan(&cfg)?;

    assert_eq!(groups(&plan.levels), vec![vec!["b", "standalone"], vec!["a"]]);
    assert!(!plan.graph.contains("not_configured"));
    Ok(())
}

#[test]
fn starts_restrict_the_plan() -> TestResult {
    let cfg = ConfigFileBuilder::new("cat")
        .with_symbols(&["main", "parse", "lex", "tests_only", "fixture"])
        .with_edge("main", "parse")
        .with_edge("parse", "lex")
        .with_edge("tests_only", "fixture")
        .with_start("parse")
        .build();

    let plan = plan(&cfg)?;

    assert_eq!(groups(&plan.levels), vec![vec!["lex"], vec!["parse"]]);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn execute_generates_every_artifact_in_order() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cmd = r#"printf '%s <- [' "$DOCGRAPH_SYMBOL"; tr '\n' ' '; printf ']'"#;
    let cfg = diamond(cmd).artifact_dir(dir.path()).concurrency(2).build();

    let plan = plan(&cfg)?;
    let summary = with_timeout(execute(&cfg, &plan, None)).await?;

    assert_eq!(summary.levels, 3);
    assert_eq!(summary.succeeded, 4);

    let store = FileArtifactStore::new(dir.path());
    assert_eq!(store.load("D")?, "D <- []");
    assert!(store.load("B")?.contains("### D"));
    let top = store.load("A")?;
    assert!(top.starts_with("A <- ["));
    assert!(top.contains("### B") && top.contains("### C"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn execute_reports_failed_symbols() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cmd = r#"cat > /dev/null; if [ "$DOCGRAPH_SYMBOL" = "B" ]; then exit 7; fi; echo ok"#;
    let cfg = diamond(cmd).artifact_dir(dir.path()).build();

    let plan = plan(&cfg)?;
    let result = with_timeout(execute(&cfg, &plan, Some(1))).await;

    let report = match result {
        Err(DocgraphError::TasksFailed(report)) => report,
        other => panic!("expected TasksFailed, got {other:?}"),
    };
    assert_eq!(report.failed_tasks().collect::<Vec<_>>(), vec!["B"]);
    assert_eq!(report.skipped, vec!["A".to_string()]);

    let store = FileArtifactStore::new(dir.path());
    assert!(store.exists("C")?);
    assert!(store.exists("D")?);
    assert!(!store.exists("A")?);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn execute_rejects_zero_concurrency_override() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = diamond("cat").artifact_dir(dir.path()).build();
    let plan = plan(&cfg)?;

    assert!(matches!(
        execute(&cfg, &plan, Some(0)).await,
        Err(DocgraphError::ConfigError(_))
    ));
    Ok(())
}
