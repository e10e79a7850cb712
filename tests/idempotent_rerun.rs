// tests/idempotent_rerun.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use docgraph::dispatch::{Dispatcher, WorkerPool};
use docgraph::errors::DocgraphError;
use docgraph::graph::SymbolGraph;
use docgraph::store::{ArtifactStore, FileArtifactStore, Idempotent, MemoryArtifactStore, Outcome};

type TestResult = Result<(), Box<dyn Error>>;

fn chain() -> SymbolGraph {
    SymbolGraph::from_parts(
        ["main", "parse", "lex", "util"],
        [("main", "parse"), ("parse", "lex"), ("main", "util")],
    )
}

async fn never_called() -> anyhow::Result<String> {
    panic!("compute must not run")
}

/// Run the whole graph once; every symbol's artifact embeds its dependencies'.
async fn run_pipeline(
    graph: &SymbolGraph,
    store: Arc<dyn ArtifactStore>,
    expensive_calls: Arc<AtomicUsize>,
) -> Result<(), DocgraphError> {
    let idempotent = Idempotent::new(store);
    let deps_graph = Arc::new(graph.clone());

    let dispatcher = Dispatcher::from_graph(WorkerPool::new(2)?, graph, move |symbol| {
        let idempotent = idempotent.clone();
        let calls = Arc::clone(&expensive_calls);
        let graph = Arc::clone(&deps_graph);
        async move {
            let name = symbol.clone();
            idempotent
                .run(&symbol, |view| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let mut text = format!("doc({name})");
                    for dep in graph.successors(&name) {
                        text.push_str(&format!(" uses[{}]", view.load(dep)?));
                    }
                    anyhow::Ok(text)
                })
                .await?;
            anyhow::Ok(())
        }
    });

    dispatcher.run().await.map(|_| ())
}

#[tokio::test]
async fn second_run_invokes_no_expensive_work() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let graph = chain();
    let calls = Arc::new(AtomicUsize::new(0));

    let store: Arc<dyn ArtifactStore> = Arc::new(FileArtifactStore::new(dir.path()));
    with_timeout(run_pipeline(&graph, Arc::clone(&store), Arc::clone(&calls))).await?;
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    // Fresh store instance over the same directory, as a new process would see it.
    let reopened: Arc<dyn ArtifactStore> = Arc::new(FileArtifactStore::new(dir.path()));
    let rerun_calls = Arc::new(AtomicUsize::new(0));
    with_timeout(run_pipeline(&graph, reopened, Arc::clone(&rerun_calls))).await?;
    assert_eq!(rerun_calls.load(Ordering::SeqCst), 0);

    assert_eq!(store.load("lex")?, "doc(lex)");
    assert_eq!(store.load("parse")?, "doc(parse) uses[doc(lex)]");
    assert_eq!(
        store.load("main")?,
        "doc(main) uses[doc(parse) uses[doc(lex)]] uses[doc(util)]"
    );
    Ok(())
}

#[tokio::test]
async fn rerun_after_partial_loss_only_regenerates_missing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let graph = chain();
    let store = FileArtifactStore::new(dir.path());

    let calls = Arc::new(AtomicUsize::new(0));
    with_timeout(run_pipeline(&graph, Arc::new(store.clone()), Arc::clone(&calls))).await?;

    std::fs::remove_file(store.path_for("main"))?;

    let rerun_calls = Arc::new(AtomicUsize::new(0));
    with_timeout(run_pipeline(&graph, Arc::new(store.clone()), Arc::clone(&rerun_calls))).await?;

    assert_eq!(rerun_calls.load(Ordering::SeqCst), 1);
    assert!(store.exists("main")?);
    Ok(())
}

#[tokio::test]
async fn failed_compute_saves_nothing() -> TestResult {
    let store = Arc::new(MemoryArtifactStore::new());
    let idempotent = Idempotent::new(store.clone());

    let result = idempotent
        .run("broken", |_| async {
            Err::<String, _>(anyhow::anyhow!("upstream timeout"))
        })
        .await;

    let err = result.expect_err("compute failed");
    assert!(format!("{err:#}").contains("upstream timeout"));
    assert!(!store.exists("broken")?);
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn existing_artifact_short_circuits() -> TestResult {
    let store = Arc::new(MemoryArtifactStore::new());
    store.save("ready", "already written")?;
    let idempotent = Idempotent::new(store.clone());

    let outcome = idempotent
        .run("ready", |_| never_called())
        .await?;

    assert_eq!(outcome, Outcome::Cached);
    assert_eq!(store.load("ready")?, "already written");

    let outcome = idempotent
        .run("fresh", |_| async { anyhow::Ok("new".to_string()) })
        .await?;
    assert_eq!(outcome, Outcome::Generated);
    assert_eq!(store.len(), 2);
    Ok(())
}

#[test]
fn file_store_names_are_hashed_and_stable() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = FileArtifactStore::new(dir.path());

    let path = store.path_for("ns::Type::method(int)");
    assert_eq!(path, store.path_for("ns::Type::method(int)"));
    assert_ne!(path, store.path_for("ns::Type::other"));
    assert_eq!(path.parent(), Some(dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("md"));

    assert!(!store.exists("ns::Type::method(int)")?);
    assert!(store.load("ns::Type::method(int)").is_err());

    store.save("ns::Type::method(int)", "# method")?;
    assert!(store.exists("ns::Type::method(int)")?);
    assert_eq!(store.load("ns::Type::method(int)")?, "# method");

    // Only the final artifact remains; the temp file was renamed away.
    let entries: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn file_store_creates_missing_root() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = FileArtifactStore::new(dir.path().join("nested").join("artifacts"));

    store.save("sym", "body")?;

    assert_eq!(store.load("sym")?, "body");
    assert!(store.root().is_dir());
    Ok(())
}

#[tokio::test]
async fn unusable_store_root_fails_before_compute() -> TestResult {
    let dir = tempfile::tempdir()?;
    let not_a_dir = dir.path().join("artifacts");
    std::fs::write(&not_a_dir, "plain file")?;

    let store = FileArtifactStore::new(&not_a_dir);
    assert!(store.exists("sym").is_err());

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let result = Idempotent::new(Arc::new(store))
        .run("sym", |_| async move {
            counted.fetch_add(1, Ordering::SeqCst);
            anyhow::Ok("expensive".to_string())
        })
        .await;

    let err = result.expect_err("store root is a regular file");
    assert!(format!("{err:#}").contains("checking artifact for 'sym'"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}
