// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::GeneratorSettings;
use crate::types::Order;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// concurrency = 4
/// artifact_dir = ".docgraph"
/// order = "callees_first"
///
/// [graph]
/// symbols = ["main", "parse", "lex"]
/// edges = [["main", "parse"], ["parse", "lex"]]
/// starts = ["main"]
///
/// [generator]
/// cmd = "./gen-doc.sh"
/// timeout = "30s"
/// retries = 2
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Symbols and references from `[graph]`.
    #[serde(default)]
    pub graph: GraphSection,

    /// The per-symbol command from `[generator]`.
    pub generator: GeneratorSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub graph: GraphSection,
    pub generator: GeneratorSettings,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        graph: GraphSection,
        generator: GeneratorSettings,
    ) -> Self {
        Self {
            config,
            graph,
            generator,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of generator processes running at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Directory holding one artifact file per symbol.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// `"callees_first"` (default) or `"callers_first"`.
    #[serde(default)]
    pub order: Order,
}

fn default_concurrency() -> usize {
    4
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(".docgraph")
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            artifact_dir: default_artifact_dir(),
            order: Order::default(),
        }
    }
}

/// `[graph]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphSection {
    /// Every known symbol. References to anything else are ignored.
    #[serde(default)]
    pub symbols: Vec<String>,

    /// `[source, destination]` pairs: `source` references `destination`.
    #[serde(default)]
    pub edges: Vec<(String, String)>,

    /// If non-empty, only symbols reachable from these are processed.
    #[serde(default)]
    pub starts: Vec<String>,
}

/// `[generator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSection {
    /// Shell command run once per symbol.
    pub cmd: String,

    /// Per-attempt timeout such as `"30s"`; no limit when absent.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Extra attempts after a failure.
    #[serde(default)]
    pub retries: u32,

    /// Delay before the first retry such as `"1s"`; doubles per retry.
    #[serde(default)]
    pub backoff: Option<String>,
}
