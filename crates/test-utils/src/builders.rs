#![allow(dead_code)]

use std::path::Path;

use docgraph::config::{
    ConfigFile, ConfigSection, GeneratorSection, GraphSection, RawConfigFile,
};
use docgraph::errors::DocgraphError;
use docgraph::types::Order;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                graph: GraphSection::default(),
                generator: GeneratorSection {
                    cmd: cmd.to_string(),
                    timeout: None,
                    retries: 0,
                    backoff: None,
                },
            },
        }
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.config.graph.symbols.push(symbol.to_string());
        self
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.config
            .graph
            .symbols
            .extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    /// `src` references `dst`.
    pub fn with_edge(mut self, src: &str, dst: &str) -> Self {
        self.config
            .graph
            .edges
            .push((src.to_string(), dst.to_string()));
        self
    }

    pub fn with_start(mut self, symbol: &str) -> Self {
        self.config.graph.starts.push(symbol.to_string());
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.config.concurrency = n;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.config.config.order = order;
        self
    }

    pub fn artifact_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.config.artifact_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn timeout(mut self, duration: &str) -> Self {
        self.config.generator.timeout = Some(duration.to_string());
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.config.generator.retries = retries;
        self
    }

    pub fn backoff(mut self, duration: &str) -> Self {
        self.config.generator.backoff = Some(duration.to_string());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile, DocgraphError> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}
