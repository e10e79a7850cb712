// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, GeneratorSection, RawConfigFile};
use crate::errors::{DocgraphError, Result};
use crate::exec::GeneratorSettings;
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DocgraphError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_symbols(&raw)?;
        validate_global_config(&raw)?;
        validate_starts(&raw)?;
        let generator = generator_settings(&raw.generator)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.graph, generator))
    }
}

fn ensure_has_symbols(cfg: &RawConfigFile) -> Result<()> {
    if cfg.graph.symbols.is_empty() {
        return Err(DocgraphError::ConfigError(
            "[graph].symbols must list at least one symbol".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.concurrency == 0 {
        return Err(DocgraphError::ConfigError(
            "[config].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_starts(cfg: &RawConfigFile) -> Result<()> {
    let known: HashSet<&str> = cfg.graph.symbols.iter().map(|s| s.as_str()).collect();
    for start in cfg.graph.starts.iter() {
        if !known.contains(start.as_str()) {
            return Err(DocgraphError::ConfigError(format!(
                "[graph].starts names unknown symbol '{}'",
                start
            )));
        }
    }
    Ok(())
}

fn generator_settings(section: &GeneratorSection) -> Result<GeneratorSettings> {
    if section.cmd.trim().is_empty() {
        return Err(DocgraphError::ConfigError(
            "[generator].cmd must not be empty".to_string(),
        ));
    }

    let mut settings = GeneratorSettings::new(section.cmd.clone());
    settings.retries = section.retries;

    if let Some(ref timeout) = section.timeout {
        settings.timeout = Some(parse_duration(timeout).map_err(|e| {
            DocgraphError::ConfigError(format!("[generator].timeout: {e}"))
        })?);
    }
    if let Some(ref backoff) = section.backoff {
        settings.backoff = parse_duration(backoff).map_err(|e| {
            DocgraphError::ConfigError(format!("[generator].backoff: {e}"))
        })?;
    }

    Ok(settings)
}
