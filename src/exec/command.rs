// src/exec/command.rs

//! Per-symbol generator process runner.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::store::{ArtifactStore, DependencyView, Idempotent, Outcome};

/// How the generator command is run.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Shell command run once per symbol.
    pub cmd: String,
    /// Per-attempt limit; the process is killed when it is exceeded.
    pub timeout: Option<Duration>,
    /// Extra attempts after a failed one.
    pub retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub backoff: Duration,
}

impl GeneratorSettings {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            timeout: None,
            retries: 0,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Produces a symbol's artifact by running a shell command.
///
/// The command sees:
/// - `DOCGRAPH_SYMBOL`: the symbol being generated
/// - `DOCGRAPH_DEPENDENCIES`: newline-separated symbols it depends on
/// - `DOCGRAPH_ARTIFACT_DIR`: the artifact directory
///
/// and receives the dependencies' artifacts on stdin, each under a
/// `### <symbol>` heading. Whatever it prints on stdout becomes the artifact.
/// Symbols that already have an artifact are skipped without spawning.
#[derive(Clone)]
pub struct CommandGenerator {
    settings: GeneratorSettings,
    artifact_dir: PathBuf,
    idempotent: Idempotent,
}

impl CommandGenerator {
    pub fn new(
        settings: GeneratorSettings,
        artifact_dir: impl Into<PathBuf>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            settings,
            artifact_dir: artifact_dir.into(),
            idempotent: Idempotent::new(store),
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub async fn generate(&self, symbol: &str, dependencies: &[String]) -> Result<Outcome> {
        let outcome = self
            .idempotent
            .run(symbol, |view| async move {
                let input = dependency_input(&view, dependencies)?;
                self.run_with_retries(symbol, dependencies, &input).await
            })
            .await?;

        if outcome == Outcome::Cached {
            info!(symbol = %symbol, "artifact already present; skipped generator");
        }
        Ok(outcome)
    }

    async fn run_with_retries(
        &self,
        symbol: &str,
        dependencies: &[String],
        input: &str,
    ) -> Result<String> {
        let mut delay = self.settings.backoff;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.run_once(symbol, dependencies, input).await {
                Ok(output) => return Ok(output),
                Err(err) if attempt <= self.settings.retries => {
                    let message = format!("{err:#}");
                    warn!(
                        symbol = %symbol,
                        attempt,
                        retry_in = ?delay,
                        error = %message,
                        "generator attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn run_once(&self, symbol: &str, dependencies: &[String], input: &str) -> Result<String> {
        info!(
            symbol = %symbol,
            dependencies = dependencies.len(),
            cmd = %self.settings.cmd,
            "starting generator process"
        );

        let mut cmd = shell_command(&self.settings.cmd);
        cmd.env("DOCGRAPH_SYMBOL", symbol)
            .env("DOCGRAPH_DEPENDENCIES", dependencies.join("\n"))
            .env("DOCGRAPH_ARTIFACT_DIR", &self.artifact_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning generator for '{symbol}'"))?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = input.to_string();
            let name = symbol.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!(symbol = %name, error = %e, "generator closed stdin early");
                }
            });
        }

        // Always consume stderr so buffers don't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            let name = symbol.to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(symbol = %name, "stderr: {}", line);
                }
            });
        }

        let waiting = child.wait_with_output();
        let output = match self.settings.timeout {
            Some(limit) => tokio::time::timeout(limit, waiting)
                .await
                .map_err(|_| anyhow!("generator for '{symbol}' timed out after {limit:?}"))?,
            None => waiting.await,
        }
        .with_context(|| format!("waiting for generator of '{symbol}'"))?;

        let code = output.status.code().unwrap_or(-1);
        info!(
            symbol = %symbol,
            exit_code = code,
            success = output.status.success(),
            "generator process exited"
        );

        if !output.status.success() {
            bail!("generator for '{symbol}' exited with code {code}");
        }

        let text = String::from_utf8(output.stdout)
            .with_context(|| format!("generator output for '{symbol}' is not UTF-8"))?;
        if text.trim().is_empty() {
            bail!("generator for '{symbol}' produced no output");
        }
        Ok(text)
    }
}

/// Concatenate the artifacts of `dependencies` as `### <symbol>` sections.
fn dependency_input(view: &DependencyView, dependencies: &[String]) -> Result<String> {
    let mut input = String::new();
    for dep in dependencies {
        let artifact = view.load(dep)?;
        input.push_str("### ");
        input.push_str(dep);
        input.push('\n');
        input.push_str(artifact.trim_end());
        input.push_str("\n\n");
    }
    Ok(input)
}

/// Build a shell command appropriate for the platform.
fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}
