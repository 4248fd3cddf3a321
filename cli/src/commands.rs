//! Subcommand bodies, kept generic over their IO so they can be tested
//! against in-memory buffers.

use std::io::{BufRead, ErrorKind, Write};

use anyhow::{Context, Result};
use kiln_config::KilnConfig;
use kiln_types::Pipeline;

/// Apply `pipeline` to every line of `input`, writing one output line each.
///
/// Returns the number of lines processed. A closed output pipe ends the run
/// early without an error.
pub fn run<R: BufRead, W: Write>(
    pipeline: &Pipeline<String>,
    input: R,
    mut output: W,
) -> Result<usize> {
    let mut processed = 0;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        if let Err(err) = writeln!(output, "{}", pipeline.apply(line)) {
            if err.kind() == ErrorKind::BrokenPipe {
                tracing::debug!(processed, "Output closed");
                return Ok(processed);
            }
            return Err(err).context("failed to write output");
        }
        processed += 1;
    }

    match output.flush() {
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            tracing::debug!(processed, "Output closed");
            return Ok(processed);
        }
        result => result.context("failed to flush output")?,
    }
    tracing::debug!(processed, "Input exhausted");
    Ok(processed)
}

/// Print every pipeline and its stages.
pub fn list<W: Write>(config: &KilnConfig, mut output: W) -> Result<()> {
    for name in config.pipeline_names() {
        match config.pipeline(name) {
            Ok(pipeline) if pipeline.is_empty() => writeln!(output, "{name}: (identity)")?,
            Ok(pipeline) => writeln!(output, "{name}: {}", pipeline.stage_names().join(" -> "))?,
            Err(err) => writeln!(output, "{name}: invalid ({err})")?,
        }
    }
    Ok(())
}

/// Build every pipeline, stopping at the first one that fails.
pub fn check<W: Write>(config: &KilnConfig, mut output: W) -> Result<()> {
    for name in config.pipeline_names() {
        let pipeline = config
            .pipeline(name)
            .with_context(|| format!("pipeline '{name}' failed to build"))?;
        let stages = pipeline.len();
        let noun = if stages == 1 { "stage" } else { "stages" };
        writeln!(output, "ok {name} ({stages} {noun})")?;
    }
    Ok(())
}
