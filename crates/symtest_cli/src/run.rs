//! Harness dispatch between Symbolic and Replay mode.

use crate::args::{RunArgs, RunMode};
use anyhow::Context;
use std::io::{self, Write};
use symtest_core::Assignment;
use symtest_replay::{CoverageReport, HarnessConfig, ReplayReport, Replayer};
use symtest_runtime::{run_symbolic, CoverageCollector, SymbexEngine, SymbolicTest};

/// Result of a harness invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The test ran under the engine
    Explored,
    /// A replay batch ran
    Replayed {
        /// Batch outcome
        report: ReplayReport,
        /// Coverage of the batch, when measured
        coverage: Option<CoverageReport>,
    },
}

/// Run a test definition as the command line asks.
///
/// Without replay flags the test is explored under `engine`. With any of
/// `-a`, `-r` or `-f` it is replayed, and the batch report is printed to
/// stdout.
///
/// # Errors
///
/// Fails on an unreadable config, a malformed override, an unreadable
/// Test-Case file, or a failing test body in Symbolic mode
pub fn run_from_args<'c, T, F>(
    args: &RunArgs,
    factory: F,
    engine: &mut dyn SymbexEngine,
    coverage: Option<&'c mut dyn CoverageCollector>,
) -> anyhow::Result<Outcome>
where
    T: SymbolicTest,
    F: Fn() -> T,
{
    let config = match &args.config {
        Some(path) => HarnessConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::default(),
    };

    let mode = args.mode();
    if mode == RunMode::Symbolic {
        run_symbolic(factory, engine, &config.symbolic)?;
        return Ok(Outcome::Explored);
    }

    let measured = coverage.is_some() && config.replay.measure_coverage;
    let mut replayer = Replayer::new(factory).with_config(config.replay.clone());
    if let Some(collector) = coverage {
        replayer = replayer.with_coverage(collector, config.coverage.clone());
    }

    match mode {
        RunMode::Assignment(pairs) => {
            let assignment =
                Assignment::from_overrides(pairs).context("parsing assignment overrides")?;
            replayer.replay_assignment(assignment);
        }
        RunMode::Defaults => {
            replayer.replay_assignment(Assignment::new());
        }
        RunMode::File(path) => {
            replayer
                .replay_file(&path)
                .with_context(|| format!("opening test cases {}", path.display()))?;
        }
        RunMode::Symbolic => {}
    }

    let coverage = if measured {
        match replayer.collect() {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!("Coverage report unavailable: {}", err);
                None
            }
        }
    } else {
        None
    };
    let report = replayer.finish();

    print_report(&mut io::stdout().lock(), &report, coverage.as_ref())?;
    Ok(Outcome::Replayed { report, coverage })
}

/// Write a human-readable batch report
///
/// # Errors
///
/// Returns the writer's error
pub fn print_report(
    out: &mut dyn Write,
    report: &ReplayReport,
    coverage: Option<&CoverageReport>,
) -> io::Result<()> {
    writeln!(
        out,
        "Replayed {} test case(s): {} succeeded, {} failed, {} output mismatch(es)",
        report.replayed,
        report.succeeded,
        report.failures.len(),
        report.mismatches.len()
    )?;

    for failure in &report.failures {
        writeln!(out, "  [{}] {} with {}", failure.index, failure.kind, failure.assignment)?;
        for line in failure.trace.lines() {
            writeln!(out, "      {}", line)?;
        }
    }

    for mismatch in &report.mismatches {
        writeln!(
            out,
            "  [{}] output mismatch on path {} ({} line(s) differ)",
            mismatch.index,
            mismatch.high_level_path_id,
            mismatch.changed_lines()
        )?;
    }

    if let Some(coverage) = coverage {
        writeln!(out, "Coverage:")?;
        for (filename, analysis) in coverage.iter() {
            let executable = analysis.executable.len();
            let missing = analysis.missing.len();
            writeln!(
                out,
                "  {}: {}/{} statements covered, missing {:?}",
                filename,
                executable - missing.min(executable),
                executable,
                analysis.missing
            )?;
        }
    }

    Ok(())
}
