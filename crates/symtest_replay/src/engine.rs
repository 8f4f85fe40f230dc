//! Replay engine for recorded and explicit assignments.

use crate::config::ReplayConfig;
use crate::coverage::{reconcile, CoverageConfig, CoverageReport};
use crate::diff::OutputMismatch;
use serde::Serialize;
use std::path::Path;
use symtest_core::{Assignment, CoreError, CoreResult};
use symtest_log::{TestCase, TestCaseReader};
use symtest_runtime::{run_replay, CoverageCollector, CoverageGuard, ReplayRun, SymbolicTest};

/// One failed replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayFailure {
    /// Position of the input within the batch
    pub index: usize,
    /// Classified error kind
    pub kind: String,
    /// Assignment that was being replayed
    pub assignment: Assignment,
    /// Full trace text
    pub trace: String,
}

/// Outcome of a replay batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Inputs executed
    pub replayed: usize,
    /// Inputs that completed without error
    pub succeeded: usize,
    /// Every failure, in batch order
    pub failures: Vec<ReplayFailure>,
    /// Every output mismatch, in batch order
    pub mismatches: Vec<OutputMismatch>,
}

impl ReplayReport {
    /// Check for a batch with no failures and no mismatches
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.mismatches.is_empty()
    }
}

/// Replays a batch of inputs against one test definition.
///
/// A failing replay never stops the batch. When a coverage collector is
/// attached and the config measures coverage, measurement starts right
/// before the first replay and runs until [`Replayer::collect`] or until
/// the replayer is dropped.
pub struct Replayer<'c, F> {
    factory: F,
    config: ReplayConfig,
    coverage_config: CoverageConfig,
    collector: Option<&'c mut dyn CoverageCollector>,
    coverage: Option<CoverageGuard<'c>>,
    position: usize,
    report: ReplayReport,
}

impl<'c, F, T> Replayer<'c, F>
where
    F: Fn() -> T,
    T: SymbolicTest,
{
    /// Create a replayer; `factory` builds a fresh test instance per input
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            config: ReplayConfig::default(),
            coverage_config: CoverageConfig::default(),
            collector: None,
            coverage: None,
            position: 0,
            report: ReplayReport::default(),
        }
    }

    /// Set the replay config
    #[must_use]
    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a coverage collector
    #[must_use]
    pub fn with_coverage(
        mut self,
        collector: &'c mut dyn CoverageCollector,
        config: CoverageConfig,
    ) -> Self {
        self.collector = Some(collector);
        self.coverage_config = config;
        self
    }

    /// Replay one explicit assignment
    pub fn replay_assignment(&mut self, assignment: Assignment) -> ReplayRun {
        self.begin_measurement();
        let index = self.next_position();
        let run = run_replay(&self.factory, assignment);
        self.record(index, &run);
        run
    }

    /// Replay a batch of explicit assignments
    pub fn replay_assignments<I>(&mut self, assignments: I)
    where
        I: IntoIterator<Item = Assignment>,
    {
        for assignment in assignments {
            self.replay_assignment(assignment);
        }
    }

    /// Replay one recorded test case and reconcile its output
    pub fn replay_test_case(&mut self, case: &TestCase) -> ReplayRun {
        self.begin_measurement();
        let index = self.next_position();
        let run = run_replay(&self.factory, case.assignment.clone());
        self.record(index, &run);

        if self.config.compare_output {
            if let Some(mismatch) =
                OutputMismatch::check(index, case.high_level_path_id, &case.output, &run.log_roll())
            {
                mismatch.warn();
                self.report.mismatches.push(mismatch);
            }
        }

        run
    }

    /// Replay a decoded test-case sequence.
    ///
    /// Undecodable records are reported as `DecodingError` failures and
    /// skipped.
    pub fn replay<I>(&mut self, cases: I)
    where
        I: IntoIterator<Item = CoreResult<TestCase>>,
    {
        self.begin_measurement();
        for item in cases {
            match item {
                Ok(case) => {
                    self.replay_test_case(&case);
                }
                Err(err) => {
                    let index = self.next_position();
                    tracing::error!("Skipping test case {}: {}", index, err);
                    self.report.failures.push(ReplayFailure {
                        index,
                        kind: err.kind_name().to_string(),
                        assignment: Assignment::new(),
                        trace: err.to_string(),
                    });
                }
            }
        }
    }

    /// Replay every test case of a file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened
    pub fn replay_file(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let reader = TestCaseReader::open(path)?;
        self.replay(reader);
        Ok(())
    }

    /// Batch outcome so far
    #[must_use]
    pub fn report(&self) -> &ReplayReport {
        &self.report
    }

    /// Failures so far
    #[must_use]
    pub fn errors(&self) -> &[ReplayFailure] {
        &self.report.failures
    }

    /// Stop measurement and reconcile the coverage report
    ///
    /// # Errors
    ///
    /// Returns `CoverageUnavailable` if no collector was attached
    pub fn collect(&mut self) -> CoreResult<CoverageReport> {
        self.begin_measurement();
        let guard = self.coverage.as_mut().ok_or(CoreError::CoverageUnavailable)?;
        guard.stop();
        reconcile(guard.collector(), &self.coverage_config)
    }

    /// Finish the batch, stopping any measurement
    #[must_use]
    pub fn finish(self) -> ReplayReport {
        self.report
    }

    fn begin_measurement(&mut self) {
        if self.coverage.is_some() {
            return;
        }
        if !self.config.measure_coverage {
            if self.collector.is_some() {
                tracing::debug!("Coverage measurement disabled by config");
            }
            return;
        }
        if let Some(collector) = self.collector.take() {
            self.coverage = Some(CoverageGuard::start(collector));
        }
    }

    fn next_position(&mut self) -> usize {
        let index = self.position;
        self.position += 1;
        index
    }

    fn record(&mut self, index: usize, run: &ReplayRun) {
        self.report.replayed += 1;
        match &run.failure {
            None => self.report.succeeded += 1,
            Some(failure) => self.report.failures.push(ReplayFailure {
                index,
                kind: failure.kind.clone(),
                assignment: run.assignment.clone(),
                trace: failure.trace.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::rc::Rc;
    use symtest_log::TestCaseWriter;
    use symtest_runtime::{FileAnalysis, TestContext};

    /// Logs `x`; fails when `x == 2`
    struct LogX;

    impl SymbolicTest for LogX {
        fn execute(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            let x = ctx.acquire_integer("x", 0)?;
            ctx.emit_log(x.to_string());
            anyhow::ensure!(x != 2, "x must not be 2");
            Ok(())
        }
    }

    fn assign(x: i32) -> Assignment {
        let mut assignment = Assignment::new();
        assignment.insert("x", x);
        assignment
    }

    #[derive(Default)]
    struct Calls {
        starts: usize,
        stops: usize,
    }

    struct SharedCollector {
        calls: Rc<RefCell<Calls>>,
    }

    impl CoverageCollector for SharedCollector {
        fn start(&mut self) {
            self.calls.borrow_mut().starts += 1;
        }
        fn stop(&mut self) {
            self.calls.borrow_mut().stops += 1;
        }
        fn erase(&mut self) {}
        fn summary_text(&mut self) -> CoreResult<String> {
            Ok("target   4   1   75%\nTOTAL   4   1   75%\n".to_string())
        }
        fn detailed_analysis(&mut self, filename: &str) -> CoreResult<FileAnalysis> {
            assert_eq!(filename, "target.py");
            Ok(FileAnalysis {
                executable: [1, 2, 3, 4].into(),
                excluded: Default::default(),
                missing: [4].into(),
            })
        }
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let mut replayer = Replayer::new(|| LogX);
        replayer.replay_assignments([assign(1), assign(2), assign(3)]);

        let report = replayer.report();
        assert_eq!(report.replayed, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);

        let failure = &report.failures[0];
        assert_eq!(failure.index, 1);
        assert_eq!(failure.kind, "TestBodyError");
        assert_eq!(failure.assignment, assign(2));
        assert!(failure.trace.contains("x must not be 2"));
    }

    #[test]
    fn test_replay_with_defaults() {
        let mut replayer = Replayer::new(|| LogX);
        let run = replayer.replay_assignment(Assignment::new());
        assert!(run.succeeded());
        assert_eq!(run.log_roll(), "0");
    }

    #[test]
    fn test_output_mismatch_is_warning() {
        let mut replayer = Replayer::new(|| LogX);
        let case = TestCase::new(assign(2), "1").with_path_id(5);
        let run = replayer.replay_test_case(&case);
        assert_eq!(run.log_roll(), "2");

        let report = replayer.finish();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].original, "1");
        assert_eq!(report.mismatches[0].replayed, "2");
        assert_eq!(report.mismatches[0].high_level_path_id, 5);
    }

    #[test]
    fn test_output_mismatch_only_on_difference() {
        let mut replayer = Replayer::new(|| LogX);
        replayer.replay_test_case(&TestCase::new(assign(3), "3"));
        assert!(replayer.report().is_clean());
    }

    #[test]
    fn test_compare_output_disabled() {
        let mut replayer =
            Replayer::new(|| LogX).with_config(ReplayConfig::new().with_compare_output(false));
        replayer.replay_test_case(&TestCase::new(assign(3), "nope"));
        assert!(replayer.report().mismatches.is_empty());
    }

    #[test]
    fn test_replay_decoded_stream_skips_bad_record() {
        let mut replayer = Replayer::new(|| LogX);
        replayer.replay(vec![
            Ok(TestCase::new(assign(1), "1")),
            Err(CoreError::decoding("bad record")),
            Ok(TestCase::new(assign(3), "3")),
        ]);

        let report = replayer.report();
        assert_eq!(report.replayed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].kind, "DecodingError");
    }

    #[test]
    fn test_replay_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.bin");
        let mut writer = TestCaseWriter::create(&path).unwrap();
        for x in [1, 2, 3] {
            writer.write(&TestCase::new(assign(x), x.to_string())).unwrap();
        }
        writer.finish().unwrap();

        let mut replayer = Replayer::new(|| LogX);
        replayer.replay_file(&path).unwrap();
        let report = replayer.finish();
        assert_eq!(report.replayed, 3);
        assert_eq!(report.failures.len(), 1);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn test_collect_without_coverage() {
        let mut replayer = Replayer::new(|| LogX);
        let err = replayer.collect().unwrap_err();
        assert_eq!(err, CoreError::CoverageUnavailable);
    }

    #[test]
    fn test_coverage_wraps_batch() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut collector = SharedCollector {
            calls: Rc::clone(&calls),
        };

        let mut replayer =
            Replayer::new(|| LogX).with_coverage(&mut collector, CoverageConfig::default());
        assert_eq!(calls.borrow().starts, 0);
        replayer.replay_assignments([assign(1), assign(2)]);
        assert_eq!(calls.borrow().starts, 1);
        assert_eq!(calls.borrow().stops, 0);

        let report = replayer.collect().unwrap();
        assert_eq!(calls.borrow().stops, 1);
        let target = report.get("target").unwrap();
        assert_eq!(target.missing, BTreeSet::from([4]));

        drop(replayer);
        assert_eq!(calls.borrow().stops, 1);
    }

    #[test]
    fn test_coverage_stopped_on_drop() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut collector = SharedCollector {
            calls: Rc::clone(&calls),
        };
        {
            let mut replayer =
                Replayer::new(|| LogX).with_coverage(&mut collector, CoverageConfig::default());
            replayer.replay_assignment(assign(2));
        }
        assert_eq!(calls.borrow().stops, 1);
    }

    #[test]
    fn test_coverage_disabled_by_config() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut collector = SharedCollector {
            calls: Rc::clone(&calls),
        };
        let mut replayer = Replayer::new(|| LogX)
            .with_config(ReplayConfig::new().with_coverage(false))
            .with_coverage(&mut collector, CoverageConfig::default());
        assert!(replayer.collect().is_err());
        drop(replayer);
        assert_eq!(calls.borrow().starts, 0);
    }

    #[test]
    fn test_config_after_coverage_still_applies() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut collector = SharedCollector {
            calls: Rc::clone(&calls),
        };
        let mut replayer = Replayer::new(|| LogX)
            .with_coverage(&mut collector, CoverageConfig::default())
            .with_config(ReplayConfig::new().with_coverage(false));
        replayer.replay_assignment(assign(1));
        assert_eq!(replayer.collect().unwrap_err(), CoreError::CoverageUnavailable);
        drop(replayer);
        assert_eq!(calls.borrow().starts, 0);
    }

    #[test]
    fn test_collect_without_replays_measures_empty_batch() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut collector = SharedCollector {
            calls: Rc::clone(&calls),
        };
        let mut replayer =
            Replayer::new(|| LogX).with_coverage(&mut collector, CoverageConfig::default());
        assert!(replayer.collect().is_ok());
        drop(replayer);
        assert_eq!(calls.borrow().starts, 1);
        assert_eq!(calls.borrow().stops, 1);
    }
}
