//! TestCaseRunner - repeated, concurrent execution of one test case
//!
//! A run dispatches `invocations` copies of the test body onto a pool of
//! `threads` workers, waits for the whole batch up to `timeout`, and reduces
//! what happened to a single [`TestResult`]:
//!
//! - inactive test case: `Ignored`, nothing runs
//! - deadline passed before every invocation finished: `Error` with a timeout
//!   cause, whatever the finished invocations reported
//! - no recorded errors: `Success`
//! - otherwise the error of the lowest-numbered failing invocation decides:
//!   assertion kinds give `Failure`, anything else `Error`
//!
//! Invocations still running when the deadline passes are not interrupted.
//! They finish on detached workers; invocations still queued are skipped.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::context::{ExecutionContext, Invocation, Metadata, RecordedError};
use crate::pool::WorkerPool;
use crate::result::{TestError, TestResult};
use crate::test_case::{TestBody, TestCase};

const WORKER_NAME: &str = "gencheck-worker";

/// Runs test cases and classifies their outcome
#[derive(Debug, Clone, Default)]
pub struct TestCaseRunner {
    _private: (),
}

impl TestCaseRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_test(&self, test_case: &TestCase) -> TestResult {
        if !test_case.is_active() {
            info!("Test '{}' is inactive, ignoring", test_case.name());
            return TestResult::ignored();
        }

        let config = *test_case.config();
        let context = Arc::new(ExecutionContext::new(test_case.name()));
        if !test_case.tags().is_empty() {
            let tags: Vec<&str> = test_case.tags().iter().map(String::as_str).collect();
            context.put_metadata("tags", tags.join(","));
        }
        context.put_metadata("threads", config.threads().to_string());
        context.put_metadata("invocations", config.invocations().to_string());

        debug!(
            "Running '{}': {} invocations on {} threads, timeout {:?}",
            test_case.name(),
            config.invocations(),
            config.effective_threads(),
            config.timeout()
        );

        let start = Instant::now();
        let completed = Arc::new(AtomicUsize::new(0));
        let record_timing = |context: &ExecutionContext| {
            context.put_metadata(
                "completed_invocations",
                completed.load(Ordering::SeqCst).to_string(),
            );
            context.put_metadata("elapsed_ms", start.elapsed().as_millis().to_string());
        };

        let mut pool = match WorkerPool::new(config.effective_threads(), WORKER_NAME) {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Could not start workers for '{}': {}", test_case.name(), e);
                record_timing(&context);
                return TestResult::from_error(TestError::other(e), context.metadata());
            }
        };

        for index in 0..config.invocations() {
            let body = test_case.body();
            let shared = context.clone();
            let counter = completed.clone();
            let submitted = pool.execute(move || {
                run_invocation(&body, &shared, index);
                counter.fetch_add(1, Ordering::SeqCst);
            });
            if let Err(e) = submitted {
                // Dropping the pool on return cancels whatever was queued.
                warn!("Could not submit invocation {} of '{}': {}", index, test_case.name(), e);
                pool.cancel();
                record_timing(&context);
                return TestResult::from_error(TestError::other(e), context.metadata());
            }
        }
        pool.shutdown();

        let terminated = pool.await_termination(config.timeout());
        record_timing(&context);

        if !terminated {
            pool.cancel();
            warn!(
                "Test '{}' timed out after {:?} with {}/{} invocations completed",
                test_case.name(),
                config.timeout(),
                completed.load(Ordering::SeqCst),
                config.invocations()
            );
            return TestResult::timed_out(config.timeout(), context.metadata());
        }

        let result = classify(context.errors(), context.metadata());
        info!("Test '{}' finished: {}", test_case.name(), result.summary());
        result
    }
}

/// Run a test case with a default runner.
pub fn run_test(test_case: &TestCase) -> TestResult {
    TestCaseRunner::new().run_test(test_case)
}

fn run_invocation(body: &TestBody, context: &ExecutionContext, index: usize) {
    let invocation = Invocation::new(context, index);
    let outcome = match catch_unwind(AssertUnwindSafe(|| body(&invocation))) {
        Ok(Ok(())) => invocation.wait_for_completion().unwrap_or(Ok(())),
        Ok(Err(error)) => Err(error),
        Err(payload) => Err(TestError::from_panic(payload)),
    };
    if let Err(error) = outcome {
        context.record_error(index, error);
    }
}

fn classify(errors: Vec<RecordedError>, metadata: Metadata) -> TestResult {
    let total = errors.len();
    match errors.into_iter().min_by_key(|recorded| recorded.invocation) {
        None => TestResult::success(metadata),
        Some(first) => {
            if total > 1 {
                warn!(
                    "Reporting error from invocation {}; {} other errors suppressed",
                    first.invocation,
                    total - 1
                );
            }
            TestResult::from_error(first.error, metadata)
        }
    }
}
