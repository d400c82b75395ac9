//! Per-run execution context
//!
//! One [`ExecutionContext`] is created for each test case run and shared by
//! every invocation of that run, possibly on several worker threads at once.
//! It owns the run's metadata and the error collection the engine classifies
//! once the batch is over. Each invocation sees the context through an
//! [`Invocation`], which also carries that invocation's completion signal.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::mpsc::{self, Receiver, SyncSender};

use log::debug;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::result::TestError;

/// Key/value data collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An error recorded by one invocation
#[derive(Debug, Clone)]
pub struct RecordedError {
    pub invocation: usize,
    pub error: TestError,
}

/// State shared by all invocations of one run
#[derive(Debug)]
pub struct ExecutionContext {
    test_name: String,
    metadata: RwLock<Metadata>,
    errors: Mutex<Vec<RecordedError>>,
}

impl ExecutionContext {
    pub(crate) fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            metadata: RwLock::new(Metadata::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Attach a metadata entry; later writes to the same key win.
    pub fn put_metadata(&self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.write().insert(key, value);
    }

    /// Snapshot of the metadata collected so far
    pub fn metadata(&self) -> Metadata {
        self.metadata.read().clone()
    }

    pub(crate) fn record_error(&self, invocation: usize, error: TestError) {
        debug!(
            "Invocation {} of '{}' recorded error: {}",
            invocation, self.test_name, error
        );
        self.errors.lock().push(RecordedError { invocation, error });
    }

    /// Snapshot of every error recorded so far, in recording order
    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.lock().clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }
}

/// One invocation's view of the shared context
///
/// A body that finishes its work on another thread calls [`Invocation::defer`]
/// and hands the returned [`Completer`] to that thread; the invocation then
/// waits for the completer instead of finishing when the body returns.
pub struct Invocation<'a> {
    context: &'a ExecutionContext,
    index: usize,
    deferred: RefCell<Option<Receiver<Result<(), TestError>>>>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(context: &'a ExecutionContext, index: usize) -> Self {
        Self {
            context,
            index,
            deferred: RefCell::new(None),
        }
    }

    /// Zero-based index of this invocation within the batch
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn context(&self) -> &ExecutionContext {
        self.context
    }

    /// Take over this invocation's completion signal.
    ///
    /// Calling it again replaces the previous completer, which then has no
    /// effect.
    pub fn defer(&self) -> Completer {
        let (sender, receiver) = mpsc::sync_channel(1);
        *self.deferred.borrow_mut() = Some(receiver);
        Completer { sender }
    }

    /// Block until the deferred outcome arrives, if the body deferred.
    pub(crate) fn wait_for_completion(&self) -> Option<Result<(), TestError>> {
        let receiver = self.deferred.borrow_mut().take()?;
        Some(match receiver.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(TestError::CompletionDropped),
        })
    }
}

impl Deref for Invocation<'_> {
    type Target = ExecutionContext;

    fn deref(&self) -> &ExecutionContext {
        self.context
    }
}

/// Resolves a deferred invocation, from any thread
#[derive(Debug)]
pub struct Completer {
    sender: SyncSender<Result<(), TestError>>,
}

impl Completer {
    pub fn complete(self, outcome: Result<(), TestError>) {
        // The receiver is gone only if the engine already stopped waiting.
        let _ = self.sender.send(outcome);
    }

    pub fn success(self) {
        self.complete(Ok(()))
    }

    pub fn fail(self, error: TestError) {
        self.complete(Err(error))
    }
}
