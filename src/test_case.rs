//! Test case definition
//!
//! A [`TestCase`] bundles a name, a body, its [`TestCaseConfig`] and whether it
//! is active. It is built once by the registration layer and only read by the
//! engine.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::config::TestCaseConfig;
use crate::context::Invocation;
use crate::result::TestError;

/// A test body. Returning `Err` or panicking both count as a failed invocation.
pub type TestBody = Arc<dyn Fn(&Invocation<'_>) -> Result<(), TestError> + Send + Sync>;

#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: TestBody,
    config: TestCaseConfig,
    active: bool,
    tags: BTreeSet<String>,
}

impl TestCase {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), TestError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
            config: TestCaseConfig::default(),
            active: true,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_config(mut self, config: TestCaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Mark the test case inactive; running it yields `Ignored`.
    pub fn disabled(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TestCaseConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub(crate) fn body(&self) -> TestBody {
        self.body.clone()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("active", &self.active)
            .field("tags", &self.tags)
            .finish()
    }
}
