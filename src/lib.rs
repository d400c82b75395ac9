//! # gencheck
//!
//! Core of a property-based test framework:
//!
//! - [`engine`] runs one test body a configurable number of times on a pool of
//!   worker threads, bounds the whole batch by a timeout, and classifies the
//!   outcome as success, failure, error or ignored.
//! - [`gen`] builds lazy, unbounded sequences of random values and composes
//!   them with `map`, `filter`, `or_null` and friends.
//! - [`property`] checks a predicate against generated samples and reports the
//!   first counterexample.
//!
//! The engine does not depend on generators: a test body that wants property
//! checking calls [`property::for_all`] itself and returns its error.
//!
//! ```ignore
//! use gencheck::{gen, property::for_all, TestCase, TestCaseConfig, TestStatus};
//!
//! let config = TestCaseConfig::builder().threads(4).invocations(100).build()?;
//! let test = TestCase::new("choose stays in range", |_| {
//!     for_all(&gen::choose(-100, 100), |x| (-100..100).contains(x))?;
//!     Ok(())
//! })
//! .with_config(config);
//!
//! assert_eq!(gencheck::run_test(&test).status, TestStatus::Success);
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod gen;
pub mod pool;
pub mod property;
pub mod result;
pub mod rng;
pub mod test_case;

// Re-export core types for easy access
pub use config::{ConfigError, TestCaseConfig, TestCaseConfigBuilder};
pub use context::{Completer, ExecutionContext, Invocation, Metadata};
pub use engine::{run_test, TestCaseRunner};
pub use gen::{BoxedGen, Gen, GenError, GenExt, Value};
pub use property::{
    check, check2, for_all, for_all2, for_all_n, for_none, Falsified, PropertyConfig,
};
pub use result::{TestError, TestResult, TestStatus};
pub use test_case::{TestBody, TestCase};
