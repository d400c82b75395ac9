//! Property evaluation
//!
//! [`for_all`] draws samples from a generator (its edge-case constants first,
//! then random values) and evaluates a predicate on each. The first sample the
//! predicate rejects, or panics on, stops the check and is reported as the
//! witness of a [`Falsified`] error, which converts into an assertion-kind
//! [`TestError`](crate::result::TestError).
//!
//! Predicates may return `bool`, `()` (for bodies that only use `assert!`), or
//! a `Result`, which makes nesting a check inside another natural:
//!
//! ```ignore
//! for_all(&default::<Vec<i32>>(), |list| {
//!     for_all(&gen::from(list.clone()), |i| *i >= i32::MIN)
//! })?;
//! ```
//!
//! Every check runs with a seed, reported on failure. Pass it back through
//! [`PropertyConfig::with_seed`] to replay the same samples.

use std::fmt::{self, Debug, Display};
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, warn};

use crate::gen::Gen;
use crate::result::panic_message;
use crate::rng;

/// Samples drawn when the caller does not say otherwise
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// A property did not hold
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("property falsified after {attempts} samples (seed {seed}) by witness {witness}: {reason}")]
pub struct Falsified {
    /// Debug rendering of the falsifying value
    pub witness: String,
    /// 1-based index of the falsifying sample, edge cases included
    pub attempts: usize,
    pub seed: u64,
    pub reason: String,
}

/// What a predicate returns
pub trait Verdict {
    fn verdict(self) -> Result<(), String>;
}

impl Verdict for bool {
    fn verdict(self) -> Result<(), String> {
        if self {
            Ok(())
        } else {
            Err("predicate returned false".to_string())
        }
    }
}

impl Verdict for () {
    fn verdict(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: Display> Verdict for Result<(), E> {
    fn verdict(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

impl<E: Display> Verdict for Result<bool, E> {
    fn verdict(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())?.verdict()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyConfig {
    pub samples: usize,
    /// Fixed seed; `None` takes `GENCHECK_SEED` or fresh entropy.
    pub seed: Option<u64>,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLE_COUNT,
            seed: None,
        }
    }
}

impl PropertyConfig {
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rng::next_seed)
    }
}

/// Check `predicate` against [`DEFAULT_SAMPLE_COUNT`] samples of `gen`.
pub fn for_all<G, P, V>(gen: &G, predicate: P) -> Result<(), Falsified>
where
    G: Gen + ?Sized,
    G::Value: Debug,
    P: Fn(&G::Value) -> V,
    V: Verdict,
{
    check(&PropertyConfig::default(), gen, predicate)
}

/// Check `predicate` against `samples` samples of `gen`.
pub fn for_all_n<G, P, V>(samples: usize, gen: &G, predicate: P) -> Result<(), Falsified>
where
    G: Gen + ?Sized,
    G::Value: Debug,
    P: Fn(&G::Value) -> V,
    V: Verdict,
{
    check(&PropertyConfig::default().with_samples(samples), gen, predicate)
}

/// Check `predicate` as configured by `config`.
///
/// Every edge-case constant of `gen` is checked first; `config.samples`
/// random values follow on top of them.
pub fn check<G, P, V>(config: &PropertyConfig, gen: &G, predicate: P) -> Result<(), Falsified>
where
    G: Gen + ?Sized,
    G::Value: Debug,
    P: Fn(&G::Value) -> V,
    V: Verdict,
{
    let seed = config.resolve_seed();
    evaluate(
        gen.constants(),
        gen.random_seeded(seed),
        config.samples,
        seed,
        |value| predicate(value).verdict(),
    )
}

/// Check that `predicate` fails for every sample of `gen`.
pub fn for_none<G, P>(gen: &G, predicate: P) -> Result<(), Falsified>
where
    G: Gen + ?Sized,
    G::Value: Debug,
    P: Fn(&G::Value) -> bool,
{
    for_all(gen, |value| {
        if predicate(value) {
            Err("predicate held")
        } else {
            Ok(())
        }
    })
}

/// Check `predicate` against pairs drawn from two generators.
pub fn for_all2<A, B, P, V>(gen_a: &A, gen_b: &B, predicate: P) -> Result<(), Falsified>
where
    A: Gen + ?Sized,
    B: Gen + ?Sized,
    A::Value: Debug,
    B::Value: Debug,
    P: Fn(&A::Value, &B::Value) -> V,
    V: Verdict,
{
    check2(&PropertyConfig::default(), gen_a, gen_b, predicate)
}

/// [`check`] over pairs. Constants are paired up to the shorter list.
pub fn check2<A, B, P, V>(
    config: &PropertyConfig,
    gen_a: &A,
    gen_b: &B,
    predicate: P,
) -> Result<(), Falsified>
where
    A: Gen + ?Sized,
    B: Gen + ?Sized,
    A::Value: Debug,
    B::Value: Debug,
    P: Fn(&A::Value, &B::Value) -> V,
    V: Verdict,
{
    let seed = config.resolve_seed();
    let mut source = rng::from_seed(seed);
    let rng_a = rng::fork(&mut source);
    let rng_b = rng::fork(&mut source);

    let constants: Vec<_> = gen_a.constants().into_iter().zip(gen_b.constants()).collect();
    let random = gen_a.random_with(rng_a).zip(gen_b.random_with(rng_b));
    evaluate(constants, random, config.samples, seed, |(a, b)| {
        predicate(a, b).verdict()
    })
}

fn evaluate<T, I, F>(
    constants: Vec<T>,
    random: I,
    samples: usize,
    seed: u64,
    verdict: F,
) -> Result<(), Falsified>
where
    T: Debug,
    I: Iterator<Item = T>,
    F: Fn(&T) -> Result<(), String>,
{
    let edge_cases = constants.len();
    debug!(
        "Checking property on {} edge cases and up to {} samples with seed {}",
        edge_cases, samples, seed
    );

    let mut checked = 0;
    for value in constants.into_iter().chain(random.take(samples)) {
        checked += 1;
        let outcome = catch_unwind(AssertUnwindSafe(|| verdict(&value))).unwrap_or_else(|payload| {
            Err(format!("predicate panicked: {}", panic_message(payload.as_ref())))
        });
        if let Err(reason) = outcome {
            let falsified = Falsified {
                witness: format!("{:?}", value),
                attempts: checked,
                seed,
                reason,
            };
            warn!("{}", falsified);
            return Err(falsified);
        }
    }

    if checked < edge_cases + samples {
        debug!(
            "Generator exhausted after {} of {} samples",
            checked - edge_cases,
            samples
        );
    }
    Ok(())
}

impl Falsified {
    /// The seed to pass to [`PropertyConfig::with_seed`] to replay this run
    pub fn replay_config(&self) -> PropertyConfig {
        PropertyConfig::default().with_seed(self.seed)
    }
}

impl fmt::Display for PropertyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) => write!(f, "{} samples, seed {}", self.samples, seed),
            None => write!(f, "{} samples", self.samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::{self, GenExt};

    #[test]
    fn test_passing_property() {
        assert!(for_all(&gen::constant(5), |x| *x == 5).is_ok());
    }

    #[test]
    fn test_failing_property_reports_witness() {
        let error = for_all(&gen::constant(2), |x| *x != 2).unwrap_err();
        assert_eq!(error.witness, "2");
        assert_eq!(error.attempts, 1);
        assert_eq!(error.reason, "predicate returned false");
    }

    #[test]
    fn test_panicking_predicate_is_a_failure() {
        let error = for_all(&gen::constant(1), |_| -> bool { panic!("bad input") }).unwrap_err();
        assert!(error.reason.contains("bad input"));
    }

    #[test]
    fn test_unit_predicate_with_asserts() {
        assert!(for_all(&gen::choose(0, 10), |x| assert!(*x < 10)).is_ok());
    }

    #[test]
    fn test_sample_count_is_respected() {
        let counter = std::sync::atomic::AtomicUsize::new(0);
        for_all_n(37, &gen::ints(), |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            true
        })
        .unwrap();
        // Three edge cases (0, MIN, MAX) on top of the 37 random samples.
        assert_eq!(counter.into_inner(), 40);
    }

    #[test]
    fn test_random_samples_follow_all_constants() {
        let seen = parking_lot::Mutex::new(Vec::new());
        for_all_n(3, &gen::choose(0, 1000), |x| seen.lock().push(*x)).unwrap();
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 5);
        assert_eq!(&seen[..2], &[0, 999]);

        let sampled = parking_lot::Mutex::new(0);
        for_all_n(1, &gen::create(|| 7), |_| *sampled.lock() += 1).unwrap();
        assert_eq!(sampled.into_inner(), 1);
    }

    #[test]
    fn test_constants_are_checked_first() {
        let error = for_all(&gen::ints(), |x| *x != i32::MIN).unwrap_err();
        assert_eq!(error.witness, i32::MIN.to_string());
        assert_eq!(error.attempts, 2);
    }

    #[test]
    fn test_seed_replays_failure() {
        let config = PropertyConfig::default().with_seed(1234);
        let gen = gen::choose(0, 1_000_000).filter(|x| *x > 10);
        let first = check(&config, &gen, |x| *x % 10 != 3).unwrap_err();
        let second = check(&first.replay_config(), &gen, |x| *x % 10 != 3).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_for_none() {
        assert!(for_none(&gen::choose(0, 10), |x| *x >= 10).is_ok());
        assert!(for_none(&gen::constant(3), |x| *x == 3).is_err());
    }

    #[test]
    fn test_for_all2() {
        assert!(for_all2(&gen::choose(0, 100), &gen::choose(100, 200), |a, b| a < b).is_ok());
        let error = for_all2(&gen::constant(1), &gen::constant(1), |a, b| a != b).unwrap_err();
        assert_eq!(error.witness, "(1, 1)");
    }

    #[test]
    fn test_check2_replays_from_seed() {
        let config = PropertyConfig::default().with_seed(77).with_samples(200);
        let (xs, ys) = (gen::choose(1, 500), gen::choose(1, 500));
        let first = check2(&config, &xs, &ys, |a, b| (a + b) % 11 != 0).unwrap_err();
        assert_eq!(first.seed, 77);

        let replay = first.replay_config().with_samples(200);
        let second = check2(&replay, &xs, &ys, |a, b| (a + b) % 11 != 0).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_verdicts() {
        assert_eq!(Ok::<bool, String>(true).verdict(), Ok(()));
        assert_eq!(
            Ok::<bool, String>(false).verdict(),
            Err("predicate returned false".to_string())
        );
        assert_eq!(Err::<(), _>("nope").verdict(), Err("nope".to_string()));
    }
}
