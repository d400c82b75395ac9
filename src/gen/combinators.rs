// Generator-to-generator transformations. All of them stay lazy: they wrap
// the upstream sequence and pull from it only when pulled themselves.

use rand::Rng;

use super::{Gen, Sequence};
use crate::rng::{self, GenRng};

/// Probability that [`OrNull`] emits `None` instead of the upstream value
pub const ABSENT_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<G, F> Map<G, F> {
    pub(super) fn new(inner: G, f: F) -> Self {
        Self { inner, f }
    }
}

impl<G, F, U> Gen for Map<G, F>
where
    G: Gen,
    F: Fn(G::Value) -> U,
{
    type Value = U;

    fn constants(&self) -> Vec<U> {
        self.inner.constants().into_iter().map(&self.f).collect()
    }

    fn random_with(&self, rng: GenRng) -> Sequence<'_, U> {
        Box::new(self.inner.random_with(rng).map(&self.f))
    }
}

#[derive(Debug, Clone)]
pub struct Filter<G, P> {
    inner: G,
    predicate: P,
}

impl<G, P> Filter<G, P> {
    pub(super) fn new(inner: G, predicate: P) -> Self {
        Self { inner, predicate }
    }
}

impl<G, P> Gen for Filter<G, P>
where
    G: Gen,
    P: Fn(&G::Value) -> bool,
{
    type Value = G::Value;

    fn constants(&self) -> Vec<G::Value> {
        self.inner
            .constants()
            .into_iter()
            .filter(|v| (self.predicate)(v))
            .collect()
    }

    fn random_with(&self, rng: GenRng) -> Sequence<'_, G::Value> {
        let predicate = &self.predicate;
        Box::new(self.inner.random_with(rng).filter(move |v| predicate(v)))
    }
}

#[derive(Debug, Clone)]
pub struct OrNull<G> {
    inner: G,
}

impl<G> OrNull<G> {
    pub(super) fn new(inner: G) -> Self {
        Self { inner }
    }
}

impl<G: Gen> Gen for OrNull<G> {
    type Value = Option<G::Value>;

    fn constants(&self) -> Vec<Option<G::Value>> {
        let mut constants = vec![None];
        constants.extend(self.inner.constants().into_iter().map(Some));
        constants
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, Option<G::Value>> {
        let mut coin = rng::fork(&mut rng);
        Box::new(self.inner.random_with(rng).map(move |value| {
            if coin.gen_bool(ABSENT_PROBABILITY) {
                None
            } else {
                Some(value)
            }
        }))
    }
}
