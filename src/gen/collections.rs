//! Container generators
//!
//! Each container sequence starts one element sequence and pulls a random
//! number of elements from it per container, so elements stay lazy too.

use std::collections::BTreeSet;

use rand::Rng;

use super::{Gen, Sequence};
use crate::rng::{self, GenRng};

/// Largest container produced unless configured otherwise
pub const MAX_COLLECTION_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct Lists<G> {
    element: G,
    max_len: usize,
}

pub fn lists<G: Gen>(element: G) -> Lists<G> {
    Lists {
        element,
        max_len: MAX_COLLECTION_LEN,
    }
}

impl<G> Lists<G> {
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl<G: Gen> Gen for Lists<G> {
    type Value = Vec<G::Value>;

    fn constants(&self) -> Vec<Vec<G::Value>> {
        vec![Vec::new()]
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, Vec<G::Value>> {
        let mut elements = self.element.random_with(rng::fork(&mut rng));
        let max_len = self.max_len;
        Box::new(std::iter::repeat_with(move || {
            let len = rng.gen_range(0..=max_len);
            elements.by_ref().take(len).collect::<Vec<_>>()
        }))
    }
}

/// Sets hold at most `max_len` distinct elements; duplicates drawn from the
/// element sequence collapse.
#[derive(Debug, Clone)]
pub struct Sets<G> {
    element: G,
    max_len: usize,
}

pub fn sets<G: Gen>(element: G) -> Sets<G>
where
    G::Value: Ord,
{
    Sets {
        element,
        max_len: MAX_COLLECTION_LEN,
    }
}

impl<G> Sets<G> {
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl<G> Gen for Sets<G>
where
    G: Gen,
    G::Value: Ord,
{
    type Value = BTreeSet<G::Value>;

    fn constants(&self) -> Vec<BTreeSet<G::Value>> {
        vec![BTreeSet::new()]
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, BTreeSet<G::Value>> {
        let mut elements = self.element.random_with(rng::fork(&mut rng));
        let max_len = self.max_len;
        Box::new(std::iter::repeat_with(move || {
            let len = rng.gen_range(0..=max_len);
            elements.by_ref().take(len).collect::<BTreeSet<_>>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{constant, from, ints, strings};
    use super::*;

    #[test]
    fn test_lists_respect_max_len() {
        let gen = lists(ints()).with_max_len(10);
        assert!(gen.random().take(200).all(|list| list.len() <= 10));
    }

    #[test]
    fn test_lists_draw_from_element_generator() {
        let gen = lists(constant(3));
        assert!(gen.random().take(50).flatten().all(|x| x == 3));
    }

    #[test]
    fn test_sets_are_deduplicated() {
        let gen = sets(from(vec![1, 2])).with_max_len(50);
        assert!(gen.random().take(100).all(|set| set.len() <= 2));
    }

    #[test]
    fn test_sets_of_strings() {
        let gen = sets(strings());
        assert!(gen.random().take(20).all(|set| set.len() <= MAX_COLLECTION_LEN));
    }
}
