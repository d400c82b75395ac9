//! Generator library
//!
//! A [`Gen`] produces lazy, logically infinite sequences of random values.
//! Every call to [`Gen::random`] starts a fresh, independent sequence; the
//! sequence itself is a plain iterator, so consumers take a bounded prefix
//! with `take(n)`. Besides random values a generator may expose a short list
//! of edge-case [`constants`](Gen::constants) (bounds, empty values) that
//! property checks try first.
//!
//! # Combinators
//!
//! - [`constant`]: every element is the same value
//! - [`choose`]: uniform integers in a half-open range
//! - [`from`]: uniform choice among fixed values
//! - [`create`]: call a function for each element, in pull order
//! - [`GenExt::map`], [`GenExt::filter`], [`GenExt::or_null`]
//! - [`default`], [`try_default`], [`for_class_name`]: generators chosen by type
//!
//! `filter` does not bound its retries. A predicate that almost never holds
//! makes the sequence stall rather than fail.

use std::iter;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::seq::SliceRandom;

use crate::rng::{self, GenRng};

mod arbitrary;
mod collections;
mod combinators;
mod numeric;
mod registry;
mod strings;

pub use arbitrary::{default, Arbitrary};
pub use collections::{lists, sets, Lists, Sets, MAX_COLLECTION_LEN};
pub use combinators::{Filter, Map, OrNull, ABSENT_PROBABILITY};
pub use numeric::{
    bools, bytes, choose, doubles, floats, integers, ints, longs, shorts, Bools, Choose, Floats,
    Integers, Integral,
};
pub use registry::{for_class_name, try_default, TypeRegistry, Value};
pub use strings::{printable_string, strings, Strings, MAX_STRING_LEN};

/// A lazily evaluated stream of generated values
pub type Sequence<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// A type-erased generator that can be shared across threads
pub type BoxedGen<T> = Box<dyn Gen<Value = T> + Send + Sync>;

/// Errors raised when a generator cannot be found for a type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error("malformed type name `{0}`")]
    MalformedTypeName(String),

    #[error("no generator registered for type `{0}`")]
    UnknownType(String),
}

pub trait Gen {
    type Value;

    /// Edge-case values worth checking before random ones.
    fn constants(&self) -> Vec<Self::Value> {
        Vec::new()
    }

    /// Start a new sequence drawing from `rng`.
    fn random_with(&self, rng: GenRng) -> Sequence<'_, Self::Value>;

    /// Start a new sequence from fresh entropy.
    fn random(&self) -> Sequence<'_, Self::Value> {
        self.random_with(rng::from_entropy())
    }

    /// Start a new sequence that is reproducible from `seed`.
    fn random_seeded(&self, seed: u64) -> Sequence<'_, Self::Value> {
        self.random_with(rng::from_seed(seed))
    }
}

impl<G: Gen + ?Sized> Gen for Box<G> {
    type Value = G::Value;

    fn constants(&self) -> Vec<Self::Value> {
        (**self).constants()
    }

    fn random_with(&self, rng: GenRng) -> Sequence<'_, Self::Value> {
        (**self).random_with(rng)
    }
}

impl<G: Gen + ?Sized> Gen for Arc<G> {
    type Value = G::Value;

    fn constants(&self) -> Vec<Self::Value> {
        (**self).constants()
    }

    fn random_with(&self, rng: GenRng) -> Sequence<'_, Self::Value> {
        (**self).random_with(rng)
    }
}

impl<G: Gen + ?Sized> Gen for &G {
    type Value = G::Value;

    fn constants(&self) -> Vec<Self::Value> {
        (**self).constants()
    }

    fn random_with(&self, rng: GenRng) -> Sequence<'_, Self::Value> {
        (**self).random_with(rng)
    }
}

/// Combinators available on every generator
pub trait GenExt: Gen + Sized {
    /// Transform each element with `f`. One upstream element per output.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Value) -> U,
    {
        Map::new(self, f)
    }

    /// Keep only elements satisfying `predicate`. Retries are unbounded.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: Fn(&Self::Value) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Mix `None` into the sequence alongside present values.
    fn or_null(self) -> OrNull<Self> {
        OrNull::new(self)
    }

    fn boxed(self) -> BoxedGen<Self::Value>
    where
        Self: Send + Sync + 'static,
    {
        Box::new(self)
    }
}

impl<G: Gen> GenExt for G {}

/// Generator whose every element is `value`
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant { value }
}

impl<T: Clone> Gen for Constant<T> {
    type Value = T;

    fn constants(&self) -> Vec<T> {
        vec![self.value.clone()]
    }

    fn random_with(&self, _rng: GenRng) -> Sequence<'_, T> {
        Box::new(iter::repeat(self.value.clone()))
    }
}

/// Generator picking uniformly among fixed values
#[derive(Debug, Clone)]
pub struct Elements<T> {
    values: Vec<T>,
}

/// Uniform choice among `values`. No values means an empty sequence.
pub fn from<T: Clone>(values: impl IntoIterator<Item = T>) -> Elements<T> {
    Elements {
        values: values.into_iter().collect(),
    }
}

impl<T: Clone> Gen for Elements<T> {
    type Value = T;

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, T> {
        Box::new(iter::from_fn(move || self.values.choose(&mut rng).cloned()))
    }
}

/// Generator calling a function for every element
///
/// The function may be stateful. Calls happen as elements are pulled, so a
/// counter captured by the function sees pulls in order, across sequences too.
pub struct Create<F> {
    f: Mutex<F>,
}

pub fn create<T, F>(f: F) -> Create<F>
where
    F: FnMut() -> T,
{
    Create { f: Mutex::new(f) }
}

impl<T, F> Gen for Create<F>
where
    F: FnMut() -> T,
{
    type Value = T;

    fn random_with(&self, _rng: GenRng) -> Sequence<'_, T> {
        Box::new(iter::from_fn(move || {
            let mut f = self.f.lock();
            Some((*f)())
        }))
    }
}
