//! Numeric generators
//!
//! Integer sampling goes through `rand`'s uniform range sampler, which works
//! in the unsigned domain and therefore never overflows, even for ranges
//! spanning the whole type such as `i64::MIN..i64::MAX`.

use std::fmt::Debug;
use std::marker::PhantomData;

use rand::distributions::uniform::SampleUniform;
use rand::Rng;

use super::{Gen, Sequence};
use crate::rng::GenRng;

/// Integer types usable with [`choose`] and [`integers`]
pub trait Integral: Copy + PartialOrd + Debug + SampleUniform + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    /// `self - 1`; only called on values greater than `MIN`.
    fn predecessor(self) -> Self;
}

macro_rules! integral {
    ($($t:ty),*) => {
        $(
            impl Integral for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const ZERO: Self = 0;

                fn predecessor(self) -> Self {
                    self - 1
                }
            }
        )*
    };
}

integral!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Uniform integers in `[min, max)`
#[derive(Debug, Clone, Copy)]
pub struct Choose<T> {
    min: T,
    max: T,
}

/// Uniform integers in `[min, max)`.
///
/// # Panics
///
/// Panics if `min >= max`, as the range would be empty.
pub fn choose<T: Integral>(min: T, max: T) -> Choose<T> {
    assert!(min < max, "choose requires min < max, got {:?}..{:?}", min, max);
    Choose { min, max }
}

impl<T: Integral> Choose<T> {
    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl<T: Integral> Gen for Choose<T> {
    type Value = T;

    fn constants(&self) -> Vec<T> {
        let last = self.max.predecessor();
        if last == self.min {
            vec![self.min]
        } else {
            vec![self.min, last]
        }
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, T> {
        let (min, max) = (self.min, self.max);
        Box::new(std::iter::repeat_with(move || rng.gen_range(min..max)))
    }
}

/// Integers over the full range of `T`
#[derive(Debug, Clone, Copy, Default)]
pub struct Integers<T> {
    _type: PhantomData<fn() -> T>,
}

pub fn integers<T: Integral>() -> Integers<T> {
    Integers { _type: PhantomData }
}

pub fn bytes() -> Integers<i8> {
    integers()
}

pub fn shorts() -> Integers<i16> {
    integers()
}

pub fn ints() -> Integers<i32> {
    integers()
}

pub fn longs() -> Integers<i64> {
    integers()
}

impl<T: Integral> Gen for Integers<T> {
    type Value = T;

    fn constants(&self) -> Vec<T> {
        if T::MIN == T::ZERO {
            vec![T::ZERO, T::MAX]
        } else {
            vec![T::ZERO, T::MIN, T::MAX]
        }
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, T> {
        Box::new(std::iter::repeat_with(move || rng.gen_range(T::MIN..=T::MAX)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bools;

pub fn bools() -> Bools {
    Bools
}

impl Gen for Bools {
    type Value = bool;

    fn constants(&self) -> Vec<bool> {
        vec![true, false]
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, bool> {
        Box::new(std::iter::repeat_with(move || rng.gen::<bool>()))
    }
}

/// Floating point types usable with [`Floats`]
pub trait FloatBounds: Copy + Debug + Send + Sync + 'static {
    fn edge_cases() -> Vec<Self>;
    fn sample(rng: &mut GenRng) -> Self;
}

macro_rules! float_bounds {
    ($($t:ident),*) => {
        $(
            impl FloatBounds for $t {
                fn edge_cases() -> Vec<Self> {
                    vec![
                        0.0,
                        $t::MIN_POSITIVE,
                        $t::MAX,
                        $t::MIN,
                        $t::INFINITY,
                        $t::NEG_INFINITY,
                        $t::NAN,
                    ]
                }

                // Half the draws come from the unit interval, half from a
                // wide symmetric range.
                fn sample(rng: &mut GenRng) -> Self {
                    if rng.gen::<bool>() {
                        rng.gen::<$t>()
                    } else {
                        rng.gen_range(-1.0e6..1.0e6)
                    }
                }
            }
        )*
    };
}

float_bounds!(f32, f64);

#[derive(Debug, Clone, Copy, Default)]
pub struct Floats<T> {
    _type: PhantomData<fn() -> T>,
}

pub fn floats() -> Floats<f32> {
    Floats { _type: PhantomData }
}

pub fn doubles() -> Floats<f64> {
    Floats { _type: PhantomData }
}

impl<T: FloatBounds> Gen for Floats<T> {
    type Value = T;

    fn constants(&self) -> Vec<T> {
        T::edge_cases()
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, T> {
        Box::new(std::iter::repeat_with(move || T::sample(&mut rng)))
    }
}
