//! Type-directed generator selection
//!
//! [`default::<T>()`] picks the built-in generator for `T` at compile time.
//! Scalars map to their numeric, boolean or string generator; containers ask
//! for their element type's generator and wrap the values. For name-based
//! lookup at runtime see [`for_class_name`](super::for_class_name).

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

use super::{bools, doubles, floats, integers, lists, sets, strings, BoxedGen, GenExt};

pub trait Arbitrary: Sized {
    fn arbitrary() -> BoxedGen<Self>;
}

/// The built-in generator for `T`.
pub fn default<T: Arbitrary>() -> BoxedGen<T> {
    T::arbitrary()
}

macro_rules! arbitrary_integer {
    ($($t:ty),*) => {
        $(
            impl Arbitrary for $t {
                fn arbitrary() -> BoxedGen<Self> {
                    integers::<$t>().boxed()
                }
            }
        )*
    };
}

arbitrary_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Arbitrary for bool {
    fn arbitrary() -> BoxedGen<Self> {
        bools().boxed()
    }
}

impl Arbitrary for f32 {
    fn arbitrary() -> BoxedGen<Self> {
        floats().boxed()
    }
}

impl Arbitrary for f64 {
    fn arbitrary() -> BoxedGen<Self> {
        doubles().boxed()
    }
}

impl Arbitrary for String {
    fn arbitrary() -> BoxedGen<Self> {
        strings().boxed()
    }
}

impl<T> Arbitrary for Vec<T>
where
    T: Arbitrary + 'static,
{
    fn arbitrary() -> BoxedGen<Self> {
        lists(T::arbitrary()).boxed()
    }
}

impl<T> Arbitrary for BTreeSet<T>
where
    T: Arbitrary + Ord + 'static,
{
    fn arbitrary() -> BoxedGen<Self> {
        sets(T::arbitrary()).boxed()
    }
}

impl<T> Arbitrary for HashSet<T>
where
    T: Arbitrary + Eq + Hash + 'static,
{
    fn arbitrary() -> BoxedGen<Self> {
        lists(T::arbitrary())
            .map(|items: Vec<T>| items.into_iter().collect::<HashSet<T>>())
            .boxed()
    }
}

impl<T> Arbitrary for Option<T>
where
    T: Arbitrary + 'static,
{
    fn arbitrary() -> BoxedGen<Self> {
        T::arbitrary().or_null().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::Gen;

    #[test]
    fn test_default_scalars() {
        assert_eq!(default::<bool>().constants(), vec![true, false]);
        assert!(default::<u8>().random().take(100).count() == 100);
        assert!(default::<String>().random().take(10).all(|s| s.len() <= 100));
    }

    #[test]
    fn test_default_list_of_ints() {
        let gen = default::<Vec<i32>>();
        assert_eq!(gen.random().take(10).count(), 10);
        assert_eq!(gen.constants(), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_default_sets() {
        let gen = default::<BTreeSet<String>>();
        assert_eq!(gen.random().take(5).count(), 5);

        let gen = default::<HashSet<i64>>();
        assert!(gen.random().take(5).all(|set| set.len() <= 100));
    }

    #[test]
    fn test_default_option() {
        let gen = default::<Option<i32>>();
        assert!(gen.constants().contains(&None));
    }
}
