// Generator library behaviour through the public API: ranges, combinators,
// stateful generators and type-directed lookup.

use std::collections::{BTreeSet, HashSet};

use gencheck::gen::{self, default, for_class_name, printable_string, Gen, GenExt};
use gencheck::property::{for_all, for_all_n};
use gencheck::{rng, GenError, Value};

#[test]
fn test_choose_small_ranges() {
    for_all(&gen::choose(0, 10), |x| (0..10).contains(x)).unwrap();
    for_all(&gen::choose(-5, 5), |x| (-5..5).contains(x)).unwrap();
    for_all(&gen::choose(7u8, 8u8), |x| *x == 7).unwrap();
}

#[test]
fn test_choose_full_integer_ranges() {
    for_all(&gen::choose(i32::MIN, i32::MAX), |x| *x < i32::MAX).unwrap();
    for_all(&gen::choose(i64::MIN, i64::MAX), |x| *x < i64::MAX).unwrap();
}

#[test]
#[should_panic]
fn test_choose_rejects_empty_range() {
    let _ = gen::choose(10, 10);
}

#[test]
fn test_constant() {
    for_all(&gen::constant(5), |x| *x == 5).unwrap();
    for_all(&gen::constant("x".to_string()), |s| s == "x").unwrap();
}

#[test]
fn test_map() {
    for_all(&gen::constant(5).map(|x| x + 7), |x| *x == 12).unwrap();
    for_all(&gen::choose(0, 100).map(|x| x * 2), |x| x % 2 == 0).unwrap();
}

#[test]
fn test_filter() {
    let gen = gen::choose(0, 100).filter(|x| x % 3 == 0);
    for_all(&gen, |x| x % 3 == 0).unwrap();

    let gen = gen::from(vec![1, 2, 5]).filter(|x| *x != 2);
    for_all(&gen, |x| *x == 1 || *x == 5).unwrap();
}

#[test]
fn test_or_null_mixes_absent_and_present() {
    let gen = gen::from(vec![1, 2, 3]).or_null();
    let seen: HashSet<Option<i32>> = gen.random().take(2000).collect();
    let expected: HashSet<Option<i32>> = [None, Some(1), Some(2), Some(3)].into_iter().collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_create_counter_is_ordered() {
    let mut next = 0;
    let gen = gen::create(move || {
        next += 1;
        next - 1
    });

    let first: Vec<i32> = gen.random().take(150).collect();
    assert_eq!(first, (0..150).collect::<Vec<_>>());

    // State lives in the generator, so a new sequence continues the count.
    assert_eq!(gen.random().next(), Some(150));
}

#[test]
fn test_from_empty_is_empty() {
    let gen = gen::from(Vec::<i32>::new());
    assert_eq!(gen.random().next(), None);
    assert!(for_all(&gen, |_| false).is_ok());
}

#[test]
fn test_seeded_sequences_repeat() {
    let gen = gen::lists(gen::strings()).with_max_len(8);
    let a: Vec<Vec<String>> = gen.random_seeded(99).take(20).collect();
    let b: Vec<Vec<String>> = gen.random_seeded(99).take(20).collect();
    assert_eq!(a, b);
}

#[test]
fn test_printable_strings() {
    let mut rng = rng::from_seed(7);
    for len in [0, 1, 64, 1000] {
        let s = printable_string(&mut rng, len);
        assert_eq!(s.chars().count(), len);
        assert!(s.chars().all(|c| ('!'..='~').contains(&c)));
    }
}

#[test]
fn test_for_class_name_aliases() {
    let cases = [
        ("java.lang.String", "String"),
        ("kotlin.String", "String"),
        ("String", "String"),
        ("java.lang.Integer", "i32"),
        ("kotlin.Int", "i32"),
        ("java.lang.Long", "i64"),
        ("kotlin.Boolean", "bool"),
        ("java.lang.Double", "f64"),
    ];
    for (name, expected) in cases {
        let gen = for_class_name(name).unwrap();
        for_all_n(50, &gen, |value| value.type_name() == expected).unwrap();
    }
}

#[test]
fn test_for_class_name_containers() {
    let gen = for_class_name("java.util.List<java.lang.Integer>").unwrap();
    for_all_n(50, &gen, |value| match value {
        Value::List(items) => items.iter().all(|item| matches!(item, Value::Int(_))),
        _ => false,
    })
    .unwrap();

    let gen = for_class_name("Set<String>").unwrap();
    for_all_n(50, &gen, |value| match value {
        Value::Set(items) => {
            let distinct: HashSet<String> = items.iter().map(|item| item.to_string()).collect();
            distinct.len() == items.len()
        }
        _ => false,
    })
    .unwrap();
}

#[test]
fn test_for_class_name_failures() {
    assert!(matches!(
        for_class_name("com.example.Widget"),
        Err(GenError::UnknownType(_))
    ));
    assert!(matches!(
        for_class_name("Map<String, i32>"),
        Err(GenError::UnknownType(_))
    ));
    assert!(matches!(
        for_class_name("Vec<i32"),
        Err(GenError::MalformedTypeName(_))
    ));
    assert!(matches!(for_class_name(""), Err(GenError::MalformedTypeName(_))));
}

#[test]
fn test_default_list_with_nested_property() {
    for_all_n(100, &default::<Vec<i32>>(), |list| {
        for_all(&gen::from(list.clone()), |item| list.contains(item))
    })
    .unwrap();
}

#[test]
fn test_default_set_with_nested_property() {
    for_all_n(100, &default::<BTreeSet<i64>>(), |set| {
        for_all(&gen::from(set.iter().copied().collect::<Vec<_>>()), |item| {
            set.contains(item)
        })
    })
    .unwrap();
}

#[test]
fn test_default_strings_and_options() {
    for_all(&default::<String>(), |s| s.chars().count() <= gen::MAX_STRING_LEN).unwrap();
    for_all(&default::<String>(), |s| s.bytes().all(|b| (33..127).contains(&b))).unwrap();
    for_all(&for_class_name("kotlin.String").unwrap(), |value| match value {
        Value::Text(s) => s.chars().all(|c| ('!'..='~').contains(&c)),
        _ => false,
    })
    .unwrap();
    let seen_none = default::<Option<bool>>()
        .random()
        .take(500)
        .any(|value| value.is_none());
    assert!(seen_none);
}
