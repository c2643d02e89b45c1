//! Cross-module behavior exercised through the public API only.

use std::cell::Cell;
use std::time::Duration;

use approx::assert_relative_eq;
use num_bigint::BigUint;

use utilkit::lists::{self, Nested};
use utilkit::numeric::{self, Power};
use utilkit::{Callable, CallableExt, Error, strings};

// ── Numeric ─────────────────────────────────────────────────────────────

#[test]
fn factorial_and_fibonacci_agree_with_known_values() {
    assert_eq!(
        numeric::factorial(30).unwrap().to_string(),
        "265252859812191058636308480000000"
    );
    assert_eq!(
        numeric::fibonacci(90).unwrap(),
        BigUint::from(2_880_067_194_370_816_120u64)
    );
}

#[test]
fn negative_inputs_are_domain_errors() {
    for err in [
        numeric::factorial(-2).unwrap_err(),
        numeric::fibonacci(-1).unwrap_err(),
        numeric::power(0, -3).unwrap_err(),
    ] {
        assert!(err.is_domain(), "{err}");
    }
}

#[test]
fn power_matches_repeated_multiplication() {
    for base in -4i64..=4 {
        let mut expected = 1i64;
        for exponent in 0..10 {
            assert_eq!(
                numeric::power(base, exponent).unwrap().to_f64(),
                expected as f64
            );
            expected *= base;
        }
    }
    assert_relative_eq!(numeric::power(5, -2).unwrap().to_f64(), 0.04);
    assert!(matches!(numeric::power(2, -1).unwrap(), Power::Fraction(f) if f == 0.5));
}

#[test]
fn memoized_fibonacci_reuses_results() {
    let calls = Cell::new(0);
    let mut fib = (|n: i64| {
        calls.set(calls.get() + 1);
        numeric::fibonacci(n).map_err(|e| e.to_string())
    })
    .memoized()
    .timed("fibonacci");

    assert_eq!(fib.invoke(80).unwrap().to_string(), "23416728348467685");
    assert_eq!(fib.invoke(80).unwrap().to_string(), "23416728348467685");
    assert!(fib.invoke(-1).is_err());
    assert_eq!(calls.get(), 2);
}

// ── Strings ─────────────────────────────────────────────────────────────

#[test]
fn string_examples() {
    assert_eq!(strings::reverse_words("Hello World"), "World Hello");
    assert!(strings::is_palindrome("A man a plan a canal Panama"));
    assert_eq!(strings::count_vowels("Hello World"), 3);
    assert_eq!(strings::title_case("hello world"), "Hello World");
    assert_eq!(strings::remove_duplicates("hello"), "helo");
}

#[test]
fn reversing_words_twice_normalizes_spacing() {
    let input = "  the   quick brown\tfox ";
    let twice = strings::reverse_words(&strings::reverse_words(input));
    assert_eq!(twice, "the quick brown fox");
    assert_eq!(strings::count_words(&twice), 4);
}

// ── Lists ───────────────────────────────────────────────────────────────

#[test]
fn list_examples() {
    let nested = vec![
        Nested::Item(1),
        Nested::from(vec![
            Nested::Item(2),
            Nested::from(vec![Nested::Item(3), Nested::Item(4)]),
        ]),
        Nested::Item(5),
    ];
    assert_eq!(lists::flatten(&nested), vec![1, 2, 3, 4, 5]);
    assert_eq!(
        lists::chunk(&[1, 2, 3, 4, 5], 2).unwrap(),
        vec![vec![1, 2], vec![3, 4], vec![5]]
    );
    assert_eq!(lists::rotate(&[1, 2, 3, 4, 5], 2), vec![4, 5, 1, 2, 3]);
    assert_eq!(lists::find_duplicates(&[1, 2, 2, 3, 3, 4]), vec![2, 3]);
    assert_eq!(
        lists::merge_sorted(&[1, 3, 5], &[2, 4, 6]),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn chunks_concatenate_back_to_input() {
    let input: Vec<u32> = (0..23).collect();
    for size in 1..30 {
        let chunks = lists::chunk(&input, size).unwrap();
        assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
        assert_eq!(chunks.concat(), input);
    }
}

#[test]
fn rotation_inverts() {
    let input = ['a', 'b', 'c', 'd'];
    for k in -9..9 {
        let rotated = lists::rotate(&input, k);
        assert_eq!(lists::rotate(&rotated, -k), input.to_vec());
    }
}

#[test]
fn merge_of_sorted_halves_is_sorted() {
    let mut values = vec![9, 3, 7, 1, 8, 2, 2, 6];
    let (left, right) = values.split_at_mut(4);
    left.sort();
    right.sort();
    let merged = lists::merge_sorted(left, right);
    values.sort();
    assert_eq!(merged, values);
}

// ── Decorators ──────────────────────────────────────────────────────────

#[test]
fn validate_positive_never_invokes_target_on_rejection() {
    let calls = Cell::new(0);
    let mut chunked = (|(len, size): (usize, usize)| {
        calls.set(calls.get() + 1);
        let input: Vec<usize> = (0..len).collect();
        lists::chunk(&input, size).map(|c| c.len())
    })
    .validated();

    assert_eq!(chunked.invoke((10, 3)).unwrap().unwrap(), 4);
    let err = chunked.invoke((10, 0)).unwrap_err();
    assert!(matches!(err, Error::NotPositive { position: 1, .. }));
    assert_eq!(calls.get(), 1);
}

#[test]
fn retry_around_validation() {
    let mut attempts = 0;
    let result = {
        let mut wrapped = (|n: i32| {
            attempts += 1;
            n
        })
        .validated()
        .retried(3, Duration::ZERO);
        wrapped.invoke(-5)
    };
    assert!(result.is_err());
    assert_eq!(attempts, 0);
}
