//! Sequence helpers over slices of arbitrary element types.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{Error, Result};

/// An arbitrarily nested sequence.
///
/// Values are owned trees, so a list can never contain itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested<T> {
    Item(T),
    List(Vec<Nested<T>>),
}

impl<T> From<Vec<Nested<T>>> for Nested<T> {
    fn from(items: Vec<Nested<T>>) -> Self {
        Nested::List(items)
    }
}

/// Expand nested sequences into one flat sequence, left to right.
///
/// Uses an explicit stack of iterators, so nesting depth is bounded by
/// memory rather than by the call stack.
pub fn flatten<T: Clone>(nested: &[Nested<T>]) -> Vec<T> {
    let mut out = Vec::new();
    let mut stack = vec![nested.iter()];
    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(Nested::Item(value)) => out.push(value.clone()),
            Some(Nested::List(items)) => stack.push(items.iter()),
            None => {
                stack.pop();
            }
        }
    }
    out
}

/// Split `seq` into consecutive chunks of `size`; the last one may be shorter.
pub fn chunk<T: Clone>(seq: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Error::InvalidChunkSize);
    }
    Ok(seq.chunks(size).map(<[T]>::to_vec).collect())
}

/// Rotate right by `k` positions; a negative `k` rotates left.
///
/// `k` is reduced modulo the length, so any value is accepted. An empty
/// sequence is returned unchanged.
pub fn rotate<T: Clone>(seq: &[T], k: i64) -> Vec<T> {
    let mut out = seq.to_vec();
    if out.is_empty() {
        return out;
    }
    let shift = i128::from(k).rem_euclid(out.len() as i128) as usize;
    out.rotate_right(shift);
    out
}

/// Values that occur more than once, each reported once, in the order their
/// first repeat is encountered.
pub fn find_duplicates<T: Eq + Hash + Clone>(seq: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for item in seq {
        if !seen.insert(item) && reported.insert(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Stable merge of two ascending slices in O(len(a) + len(b)).
///
/// Equal elements from `a` come before those from `b`. Both inputs must
/// already be sorted; unsorted input is not detected and the output order is
/// then unspecified.
pub fn merge_sorted<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            out.push(a[i].clone());
            i += 1;
        } else {
            out.push(b[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Summary statistics of a numeric list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Min, max, mean and median; `EmptyInput` for no values, `NonFinite` for NaN or infinity.
pub fn list_stats(values: &[f64]) -> Result<ListStats> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::NonFinite(bad));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let sum: f64 = sorted.iter().sum();
    // Sum of large finite values can overflow; scale first in that case.
    let mean = if sum.is_finite() {
        sum / n as f64
    } else {
        sorted.iter().map(|v| v / n as f64).sum()
    };
    Ok(ListStats {
        min: sorted[0],
        max: sorted[n - 1],
        mean,
        median,
    })
}
