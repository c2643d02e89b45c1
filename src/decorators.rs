//! Composable function wrappers.
//!
//! Anything implementing [`Callable`] can be wrapped, and every wrapper is
//! itself a [`Callable`], so wrappers stack. Closures and function pointers
//! implement [`Callable`] through the blanket impl over `FnMut(A) -> R`.
//! Functions of several arguments take them as one tuple.
//!
//! Wrapping order is explicit: the first wrapper applied sits closest to the
//! target.
//!
//! ```
//! use utilkit::decorators::{Callable, CallableExt};
//!
//! let mut square = (|n: u64| n * n).memoized().timed("square");
//! assert_eq!(square.invoke(12), 144);
//! assert_eq!(square.inner().cache_info().misses, 1);
//! ```
//!
//! Wrappers take `&mut self` and hold no locks; they are meant for
//! single-threaded use.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// A function of one (possibly tuple) argument.
pub trait Callable<A> {
    type Output;

    fn invoke(&mut self, args: A) -> Self::Output;
}

impl<A, R, F> Callable<A> for F
where
    F: FnMut(A) -> R,
{
    type Output = R;

    fn invoke(&mut self, args: A) -> R {
        self(args)
    }
}

/// Builder methods for wrapping any [`Callable`].
pub trait CallableExt<A>: Callable<A> + Sized {
    fn timed(self, name: impl Into<String>) -> Timed<Self> {
        Timed::new(name, self)
    }

    fn memoized(self) -> Memoize<Self, A>
    where
        A: Eq + Hash + Clone,
        Self::Output: Clone,
    {
        Memoize::new(self)
    }

    fn validated(self) -> ValidatePositive<Self>
    where
        A: Arguments,
    {
        ValidatePositive::new(self)
    }

    fn logged(self, name: impl Into<String>) -> Logged<Self> {
        Logged::new(name, self)
    }

    fn retried(self, max_attempts: usize, delay: Duration) -> Retry<Self> {
        Retry::new(self, max_attempts, delay)
    }
}

impl<A, C: Callable<A>> CallableExt<A> for C {}

// ── Timer ───────────────────────────────────────────────────────────────

/// Measures wall-clock time of each call and reports it as a `tracing` event.
pub struct Timed<C> {
    name: String,
    inner: C,
    last_elapsed: Option<Duration>,
}

impl<C> Timed<C> {
    pub fn new(name: impl Into<String>, inner: C) -> Self {
        Self {
            name: name.into(),
            inner,
            last_elapsed: None,
        }
    }

    /// Duration of the most recent call, if any.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<A, C: Callable<A>> Callable<A> for Timed<C> {
    type Output = C::Output;

    fn invoke(&mut self, args: A) -> C::Output {
        let start = Instant::now();
        let output = self.inner.invoke(args);
        let elapsed = start.elapsed();
        self.last_elapsed = Some(elapsed);
        tracing::info!(
            function = %self.name,
            elapsed_us = elapsed.as_micros() as u64,
            "{} executed in {:.6} seconds",
            self.name,
            elapsed.as_secs_f64()
        );
        output
    }
}

// ── Memoize ─────────────────────────────────────────────────────────────

/// Snapshot of a [`Memoize`] cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Caches results keyed by the exact argument value.
///
/// The cache is unbounded and never evicts; it lives as long as the wrapper.
/// Only pure targets should be wrapped: a target with side effects runs them
/// once per distinct argument. Every output is cached, `Err` included.
pub struct Memoize<C: Callable<A>, A> {
    inner: C,
    cache: HashMap<A, C::Output>,
    hits: u64,
    misses: u64,
}

impl<A, C> Memoize<C, A>
where
    A: Eq + Hash + Clone,
    C: Callable<A>,
    C::Output: Clone,
{
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
        }
    }

    /// Drop every cached entry and reset the counters.
    pub fn cache_clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<A, C> Callable<A> for Memoize<C, A>
where
    A: Eq + Hash + Clone,
    C: Callable<A>,
    C::Output: Clone,
{
    type Output = C::Output;

    fn invoke(&mut self, args: A) -> C::Output {
        if let Some(cached) = self.cache.get(&args) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        let output = self.inner.invoke(args.clone());
        self.cache.insert(args, output.clone());
        output
    }
}

// ── Validate positive ───────────────────────────────────────────────────

/// Positional arguments that [`ValidatePositive`] can inspect.
///
/// Returns the position and printed value of the first numeric argument that
/// is not strictly positive. Non-numeric arguments always pass.
pub trait Arguments {
    fn first_non_positive(&self) -> Option<(usize, String)>;
}

/// A single argument value.
pub trait Argument {
    /// `false` only for numbers `<= 0`. NaN compares false and passes.
    fn is_positive(&self) -> bool;
}

macro_rules! numeric_argument {
    ($zero:expr => $($t:ty),*) => {
        $(
            impl Argument for $t {
                fn is_positive(&self) -> bool {
                    !matches!(
                        self.partial_cmp(&$zero),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                }
            }

            impl Arguments for $t {
                fn first_non_positive(&self) -> Option<(usize, String)> {
                    (!self.is_positive()).then(|| (0, self.to_string()))
                }
            }
        )*
    };
}

numeric_argument!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric_argument!(0.0 => f32, f64);

macro_rules! passthrough_argument {
    ($($t:ty),*) => {
        $(
            impl Argument for $t {
                fn is_positive(&self) -> bool {
                    true
                }
            }
        )*
    };
}

passthrough_argument!(bool, char, String, &str);

macro_rules! tuple_arguments {
    ($(($($idx:tt $name:ident),+)),+) => {
        $(
            impl<$($name: Argument + fmt::Display),+> Arguments for ($($name,)+) {
                fn first_non_positive(&self) -> Option<(usize, String)> {
                    $(
                        if !self.$idx.is_positive() {
                            return Some(($idx, self.$idx.to_string()));
                        }
                    )+
                    None
                }
            }
        )+
    };
}

tuple_arguments!(
    (0 A),
    (0 A, 1 B),
    (0 A, 1 B, 2 C),
    (0 A, 1 B, 2 C, 3 D)
);

/// Rejects non-positive numeric arguments before the target runs.
///
/// The target is never invoked for rejected arguments.
pub struct ValidatePositive<C> {
    inner: C,
}

impl<C> ValidatePositive<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<A: Arguments, C: Callable<A>> Callable<A> for ValidatePositive<C> {
    type Output = Result<C::Output>;

    fn invoke(&mut self, args: A) -> Result<C::Output> {
        if let Some((position, value)) = args.first_non_positive() {
            return Err(Error::NotPositive { position, value });
        }
        Ok(self.inner.invoke(args))
    }
}

// ── Call logging ────────────────────────────────────────────────────────

/// Logs every call's arguments and output at `debug` level.
pub struct Logged<C> {
    name: String,
    inner: C,
}

impl<C> Logged<C> {
    pub fn new(name: impl Into<String>, inner: C) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<A, C> Callable<A> for Logged<C>
where
    A: fmt::Debug,
    C: Callable<A>,
    C::Output: fmt::Debug,
{
    type Output = C::Output;

    fn invoke(&mut self, args: A) -> C::Output {
        tracing::debug!(function = %self.name, "calling {}({:?})", self.name, args);
        let output = self.inner.invoke(args);
        tracing::debug!(function = %self.name, "{} returned {:?}", self.name, output);
        output
    }
}

// ── Retry ───────────────────────────────────────────────────────────────

/// Re-invokes a fallible target until it succeeds or `max_attempts` is
/// reached, sleeping `delay` between attempts. The last error is returned.
pub struct Retry<C> {
    inner: C,
    max_attempts: usize,
    delay: Duration,
    attempts: usize,
}

impl<C> Retry<C> {
    /// `max_attempts` below 1 is treated as 1.
    pub fn new(inner: C, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
            attempts: 0,
        }
    }

    /// Total number of target invocations so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<A, T, E, C> Callable<A> for Retry<C>
where
    A: Clone,
    E: fmt::Display,
    C: Callable<A, Output = std::result::Result<T, E>>,
{
    type Output = std::result::Result<T, E>;

    fn invoke(&mut self, args: A) -> std::result::Result<T, E> {
        let mut attempt = 1;
        loop {
            self.attempts += 1;
            match self.inner.invoke(args.clone()) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "call failed: {e}; retrying in {:?}",
                        self.delay
                    );
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        max_attempts = self.max_attempts,
                        "call failed after {} attempts: {e}",
                        self.max_attempts
                    );
                    return Err(e);
                }
            }
        }
    }
}
