//! Built-in self-check cases and the runner that aggregates them.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic;
use std::str::FromStr;
use std::time::{Duration, Instant};

use num_bigint::{BigInt, BigUint};

use crate::config::Config;
use crate::decorators::{Callable, CallableExt};
use crate::error::Error;
use crate::lists::{self, Nested};
use crate::numeric::{self, Power};
use crate::strings;

type Check = std::result::Result<(), String>;

/// Library module a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Module {
    Numeric,
    Strings,
    Lists,
    Decorators,
}

impl Module {
    pub const ALL: [Module; 4] = [
        Module::Numeric,
        Module::Strings,
        Module::Lists,
        Module::Decorators,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Numeric => "numeric",
            Module::Strings => "strings",
            Module::Lists => "lists",
            Module::Decorators => "decorators",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownModule(s.to_string()))
    }
}

/// A named self-check.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub module: Module,
    pub name: &'static str,
    pub check: fn() -> Check,
}

impl Case {
    /// `module::name`.
    pub fn id(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub module: Module,
    pub name: &'static str,
    pub outcome: Outcome,
    pub duration: Duration,
}

/// Aggregated counts for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
    pub duration: Duration,
}

impl SuiteReport {
    pub fn stats(&self) -> SuiteStats {
        let failed = self
            .results
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count();
        SuiteStats {
            total: self.results.len(),
            passed: self.results.len() - failed,
            failed,
        }
    }

    pub fn success(&self) -> bool {
        self.results.iter().all(|r| !r.outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.outcome.is_failure())
    }
}

/// Run the built-in catalog under `config`.
pub fn run(config: &Config) -> SuiteReport {
    run_cases(&catalog(), config)
}

/// Run `cases` in order, skipping modules `config` does not select.
///
/// A check that panics is recorded as a failure with the panic message and
/// location. The default panic hook is replaced while the cases run so panics
/// do not interleave with the report on stderr.
pub fn run_cases(cases: &[Case], config: &Config) -> SuiteReport {
    let started = Instant::now();
    let mut results = Vec::new();

    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
    }));

    for case in cases.iter().filter(|c| config.includes(c.module)) {
        let start = Instant::now();
        let outcome = match panic::catch_unwind(case.check) {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(message)) => Outcome::Failed(message),
            Err(payload) => Outcome::Failed(panic_message(payload.as_ref())),
        };
        let duration = start.elapsed();
        let failed = outcome.is_failure();
        tracing::debug!(case = %case.id(), failed, "case finished");
        results.push(CaseResult {
            module: case.module,
            name: case.name,
            outcome,
            duration,
        });
        if failed && config.fail_fast {
            tracing::warn!(case = %case.id(), "stopping after first failure");
            break;
        }
    }
    panic::set_hook(previous_hook);

    let report = SuiteReport {
        results,
        duration: started.elapsed(),
    };
    let stats = report.stats();
    tracing::info!(
        total = stats.total,
        passed = stats.passed,
        failed = stats.failed,
        "self-check finished"
    );
    report
}

thread_local! {
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let prefix = match PANIC_LOCATION.with(|slot| slot.borrow_mut().take()) {
        Some(location) => format!("panicked at {location}"),
        None => "panicked".to_string(),
    };
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("{prefix}: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("{prefix}: {s}")
    } else {
        prefix
    }
}

fn expect_eq<T: PartialEq + fmt::Debug>(actual: T, expected: T) -> Check {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {actual:?}"))
    }
}

fn expect(condition: bool, message: &str) -> Check {
    if condition {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

fn expect_domain_error<T: fmt::Debug>(result: crate::error::Result<T>) -> Check {
    match result {
        Err(e) if e.is_domain() => Ok(()),
        other => Err(format!("expected a domain error, got {other:?}")),
    }
}

fn fail(e: Error) -> String {
    e.to_string()
}

/// Every built-in case, grouped by module.
pub fn catalog() -> Vec<Case> {
    vec![
        Case {
            module: Module::Numeric,
            name: "factorial_recurrence",
            check: || {
                expect_eq(numeric::factorial(0).map_err(fail)?, BigUint::from(1u32))?;
                for n in 1..30 {
                    let expected =
                        numeric::factorial(n - 1).map_err(fail)? * BigUint::from(n as u64);
                    expect_eq(numeric::factorial(n).map_err(fail)?, expected)?;
                }
                Ok(())
            },
        },
        Case {
            module: Module::Numeric,
            name: "factorial_negative_rejected",
            check: || expect_domain_error(numeric::factorial(-1)),
        },
        Case {
            module: Module::Numeric,
            name: "fibonacci_recurrence",
            check: || {
                expect_eq(numeric::fibonacci(0).map_err(fail)?, BigUint::from(0u32))?;
                expect_eq(numeric::fibonacci(1).map_err(fail)?, BigUint::from(1u32))?;
                for n in 0..50 {
                    let sum = numeric::fibonacci(n).map_err(fail)?
                        + numeric::fibonacci(n + 1).map_err(fail)?;
                    expect_eq(sum, numeric::fibonacci(n + 2).map_err(fail)?)?;
                }
                Ok(())
            },
        },
        Case {
            module: Module::Numeric,
            name: "fibonacci_negative_rejected",
            check: || expect_domain_error(numeric::fibonacci(-3)),
        },
        Case {
            module: Module::Numeric,
            name: "is_prime",
            check: || {
                let primes: Vec<i64> = (-3..20).filter(|&n| numeric::is_prime(n)).collect();
                expect_eq(primes, vec![2, 3, 5, 7, 11, 13, 17, 19])
            },
        },
        Case {
            module: Module::Numeric,
            name: "gcd_lcm_product",
            check: || {
                for (a, b) in [(12, 18), (-4, 6), (7, 13), (100, -75)] {
                    let product = (i128::from(a) * i128::from(b)).unsigned_abs();
                    expect_eq(
                        u128::from(numeric::gcd(a, b)) * numeric::lcm(a, b),
                        product,
                    )?;
                }
                expect_eq(numeric::gcd(0, 0), 0)?;
                expect_eq(numeric::lcm(0, 0), 0)
            },
        },
        Case {
            module: Module::Numeric,
            name: "power",
            check: || {
                expect_eq(
                    numeric::power(2, 10).map_err(fail)?,
                    Power::Exact(BigInt::from(1024)),
                )?;
                let value = numeric::power(5, -2).map_err(fail)?.to_f64();
                expect((value - 0.04).abs() < 1e-12, "power(5, -2) should be 0.04")?;
                expect_domain_error(numeric::power(0, -1))
            },
        },
        Case {
            module: Module::Strings,
            name: "reverse_words",
            check: || expect_eq(strings::reverse_words("Hello World").as_str(), "World Hello"),
        },
        Case {
            module: Module::Strings,
            name: "is_palindrome",
            check: || {
                expect(
                    strings::is_palindrome("A man a plan a canal Panama"),
                    "phrase should be a palindrome",
                )?;
                expect(!strings::is_palindrome("hello"), "hello is not a palindrome")
            },
        },
        Case {
            module: Module::Strings,
            name: "count_vowels",
            check: || expect_eq(strings::count_vowels("Hello World"), 3),
        },
        Case {
            module: Module::Strings,
            name: "title_case",
            check: || expect_eq(strings::title_case("hello world").as_str(), "Hello World"),
        },
        Case {
            module: Module::Strings,
            name: "remove_duplicates",
            check: || {
                let once = strings::remove_duplicates("hello");
                expect_eq(once.as_str(), "helo")?;
                expect_eq(strings::remove_duplicates(&once), once)
            },
        },
        Case {
            module: Module::Lists,
            name: "flatten",
            check: || {
                let nested = vec![
                    Nested::Item(1),
                    Nested::List(vec![
                        Nested::Item(2),
                        Nested::List(vec![Nested::Item(3), Nested::Item(4)]),
                    ]),
                    Nested::Item(5),
                ];
                expect_eq(lists::flatten(&nested), vec![1, 2, 3, 4, 5])
            },
        },
        Case {
            module: Module::Lists,
            name: "chunk",
            check: || {
                expect_eq(
                    lists::chunk(&[1, 2, 3, 4, 5], 2).map_err(fail)?,
                    vec![vec![1, 2], vec![3, 4], vec![5]],
                )?;
                expect_domain_error(lists::chunk(&[1, 2, 3], 0))
            },
        },
        Case {
            module: Module::Lists,
            name: "rotate",
            check: || expect_eq(lists::rotate(&[1, 2, 3, 4, 5], 2), vec![4, 5, 1, 2, 3]),
        },
        Case {
            module: Module::Lists,
            name: "find_duplicates",
            check: || expect_eq(lists::find_duplicates(&[1, 2, 2, 3, 3, 4]), vec![2, 3]),
        },
        Case {
            module: Module::Lists,
            name: "merge_sorted",
            check: || {
                expect_eq(
                    lists::merge_sorted(&[1, 3, 5], &[2, 4, 6]),
                    vec![1, 2, 3, 4, 5, 6],
                )
            },
        },
        Case {
            module: Module::Lists,
            name: "list_stats",
            check: || {
                let stats = lists::list_stats(&[1.0, 2.0, 3.0, 4.0]).map_err(fail)?;
                expect((stats.median - 2.5).abs() < f64::EPSILON, "median should be 2.5")?;
                expect_domain_error(lists::list_stats(&[]))
            },
        },
        Case {
            module: Module::Decorators,
            name: "memoize_calls_once",
            check: || {
                let mut calls = 0;
                let mut square = (|n: u64| {
                    calls += 1;
                    n * n
                })
                .memoized();
                expect_eq(square.invoke(9), 81)?;
                expect_eq(square.invoke(9), 81)?;
                drop(square);
                expect_eq(calls, 1)
            },
        },
        Case {
            module: Module::Decorators,
            name: "validate_positive_blocks_call",
            check: || {
                let mut calls = 0;
                let mut area = (|(w, h): (i64, i64)| {
                    calls += 1;
                    w * h
                })
                .validated();
                expect(area.invoke((0, 5)).is_err(), "zero should be rejected")?;
                expect(area.invoke((4, -5)).is_err(), "negative should be rejected")?;
                drop(area);
                expect_eq(calls, 0)
            },
        },
        Case {
            module: Module::Decorators,
            name: "timer_passes_result_through",
            check: || {
                let mut timed = strings::reverse_words.timed("reverse_words");
                expect_eq(timed.invoke("a b").as_str(), "b a")?;
                expect(timed.last_elapsed().is_some(), "elapsed time should be recorded")
            },
        },
    ]
}
