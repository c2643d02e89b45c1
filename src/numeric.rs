//! Integer arithmetic helpers.
//!
//! Factorial and Fibonacci return arbitrary-precision values so they never
//! overflow. `power` is exact for non-negative exponents and falls back to
//! floating point for negative ones.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Compute `n!` exactly.
pub fn factorial(n: i64) -> Result<BigUint> {
    if n < 0 {
        return Err(Error::NegativeInput {
            function: "factorial",
            value: n,
        });
    }
    let mut result = BigUint::one();
    for i in 2..=n.unsigned_abs() {
        result *= i;
    }
    Ok(result)
}

/// Compute the nth Fibonacci number with `F(0) = 0` and `F(1) = 1`.
///
/// Iterative: O(n) additions, only the last two terms are kept.
pub fn fibonacci(n: i64) -> Result<BigUint> {
    if n < 0 {
        return Err(Error::NegativeInput {
            function: "fibonacci",
            value: n,
        });
    }
    let (mut a, mut b) = (BigUint::zero(), BigUint::one());
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    Ok(a)
}

/// Trial division over odd candidates up to the integer square root.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let n = n.unsigned_abs();
    let mut candidate = 3u64;
    // `candidate <= n / candidate` is `candidate² <= n` without overflow.
    while candidate <= n / candidate {
        if n % candidate == 0 {
            return false;
        }
        candidate += 2;
    }
    true
}

/// Greatest common divisor of `|a|` and `|b|`. `gcd(0, 0)` is 0.
pub fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, `|a·b| / gcd(a, b)`.
///
/// Returns 0 when either input is 0, including `lcm(0, 0)`. The result is
/// `u128` because the product of two `i64` magnitudes does not fit in 64 bits.
pub fn lcm(a: i64, b: i64) -> u128 {
    if a == 0 || b == 0 {
        return 0;
    }
    let divisor = u128::from(gcd(a, b));
    u128::from(a.unsigned_abs()) / divisor * u128::from(b.unsigned_abs())
}

/// Result of [`power`].
#[derive(Debug, Clone, PartialEq)]
pub enum Power {
    /// Exact integer result of a non-negative exponent.
    Exact(BigInt),
    /// `1 / base^|exponent|` for a negative exponent.
    Fraction(f64),
}

impl Power {
    /// Lossy conversion to `f64`. Exact values too large for `f64` become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Power::Exact(value) => value.to_f64().unwrap_or(f64::NAN),
            Power::Fraction(value) => *value,
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Power::Exact(value) => write!(f, "{value}"),
            Power::Fraction(value) => write!(f, "{value}"),
        }
    }
}

const UNDERFLOW_EXPONENT: u64 = 1100;

/// Raise `base` to `exponent`, which may be negative.
///
/// Square-and-multiply, O(log |exponent|) multiplications. `power(x, 0)` is 1
/// for every `x`, including 0. Negative exponents past the `f64` underflow
/// range return a signed zero without building the exact denominator.
pub fn power(base: i64, exponent: i64) -> Result<Power> {
    if exponent >= 0 {
        return Ok(Power::Exact(pow_exact(base, exponent.unsigned_abs())));
    }
    if base == 0 {
        return Err(Error::ZeroToNegativePower);
    }
    let magnitude = exponent.unsigned_abs();
    let sign = if base < 0 && magnitude % 2 == 1 { -1.0 } else { 1.0 };
    if base.unsigned_abs() == 1 {
        return Ok(Power::Fraction(sign));
    }
    // 2^-1075 already rounds to zero.
    if magnitude > UNDERFLOW_EXPONENT {
        return Ok(Power::Fraction(sign * 0.0));
    }
    let denominator = pow_exact(base, magnitude);
    Ok(Power::Fraction(
        denominator.to_f64().map_or(0.0, |d| d.recip()),
    ))
}

fn pow_exact(base: i64, mut exponent: u64) -> BigInt {
    let mut base = BigInt::from(base);
    let mut result = BigInt::one();
    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= &base;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = &base * &base;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn factorial_small_values() {
        assert_eq!(factorial(0).unwrap(), BigUint::from(1u32));
        assert_eq!(factorial(1).unwrap(), BigUint::from(1u32));
        assert_eq!(factorial(5).unwrap(), BigUint::from(120u32));
        assert_eq!(factorial(10).unwrap(), BigUint::from(3_628_800u32));
    }

    #[test]
    fn factorial_beyond_u64() {
        let value = factorial(25).unwrap();
        assert_eq!(value.to_string(), "15511210043330985984000000");
    }

    #[test]
    fn factorial_recurrence() {
        for n in 1..40 {
            let expected = factorial(n - 1).unwrap() * BigUint::from(n as u64);
            assert_eq!(factorial(n).unwrap(), expected, "n = {n}");
        }
    }

    #[test]
    fn factorial_negative_is_domain_error() {
        let err = factorial(-1).unwrap_err();
        assert!(err.is_domain());
        assert!(matches!(
            err,
            Error::NegativeInput {
                function: "factorial",
                value: -1
            }
        ));
    }

    #[test]
    fn fibonacci_seed_values() {
        assert_eq!(fibonacci(0).unwrap(), BigUint::zero());
        assert_eq!(fibonacci(1).unwrap(), BigUint::one());
        assert_eq!(fibonacci(2).unwrap(), BigUint::one());
        assert_eq!(fibonacci(10).unwrap(), BigUint::from(55u32));
    }

    #[test]
    fn fibonacci_large_index() {
        assert_eq!(
            fibonacci(100).unwrap().to_string(),
            "354224848179261915075"
        );
    }

    #[test]
    fn fibonacci_recurrence() {
        for n in 0..60 {
            let sum = fibonacci(n).unwrap() + fibonacci(n + 1).unwrap();
            assert_eq!(sum, fibonacci(n + 2).unwrap(), "n = {n}");
        }
    }

    #[test]
    fn fibonacci_negative_is_domain_error() {
        assert!(matches!(
            fibonacci(-5),
            Err(Error::NegativeInput {
                function: "fibonacci",
                ..
            })
        ));
    }

    #[test]
    fn primes_below_thirty() {
        let primes: Vec<i64> = (-5..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn prime_squares_are_composite() {
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(!is_prime(7919 * 7919));
        assert!(is_prime(7919));
    }

    #[test]
    fn large_prime() {
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(2_147_483_649));
    }

    #[test]
    fn gcd_is_sign_normalized() {
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(-48, 18), 6);
        assert_eq!(gcd(48, -18), 6);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(i64::MIN, 0), 1u64 << 63);
    }

    #[test]
    fn lcm_values_and_zero_convention() {
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(-4, 6), 12);
        assert_eq!(lcm(0, 5), 0);
        assert_eq!(lcm(0, 0), 0);
    }

    #[test]
    fn gcd_times_lcm_is_abs_product() {
        for a in -20i64..=20 {
            for b in -20i64..=20 {
                if a == 0 || b == 0 {
                    continue;
                }
                let product = (i128::from(a) * i128::from(b)).unsigned_abs();
                assert_eq!(u128::from(gcd(a, b)) * lcm(a, b), product);
            }
        }
    }

    #[test]
    fn lcm_does_not_overflow() {
        assert_eq!(
            lcm(i64::MAX, i64::MAX - 1),
            i64::MAX as u128 * (i64::MAX - 1) as u128
        );
    }

    #[test]
    fn power_exact() {
        assert_eq!(power(2, 10).unwrap(), Power::Exact(BigInt::from(1024)));
        assert_eq!(power(-3, 3).unwrap(), Power::Exact(BigInt::from(-27)));
        assert_eq!(power(7, 0).unwrap(), Power::Exact(BigInt::one()));
        assert_eq!(power(0, 0).unwrap(), Power::Exact(BigInt::one()));
        assert_eq!(
            power(2, 100).unwrap().to_string(),
            "1267650600228229401496703205376"
        );
    }

    #[test]
    fn power_negative_exponent() {
        let Power::Fraction(value) = power(5, -2).unwrap() else {
            panic!("expected a fraction");
        };
        assert_relative_eq!(value, 0.04);
        assert_relative_eq!(power(-2, -3).unwrap().to_f64(), -0.125);
    }

    #[test]
    fn power_huge_negative_exponent_underflows() {
        assert_eq!(power(3, -1_000_000_000_000).unwrap(), Power::Fraction(0.0));
        let Power::Fraction(value) = power(-2, -1_000_001).unwrap() else {
            panic!("expected a fraction");
        };
        assert_eq!(value, 0.0);
        assert!(value.is_sign_negative());
        assert!(power(-2, -1_000_000).unwrap().to_f64().is_sign_positive());
        assert_eq!(power(2, i64::MIN).unwrap().to_f64(), 0.0);
    }

    #[test]
    fn power_unit_base_with_negative_exponent() {
        assert_eq!(power(1, -i64::MAX).unwrap(), Power::Fraction(1.0));
        assert_eq!(power(-1, -i64::MAX).unwrap(), Power::Fraction(-1.0));
        assert_eq!(power(-1, -4).unwrap(), Power::Fraction(1.0));
    }

    #[test]
    fn power_negative_exponent_near_underflow() {
        assert_relative_eq!(power(2, -1000).unwrap().to_f64(), 2f64.powi(-1000));
        assert_eq!(power(2, -1100).unwrap().to_f64(), 0.0);
    }

    #[test]
    fn zero_to_negative_power_fails() {
        let err = power(0, -1).unwrap_err();
        assert!(matches!(err, Error::ZeroToNegativePower));
        assert!(err.is_domain());
    }
}
