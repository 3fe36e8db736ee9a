//! Newton-Raphson approximation of `value^(1/n)`.

use crate::error::CalcError;

pub const DEFAULT_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Convergence knobs for [`nth_root_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// [`nth_root_with`] using the default tolerance and iteration cap.
///
/// # Errors
/// See [`nth_root_with`].
pub fn nth_root(value: f64, n: i32) -> Result<f64, CalcError> {
    nth_root_with(value, n, RootOptions::default())
}

/// Solve `x^n = value` by Newton-Raphson, starting from `value / n`.
///
/// Iterates `x' = ((n - 1) x + value / x^(n - 1)) / n` until two successive
/// guesses differ by less than `opts.tolerance` or `opts.max_iterations` is
/// reached, and returns the last guess. `value == 0` returns `0.0` directly
/// since the first step would divide by zero.
///
/// The `value / n` start is far below the root for tiny values, so the first
/// step overshoots to roughly `n^(n-2) / value^(n-2)` and each later step only
/// shrinks it by `(n - 1) / n`. Such inputs can exhaust the iteration cap
/// unconverged (`nth_root(1e-10, 10)` is around `1e42`), or overflow to
/// infinity when `(value / n)^(n - 1)` underflows (`nth_root(1e-300, 3)`).
///
/// # Errors
/// Returns [`CalcError::InvalidArgument`] for an even root of a negative
/// number, or when `n <= 0`.
pub fn nth_root_with(value: f64, n: i32, opts: RootOptions) -> Result<f64, CalcError> {
    if value < 0.0 && n % 2 == 0 {
        return Err(CalcError::invalid_argument("even root of negative number"));
    }
    if n <= 0 {
        return Err(CalcError::invalid_argument("root index must be positive"));
    }
    if value == 0.0 {
        return Ok(0.0);
    }

    let nf = f64::from(n);
    let mut x = value / nf;
    for _ in 0..opts.max_iterations {
        let prev = x;
        x = (nf - 1.0).mul_add(x, value / x.powi(n - 1)) / nf;
        if (x - prev).abs() < opts.tolerance {
            break;
        }
    }
    Ok(x)
}
