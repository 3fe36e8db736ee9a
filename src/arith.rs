//! Integer and floating-point arithmetic behind the basic and advanced menus.
//!
//! Integer operations use `i32` with two's-complement wraparound; nothing here
//! checks for overflow.

use crate::error::CalcError;

pub const fn add(x: i32, y: i32) -> i32 {
    x.wrapping_add(y)
}

pub const fn subtract(x: i32, y: i32) -> i32 {
    x.wrapping_sub(y)
}

pub const fn multiply(x: i32, y: i32) -> i32 {
    x.wrapping_mul(y)
}

/// Integer division, truncating toward zero.
///
/// # Errors
/// Returns [`CalcError::DivisionByZero`] when `y == 0`.
pub const fn divide(x: i32, y: i32) -> Result<i32, CalcError> {
    if y == 0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(x.wrapping_div(y))
}

/// Remainder consistent with [`divide`]: `divide(x, y) * y + remainder(x, y) == x`.
///
/// # Errors
/// Returns [`CalcError::DivisionByZero`] when `y == 0`.
pub const fn remainder(x: i32, y: i32) -> Result<i32, CalcError> {
    if y == 0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(x.wrapping_rem(y))
}

/// Render `x / y` as `"{x} / {y} = {quotient} R {remainder}"`.
///
/// The zero-divisor case is an `Err` whose [`CalcError::user_message`] is
/// `Error: Division by zero`; the session stores that text as the result.
///
/// # Errors
/// Returns [`CalcError::DivisionByZero`] when `y == 0`.
pub fn divide_with_remainder(x: i32, y: i32) -> Result<String, CalcError> {
    let quotient = divide(x, y)?;
    let rem = remainder(x, y)?;
    Ok(format!("{x} / {y} = {quotient} R {rem}"))
}

/// `base` raised to `exponent`. A negative base with a fractional exponent is NaN.
pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn basic_operations() {
        assert_eq!(add(5, 3), 8);
        assert_eq!(subtract(5, 3), 2);
        assert_eq!(multiply(5, 3), 15);
        assert_eq!(divide(17, 5).unwrap(), 3);
    }

    #[test]
    fn integer_ops_wrap_on_overflow() {
        assert_eq!(add(i32::MAX, 1), i32::MIN);
        assert_eq!(subtract(i32::MIN, 1), i32::MAX);
        assert_eq!(multiply(i32::MAX, 2), -2);
        assert_eq!(divide(i32::MIN, -1).unwrap(), i32::MIN);
    }

    #[test]
    fn divide_truncates_toward_zero() {
        assert_eq!(divide(-7, 2).unwrap(), -3);
        assert_eq!(remainder(-7, 2).unwrap(), -1);
        assert_eq!(divide(7, -2).unwrap(), -3);
        assert_eq!(remainder(7, -2).unwrap(), 1);
    }

    #[test]
    fn quotient_and_remainder_reconstruct_dividend() {
        for x in [-100, -17, -1, 0, 1, 13, 17, 99, i32::MAX, i32::MIN + 1] {
            for y in [-7, -3, -1, 1, 2, 5, 11] {
                let q = divide(x, y).unwrap();
                let r = remainder(x, y).unwrap();
                assert_eq!(q * y + r, x, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn divide_by_zero_fails() {
        for x in [-5, 0, 42, i32::MAX] {
            assert_eq!(divide(x, 0), Err(CalcError::DivisionByZero));
            assert_eq!(remainder(x, 0), Err(CalcError::DivisionByZero));
        }
    }

    #[test]
    fn divide_with_remainder_formats() {
        assert_eq!(divide_with_remainder(17, 5).unwrap(), "17 / 5 = 3 R 2");
        assert_eq!(divide_with_remainder(-17, 5).unwrap(), "-17 / 5 = -3 R -2");
    }

    #[test]
    fn divide_with_remainder_zero_keeps_error_text() {
        let err = divide_with_remainder(17, 0).unwrap_err();
        assert_eq!(err.user_message(), "Error: Division by zero");
    }

    #[test]
    fn power_delegates_to_powf() {
        assert_eq!(power(2.0, 10.0), 1024.0);
        assert_eq!(power(9.0, 0.5), 3.0);
        assert!(power(-8.0, 0.5).is_nan());
    }
}
