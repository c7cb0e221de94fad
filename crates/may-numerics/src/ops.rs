//! Free-function numeric primitives: `add, sub, mul, div, neg, abs, conj,
//! pow, cmp, gcd, lcm, smod, min, max` plus the mandatory `num_simplify`
//! step (§4.2).
//!
//! Every function here mirrors one line of the §4.2 contract list. Binary
//! real operations promote both operands to the higher of the two
//! [`Level`](crate::Level)s (Integer < Rational < Float) before doing the
//! native `rug` operation, then run the result back through
//! [`num_simplify`] so a `Rational` that happens to reduce to an integer
//! (or a `Complex` whose imaginary part cancelled to zero) collapses
//! immediately, per "The `num_simplify` step is mandatory before sealing a
//! numeric into the DAG."

use std::cmp::Ordering;

use rug::ops::Pow as _;
use rug::{Float, Integer, Rational};

use crate::dummy::Dest;
use crate::error::NumericError;
use crate::{DEFAULT_PRECISION, Level, Numeric};

/// Collapse a freshly computed value into its canonical leaf: `Rational`
/// with unit denominator becomes `Integer`; `Complex` with zero imaginary
/// part becomes its real part. Mandatory before installing any numeric
/// result into the DAG.
#[must_use]
pub fn num_simplify(n: Numeric) -> Numeric {
    match n {
        Numeric::Rational(r) => {
            if *r.denom() == 1 {
                Numeric::Integer(r.numer().clone())
            } else {
                Numeric::Rational(r)
            }
        }
        Numeric::Complex(re, im) => {
            if im.is_zero() {
                *re
            } else {
                Numeric::Complex(re, im)
            }
        }
        other => other,
    }
}

fn common_level(a: &Numeric, b: &Numeric) -> Option<Level> {
    Some(std::cmp::max(a.level()?, b.level()?))
}

fn as_integer(n: &Numeric) -> Option<&Integer> {
    match n {
        Numeric::Integer(i) => Some(i),
        _ => None,
    }
}

fn as_rational(n: &Numeric) -> Option<&Rational> {
    match n {
        Numeric::Rational(r) => Some(r),
        _ => None,
    }
}

fn as_float(n: &Numeric) -> Option<&Float> {
    match n {
        Numeric::Float(f) => Some(f),
        _ => None,
    }
}

/// Apply a real binary op after promoting both operands to at least
/// `min_level`. `Complex` operands are never passed here; callers dispatch
/// those themselves first.
fn real_binop_at(
    a: &Numeric,
    b: &Numeric,
    min_level: Level,
    int_op: impl FnOnce(&Integer, &Integer) -> Integer,
    rat_op: impl FnOnce(&Rational, &Rational) -> Rational,
    float_op: impl FnOnce(&Float, &Float) -> Float,
) -> Option<Numeric> {
    let level = std::cmp::max(common_level(a, b)?, min_level);
    let pa = a.to_level(level);
    let pb = b.to_level(level);
    let raw = match level {
        Level::Integer => Numeric::Integer(int_op(as_integer(&pa)?, as_integer(&pb)?)),
        Level::Rational => Numeric::Rational(rat_op(as_rational(&pa)?, as_rational(&pb)?)),
        Level::Float => Numeric::Float(float_op(as_float(&pa)?, as_float(&pb)?)),
    };
    Some(num_simplify(raw))
}

/// Apply a real binary op after promoting both operands to a common level.
fn real_binop(
    a: &Numeric,
    b: &Numeric,
    int_op: impl FnOnce(&Integer, &Integer) -> Integer,
    rat_op: impl FnOnce(&Rational, &Rational) -> Rational,
    float_op: impl FnOnce(&Float, &Float) -> Float,
) -> Numeric {
    real_binop_at(a, b, Level::Integer, int_op, rat_op, float_op)
        .expect("real_binop is only ever called with two non-Complex operands")
}

/// `a + b`.
#[must_use]
pub fn add(a: &Numeric, b: &Numeric) -> Numeric {
    match (a, b) {
        (Numeric::Complex(are, aim), Numeric::Complex(bre, bim)) => {
            Numeric::complex(add(are, bre), add(aim, bim))
        }
        (Numeric::Complex(are, aim), other) | (other, Numeric::Complex(are, aim)) => {
            Numeric::complex(add(are, other), (**aim).clone())
        }
        _ => real_binop(
            a,
            b,
            |x, y| (x + y).into(),
            |x, y| (x + y).into(),
            |x, y| x.clone() + y,
        ),
    }
}

/// `a - b`.
#[must_use]
pub fn sub(a: &Numeric, b: &Numeric) -> Numeric {
    add(a, &neg(b, Dest::Dummy))
}

/// `-a`.
#[must_use]
pub fn neg(a: &Numeric, dest: Dest<'_>) -> Numeric {
    let raw = match a {
        Numeric::Integer(i) => Numeric::Integer(-i.clone()),
        Numeric::Rational(r) => Numeric::Rational(-r.clone()),
        Numeric::Float(f) => Numeric::Float(-f.clone()),
        Numeric::Complex(re, im) => Numeric::complex(neg(re, Dest::Dummy), neg(im, Dest::Dummy)),
    };
    dest.place(raw)
}

/// `a * b`.
#[must_use]
pub fn mul(a: &Numeric, b: &Numeric) -> Numeric {
    match (a, b) {
        (Numeric::Complex(are, aim), Numeric::Complex(bre, bim)) => {
            // (are + i aim)(bre + i bim) = (are*bre - aim*bim) + i(are*bim + aim*bre)
            let re = sub(&mul(are, bre), &mul(aim, bim));
            let im = add(&mul(are, bim), &mul(aim, bre));
            Numeric::complex(re, im)
        }
        (Numeric::Complex(re, im), other) | (other, Numeric::Complex(re, im)) => {
            Numeric::complex(mul(re, other), mul(im, other))
        }
        _ => real_binop(
            a,
            b,
            |x, y| (x * y).into(),
            |x, y| (x * y).into(),
            |x, y| x.clone() * y,
        ),
    }
}

/// `a / b`. `Err(DivisionByZero)` when `b` is exactly zero.
///
/// Division is field division: two `Integer`s promote at least to
/// `Rational` rather than using `rug`'s truncating integer division.
/// Euclidean division lives one layer up, in `divexact`.
///
/// # Errors
/// Returns [`NumericError::DivisionByZero`] if `b` is zero.
pub fn div(a: &Numeric, b: &Numeric) -> Result<Numeric, NumericError> {
    if b.is_zero() {
        return Err(NumericError::DivisionByZero);
    }
    let result = match (a, b) {
        (_, Numeric::Complex(bre, bim)) => {
            // a / (bre + i bim) = a * conj(b) / |b|^2
            let denom = add(&mul(bre, bre), &mul(bim, bim));
            let numerator = mul(a, &conj(b));
            let Numeric::Complex(nre, nim) = numerator else {
                return div(&numerator, &denom);
            };
            Numeric::complex(div(&nre, &denom)?, div(&nim, &denom)?)
        }
        (Numeric::Complex(are, aim), other) => {
            Numeric::complex(div(are, other)?, div(aim, other)?)
        }
        _ => real_binop_at(
            a,
            b,
            Level::Rational,
            |_, _| Integer::new(),
            |x, y| (x / y).into(),
            |x, y| x.clone() / y,
        )
        .ok_or(NumericError::CannotBeConverted("real division"))?,
    };
    Ok(result)
}

/// `|a|`. For `Complex`, the Euclidean norm as a fresh `Float`.
#[must_use]
pub fn abs(a: &Numeric) -> Numeric {
    match a {
        Numeric::Integer(i) => Numeric::Integer(i.clone().abs()),
        Numeric::Rational(r) => Numeric::Rational(r.clone().abs()),
        Numeric::Float(f) => Numeric::Float(f.clone().abs()),
        Numeric::Complex(re, im) => {
            let re_f = Float::with_val(DEFAULT_PRECISION, re.to_f64_approx());
            let im_f = Float::with_val(DEFAULT_PRECISION, im.to_f64_approx());
            Numeric::Float(re_f.hypot(&im_f))
        }
    }
}

/// Complex conjugate; the identity on any real leaf.
#[must_use]
pub fn conj(a: &Numeric) -> Numeric {
    match a {
        Numeric::Complex(re, im) => Numeric::complex((**re).clone(), neg(im, Dest::Dummy)),
        other => other.clone(),
    }
}

/// `min(a, b)` under [`cmp`]; `None` if incomparable.
#[must_use]
pub fn min<'a>(a: &'a Numeric, b: &'a Numeric) -> Option<&'a Numeric> {
    match cmp(a, b)? {
        Ordering::Greater => Some(b),
        Ordering::Less | Ordering::Equal => Some(a),
    }
}

/// `max(a, b)` under [`cmp`]; `None` if incomparable.
#[must_use]
pub fn max<'a>(a: &'a Numeric, b: &'a Numeric) -> Option<&'a Numeric> {
    match cmp(a, b)? {
        Ordering::Less => Some(b),
        Ordering::Greater | Ordering::Equal => Some(a),
    }
}

/// Total order over two real values; `Complex` values compare `Equal` only
/// when both components match, and are otherwise incomparable (`None`) —
/// ordering complex numbers is exactly what §4.4.6's sign convention exists
/// to avoid needing.
#[must_use]
pub fn cmp(a: &Numeric, b: &Numeric) -> Option<Ordering> {
    match (a, b) {
        (Numeric::Complex(are, aim), Numeric::Complex(bre, bim)) => {
            if are == bre && aim == bim {
                Some(Ordering::Equal)
            } else {
                None
            }
        }
        (Numeric::Complex(..), _) | (_, Numeric::Complex(..)) => None,
        _ => {
            let level = common_level(a, b)?;
            let pa = a.to_level(level);
            let pb = b.to_level(level);
            match level {
                Level::Integer => Some(as_integer(&pa)?.cmp(as_integer(&pb)?)),
                Level::Rational => Some(as_rational(&pa)?.cmp(as_rational(&pb)?)),
                Level::Float => as_float(&pa)?.partial_cmp(as_float(&pb)?),
            }
        }
    }
}

/// Integer/rational/Gaussian-integer GCD (§4.2, used directly by the GCD
/// engine's content pass and by heuristic-GCD's evaluation-point lift).
///
/// # Errors
/// [`NumericError::NotAnInteger`] if either operand is a non-integer
/// `Float`; [`NumericError::CannotBeConverted`] for a `Complex` operand
/// whose components are not both plain integers (Gaussian-integer `gcd` is
/// only implemented for that case).
pub fn gcd(a: &Numeric, b: &Numeric) -> Result<Numeric, NumericError> {
    match (a, b) {
        (Numeric::Integer(x), Numeric::Integer(y)) => Ok(Numeric::Integer(x.clone().gcd(y))),
        (Numeric::Rational(x), Numeric::Rational(y)) => {
            // gcd(p/q, r/s) = gcd(p*s, r*q) / (q*s), the standard
            // polynomial-content generalisation of integer gcd to
            // rationals used when collecting coefficient contents.
            let num =
                Integer::from(x.numer() * y.denom()).gcd(&Integer::from(y.numer() * x.denom()));
            let den = Integer::from(x.denom() * y.denom());
            Ok(num_simplify(Numeric::Rational(Rational::from((num, den)))))
        }
        (Numeric::Complex(are, aim), Numeric::Complex(bre, bim)) => {
            gaussian_gcd(are, aim, bre, bim)
        }
        (Numeric::Float(_), _) | (_, Numeric::Float(_)) => Err(NumericError::NotAnInteger),
        _ => {
            let level = common_level(a, b)
                .ok_or(NumericError::CannotBeConverted("mixed real/complex gcd"))?;
            gcd(&a.to_level(level), &b.to_level(level))
        }
    }
}

fn as_plain_integer(n: &Numeric) -> Option<&Integer> {
    match n {
        Numeric::Integer(i) => Some(i),
        _ => None,
    }
}

fn gaussian_gcd(
    are: &Numeric,
    aim: &Numeric,
    bre: &Numeric,
    bim: &Numeric,
) -> Result<Numeric, NumericError> {
    let (mut are, mut aim, mut bre, mut bim) = (
        as_plain_integer(are)
            .ok_or(NumericError::CannotBeConverted("non-integer Gaussian gcd"))?
            .clone(),
        as_plain_integer(aim)
            .ok_or(NumericError::CannotBeConverted("non-integer Gaussian gcd"))?
            .clone(),
        as_plain_integer(bre)
            .ok_or(NumericError::CannotBeConverted("non-integer Gaussian gcd"))?
            .clone(),
        as_plain_integer(bim)
            .ok_or(NumericError::CannotBeConverted("non-integer Gaussian gcd"))?
            .clone(),
    );
    // Euclidean algorithm on Gaussian integers: repeatedly divide the
    // larger-norm value by the smaller, rounding the quotient to the
    // nearest Gaussian integer, until the remainder is zero.
    while bre.clone().abs() != 0 || bim.clone().abs() != 0 {
        let norm_b = Integer::from(&bre * &bre) + Integer::from(&bim * &bim);
        let num_re = Integer::from(&are * &bre) + Integer::from(&aim * &bim);
        let num_im = Integer::from(&aim * &bre) - Integer::from(&are * &bim);
        let q_re = round_div(&num_re, &norm_b);
        let q_im = round_div(&num_im, &norm_b);
        let r_re = &are - (&q_re * &bre - &q_im * &bim);
        let r_im = &aim - (&q_re * &bim + &q_im * &bre);
        are = bre;
        aim = bim;
        bre = r_re;
        bim = r_im;
    }
    Ok(Numeric::complex(Numeric::Integer(are), Numeric::Integer(aim)))
}

/// Round `n / d` to the nearest integer (ties away from zero), exactly.
fn round_div(n: &Integer, d: &Integer) -> Integer {
    let approx = Rational::from((n.clone(), d.clone()));
    let floor = approx.clone().floor().numer().clone();
    let frac = approx - Rational::from(floor.clone());
    if frac >= Rational::from((1, 2)) {
        floor + 1
    } else {
        floor
    }
}

/// `lcm(a, b) = |a*b| / gcd(a, b)`.
///
/// # Errors
/// Propagates [`gcd`]'s errors; additionally `Err(DivisionByZero)` is
/// impossible since `gcd(0, 0) = 0` is handled by returning `0` directly.
pub fn lcm(a: &Numeric, b: &Numeric) -> Result<Numeric, NumericError> {
    if a.is_zero() || b.is_zero() {
        return Ok(Numeric::zero());
    }
    let g = gcd(a, b)?;
    let product = abs(&mul(a, b));
    div(&product, &g)
}

/// Symmetric modulus: the unique `r` with `a ≡ r (mod n)` and
/// `-|n|/2 < r ≤ |n|/2` (`smod.c`). Used by heuristic GCD's evaluation-point
/// lift and directly exposed as a numeric op.
///
/// # Errors
/// [`NumericError::NotAnInteger`] unless both operands are `Integer`;
/// [`NumericError::DivisionByZero`] if `n` is zero.
pub fn smod(a: &Numeric, n: &Numeric) -> Result<Numeric, NumericError> {
    let (Numeric::Integer(a), Numeric::Integer(n)) = (a, n) else {
        return Err(NumericError::NotAnInteger);
    };
    if *n == 0 {
        return Err(NumericError::DivisionByZero);
    }
    let n_abs = n.clone().abs();
    let half = Rational::from((n_abs.clone(), 2));
    let mut r = a.clone().rem_euc(n_abs.clone());
    if Rational::from(r.clone()) > half {
        r -= &n_abs;
    }
    Ok(Numeric::Integer(r))
}

/// Opportunistic exact float-to-rational conversion (`rationalize.c`):
/// returns `Some` only when `f` is finite, which is always true for a
/// well-formed binary float but kept as an explicit, named boundary rather
/// than an implicit one so callers can choose when to pay for it.
#[must_use]
pub fn rationalize_float(f: &Float) -> Option<Numeric> {
    if !f.is_finite() {
        return None;
    }
    let r = Rational::from_f64(f.to_f64())?;
    Some(num_simplify(Numeric::Rational(r)))
}

/// Pure-numeric power. Returns `None` when the result cannot be
/// represented exactly as a `Numeric` (e.g. `2^(1/2)`) — the caller (the
/// evaluator's Power rule, §4.4.4) is responsible for leaving such cases as
/// a symbolic `Power` node instead.
#[must_use]
pub fn pow(base: &Numeric, exponent: &Numeric) -> Option<Numeric> {
    match (base, exponent) {
        (_, Numeric::Integer(e)) => pow_integer_exponent(base, e),
        (Numeric::Float(b), Numeric::Float(e)) => Some(Numeric::Float(b.clone().pow(e))),
        (Numeric::Float(b), Numeric::Rational(e)) => {
            let ef = Float::with_val(DEFAULT_PRECISION, e);
            Some(Numeric::Float(b.clone().pow(&ef)))
        }
        _ => None,
    }
}

fn pow_integer_exponent(base: &Numeric, e: &Integer) -> Option<Numeric> {
    if *e == 0 {
        return Some(Numeric::one());
    }
    let e_u32 = e.clone().abs().to_u32()?;
    let raw = match base {
        Numeric::Integer(b) => Numeric::Integer(b.clone().pow(e_u32)),
        Numeric::Rational(b) => Numeric::Rational(b.clone().pow(e_u32)),
        Numeric::Float(b) => Numeric::Float(b.clone().pow(e_u32)),
        Numeric::Complex(..) => return pow_complex_integer(base, e_u32),
    };
    if e.cmp0() == Ordering::Less {
        div(&Numeric::one(), &raw).ok()
    } else {
        Some(num_simplify(raw))
    }
}

fn pow_complex_integer(base: &Numeric, e_u32: u32) -> Option<Numeric> {
    let mut acc = Numeric::one();
    for _ in 0..e_u32 {
        acc = mul(&acc, base);
    }
    Some(acc)
}
