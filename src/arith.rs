//! Arithmetic in the residue ring `Z/MZ` for the prime modulus `M`.

use std::{fmt, ops};

use crate::Error;

/// Prime modulus of all arithmetic performed by the calculator.
///
/// `inverse` relies on the modulus being prime: only then every nonzero residue
/// has a multiplicative inverse.
pub const MODULUS: u64 = 1_234_577;

/// Integer in the canonical range `[0, MODULUS)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Residue(u64);

impl Residue {
    /// Additive identity.
    pub const ZERO: Self = Residue(0);
    /// Multiplicative identity.
    pub const ONE: Self = Residue(1);

    /// Creates a residue by reducing `value` modulo `MODULUS`.
    pub fn new(value: u64) -> Self {
        Residue(value % MODULUS)
    }

    /// Returns the canonical representative of this residue.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Reduces a decimal literal of arbitrary length, one digit at a time.
    ///
    /// `digits` must consist of ASCII digits only (which is what the lexer produces
    /// for `Number` tokens).
    pub fn from_decimal(digits: &str) -> Self {
        debug_assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        let value = digits.bytes().fold(0, |acc, digit| {
            (acc * 10 + u64::from(digit - b'0')) % MODULUS
        });
        Residue(value)
    }
}

impl From<u64> for Residue {
    fn from(value: u64) -> Self {
        Residue::new(value)
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, formatter)
    }
}

impl ops::Add for Residue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Residue((self.0 + rhs.0) % MODULUS)
    }
}

impl ops::Sub for Residue {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        reduce(self.0 as i64 - rhs.0 as i64)
    }
}

impl ops::Mul for Residue {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        mul(self, rhs)
    }
}

impl ops::Neg for Residue {
    type Output = Self;

    fn neg(self) -> Self {
        reduce(-(self.0 as i64))
    }
}

/// Maps an arbitrary integer to its representative in `[0, MODULUS)`.
pub fn reduce(x: i64) -> Residue {
    Residue(x.rem_euclid(MODULUS as i64) as u64)
}

/// Multiplies residues by doubling and adding, so that no intermediate value
/// exceeds `2 * MODULUS`.
pub fn mul(a: Residue, b: Residue) -> Residue {
    let (mut addend, mut multiplier) = (a.0, b.0);
    let mut result = 0;
    while multiplier > 0 {
        if multiplier & 1 == 1 {
            result = (result + addend) % MODULUS;
        }
        addend = (addend * 2) % MODULUS;
        multiplier >>= 1;
    }
    Residue(result)
}

/// Raises `base` to the power `exponent` by square-and-multiply.
///
/// The exponent is a plain counting number; `pow(x, 0)` is 1 for every `x`, including 0.
pub fn pow(base: Residue, exponent: u64) -> Residue {
    let (mut base, mut exponent) = (base, exponent);
    let mut result = Residue::ONE;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul(result, base);
        }
        base = mul(base, base);
        exponent >>= 1;
    }
    result
}

/// Computes the multiplicative inverse with the extended Euclidean algorithm.
///
/// # Errors
///
/// Returns `DivisionByZero` if `b` is 0.
pub fn inverse(b: Residue) -> Result<Residue, Error> {
    if b == Residue::ZERO {
        return Err(Error::DivisionByZero);
    }

    // Invariant: `t * b == r (mod MODULUS)` for both `(r, t)` pairs.
    let (mut r, mut next_r) = (MODULUS as i64, b.0 as i64);
    let (mut t, mut next_t) = (0_i64, 1_i64);
    while next_r != 0 {
        let quotient = r / next_r;
        let new_r = r - quotient * next_r;
        r = next_r;
        next_r = new_r;
        let new_t = t - quotient * next_t;
        t = next_t;
        next_t = new_t;
    }
    debug_assert_eq!(r, 1, "modulus is not prime");
    Ok(reduce(t))
}

/// Divides `a` by `b`, i.e., multiplies `a` by the inverse of `b`.
///
/// # Errors
///
/// Returns `DivisionByZero` if `b` is 0.
pub fn divide(a: Residue, b: Residue) -> Result<Residue, Error> {
    inverse(b).map(|b_inv| mul(a, b_inv))
}
