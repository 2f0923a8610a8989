//! Dimensions: powers of the seven SI base quantities, with rational exponents.
//! Used to check that addition/subtraction and conversion only happen between
//! dimensionally compatible units.

use num_rational::Ratio;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Rational exponent for dimensions (and unit components).
pub type Exponent = Ratio<i64>;

fn widen(e: Exponent) -> Ratio<i128> {
    Ratio::new_raw(i128::from(*e.numer()), i128::from(*e.denom()))
}

fn narrow(r: Ratio<i128>) -> Option<Exponent> {
    Some(Ratio::new_raw(
        i64::try_from(*r.numer()).ok()?,
        i64::try_from(*r.denom()).ok()?,
    ))
}

/// `a + b`, or `None` when the reduced result does not fit an [Exponent].
pub(crate) fn checked_add(a: Exponent, b: Exponent) -> Option<Exponent> {
    narrow(widen(a) + widen(b))
}

/// `a * b`, or `None` when the reduced result does not fit an [Exponent].
pub(crate) fn checked_mul(a: Exponent, b: Exponent) -> Option<Exponent> {
    narrow(widen(a) * widen(b))
}

/// The seven SI base quantities, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    Luminosity,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::Luminosity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseDimension::Length => "length",
            BaseDimension::Mass => "mass",
            BaseDimension::Time => "time",
            BaseDimension::Current => "current",
            BaseDimension::Temperature => "temperature",
            BaseDimension::Amount => "amount",
            BaseDimension::Luminosity => "luminosity",
        }
    }

    /// Name of the SI base unit for this quantity (target of `to_base_units`).
    pub fn base_unit(self) -> &'static str {
        match self {
            BaseDimension::Length => "meter",
            BaseDimension::Mass => "kilogram",
            BaseDimension::Time => "second",
            BaseDimension::Current => "ampere",
            BaseDimension::Temperature => "kelvin",
            BaseDimension::Amount => "mole",
            BaseDimension::Luminosity => "candela",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Seven rational exponents, one per [BaseDimension]. A zero exponent is the
/// same as an absent one; equality is exact (rationals do not drift).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Dimension([Exponent; 7]);

impl Dimension {
    /// Dimensionless (all exponents zero).
    pub fn dimensionless() -> Self {
        Self([Exponent::from_integer(0); 7])
    }

    pub fn new(
        length: Exponent,
        mass: Exponent,
        time: Exponent,
        current: Exponent,
        temperature: Exponent,
        amount: Exponent,
        luminosity: Exponent,
    ) -> Self {
        Self([length, mass, time, current, temperature, amount, luminosity])
    }

    /// From integer exponents in canonical order (used by the static unit table).
    pub fn from_integers(exponents: [i8; 7]) -> Self {
        let mut out = Self::dimensionless();
        for (slot, e) in out.0.iter_mut().zip(exponents) {
            *slot = Exponent::from_integer(i64::from(e));
        }
        out
    }

    /// Single base quantity with exponent 1.
    pub fn base(dim: BaseDimension) -> Self {
        Self::dimensionless().with(dim, Exponent::from_integer(1))
    }

    /// Copy with one exponent replaced.
    pub fn with(mut self, dim: BaseDimension, exponent: Exponent) -> Self {
        self.0[dim.index()] = exponent;
        self
    }

    pub fn get(&self, dim: BaseDimension) -> Exponent {
        self.0[dim.index()]
    }

    pub fn length(&self) -> Exponent {
        self.get(BaseDimension::Length)
    }

    pub fn mass(&self) -> Exponent {
        self.get(BaseDimension::Mass)
    }

    pub fn time(&self) -> Exponent {
        self.get(BaseDimension::Time)
    }

    pub fn current(&self) -> Exponent {
        self.get(BaseDimension::Current)
    }

    pub fn temperature(&self) -> Exponent {
        self.get(BaseDimension::Temperature)
    }

    pub fn amount(&self) -> Exponent {
        self.get(BaseDimension::Amount)
    }

    pub fn luminosity(&self) -> Exponent {
        self.get(BaseDimension::Luminosity)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| *e == Exponent::from_integer(0))
    }

    /// Non-zero components in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BaseDimension, Exponent)> + '_ {
        BaseDimension::ALL
            .into_iter()
            .map(|d| (d, self.get(d)))
            .filter(|(_, e)| *e != Exponent::from_integer(0))
    }

    /// Raise to a rational power: every exponent multiplied by `factor`.
    pub fn scale(&self, factor: Exponent) -> Self {
        let mut out = *self;
        for e in out.0.iter_mut() {
            *e *= factor;
        }
        out
    }
}

impl Dimension {
    /// [scale](Self::scale) that reports exponent overflow instead of panicking.
    pub fn checked_scale(&self, factor: Exponent) -> Option<Self> {
        let mut out = *self;
        for e in out.0.iter_mut() {
            *e = checked_mul(*e, factor)?;
        }
        Some(out)
    }

    /// Dimension of a product, or `None` on exponent overflow.
    pub fn checked_add(mut self, rhs: Dimension) -> Option<Self> {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a = checked_add(*a, b)?;
        }
        Some(self)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::dimensionless()
    }
}

/// Dimension of a product.
impl Add for Dimension {
    type Output = Dimension;

    fn add(mut self, rhs: Dimension) -> Dimension {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
        self
    }
}

/// Dimension of a quotient.
impl Sub for Dimension {
    type Output = Dimension;

    fn sub(mut self, rhs: Dimension) -> Dimension {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
        self
    }
}

impl Mul<Exponent> for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Exponent) -> Dimension {
        self.scale(rhs)
    }
}

impl Neg for Dimension {
    type Output = Dimension;

    fn neg(self) -> Dimension {
        self.scale(Exponent::from_integer(-1))
    }
}

impl std::iter::Sum for Dimension {
    fn sum<I: Iterator<Item = Dimension>>(iter: I) -> Self {
        iter.fold(Dimension::dimensionless(), Add::add)
    }
}

/// Render an exponent for `^` suffixes: integers bare, fractions parenthesized
/// so that `m^(1/2)` never reads as a division.
pub(crate) fn format_exponent(e: Exponent) -> String {
    if e.is_integer() {
        e.to_integer().to_string()
    } else {
        format!("({}/{})", e.numer(), e.denom())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("dimensionless");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(d, e)| {
                if e == Exponent::from_integer(1) {
                    d.name().to_string()
                } else {
                    format!("{}^{}", d.name(), format_exponent(e))
                }
            })
            .collect();
        write!(f, "{}", parts.join(" * "))
    }
}
