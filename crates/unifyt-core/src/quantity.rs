//! Quantity: magnitude (scalar or flat array) + unit. Arithmetic with
//! dimension checking and automatic conversion into the left operand's unit.

use crate::config::Tolerance;
use crate::dimension::{Dimension, Exponent};
use crate::error::{QuantityError, UnitError};
use crate::serialization::QuantityRecord;
use crate::unit::{pow, Unit};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric payload of a [Quantity]. Scalars broadcast against arrays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Magnitude {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Magnitude {
    pub fn is_array(&self) -> bool {
        matches!(self, Magnitude::Array(_))
    }

    /// Number of elements (1 for a scalar).
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Magnitude::Scalar(v) => std::slice::from_ref(v),
            Magnitude::Array(v) => v,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Magnitude {
        match self {
            Magnitude::Scalar(v) => Magnitude::Scalar(f(*v)),
            Magnitude::Array(v) => Magnitude::Array(v.iter().map(|x| f(*x)).collect()),
        }
    }

    /// Element-wise binary operation with scalar broadcasting.
    pub fn zip_with(
        &self,
        other: &Magnitude,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Magnitude, QuantityError> {
        use Magnitude::*;
        Ok(match (self, other) {
            (Scalar(a), Scalar(b)) => Scalar(f(*a, *b)),
            (Scalar(a), Array(b)) => Array(b.iter().map(|y| f(*a, *y)).collect()),
            (Array(a), Scalar(b)) => Array(a.iter().map(|x| f(*x, *b)).collect()),
            (Array(a), Array(b)) if a.len() == b.len() => {
                Array(a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect())
            }
            (Array(a), Array(b)) => {
                return Err(QuantityError::ShapeMismatch {
                    left: a.len(),
                    right: b.len(),
                })
            }
        })
    }

    /// True iff `pred` holds for every (broadcast) pair of elements.
    pub fn all_pairs(
        &self,
        other: &Magnitude,
        pred: impl Fn(f64, f64) -> bool,
    ) -> Result<bool, QuantityError> {
        let (a, b) = (self.as_slice(), other.as_slice());
        match (self, other) {
            (Magnitude::Array(_), Magnitude::Array(_)) if a.len() != b.len() => {
                Err(QuantityError::ShapeMismatch {
                    left: a.len(),
                    right: b.len(),
                })
            }
            (Magnitude::Scalar(x), _) => Ok(b.iter().all(|y| pred(*x, *y))),
            (_, Magnitude::Scalar(y)) => Ok(a.iter().all(|x| pred(*x, *y))),
            _ => Ok(a.iter().zip(b).all(|(x, y)| pred(*x, *y))),
        }
    }
}

impl From<f64> for Magnitude {
    fn from(v: f64) -> Self {
        Magnitude::Scalar(v)
    }
}

impl From<Vec<f64>> for Magnitude {
    fn from(v: Vec<f64>) -> Self {
        Magnitude::Array(v)
    }
}

impl From<&[f64]> for Magnitude {
    fn from(v: &[f64]) -> Self {
        Magnitude::Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Magnitude {
    fn from(v: [f64; N]) -> Self {
        Magnitude::Array(v.to_vec())
    }
}

fn fmt_number(f: &mut std::fmt::Formatter<'_>, x: f64) -> std::fmt::Result {
    match f.precision() {
        Some(p) => write!(f, "{x:.p$}"),
        None => write!(f, "{x}"),
    }
}

impl std::fmt::Display for Magnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Magnitude::Scalar(x) => fmt_number(f, *x),
            Magnitude::Array(xs) => {
                f.write_str("[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_number(f, *x)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Anything a quantity's unit can be built from: a parsed [Unit] or an
/// expression string.
pub trait IntoUnit {
    fn into_unit(self) -> Result<Unit, UnitError>;
}

impl IntoUnit for Unit {
    fn into_unit(self) -> Result<Unit, UnitError> {
        Ok(self)
    }
}

impl IntoUnit for &Unit {
    fn into_unit(self) -> Result<Unit, UnitError> {
        Ok(self.clone())
    }
}

impl IntoUnit for &str {
    fn into_unit(self) -> Result<Unit, UnitError> {
        Unit::parse(self)
    }
}

impl IntoUnit for String {
    fn into_unit(self) -> Result<Unit, UnitError> {
        Unit::parse(&self)
    }
}

impl IntoUnit for &String {
    fn into_unit(self) -> Result<Unit, UnitError> {
        Unit::parse(self)
    }
}

/// A physical quantity: numeric magnitude and unit. Immutable; every
/// operation returns a new value. Non-finite magnitudes are accepted
/// (see [Quantity::check_finite]).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "QuantityRecord", try_from = "QuantityRecord")]
pub struct Quantity {
    magnitude: Magnitude,
    unit: Unit,
}

impl Quantity {
    /// Build from a value and a unit (parsed immediately when given as a string).
    pub fn new(value: impl Into<Magnitude>, unit: impl IntoUnit) -> Result<Self, UnitError> {
        Ok(Self {
            magnitude: value.into(),
            unit: unit.into_unit()?,
        })
    }

    pub fn from_parts(magnitude: impl Into<Magnitude>, unit: Unit) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit,
        }
    }

    pub fn dimensionless(value: impl Into<Magnitude>) -> Self {
        Self::from_parts(value, Unit::dimensionless())
    }

    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn into_parts(self) -> (Magnitude, Unit) {
        (self.magnitude, self.unit)
    }

    /// The scalar value, or `None` for an array quantity.
    pub fn value(&self) -> Option<f64> {
        match self.magnitude {
            Magnitude::Scalar(v) => Some(v),
            Magnitude::Array(_) => None,
        }
    }

    /// The scalar value; error for an array quantity.
    pub fn as_scalar(&self) -> Result<f64, QuantityError> {
        self.value().ok_or_else(|| QuantityError::InvalidValue {
            reason: format!("expected a scalar, found an array of {}", self.len()),
        })
    }

    /// All elements (one for a scalar).
    pub fn values(&self) -> &[f64] {
        self.magnitude.as_slice()
    }

    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    pub fn is_array(&self) -> bool {
        self.magnitude.is_array()
    }

    /// Derived from the unit on every call.
    pub fn dimensionality(&self) -> Dimension {
        self.unit.dimensionality()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    pub fn is_compatible_with(&self, other: &Quantity) -> bool {
        self.unit.is_compatible_with(&other.unit)
    }

    /// Fail with `InvalidValue` if any element is NaN or infinite.
    pub fn check_finite(&self) -> Result<(), QuantityError> {
        match self.values().iter().find(|v| !v.is_finite()) {
            Some(v) => Err(QuantityError::InvalidValue {
                reason: format!("non-finite magnitude {v} in {}", self.unit),
            }),
            None => Ok(()),
        }
    }

    fn incompatible(&self, other: &Unit, operation: &'static str) -> QuantityError {
        QuantityError::IncompatibleUnits {
            left: self.unit.to_string(),
            right: other.to_string(),
            operation,
        }
    }

    /// Convert to `target`; same dimension required. Linear only.
    pub fn to(&self, target: impl IntoUnit) -> Result<Quantity, QuantityError> {
        let target = target.into_unit()?;
        self.convert_to(&target, "convert")
    }

    fn convert_to(&self, target: &Unit, operation: &'static str) -> Result<Quantity, QuantityError> {
        if !self.unit.is_compatible_with(target) {
            return Err(self.incompatible(target, operation));
        }
        let factor = self.unit.factor() / target.factor();
        Ok(Quantity::from_parts(
            self.magnitude.map(|v| v * factor),
            target.clone(),
        ))
    }

    /// Same quantity in SI base units (meter, kilogram, second, …).
    pub fn to_base_units(&self) -> Quantity {
        let base = self.unit.to_base_units();
        let factor = self.unit.factor() / base.factor();
        Quantity::from_parts(self.magnitude.map(|v| v * factor), base)
    }

    /// Affine conversion between kelvin, celsius, fahrenheit and rankine
    /// (offsets applied). Both units must be single temperature symbols.
    pub fn to_temperature(&self, target: impl IntoUnit) -> Result<Quantity, QuantityError> {
        let target = target.into_unit()?;
        let ((from_factor, from_offset), (to_factor, to_offset)) =
            match (self.unit.temperature_scale(), target.temperature_scale()) {
                (Some(from), Some(to)) => (from, to),
                _ => return Err(self.incompatible(&target, "convert temperature")),
            };
        Ok(Quantity::from_parts(
            self.magnitude
                .map(|v| (v + from_offset) * from_factor / to_factor - to_offset),
            target,
        ))
    }

    /// `other`'s magnitude expressed in this quantity's unit. `operation`
    /// names the failing operation in the error.
    fn aligned(&self, other: &Quantity, operation: &'static str) -> Result<Magnitude, QuantityError> {
        if !self.is_compatible_with(other) {
            return Err(self.incompatible(&other.unit, operation));
        }
        let factor = other.unit.factor() / self.unit.factor();
        Ok(other.magnitude.map(|v| v * factor))
    }

    /// Sum in the left operand's unit; dimensions must match.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let rhs = self.aligned(other, "add")?;
        let magnitude = self.magnitude.zip_with(&rhs, |a, b| a + b)?;
        Ok(Quantity::from_parts(magnitude, self.unit.clone()))
    }

    /// Difference in the left operand's unit; dimensions must match.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let rhs = self.aligned(other, "subtract")?;
        let magnitude = self.magnitude.zip_with(&rhs, |a, b| a - b)?;
        Ok(Quantity::from_parts(magnitude, self.unit.clone()))
    }

    fn require_dimensionless(&self, operation: &'static str) -> Result<(), QuantityError> {
        if self.is_dimensionless() {
            Ok(())
        } else {
            Err(QuantityError::DimensionedScalar {
                unit: self.unit.to_string(),
                operation,
            })
        }
    }

    /// `self + n`; only for dimensionless quantities.
    pub fn add_scalar(&self, n: f64) -> Result<Quantity, QuantityError> {
        self.require_dimensionless("add")?;
        Ok(Quantity::from_parts(self.magnitude.map(|v| v + n), self.unit.clone()))
    }

    /// `self - n`; only for dimensionless quantities.
    pub fn sub_scalar(&self, n: f64) -> Result<Quantity, QuantityError> {
        self.require_dimensionless("subtract")?;
        Ok(Quantity::from_parts(self.magnitude.map(|v| v - n), self.unit.clone()))
    }

    /// `n - self`; only for dimensionless quantities.
    pub fn rsub_scalar(&self, n: f64) -> Result<Quantity, QuantityError> {
        self.require_dimensionless("subtract")?;
        Ok(Quantity::from_parts(self.magnitude.map(|v| n - v), self.unit.clone()))
    }

    /// Product: values and units multiply. Fails only on array length mismatch.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let magnitude = self.magnitude.zip_with(&other.magnitude, |a, b| a * b)?;
        Ok(Quantity::from_parts(magnitude, self.unit.clone().mul(&other.unit)))
    }

    /// Quotient: values and units divide. Fails only on array length mismatch.
    #[allow(clippy::should_implement_trait)]
    pub fn div(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let magnitude = self.magnitude.zip_with(&other.magnitude, |a, b| a / b)?;
        Ok(Quantity::from_parts(magnitude, self.unit.clone().div(&other.unit)))
    }

    pub fn mul_scalar(&self, n: f64) -> Quantity {
        Quantity::from_parts(self.magnitude.map(|v| v * n), self.unit.clone())
    }

    pub fn div_scalar(&self, n: f64) -> Quantity {
        Quantity::from_parts(self.magnitude.map(|v| v / n), self.unit.clone())
    }

    /// `n / self`, in the reciprocal unit.
    pub fn rdiv_scalar(&self, n: f64) -> Quantity {
        Quantity::from_parts(self.magnitude.map(|v| n / v), self.unit.recip())
    }

    /// Raise value and unit to a rational power.
    pub fn power(&self, exponent: Exponent) -> Quantity {
        Quantity::from_parts(
            self.magnitude.map(|v| pow(v, exponent)),
            self.unit.clone().power(exponent),
        )
    }

    pub fn powi(&self, n: i32) -> Quantity {
        self.power(Exponent::from_integer(i64::from(n)))
    }

    pub fn sqrt(&self) -> Quantity {
        self.power(Exponent::new(1, 2))
    }

    pub fn abs(&self) -> Quantity {
        Quantity::from_parts(self.magnitude.map(f64::abs), self.unit.clone())
    }

    /// Equal within `tolerance` after converting `other` into this unit.
    /// Incompatible dimensions or array lengths give `false`, not an error.
    pub fn approx_eq(&self, other: &Quantity, tolerance: Tolerance) -> bool {
        let Ok(rhs) = self.aligned(other, "compare") else {
            return false;
        };
        self.magnitude
            .all_pairs(&rhs, |a, b| tolerance.is_close(a, b))
            .unwrap_or(false)
    }

    fn compare(
        &self,
        other: &Quantity,
        pred: impl Fn(f64, f64) -> bool,
    ) -> Result<bool, QuantityError> {
        let rhs = self.aligned(other, "compare")?;
        self.magnitude.all_pairs(&rhs, pred)
    }

    /// `self < other` for every element. Fails on incompatible dimensions.
    pub fn lt(&self, other: &Quantity) -> Result<bool, QuantityError> {
        self.compare(other, |a, b| a < b)
    }

    /// `self <= other` for every element, where "equal" means within the
    /// default tolerance.
    pub fn le(&self, other: &Quantity) -> Result<bool, QuantityError> {
        let tol = Tolerance::default();
        self.compare(other, |a, b| a < b || tol.is_close(a, b))
    }

    pub fn gt(&self, other: &Quantity) -> Result<bool, QuantityError> {
        self.compare(other, |a, b| a > b)
    }

    pub fn ge(&self, other: &Quantity) -> Result<bool, QuantityError> {
        let tol = Tolerance::default();
        self.compare(other, |a, b| a > b || tol.is_close(a, b))
    }
}

/// Approximate equality with [Tolerance::default] (rtol 1e-5, atol 1e-8).
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, Tolerance::default())
    }
}

impl Add for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity::add(self, rhs)
    }
}

impl Sub for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn sub(self, rhs: Self) -> Self::Output {
        Quantity::sub(self, rhs)
    }
}

impl Mul for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn mul(self, rhs: Self) -> Self::Output {
        Quantity::mul(self, rhs)
    }
}

impl Div for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn div(self, rhs: Self) -> Self::Output {
        Quantity::div(self, rhs)
    }
}

impl Add<f64> for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_scalar(rhs)
    }
}

impl Sub<f64> for &Quantity {
    type Output = Result<Quantity, QuantityError>;

    fn sub(self, rhs: f64) -> Self::Output {
        self.sub_scalar(rhs)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.mul_scalar(rhs)
    }
}

impl Div<f64> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        self.div_scalar(rhs)
    }
}

impl Mul<&Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        rhs.mul_scalar(self)
    }
}

impl Div<&Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        rhs.rdiv_scalar(self)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::from_parts(self.magnitude.map(|v| -v), self.unit.clone())
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        -&self
    }
}

impl std::fmt::Display for Quantity {
    /// `"{magnitude} {unit}"`; a precision (`{:.3}`) applies to every element.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.magnitude, f)?;
        write!(f, " {}", self.unit)
    }
}
