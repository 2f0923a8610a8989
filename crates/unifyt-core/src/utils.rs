//! Array helpers built on the public [Quantity] interface. Operands that
//! combine with a first quantity (stop, step, bounds, concatenated parts) are
//! converted into its unit first.

use crate::config::Tolerance;
use crate::error::UtilityError;
use crate::quantity::{IntoUnit, Quantity};
use ordered_float::OrderedFloat;

fn scalar_in(q: &Quantity, like: &Quantity) -> Result<f64, UtilityError> {
    Ok(q.to(like.unit())?.as_scalar()?)
}

fn nonempty<'a>(q: &'a Quantity, function: &'static str) -> Result<&'a [f64], UtilityError> {
    match q.values() {
        [] => Err(UtilityError::Empty(function)),
        values => Ok(values),
    }
}

fn too_many(function: &'static str, count: f64) -> UtilityError {
    UtilityError::InvalidArgument {
        function,
        reason: format!("{count} elements cannot be allocated"),
    }
}

fn with_values(like: &Quantity, values: Vec<f64>) -> Quantity {
    Quantity::from_parts(values, like.unit().clone())
}

fn with_scalar(like: &Quantity, value: f64) -> Quantity {
    Quantity::from_parts(value, like.unit().clone())
}

/// `num` evenly spaced values from `start` to `stop` inclusive, in `start`'s unit.
pub fn linspace(start: &Quantity, stop: &Quantity, num: usize) -> Result<Quantity, UtilityError> {
    let a = start.as_scalar()?;
    let b = scalar_in(stop, start)?;
    let values = match num {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let step = (b - a) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { b } else { a + step * i as f64 })
                .collect()
        }
    };
    Ok(with_values(start, values))
}

/// Values `start, start + step, …` strictly before `stop`, in `start`'s unit.
pub fn arange(start: &Quantity, stop: &Quantity, step: &Quantity) -> Result<Quantity, UtilityError> {
    let a = start.as_scalar()?;
    let b = scalar_in(stop, start)?;
    let s = scalar_in(step, start)?;
    if s == 0.0 || !s.is_finite() {
        return Err(UtilityError::InvalidArgument {
            function: "arange",
            reason: format!("step must be finite and non-zero, got {s}"),
        });
    }
    let count = ((b - a) / s).ceil();
    let count = match count {
        c if c.is_nan() || c <= 0.0 => 0,
        c if c < usize::MAX as f64 => c as usize,
        _ => return Err(too_many("arange", count)),
    };
    let mut values = Vec::new();
    values
        .try_reserve_exact(count)
        .map_err(|_| too_many("arange", count as f64))?;
    values.extend((0..count).map(|i| a + s * i as f64));
    Ok(with_values(start, values))
}

pub fn zeros(len: usize, unit: impl IntoUnit) -> Result<Quantity, UtilityError> {
    Ok(Quantity::new(vec![0.0; len], unit)?)
}

pub fn ones(len: usize, unit: impl IntoUnit) -> Result<Quantity, UtilityError> {
    Ok(Quantity::new(vec![1.0; len], unit)?)
}

/// `len` copies of a scalar quantity.
pub fn full(len: usize, fill: &Quantity) -> Result<Quantity, UtilityError> {
    Ok(with_values(fill, vec![fill.as_scalar()?; len]))
}

/// Join the elements of all parts into one array in the first part's unit.
pub fn concatenate(parts: &[Quantity]) -> Result<Quantity, UtilityError> {
    let (first, _) = parts.split_first().ok_or(UtilityError::Empty("concatenate"))?;
    let mut values = Vec::with_capacity(parts.iter().map(Quantity::len).sum());
    for part in parts {
        values.extend_from_slice(part.to(first.unit())?.values());
    }
    Ok(with_values(first, values))
}

/// Sum of the elements (0 for an empty array).
pub fn sum(q: &Quantity) -> Quantity {
    with_scalar(q, q.values().iter().sum())
}

pub fn mean(q: &Quantity) -> Result<Quantity, UtilityError> {
    let values = nonempty(q, "mean")?;
    Ok(with_scalar(q, values.iter().sum::<f64>() / values.len() as f64))
}

/// Population standard deviation.
pub fn std(q: &Quantity) -> Result<Quantity, UtilityError> {
    let values = nonempty(q, "std")?;
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok(with_scalar(q, var.sqrt()))
}

/// Smallest element. NaN orders above every number.
pub fn min(q: &Quantity) -> Result<Quantity, UtilityError> {
    let values = nonempty(q, "min")?;
    let m = values.iter().copied().map(OrderedFloat).min().unwrap_or_default();
    Ok(with_scalar(q, m.into_inner()))
}

/// Largest element. NaN orders above every number.
pub fn max(q: &Quantity) -> Result<Quantity, UtilityError> {
    let values = nonempty(q, "max")?;
    let m = values.iter().copied().map(OrderedFloat).max().unwrap_or_default();
    Ok(with_scalar(q, m.into_inner()))
}

pub fn sqrt(q: &Quantity) -> Quantity {
    q.sqrt()
}

/// Limit every element to `[lo, hi]` (bounds converted into `q`'s unit;
/// scalar or same-length arrays).
pub fn clip(q: &Quantity, lo: &Quantity, hi: &Quantity) -> Result<Quantity, UtilityError> {
    let lo = lo.to(q.unit())?;
    let hi = hi.to(q.unit())?;
    let clipped = q
        .magnitude()
        .zip_with(lo.magnitude(), f64::max)?
        .zip_with(hi.magnitude(), f64::min)?;
    Ok(Quantity::from_parts(clipped, q.unit().clone()))
}

/// All elements close under the default tolerance; false when the
/// dimensions differ.
pub fn isclose(a: &Quantity, b: &Quantity) -> bool {
    a.approx_eq(b, Tolerance::default())
}

pub fn isclose_with(a: &Quantity, b: &Quantity, tolerance: Tolerance) -> bool {
    a.approx_eq(b, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuantityError;
    use crate::quantity::Magnitude;
    use approx::assert_relative_eq;

    fn q(v: impl Into<Magnitude>, unit: &str) -> Quantity {
        Quantity::new(v, unit).unwrap()
    }

    #[test]
    fn linspace_converts_stop() {
        let r = linspace(&q(0.0, "m"), &q(1.0, "km"), 5).unwrap();
        assert_eq!(r.values(), &[0.0, 250.0, 500.0, 750.0, 1000.0]);
        assert_eq!(r.unit().to_string(), "m");
        assert_eq!(linspace(&q(3.0, "s"), &q(9.0, "s"), 1).unwrap().values(), &[3.0]);
        assert!(linspace(&q(3.0, "s"), &q(9.0, "s"), 0).unwrap().is_empty());
    }

    #[test]
    fn linspace_rejects_incompatible_stop() {
        assert!(matches!(
            linspace(&q(0.0, "m"), &q(1.0, "s"), 3),
            Err(UtilityError::Quantity(QuantityError::IncompatibleUnits { .. }))
        ));
    }

    #[test]
    fn arange_excludes_stop() {
        let r = arange(&q(0.0, "m"), &q(5.0, "m"), &q(100.0, "cm")).unwrap();
        assert_eq!(r.values(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        let down = arange(&q(3.0, "s"), &q(0.0, "s"), &q(-1.0, "s")).unwrap();
        assert_eq!(down.values(), &[3.0, 2.0, 1.0]);
        assert!(arange(&q(3.0, "s"), &q(0.0, "s"), &q(1.0, "s")).unwrap().is_empty());
    }

    #[test]
    fn arange_zero_step() {
        assert!(matches!(
            arange(&q(0.0, "s"), &q(1.0, "s"), &q(0.0, "s")),
            Err(UtilityError::InvalidArgument { function: "arange", .. })
        ));
    }

    #[test]
    fn arange_refuses_unallocatable_ranges() {
        for stop in [1e300, f64::INFINITY] {
            assert!(matches!(
                arange(&q(0.0, "m"), &q(stop, "m"), &q(1.0, "m")),
                Err(UtilityError::InvalidArgument { function: "arange", .. })
            ));
        }
        assert!(arange(&q(0.0, "m"), &q(f64::NAN, "m"), &q(1.0, "m")).unwrap().is_empty());
    }

    #[test]
    fn constructors() {
        assert_eq!(zeros(3, "kg").unwrap().values(), &[0.0; 3]);
        assert_eq!(ones(2, "m/s").unwrap().unit().to_string(), "m / s");
        let f = full(2, &q(9.81, "m/s^2")).unwrap();
        assert_eq!(f.values(), &[9.81, 9.81]);
        assert!(full(2, &q(vec![1.0, 2.0], "m")).is_err());
        assert!(zeros(1, "m/").is_err());
    }

    #[test]
    fn concatenate_in_first_unit() {
        let joined = concatenate(&[q(vec![1.0, 2.0], "m"), q(0.5, "km"), q(vec![30.0], "cm")]).unwrap();
        assert_eq!(joined.unit().to_string(), "m");
        assert_relative_eq!(joined.values()[2], 500.0);
        assert_relative_eq!(joined.values()[3], 0.3);
        assert_eq!(concatenate(&[]), Err(UtilityError::Empty("concatenate")));
        assert!(concatenate(&[q(1.0, "m"), q(1.0, "s")]).is_err());
    }

    #[test]
    fn reductions() {
        let xs = q(vec![1.0, 2.0, 3.0, 4.0], "m");
        assert_eq!(sum(&xs).value(), Some(10.0));
        assert_eq!(mean(&xs).unwrap().value(), Some(2.5));
        assert_relative_eq!(std(&xs).unwrap().value().unwrap(), 1.118_033_988_749_895, epsilon = 1e-12);
        assert_eq!(min(&xs).unwrap().value(), Some(1.0));
        assert_eq!(max(&xs).unwrap().value(), Some(4.0));
        assert_eq!(max(&xs).unwrap().unit(), xs.unit());
    }

    #[test]
    fn reductions_of_empty_arrays() {
        let empty = q(Vec::<f64>::new(), "m");
        assert_eq!(sum(&empty).value(), Some(0.0));
        assert_eq!(mean(&empty), Err(UtilityError::Empty("mean")));
        assert_eq!(std(&empty), Err(UtilityError::Empty("std")));
        assert_eq!(min(&empty), Err(UtilityError::Empty("min")));
        assert_eq!(max(&empty), Err(UtilityError::Empty("max")));
    }

    #[test]
    fn sqrt_halves_exponents() {
        let r = sqrt(&q(vec![4.0, 9.0], "m^2"));
        assert_eq!(r.values(), &[2.0, 3.0]);
        assert_eq!(r.unit().to_string(), "m");
    }

    #[test]
    fn clip_converts_bounds() {
        let c = clip(&q(vec![1.0, 5.0, 10.0], "m"), &q(200.0, "cm"), &q(0.008, "km")).unwrap();
        assert_eq!(c.values(), &[2.0, 5.0, 8.0]);
        let s = clip(&q(12.0, "m"), &q(0.0, "m"), &q(10.0, "m")).unwrap();
        assert_eq!(s.value(), Some(10.0));
    }

    #[test]
    fn isclose_variants() {
        assert!(isclose(&q(1.0, "km"), &q(1000.0, "m")));
        assert!(!isclose(&q(1.0, "km"), &q(1000.0, "s")));
        assert!(!isclose(&q(1.0, "m"), &q(1.01, "m")));
        assert!(isclose_with(&q(1.0, "m"), &q(1.01, "m"), Tolerance::new(0.02, 0.0)));
    }
}
