//! unifyt: dimensional analysis and unit conversion.
//!
//! Units are parsed from expressions such as `"kg * m / s^2"` or `"220 yard"`
//! into exponent maps over atomic symbols; dimensions are vectors of rational
//! exponents over the seven SI base quantities. [Quantity] pairs a scalar or
//! flat array magnitude with a unit and checks dimensions on every operation.
//!
//! ```
//! use unifyt_core::Quantity;
//!
//! let d = Quantity::new(100.0, "meter").unwrap();
//! let sum = d.add(&Quantity::new(1.0, "km").unwrap()).unwrap();
//! assert_eq!(sum.value(), Some(1100.0));
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod dimension;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod prefix;
pub mod quantity;
pub mod serialization;
pub mod suggest;
pub mod unit;
pub mod unit_registry;
pub mod unit_table;
pub mod utils;

pub use config::{Config, Tolerance};
pub use constants::{get_constant, list_constants};
pub use context::{current_system, with_unit_system, UnitContext, UnitSystemGuard};
pub use dimension::{BaseDimension, Dimension, Exponent};
pub use error::{
    ConfigError, ConstantError, ContextError, Error, QuantityError, RegistryError, Result,
    SerializationError, UnitError, UtilityError,
};
pub use quantity::{IntoUnit, Magnitude, Quantity};
pub use serialization::QuantityRecord;
pub use unit::Unit;
pub use unit_registry::UnitRegistry;

/// Convert a scalar `value` from one unit expression to another.
///
/// ```
/// assert_eq!(unifyt_core::convert(1000.0, "meter", "kilometer").unwrap(), 1.0);
/// ```
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64> {
    let q = Quantity::new(value, from)?;
    Ok(q.to(to)?.as_scalar()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE_UNITS: &[&str] = &[
        "meter",
        "km/h",
        "kg * m / s^2",
        "N * m",
        "kWh",
        "mile / gallon",
        "J / (mol * K)",
        "1 / s",
        "m^(1/2)",
        "220 yard",
        "psi",
        "GeV",
        "dimensionless",
        "ft^3",
        "uF * V",
    ];

    fn unit(s: &str) -> Unit {
        Unit::parse(s).unwrap()
    }

    #[test]
    fn base_unit_rendering_round_trips_dimension() {
        for s in SAMPLE_UNITS {
            let u = unit(s);
            let rendered = u.to_base_units().to_string();
            assert_eq!(
                unit(&rendered).dimensionality(),
                u.dimensionality(),
                "{s} -> {rendered}"
            );
        }
    }

    #[test]
    fn conversion_factors_are_transitive() {
        let groups: &[&[&str]] = &[
            &["m", "ft", "mile", "nmi", "angstrom"],
            &["J", "eV", "kcal", "BTU", "kWh"],
            &["m/s", "km/h", "mi/h", "knot"],
            &["Pa", "psi", "atm", "bar", "mmHg"],
        ];
        for group in groups {
            for a in *group {
                for b in *group {
                    for c in *group {
                        let (a, b, c) = (unit(a), unit(b), unit(c));
                        let via = a.conversion_factor_to(&b).unwrap()
                            * b.conversion_factor_to(&c).unwrap();
                        let direct = a.conversion_factor_to(&c).unwrap();
                        assert_relative_eq!(via, direct, max_relative = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn self_conversion_is_exactly_one() {
        for s in SAMPLE_UNITS {
            let u = unit(s);
            assert_eq!(u.conversion_factor_to(&u).unwrap(), 1.0, "{s}");
        }
    }

    #[test]
    fn quantity_round_trip_conversion() {
        let cases = [
            (3.5, "m", "ft"),
            (-40.0, "J", "eV"),
            (1e-9, "s", "year"),
            (72.0, "mi/h", "m/s"),
            (0.25, "L", "cm^3"),
        ];
        for (v, from, to) in cases {
            let q = Quantity::new(v, from).unwrap();
            let back = q.to(to).unwrap().to(q.unit()).unwrap();
            assert_relative_eq!(back.value().unwrap(), v, max_relative = 1e-12);
        }
    }

    #[test]
    fn headline_conversions() {
        assert_eq!(Quantity::new(1000.0, "meter").unwrap().to("kilometer").unwrap().value(), Some(1.0));
        assert_eq!(Quantity::new(60.0, "second").unwrap().to("minute").unwrap().value(), Some(1.0));
        assert_eq!(convert(1000.0, "meter", "kilometer").unwrap(), 1.0);
    }

    #[test]
    fn addition_result_takes_left_unit() {
        let m = Quantity::new(100.0, "meter").unwrap();
        let km = Quantity::new(1.0, "kilometer").unwrap();
        assert_eq!(m.add(&km).unwrap().value(), Some(1100.0));
        let half = Quantity::new(500.0, "meter").unwrap();
        let sum = km.add(&half).unwrap();
        assert_eq!(sum.value(), Some(1.5));
        assert_eq!(sum.unit().to_string(), "kilometer");
    }

    #[test]
    fn addition_of_different_dimensions_fails() {
        let m = Quantity::new(100.0, "meter").unwrap();
        let s = Quantity::new(10.0, "second").unwrap();
        assert!(matches!(
            m.add(&s),
            Err(QuantityError::IncompatibleUnits { operation: "add", .. })
        ));
        assert!(matches!(convert(1.0, "m", "s"), Err(Error::Quantity(_))));
        assert!(matches!(convert(1.0, "m/", "s"), Err(Error::Unit(_))));
    }

    #[test]
    fn velocity_dimensionality() {
        let d = unit("meter/second").dimensionality();
        assert_eq!(d.length(), Exponent::from_integer(1));
        assert_eq!(d.time(), Exponent::from_integer(-1));
        assert_eq!(d, Dimension::from_integers([1, 0, -1, 0, 0, 0, 0]));
    }

    #[test]
    fn furlong_is_220_yards() {
        let mut reg = UnitRegistry::new();
        reg.define("furlong", "220 yard").unwrap();
        let f = reg.get_unit("furlong").unwrap().conversion_factor_to(&unit("meter")).unwrap();
        assert_relative_eq!(f, 201.168, max_relative = 1e-12);
    }

    #[test]
    fn arrays_add_element_wise() {
        let a = Quantity::new(vec![1.0, 2.0, 3.0], "meter").unwrap();
        let b = Quantity::new(vec![4.0, 5.0, 6.0], "meter").unwrap();
        let sum = (&a + &b).unwrap();
        assert_eq!(sum.values(), &[5.0, 7.0, 9.0]);
        assert_eq!(sum.unit(), &unit("meter"));
    }

    #[test]
    fn isclose_tolerates_rounding_and_rejects_mismatch() {
        let a = Quantity::new(1.0, "meter").unwrap();
        assert!(utils::isclose(&a, &Quantity::new(1.0000001, "meter").unwrap()));
        assert!(!utils::isclose(&a, &Quantity::new(1.0, "second").unwrap()));
    }

    #[test]
    fn errors_convert_into_crate_error() {
        let e: Error = get_constant("nope").unwrap_err().into();
        assert!(matches!(e, Error::Constant(_)));
        let e: Error = UnitContext::enter("").map(|_| ()).unwrap_err().into();
        assert!(matches!(e, Error::Context(_)));
    }
}
