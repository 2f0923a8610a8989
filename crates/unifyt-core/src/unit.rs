//! Units: product of atomic unit symbols with rational exponents, plus a scale.
//! Dimensions and conversion factors are derived from the static unit table.

use crate::dimension::{self, format_exponent, BaseDimension, Dimension, Exponent};
use crate::error::UnitError;
use crate::parser;
use crate::unit_table;
use num_rational::Ratio;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

/// Maximum number of parsed expressions kept by the parse cache.
pub const CACHE_CAPACITY: usize = 1000;

/// Process-wide parse cache keyed by the literal expression. Fills up to
/// [CACHE_CAPACITY] entries and then stops inserting.
static PARSE_CACHE: LazyLock<Mutex<HashMap<String, Unit>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Number of entries currently in the parse cache.
pub fn cache_len() -> usize {
    PARSE_CACHE.lock().len()
}

/// Empty the parse cache.
pub fn clear_cache() {
    PARSE_CACHE.lock().clear();
    tracing::debug!("unit parse cache cleared");
}

/// `base^e` with exact integer powers where possible.
pub(crate) fn pow(base: f64, e: Exponent) -> f64 {
    if e.is_integer() {
        match i32::try_from(e.to_integer()) {
            Ok(n) => base.powi(n),
            Err(_) => base.powf(e.to_integer() as f64),
        }
    } else {
        base.powf(*e.numer() as f64 / *e.denom() as f64)
    }
}

/// Unit = product of symbol^exponent, times a scale. Stored in canonical form
/// (sorted symbols, no zero exponents).
///
/// Equality and hashing look at the components only; two units that differ
/// only in scale compare equal and are told apart by
/// [conversion_factor_to](Unit::conversion_factor_to).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Unit {
    components: BTreeMap<String, Exponent>,
    scale: f64,
}

impl Unit {
    /// Dimensionless unit (no components, scale 1).
    pub fn dimensionless() -> Self {
        Self {
            components: BTreeMap::new(),
            scale: 1.0,
        }
    }

    /// Single atomic symbol with exponent 1. The symbol is not validated.
    pub fn from_symbol(symbol: impl Into<String>) -> Self {
        let mut components = BTreeMap::new();
        components.insert(symbol.into(), Exponent::from_integer(1));
        Self {
            components,
            scale: 1.0,
        }
    }

    /// Pure number: no components, the given scale.
    pub fn from_scale(scale: f64) -> Self {
        Self {
            components: BTreeMap::new(),
            scale,
        }
    }

    /// Build from (symbol, exponent) pairs; exponents of repeated symbols add up.
    pub fn from_components<S: Into<String>>(
        components: impl IntoIterator<Item = (S, Exponent)>,
        scale: f64,
    ) -> Self {
        let mut map: BTreeMap<String, Exponent> = BTreeMap::new();
        for (symbol, e) in components {
            *map.entry(symbol.into()).or_insert_with(|| Ratio::from_integer(0)) += e;
        }
        map.retain(|_, e| *e != Ratio::from_integer(0));
        Self {
            components: map,
            scale,
        }
    }

    /// [from_components](Self::from_components) that returns `None` instead of
    /// overflowing an exponent.
    fn checked_from_components(
        components: impl IntoIterator<Item = (String, Exponent)>,
        scale: f64,
    ) -> Option<Self> {
        let mut map: BTreeMap<String, Exponent> = BTreeMap::new();
        for (symbol, e) in components {
            let slot = map.entry(symbol).or_insert_with(|| Ratio::from_integer(0));
            *slot = dimension::checked_add(*slot, e)?;
        }
        map.retain(|_, e| *e != Ratio::from_integer(0));
        Some(Self {
            components: map,
            scale,
        })
    }

    /// Parse a unit expression, going through the process-wide cache.
    ///
    /// The same string always yields the same components. See [crate::parser]
    /// for the grammar.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        if let Some(unit) = PARSE_CACHE.lock().get(input) {
            tracing::trace!(unit = input, "parse cache hit");
            return Ok(unit.clone());
        }
        let unit = parser::parse(input)?;
        let mut cache = PARSE_CACHE.lock();
        if cache.len() < CACHE_CAPACITY {
            cache.insert(input.to_string(), unit.clone());
            tracing::trace!(unit = input, "parse cache insert");
        } else {
            tracing::trace!(unit = input, "parse cache full, not inserting");
        }
        Ok(unit)
    }

    /// (symbol, exponent) pairs in canonical order.
    pub fn components(&self) -> impl Iterator<Item = (&str, Exponent)> {
        self.components.iter().map(|(s, e)| (s.as_str(), *e))
    }

    /// Exponent of `symbol` (zero when absent).
    pub fn exponent(&self, symbol: &str) -> Exponent {
        self.components
            .get(symbol)
            .copied()
            .unwrap_or_else(|| Ratio::from_integer(0))
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    /// No components (a pure number or `dimensionless`).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Dimension from the unit table, weighted by exponents. Symbols the table
    /// does not know contribute nothing.
    pub fn dimensionality(&self) -> Dimension {
        self.components
            .iter()
            .filter_map(|(symbol, e)| unit_table::lookup(symbol).map(|def| def.dimension * *e))
            .sum()
    }

    /// [dimensionality](Self::dimensionality), or `None` when an exponent
    /// of the result overflows.
    pub fn checked_dimensionality(&self) -> Option<Dimension> {
        self.components
            .iter()
            .filter_map(|(symbol, e)| unit_table::lookup(symbol).map(|def| (def, *e)))
            .try_fold(Dimension::dimensionless(), |acc, (def, e)| {
                acc.checked_add(def.dimension.checked_scale(e)?)
            })
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimensionality().is_dimensionless()
    }

    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        self.dimensionality() == other.dimensionality()
    }

    /// Factor to SI base units: scale × Π table(symbol)^exponent. Unknown
    /// symbols count as 1.
    pub fn factor(&self) -> f64 {
        self.components.iter().fold(self.scale, |acc, (symbol, e)| {
            let f = unit_table::lookup(symbol).map_or(1.0, |def| def.factor);
            acc * pow(f, *e)
        })
    }

    /// Multiply a magnitude in `self` by this to express it in `other`.
    /// Linear only: temperature offsets are not applied.
    pub fn conversion_factor_to(&self, other: &Unit) -> Result<f64, UnitError> {
        let (from_dimension, to_dimension) = (self.dimensionality(), other.dimensionality());
        if from_dimension != to_dimension {
            return Err(UnitError::IncompatibleDimensions {
                from: self.to_string(),
                to: other.to_string(),
                from_dimension: from_dimension.to_string(),
                to_dimension: to_dimension.to_string(),
            });
        }
        Ok(self.factor() / other.factor())
    }

    /// Same dimension, expressed in the seven SI base-unit names (meter,
    /// kilogram, …) with scale 1. Unknown symbols are kept as they are.
    pub fn to_base_units(&self) -> Unit {
        let mut out: Vec<(String, Exponent)> = Vec::new();
        for (symbol, e) in &self.components {
            match unit_table::lookup(symbol) {
                Some(def) => out.extend(
                    def.dimension
                        .iter()
                        .map(|(base, d)| (base.base_unit().to_string(), d * *e)),
                ),
                None => out.push((symbol.clone(), *e)),
            }
        }
        Unit::from_components(out, 1.0)
    }

    /// Multiply two units: exponents add, scales multiply.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: &Self) -> Self {
        let scale = self.scale * other.scale;
        Self::from_components(
            self.components
                .into_iter()
                .chain(other.components.iter().map(|(s, e)| (s.clone(), *e))),
            scale,
        )
    }

    /// Divide: self * other^(-1).
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, other: &Self) -> Self {
        self.mul(&other.recip())
    }

    /// 1 / self.
    pub fn recip(&self) -> Self {
        self.clone().powi(-1)
    }

    /// Raise unit to integer power.
    pub fn powi(self, n: i64) -> Self {
        self.power(Exponent::from_integer(n))
    }

    /// Raise unit to rational power: exponents multiply, scale is raised.
    pub fn power(self, exp: Exponent) -> Self {
        let scale = pow(self.scale, exp);
        Self::from_components(
            self.components.into_iter().map(|(s, e)| (s, e * exp)),
            scale,
        )
    }

    /// [mul](Self::mul), or `None` on exponent overflow.
    pub fn checked_mul(self, other: &Self) -> Option<Self> {
        let scale = self.scale * other.scale;
        Self::checked_from_components(
            self.components
                .into_iter()
                .chain(other.components.iter().map(|(s, e)| (s.clone(), *e))),
            scale,
        )
    }

    /// [div](Self::div), or `None` on exponent overflow.
    pub fn checked_div(self, other: &Self) -> Option<Self> {
        self.checked_mul(&other.clone().checked_power(Exponent::from_integer(-1))?)
    }

    /// [power](Self::power), or `None` on exponent overflow.
    pub fn checked_power(self, exp: Exponent) -> Option<Self> {
        let scale = pow(self.scale, exp);
        let components = self
            .components
            .into_iter()
            .map(|(s, e)| Some((s, dimension::checked_mul(e, exp)?)))
            .collect::<Option<Vec<_>>>()?;
        Self::checked_from_components(components, scale)
    }

    /// Kelvin per degree and additive offset, for a single temperature symbol
    /// (kelvin, celsius, fahrenheit, rankine and their aliases).
    pub(crate) fn temperature_scale(&self) -> Option<(f64, f64)> {
        let mut components = self.components.iter();
        let (symbol, e) = components.next()?;
        if components.next().is_some() || *e != Ratio::from_integer(1) {
            return None;
        }
        let def = unit_table::lookup(symbol)?;
        (def.dimension == Dimension::base(BaseDimension::Temperature))
            .then_some((def.factor * self.scale, def.offset))
    }

    /// Additive offset of a temperature scale (273.15 for celsius, 459.67
    /// for fahrenheit, 0 for kelvin). `None` for anything that is not a
    /// plain temperature unit.
    pub fn offset(&self) -> Option<f64> {
        self.temperature_scale().map(|(_, offset)| offset)
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::dimensionless()
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Unit::parse(&s)
    }
}

impl TryFrom<&str> for Unit {
    type Error = UnitError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Unit::parse(s)
    }
}

impl From<Unit> for String {
    fn from(u: Unit) -> String {
        u.to_string()
    }
}

/// Plain decimal for ordinary magnitudes, exponent form for very small or
/// very large ones. Both forms lex back as a single number.
pub(crate) fn format_number(x: f64) -> String {
    let a = x.abs();
    if a == 0.0 || (1e-4..1e15).contains(&a) {
        format!("{x}")
    } else {
        format!("{x:e}")
    }
}

impl std::fmt::Display for Unit {
    /// `num * num / den * den`, with `^e` for exponents other than 1 and the
    /// scale (when not 1) as a leading number. Re-parses to an equal unit.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let term = |symbol: &str, e: Exponent| {
            if e == Ratio::from_integer(1) {
                symbol.to_string()
            } else {
                format!("{symbol}^{}", format_exponent(e))
            }
        };
        let mut numerator: Vec<String> = Vec::new();
        if self.scale != 1.0 {
            numerator.push(format_number(self.scale));
        }
        let mut denominator: Vec<String> = Vec::new();
        for (symbol, e) in &self.components {
            if *e > Ratio::from_integer(0) {
                numerator.push(term(symbol, *e));
            } else {
                denominator.push(term(symbol, -*e));
            }
        }
        match (numerator.is_empty(), denominator.is_empty()) {
            (true, true) => f.write_str("dimensionless"),
            (false, true) => write!(f, "{}", numerator.join(" * ")),
            (true, false) => write!(f, "1 / {}", denominator.join(" * ")),
            (false, false) => write!(
                f,
                "{} / {}",
                numerator.join(" * "),
                denominator.join(" * ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(s: &str) -> Unit {
        Unit::parse(s).unwrap()
    }

    #[test]
    fn dimensionless_is_empty() {
        assert!(Unit::dimensionless().is_empty());
        assert!(Unit::dimensionless().is_dimensionless());
        assert_eq!(Unit::dimensionless().to_string(), "dimensionless");
    }

    #[test]
    fn parse_is_idempotent() {
        let a = unit("kg * m^2 / s^2");
        let b = unit("kg * m^2 / s^2");
        assert_eq!(a, b);
        assert_eq!(a.components().collect::<Vec<_>>(), b.components().collect::<Vec<_>>());
    }

    #[test]
    fn checked_algebra() {
        let a = unit("kg * m^2");
        let b = unit("s^2");
        assert_eq!(a.clone().checked_div(&b), Some(a.clone().div(&b)));
        let half = Exponent::new(1, 2);
        assert_eq!(a.clone().checked_power(half), Some(a.clone().power(half)));
        assert_eq!(a.checked_dimensionality(), Some(a.dimensionality()));
        let huge = Unit::from_components([("m", Exponent::from_integer(i64::MAX))], 1.0);
        assert!(huge.clone().checked_mul(&huge).is_none());
        let kwh = unit("kWh").checked_power(Exponent::from_integer(i64::MAX / 2 + 1)).unwrap();
        assert!(kwh.checked_dimensionality().is_none());
    }

    #[test]
    fn zero_scale_never_parses() {
        assert!(Unit::parse("0 m").is_err());
        let u = unit("0.5 m");
        assert_eq!(u.conversion_factor_to(&u).unwrap(), 1.0);
    }

    #[test]
    fn velocity_dimensionality() {
        let d = unit("meter/second").dimensionality();
        assert_eq!(d, Dimension::from_integers([1, 0, -1, 0, 0, 0, 0]));
    }

    #[test]
    fn derived_unit_dimensionality() {
        assert_eq!(unit("J").dimensionality(), unit("kg * m^2 / s^2").dimensionality());
        assert!(unit("W").is_compatible_with(&unit("J/s")));
        assert!(unit("N * m").is_compatible_with(&unit("joule")));
    }

    #[test]
    fn unknown_symbols_contribute_nothing() {
        let u = unit("smoot");
        assert!(u.is_dimensionless());
        assert_eq!(u.factor(), 1.0);
        assert_eq!(unit("smoot * m").dimensionality(), unit("m").dimensionality());
    }

    #[test]
    fn conversion_factor_basic() {
        assert_eq!(unit("km").conversion_factor_to(&unit("m")).unwrap(), 1000.0);
        let f = unit("mile/hour").conversion_factor_to(&unit("m/s")).unwrap();
        assert!((f - 0.44704).abs() < 1e-12);
    }

    #[test]
    fn conversion_factor_to_self_is_exactly_one() {
        for s in ["m", "km/h", "kg * m^2 / s^2", "m^(1/2)", "degF", "220 yard", "smoot"] {
            let u = unit(s);
            assert_eq!(u.conversion_factor_to(&u).unwrap(), 1.0, "{s}");
        }
    }

    #[test]
    fn conversion_factor_is_transitive() {
        let (a, b, c) = (unit("mile"), unit("ft"), unit("cm"));
        let ab = a.conversion_factor_to(&b).unwrap();
        let bc = b.conversion_factor_to(&c).unwrap();
        let ac = a.conversion_factor_to(&c).unwrap();
        assert!((ab * bc - ac).abs() <= 1e-12 * ac.abs());
    }

    #[test]
    fn conversion_factor_incompatible() {
        let err = unit("m").conversion_factor_to(&unit("s")).unwrap_err();
        match err {
            UnitError::IncompatibleDimensions {
                from_dimension,
                to_dimension,
                ..
            } => {
                assert_eq!(from_dimension, "length");
                assert_eq!(to_dimension, "time");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn temperature_conversion_is_linear_only() {
        let f = unit("celsius").conversion_factor_to(&unit("kelvin")).unwrap();
        assert_eq!(f, 1.0);
        assert_eq!(unit("celsius").offset(), Some(273.15));
        assert_eq!(unit("kelvin").offset(), Some(0.0));
        assert_eq!(unit("m").offset(), None);
        assert_eq!(unit("K^2").offset(), None);
    }

    #[test]
    fn scale_enters_the_factor() {
        let furlong = unit("220 yard");
        let f = furlong.conversion_factor_to(&unit("meter")).unwrap();
        assert!((f - 201.168).abs() < 1e-9);
    }

    #[test]
    fn equality_ignores_scale() {
        assert_eq!(unit("yard"), unit("220 yard"));
        assert_ne!(unit("yard"), unit("m"));
    }

    #[test]
    fn algebra_combines_components_and_scales() {
        let m = Unit::from_symbol("m");
        let s = Unit::from_symbol("s");
        let v = m.clone().div(&s);
        assert_eq!(v.exponent("m"), Exponent::from_integer(1));
        assert_eq!(v.exponent("s"), Exponent::from_integer(-1));
        assert_eq!(v.clone().mul(&s), m);
        let a = v.powi(2);
        assert_eq!(a.exponent("s"), Exponent::from_integer(-2));
        let scaled = Unit::from_scale(2.0).mul(&m).power(Exponent::new(1, 2));
        assert!((scaled.scale() - 2f64.sqrt()).abs() < 1e-15);
        assert!(m.clone().div(&m).is_empty());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(unit("m/s").to_string(), "m / s");
        assert_eq!(unit("kg m^2 s^-2").to_string(), "kg * m^2 / s^2");
        assert_eq!(unit("1/s").to_string(), "1 / s");
        assert_eq!(unit("m^(1/2)").to_string(), "m^(1/2)");
        assert_eq!(unit("220 yard").to_string(), "220 * yard");
        assert_eq!(Unit::from_scale(1e-20).mul(&unit("m")).to_string(), "1e-20 * m");
    }

    #[test]
    fn rendered_string_round_trips() {
        for s in [
            "kg * m^2 / s^2",
            "1 / s",
            "J / kg * K",
            "m^(3/2) / s^(1/2)",
            "0.5 * W / m^2",
            "µm",
            "°C",
            "%",
        ] {
            let u = unit(s);
            let back = unit(&u.to_string());
            assert_eq!(back, u, "{s}");
            assert!((back.factor() - u.factor()).abs() <= 1e-15 * u.factor().abs(), "{s}");
        }
    }

    #[test]
    fn base_units_round_trip_dimension() {
        for s in ["J", "W/m^2", "mile/hour", "ohm", "mol/L", "lux", "Hz^(1/2)", "smoot/s"] {
            let u = unit(s);
            let base = u.to_base_units();
            assert_eq!(unit(&base.to_string()).dimensionality(), u.dimensionality(), "{s}");
        }
        assert_eq!(unit("J").to_base_units().to_string(), "kilogram * meter^2 / second^2");
        assert_eq!(unit("rad").to_base_units().to_string(), "dimensionless");
    }

    #[test]
    fn cache_stays_bounded() {
        for i in 0..(CACHE_CAPACITY + 50) {
            unit(&format!("{i} * m"));
        }
        assert!(cache_len() <= CACHE_CAPACITY);
        // Lookups keep working once the cache is full.
        assert_eq!(unit("furlong"), Unit::from_symbol("furlong"));
    }

    #[test]
    fn cleared_cache_refills() {
        clear_cache();
        assert_eq!(unit("m/s"), unit("m / s"));
        assert!(cache_len() <= CACHE_CAPACITY);
    }

    #[test]
    fn serde_uses_rendered_string() {
        let u = unit("km/h");
        let json = serde_json::to_string(&u).unwrap();
        assert_eq!(json, "\"km / h\"");
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn from_str_reports_parse_errors() {
        assert!(matches!("m/".parse::<Unit>(), Err(UnitError::Parse { .. })));
    }
}
