//! Unit registry: user-defined units and one-hop aliases on top of the
//! built-in unit table.
//!
//! Resolution order for [UnitRegistry::get_unit]: alias (one hop), then the
//! custom definitions, then the expression parser. Registries are independent
//! values; [UnitRegistry::global] is a shared instance for callers that want one.

use crate::error::{RegistryError, UnitError};
use crate::quantity::{Magnitude, Quantity};
use crate::suggest;
use crate::unit::Unit;
use crate::unit_table;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

const MAX_SUGGESTIONS: usize = 3;

static GLOBAL: LazyLock<RwLock<UnitRegistry>> = LazyLock::new(|| RwLock::new(UnitRegistry::new()));

/// Registry mapping custom unit names to units, and aliases to names.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
    aliases: HashMap<String, String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry. Lock it for reading or writing:
    /// `UnitRegistry::global().write().define("smoot", "1.7018 m")`.
    pub fn global() -> &'static RwLock<UnitRegistry> {
        &GLOBAL
    }

    /// Define `name` as `definition` (any unit expression, which may use
    /// earlier custom units and aliases). An existing definition is replaced
    /// and returned.
    pub fn define(&mut self, name: &str, definition: &str) -> Result<Option<Unit>, RegistryError> {
        let unit = self.parse(definition).map_err(|source| RegistryError::Definition {
            name: name.to_string(),
            source,
        })?;
        Ok(self.define_unit(name, unit))
    }

    /// Like [define](Self::define), but fails if `name` is already defined.
    pub fn define_unique(&mut self, name: &str, definition: &str) -> Result<(), RegistryError> {
        if self.units.contains_key(name) {
            return Err(RegistryError::AlreadyExists(name.to_string()));
        }
        self.define(name, definition)?;
        Ok(())
    }

    /// Store an already-built unit under `name`, returning the previous one.
    pub fn define_unit(&mut self, name: &str, unit: Unit) -> Option<Unit> {
        tracing::debug!(name, unit = %unit, "defining unit");
        let previous = self.units.insert(name.to_string(), unit);
        if let Some(previous) = &previous {
            tracing::debug!(name, previous = %previous, "replaced existing unit definition");
        }
        previous
    }

    /// Make `alias` resolve to `existing`. Only one hop is followed and
    /// cycles are not detected.
    pub fn alias(&mut self, alias: &str, existing: &str) -> Option<String> {
        tracing::debug!(alias, existing, "defining alias");
        self.aliases.insert(alias.to_string(), existing.to_string())
    }

    /// Remove a custom unit and/or alias named `name`. True if anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let unit = self.units.remove(name).is_some();
        let alias = self.aliases.remove(name).is_some();
        unit || alias
    }

    /// True if `name` is a custom unit or an alias.
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Number of custom units (aliases not counted).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn dealias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// A single symbol's custom definition (after one alias hop when
    /// `follow_aliases`), or the symbol itself.
    fn resolve_symbol(&self, symbol: &str, follow_aliases: bool) -> Unit {
        let name = if follow_aliases { self.dealias(symbol) } else { symbol };
        match self.units.get(name) {
            Some(unit) => unit.clone(),
            None => Unit::from_symbol(name),
        }
    }

    /// Replace custom symbols by their definitions. Fails when the result
    /// has an exponent or scale that cannot be represented.
    fn substitute(&self, expr: &str, follow_aliases: bool) -> Result<Unit, UnitError> {
        let parsed = Unit::parse(expr)?;
        if self.units.is_empty() && (self.aliases.is_empty() || !follow_aliases) {
            return Ok(parsed);
        }
        let unit = parsed
            .components()
            .try_fold(Unit::from_scale(parsed.scale()), |acc, (symbol, e)| {
                acc.checked_mul(&self.resolve_symbol(symbol, follow_aliases).checked_power(e)?)
            })
            .filter(|u| u.checked_dimensionality().is_some())
            .ok_or_else(|| UnitError::parse(expr, "exponent out of range", 0))?;
        if unit.scale() == 0.0 || !unit.scale().is_finite() {
            return Err(UnitError::parse(
                expr,
                format!("scale must be finite and non-zero, got {}", unit.scale()),
                0,
            ));
        }
        Ok(unit)
    }

    /// Parse a unit expression, replacing custom units and aliases by their
    /// definitions: with `furlong = 220 yard`, "furlong / fortnight" becomes
    /// a quotient of yard and the definition of fortnight.
    pub fn parse(&self, expr: &str) -> Result<Unit, UnitError> {
        self.substitute(expr, true)
    }

    /// Alias hop, then custom table, then parse. `None` when the name does not
    /// parse or names a symbol that is neither built in nor defined here.
    pub fn get_unit(&self, name: &str) -> Option<Unit> {
        self.require_unit(name).ok()
    }

    /// Like [get_unit](Self::get_unit), with the reason for a failure:
    /// a parse error, or `NotFound` with suggestions for the first unknown symbol.
    pub fn require_unit(&self, name: &str) -> Result<Unit, UnitError> {
        let target = self.dealias(name);
        if let Some(unit) = self.units.get(target) {
            return Ok(unit.clone());
        }
        // The alias hop is already spent; only custom units are substituted.
        let unit = self.substitute(target, false)?;
        let unknown = unit
            .components()
            .find(|(s, _)| !unit_table::is_known(s))
            .map(|(s, _)| s.to_string());
        match unknown {
            Some(name) => Err(UnitError::NotFound {
                suggestions: self.suggestions(&name),
                name,
            }),
            None => Ok(unit),
        }
    }

    /// Known names (built-in symbols, custom units, aliases) close to `name`.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        let candidates = unit_table::symbols()
            .map(|s| -> &str { s })
            .chain(self.units.keys().map(String::as_str))
            .chain(self.aliases.keys().map(String::as_str));
        suggest::suggest(name, candidates, MAX_SUGGESTIONS)
    }

    /// Build a quantity whose unit may use this registry's names.
    pub fn quantity(&self, value: impl Into<Magnitude>, expr: &str) -> Result<Quantity, UnitError> {
        Ok(Quantity::from_parts(value, self.parse(expr)?))
    }

    /// Snapshot of the custom units.
    pub fn list_units(&self) -> BTreeMap<String, Unit> {
        self.units.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of the aliases.
    pub fn list_aliases(&self) -> BTreeMap<String, String> {
        self.aliases.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
