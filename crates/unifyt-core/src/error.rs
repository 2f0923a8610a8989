//! Error taxonomy. One enum per layer so callers can tell a dimension
//! mismatch from a parse failure from a missing unit.

use thiserror::Error;

/// Errors raised while parsing units or deriving conversion factors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("cannot parse unit '{input}' at position {position}: {reason}")]
    Parse {
        input: String,
        reason: String,
        position: usize,
    },

    #[error("incompatible dimensions: cannot convert {from} ({from_dimension}) to {to} ({to_dimension})")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dimension: String,
        to_dimension: String,
    },

    #[error("unit '{name}' not recognized{}", format_suggestions(.suggestions))]
    NotFound {
        name: String,
        suggestions: Vec<String>,
    },
}

impl UnitError {
    pub fn parse(input: &str, reason: impl Into<String>, position: usize) -> Self {
        UnitError::Parse {
            input: input.to_string(),
            reason: reason.into(),
            position,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!("; did you mean: {}?", suggestions.join(", "))
    }
}

/// Errors raised by quantity arithmetic, comparison and conversion.
///
/// Dimension mismatches all surface as [IncompatibleUnits](Self::IncompatibleUnits);
/// its `operation` names the failure category:
///
/// - `"convert"`: conversion ([Quantity::to](crate::Quantity::to) and friends)
/// - `"add"` / `"subtract"`: unsupported arithmetic between the two units
/// - `"compare"`: ordering (`lt`, `le`, `gt`, `ge`)
///
/// Arithmetic between a bare number and a dimensioned quantity is
/// [DimensionedScalar](Self::DimensionedScalar) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("cannot {operation} {left} and {right}: incompatible units")]
    IncompatibleUnits {
        left: String,
        right: String,
        operation: &'static str,
    },

    #[error("cannot {operation} a bare number and a quantity in {unit}: quantity is not dimensionless")]
    DimensionedScalar {
        unit: String,
        operation: &'static str,
    },

    #[error("array length mismatch: {left} vs {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Errors raised by [crate::UnitRegistry].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unit '{0}' is already defined")]
    AlreadyExists(String),

    #[error("invalid definition for unit '{name}': {source}")]
    Definition {
        name: String,
        #[source]
        source: UnitError,
    },
}

/// Errors raised when entering a unit-system context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("invalid unit system name '{0}'")]
    InvalidUnitSystem(String),
}

/// Errors raised while encoding or decoding quantities.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record does not describe a Quantity (type = '{0}')")]
    NotAQuantity(String),

    #[error("unsupported record version {found} (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Lookup of an unknown physical constant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstantError {
    #[error("constant '{name}' not found")]
    NotFound { name: String },
}

/// Errors raised by the array helpers in [crate::utils].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtilityError {
    #[error("{0}: need at least one element")]
    Empty(&'static str),

    #[error("{function}: {reason}")]
    InvalidArgument {
        function: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

impl From<UnitError> for UtilityError {
    fn from(e: UnitError) -> Self {
        UtilityError::Quantity(QuantityError::Unit(e))
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Constant(#[from] ConstantError),

    #[error(transparent)]
    Utility(#[from] UtilityError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
