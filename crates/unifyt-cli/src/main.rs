use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unifyt_core::{serialization, Config, Magnitude, Quantity};

#[derive(Parser, Debug)]
#[command(name = "unifyt", version, about = "Convert quantities between units")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Value to convert; comma-separated for an array (e.g. `1,2.5,-3`)
    #[arg(required_unless_present_any = ["constant", "list_constants"])]
    value: Option<String>,

    /// Unit of the value (e.g. `km/h`, `"kg * m / s^2"`)
    #[arg(required_unless_present_any = ["constant", "list_constants"])]
    from: Option<String>,

    /// Target unit; SI base units when omitted
    to: Option<String>,

    /// Apply temperature offsets (degC, degF, K, degR)
    #[arg(long)]
    temperature: bool,

    /// Print a physical constant (e.g. `c`, `hbar`, `G`)
    #[arg(long, value_name = "NAME", conflicts_with_all = ["value", "list_constants"])]
    constant: Option<String>,

    /// List the names accepted by --constant
    #[arg(long)]
    list_constants: bool,

    /// Print the result as a JSON record
    #[arg(long)]
    json: bool,

    /// TOML file with comparison tolerances
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail unless the result matches VALUE (in the target unit) within tolerance
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    expect: Option<f64>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] unifyt_core::Error),

    #[error("invalid value '{0}'")]
    InvalidValue(String),

    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: Quantity, actual: Quantity },
}

macro_rules! from_core_error {
    ($($ty:ty),*) => {
        $(impl From<$ty> for CliError {
            fn from(e: $ty) -> Self {
                CliError::Core(e.into())
            }
        })*
    };
}

from_core_error!(
    unifyt_core::UnitError,
    unifyt_core::QuantityError,
    unifyt_core::ConstantError,
    unifyt_core::ConfigError,
    unifyt_core::SerializationError
);

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// "1.5" is a scalar, "1,2,3" an array.
fn parse_values(text: &str) -> Result<Magnitude, CliError> {
    let values = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| CliError::InvalidValue(part.trim().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [single] if !text.contains(',') => Ok(Magnitude::Scalar(*single)),
        _ => Ok(Magnitude::Array(values)),
    }
}

fn convert(cli: &Cli, value: &str, from: &str) -> Result<Quantity, CliError> {
    let q = Quantity::new(parse_values(value)?, from)?;
    tracing::info!(quantity = %q, to = ?cli.to, "converting");
    let result = match (&cli.to, cli.temperature) {
        (Some(to), false) => q.to(to.as_str())?,
        (Some(to), true) => q.to_temperature(to.as_str())?,
        (None, false) => q.to_base_units(),
        (None, true) => q.to_temperature("kelvin")?,
    };
    Ok(result)
}

fn check_expectation(cli: &Cli, result: &Quantity) -> Result<(), CliError> {
    let Some(expected) = cli.expect else {
        return Ok(());
    };
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let expected = Quantity::from_parts(expected, result.unit().clone());
    if result.approx_eq(&expected, config.tolerance) {
        Ok(())
    } else {
        Err(CliError::Mismatch {
            expected,
            actual: result.clone(),
        })
    }
}

fn print(cli: &Cli, q: &Quantity) -> Result<(), CliError> {
    if cli.json {
        println!("{}", serialization::to_json_pretty(q)?);
    } else {
        println!("{q}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.list_constants {
        for name in unifyt_core::list_constants() {
            println!("{name}");
        }
        return Ok(());
    }
    if let Some(name) = &cli.constant {
        let c = unifyt_core::get_constant(name)?;
        let c = match &cli.to {
            Some(to) => c.to(to.as_str())?,
            None => c,
        };
        return print(cli, &c);
    }
    let (Some(value), Some(from)) = (&cli.value, &cli.from) else {
        unreachable!("clap requires VALUE and FROM here");
    };
    let result = convert(cli, value, from)?;
    check_expectation(cli, &result)?;
    print(cli, &result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("unifyt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn values_scalar_and_array() {
        assert_eq!(parse_values("1.5").unwrap(), Magnitude::Scalar(1.5));
        assert_eq!(parse_values("1, 2,-3").unwrap(), Magnitude::Array(vec![1.0, 2.0, -3.0]));
        assert!(parse_values("4,").is_err());
        assert!(matches!(parse_values("abc"), Err(CliError::InvalidValue(v)) if v == "abc"));
    }

    #[test]
    fn converts_to_target() {
        let c = cli(&["1000", "m", "km"]);
        let q = convert(&c, c.value.as_deref().unwrap(), c.from.as_deref().unwrap()).unwrap();
        assert_eq!(q.value(), Some(1.0));
    }

    #[test]
    fn converts_to_base_units_without_target() {
        let c = cli(&["1", "km/h"]);
        let q = convert(&c, "1", "km/h").unwrap();
        assert!((q.value().unwrap() - 1.0 / 3.6).abs() < 1e-12);
        assert!(q.unit().is_compatible_with(&unifyt_core::Unit::parse("m/s").unwrap()));
        assert!(c.to.is_none());
    }

    #[test]
    fn negative_values_and_temperature() {
        let c = cli(&["--temperature", "-40", "degC", "degF"]);
        let q = convert(&c, c.value.as_deref().unwrap(), "degC").unwrap();
        assert!((q.value().unwrap() + 40.0).abs() < 1e-9);
    }

    #[test]
    fn expectation_uses_tolerance() {
        let c = cli(&["1", "mile", "km", "--expect", "1.609344"]);
        let q = convert(&c, "1", "mile").unwrap();
        assert!(check_expectation(&c, &q).is_ok());
        let c = cli(&["1", "mile", "km", "--expect", "1.7"]);
        assert!(matches!(
            check_expectation(&c, &q),
            Err(CliError::Mismatch { .. })
        ));
    }

    #[test]
    fn incompatible_units_fail() {
        let c = cli(&["1", "m", "s"]);
        let err = convert(&c, "1", "m").unwrap_err();
        assert!(matches!(err, CliError::Core(unifyt_core::Error::Quantity(_))));
    }

    #[test]
    fn constant_mode_needs_no_positionals() {
        let c = cli(&["--constant", "c"]);
        assert!(c.value.is_none());
        assert!(run(&c).is_ok());
        assert!(Cli::try_parse_from(["unifyt", "1"]).is_err());
    }
}
