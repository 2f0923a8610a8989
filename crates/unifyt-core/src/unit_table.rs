//! Static table of atomic unit symbols: factor to SI base units, dimension,
//! and additive offsets for the non-ratio temperature scales.
//!
//! Symbols not in the table may still resolve through a metric/binary prefix
//! on a prefixable entry ("Mm", "kcd", "nanomole", "KiB").

use crate::dimension::Dimension;
use crate::prefix::{self, Prefix};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Which prefixes an entry accepts in the fallback lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Prefixes {
    None,
    Metric,
    /// Metric and binary (information units).
    All,
}

struct Entry {
    symbols: &'static [&'static str],
    factor: f64,
    dim: [i8; 7],
    prefixes: Prefixes,
}

/// Resolved definition of an atomic symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitDef {
    /// Multiply a magnitude in this unit by `factor` to get SI base units.
    pub factor: f64,
    pub dimension: Dimension,
    /// Additive offset applied before `factor` for absolute temperatures
    /// (kelvin = (value + offset) * factor). Zero for everything else.
    pub offset: f64,
}

// Exponent order: length, mass, time, current, temperature, amount, luminosity.
const NONE: [i8; 7] = [0, 0, 0, 0, 0, 0, 0];
const LENGTH: [i8; 7] = [1, 0, 0, 0, 0, 0, 0];
const MASS: [i8; 7] = [0, 1, 0, 0, 0, 0, 0];
const TIME: [i8; 7] = [0, 0, 1, 0, 0, 0, 0];
const CURRENT: [i8; 7] = [0, 0, 0, 1, 0, 0, 0];
const TEMPERATURE: [i8; 7] = [0, 0, 0, 0, 1, 0, 0];
const AMOUNT: [i8; 7] = [0, 0, 0, 0, 0, 1, 0];
const LUMINOSITY: [i8; 7] = [0, 0, 0, 0, 0, 0, 1];
const AREA: [i8; 7] = [2, 0, 0, 0, 0, 0, 0];
const VOLUME: [i8; 7] = [3, 0, 0, 0, 0, 0, 0];
const INVERSE_AREA: [i8; 7] = [-2, 0, 0, 0, 0, 0, 0];
const VELOCITY: [i8; 7] = [1, 0, -1, 0, 0, 0, 0];
const ACCELERATION: [i8; 7] = [1, 0, -2, 0, 0, 0, 0];
const FREQUENCY: [i8; 7] = [0, 0, -1, 0, 0, 0, 0];
const FORCE: [i8; 7] = [1, 1, -2, 0, 0, 0, 0];
const PRESSURE: [i8; 7] = [-1, 1, -2, 0, 0, 0, 0];
const ENERGY: [i8; 7] = [2, 1, -2, 0, 0, 0, 0];
const POWER: [i8; 7] = [2, 1, -3, 0, 0, 0, 0];
const CHARGE: [i8; 7] = [0, 0, 1, 1, 0, 0, 0];
const VOLTAGE: [i8; 7] = [2, 1, -3, -1, 0, 0, 0];
const RESISTANCE: [i8; 7] = [2, 1, -3, -2, 0, 0, 0];
const CONDUCTANCE: [i8; 7] = [-2, -1, 3, 2, 0, 0, 0];
const CAPACITANCE: [i8; 7] = [-2, -1, 4, 2, 0, 0, 0];
const INDUCTANCE: [i8; 7] = [2, 1, -2, -2, 0, 0, 0];
const MAGNETIC_FLUX: [i8; 7] = [2, 1, -2, -1, 0, 0, 0];
const MAGNETIC_FIELD: [i8; 7] = [0, 1, -2, -1, 0, 0, 0];
const ILLUMINANCE: [i8; 7] = [-2, 0, 0, 0, 0, 0, 1];
const DOSE: [i8; 7] = [2, 0, -2, 0, 0, 0, 0];
const CATALYTIC: [i8; 7] = [0, 0, -1, 0, 0, 1, 0];
const DYNAMIC_VISCOSITY: [i8; 7] = [-1, 1, -1, 0, 0, 0, 0];
const KINEMATIC_VISCOSITY: [i8; 7] = [2, 0, -1, 0, 0, 0, 0];
const THERMAL_CONDUCTIVITY: [i8; 7] = [1, 1, -3, 0, -1, 0, 0];
const HEAT_CAPACITY: [i8; 7] = [2, 1, -2, 0, -1, 0, 0];
const SPECIFIC_HEAT: [i8; 7] = [2, 0, -2, 0, -1, 0, 0];
const MOLAR_MASS: [i8; 7] = [0, 1, 0, 0, 0, -1, 0];
const CONCENTRATION: [i8; 7] = [-3, 0, 0, 0, 0, 1, 0];
const DENSITY: [i8; 7] = [-3, 1, 0, 0, 0, 0, 0];
const FLOW: [i8; 7] = [3, 0, -1, 0, 0, 0, 0];

const fn e(symbols: &'static [&'static str], factor: f64, dim: [i8; 7]) -> Entry {
    Entry {
        symbols,
        factor,
        dim,
        prefixes: Prefixes::None,
    }
}

const fn si(symbols: &'static [&'static str], factor: f64, dim: [i8; 7]) -> Entry {
    Entry {
        symbols,
        factor,
        dim,
        prefixes: Prefixes::Metric,
    }
}

const PARSEC: f64 = 3.085_677_581_491_367_3e16;
const ATOMIC_MASS: f64 = 1.660_539_066_60e-27;

#[rustfmt::skip]
static ENTRIES: &[Entry] = &[
    // Length
    si(&["meter", "m", "meters", "metre", "metres"], 1.0, LENGTH),
    e(&["kilometer", "km", "kilometers"], 1000.0, LENGTH),
    e(&["centimeter", "cm", "centimeters"], 0.01, LENGTH),
    e(&["millimeter", "mm", "millimeters"], 0.001, LENGTH),
    e(&["micrometer", "um", "µm", "micrometers", "micron"], 1e-6, LENGTH),
    e(&["nanometer", "nm", "nanometers"], 1e-9, LENGTH),
    e(&["picometer", "pm"], 1e-12, LENGTH),
    e(&["femtometer", "fm", "fermi"], 1e-15, LENGTH),
    e(&["angstrom", "Å"], 1e-10, LENGTH),
    e(&["mile", "mi", "miles"], 1609.344, LENGTH),
    e(&["yard", "yd", "yards"], 0.9144, LENGTH),
    e(&["foot", "ft", "feet"], 0.3048, LENGTH),
    e(&["inch", "in", "inches"], 0.0254, LENGTH),
    e(&["nautical_mile", "nmi"], 1852.0, LENGTH),
    e(&["fathom"], 1.8288, LENGTH),
    e(&["chain"], 20.1168, LENGTH),
    e(&["furlong"], 201.168, LENGTH),
    e(&["league"], 4828.032, LENGTH),
    e(&["astronomical_unit", "au", "AU"], 1.495_978_707e11, LENGTH),
    e(&["light_year", "ly"], 9.460_730_472_580_8e15, LENGTH),
    si(&["parsec", "pc"], PARSEC, LENGTH),
    e(&["kiloparsec", "kpc"], PARSEC * 1e3, LENGTH),
    e(&["megaparsec", "Mpc"], PARSEC * 1e6, LENGTH),

    // Mass
    e(&["kilogram", "kg", "kilograms"], 1.0, MASS),
    si(&["gram", "g", "grams"], 0.001, MASS),
    e(&["milligram", "mg", "milligrams"], 1e-6, MASS),
    e(&["microgram", "ug", "µg", "micrograms"], 1e-9, MASS),
    e(&["pound", "lb", "pounds"], 0.453_592_37, MASS),
    e(&["ounce", "oz", "ounces"], 0.028_349_523_125, MASS),
    e(&["ton", "tons", "tonne", "tonnes", "t"], 1000.0, MASS),
    e(&["atomic_mass_unit", "amu", "u", "dalton", "Da"], ATOMIC_MASS, MASS),
    e(&["electron_mass", "m_e"], 9.109_383_701_5e-31, MASS),
    e(&["proton_mass", "m_p"], 1.672_621_923_69e-27, MASS),
    e(&["neutron_mass", "m_n"], 1.674_927_498_04e-27, MASS),
    e(&["solar_mass", "M_sun"], 1.988_47e30, MASS),
    e(&["earth_mass", "M_earth"], 5.972_17e24, MASS),
    e(&["carat", "ct"], 0.0002, MASS),
    e(&["grain", "gr"], 6.479_891e-5, MASS),
    e(&["stone", "st"], 6.350_293_18, MASS),
    e(&["slug"], 14.593_902_94, MASS),

    // Time
    si(&["second", "s", "seconds", "sec"], 1.0, TIME),
    e(&["millisecond", "ms", "milliseconds"], 0.001, TIME),
    e(&["microsecond", "us", "µs", "microseconds"], 1e-6, TIME),
    e(&["nanosecond", "ns", "nanoseconds"], 1e-9, TIME),
    e(&["picosecond", "ps"], 1e-12, TIME),
    e(&["femtosecond", "fs"], 1e-15, TIME),
    e(&["attosecond", "as"], 1e-18, TIME),
    e(&["shake"], 1e-8, TIME),
    e(&["minute", "min", "minutes"], 60.0, TIME),
    e(&["hour", "h", "hr", "hours"], 3600.0, TIME),
    e(&["day", "d", "days"], 86400.0, TIME),
    e(&["week", "weeks"], 604_800.0, TIME),
    e(&["fortnight"], 1_209_600.0, TIME),
    e(&["month", "months"], 2_629_800.0, TIME),
    e(&["year", "yr", "years"], 31_536_000.0, TIME),
    e(&["decade"], 315_576_000.0, TIME),
    e(&["century"], 3_155_760_000.0, TIME),
    e(&["millennium"], 31_557_600_000.0, TIME),

    // Temperature (offsets live in OFFSETS)
    si(&["kelvin", "K", "kelvins"], 1.0, TEMPERATURE),
    e(&["celsius", "degC", "°C"], 1.0, TEMPERATURE),
    e(&["fahrenheit", "degF", "°F"], 5.0 / 9.0, TEMPERATURE),
    e(&["rankine", "degR", "°R"], 5.0 / 9.0, TEMPERATURE),

    // Current
    si(&["ampere", "A", "amperes", "amp", "amps"], 1.0, CURRENT),
    e(&["milliampere", "mA"], 0.001, CURRENT),
    e(&["microampere", "uA", "µA"], 1e-6, CURRENT),
    e(&["nanoampere", "nA"], 1e-9, CURRENT),
    e(&["picoampere", "pA"], 1e-12, CURRENT),
    e(&["kiloampere", "kA"], 1000.0, CURRENT),
    e(&["statampere"], 3.335_64e-10, CURRENT),

    // Amount, luminosity
    si(&["mole", "mol", "moles"], 1.0, AMOUNT),
    si(&["candela", "cd", "candelas"], 1.0, LUMINOSITY),

    // Energy
    si(&["joule", "J", "joules"], 1.0, ENERGY),
    e(&["kilojoule", "kJ"], 1000.0, ENERGY),
    e(&["megajoule", "MJ"], 1e6, ENERGY),
    e(&["gigajoule", "GJ"], 1e9, ENERGY),
    si(&["calorie", "cal", "calories"], 4.184, ENERGY),
    e(&["kilocalorie", "kcal", "Calorie"], 4184.0, ENERGY),
    si(&["electronvolt", "eV"], 1.602_176_634e-19, ENERGY),
    si(&["watt_hour", "Wh"], 3600.0, ENERGY),
    e(&["kilowatt_hour", "kWh"], 3.6e6, ENERGY),
    e(&["erg"], 1e-7, ENERGY),
    e(&["british_thermal_unit", "BTU", "btu"], 1055.06, ENERGY),
    e(&["therm"], 1.055_06e8, ENERGY),
    e(&["quad"], 1.055_06e18, ENERGY),
    e(&["ton_tnt"], 4.184e9, ENERGY),
    e(&["kiloton_tnt"], 4.184e12, ENERGY),
    e(&["megaton_tnt"], 4.184e15, ENERGY),
    e(&["rydberg", "Ry"], 2.179_872_361_103_5e-18, ENERGY),
    e(&["hartree", "Ha"], 4.359_744_722_207_1e-18, ENERGY),

    // Power
    si(&["watt", "W", "watts"], 1.0, POWER),
    e(&["milliwatt", "mW"], 0.001, POWER),
    e(&["microwatt", "uW", "µW"], 1e-6, POWER),
    e(&["nanowatt", "nW"], 1e-9, POWER),
    e(&["kilowatt", "kW", "kilowatts"], 1000.0, POWER),
    e(&["megawatt", "MW", "megawatts"], 1e6, POWER),
    e(&["gigawatt", "GW"], 1e9, POWER),
    e(&["terawatt", "TW"], 1e12, POWER),
    e(&["horsepower", "hp"], 745.699_872, POWER),
    e(&["metric_horsepower", "PS"], 735.498_75, POWER),
    e(&["boiler_horsepower"], 9809.5, POWER),

    // Pressure
    si(&["pascal", "Pa", "pascals"], 1.0, PRESSURE),
    e(&["kilopascal", "kPa"], 1000.0, PRESSURE),
    e(&["megapascal", "MPa"], 1e6, PRESSURE),
    e(&["gigapascal", "GPa"], 1e9, PRESSURE),
    si(&["bar", "bars"], 1e5, PRESSURE),
    e(&["millibar", "mbar"], 100.0, PRESSURE),
    e(&["microbar", "ubar"], 0.1, PRESSURE),
    e(&["barye"], 0.1, PRESSURE),
    e(&["atmosphere", "atm"], 101_325.0, PRESSURE),
    e(&["technical_atmosphere", "at"], 98_066.5, PRESSURE),
    e(&["psi", "PSI", "pound_per_square_inch"], 6894.757_293, PRESSURE),
    e(&["torr", "Torr"], 133.322_368, PRESSURE),
    e(&["millimeter_mercury", "mmHg"], 133.322_387, PRESSURE),
    e(&["inch_mercury", "inHg"], 3386.389, PRESSURE),

    // Force
    si(&["newton", "N", "newtons"], 1.0, FORCE),
    e(&["kilonewton", "kN"], 1000.0, FORCE),
    e(&["meganewton", "MN"], 1e6, FORCE),
    e(&["dyne", "dyn"], 1e-5, FORCE),
    e(&["pound_force", "lbf"], 4.448_221_615, FORCE),
    e(&["kilogram_force", "kgf"], 9.806_65, FORCE),
    e(&["gram_force", "gf"], 0.009_806_65, FORCE),
    e(&["ton_force", "tf"], 9806.65, FORCE),
    e(&["poundal"], 0.138_254_954, FORCE),
    e(&["kip"], 4448.221_615, FORCE),

    // Frequency
    si(&["hertz", "Hz"], 1.0, FREQUENCY),
    e(&["millihertz", "mHz"], 0.001, FREQUENCY),
    e(&["kilohertz", "kHz"], 1000.0, FREQUENCY),
    e(&["megahertz", "MHz"], 1e6, FREQUENCY),
    e(&["gigahertz", "GHz"], 1e9, FREQUENCY),
    e(&["terahertz", "THz"], 1e12, FREQUENCY),
    e(&["rpm"], 1.0 / 60.0, FREQUENCY),
    e(&["rps"], 1.0, FREQUENCY),

    // Electromagnetic
    si(&["volt", "V", "volts"], 1.0, VOLTAGE),
    e(&["millivolt", "mV"], 0.001, VOLTAGE),
    e(&["microvolt", "uV", "µV"], 1e-6, VOLTAGE),
    e(&["nanovolt", "nV"], 1e-9, VOLTAGE),
    e(&["kilovolt", "kV"], 1000.0, VOLTAGE),
    e(&["megavolt", "MV"], 1e6, VOLTAGE),
    e(&["statvolt"], 299.792_458, VOLTAGE),
    si(&["coulomb", "C", "coulombs"], 1.0, CHARGE),
    si(&["ohm", "Ω", "ohms"], 1.0, RESISTANCE),
    e(&["kiloohm", "kΩ"], 1000.0, RESISTANCE),
    e(&["megaohm", "MΩ"], 1e6, RESISTANCE),
    si(&["siemens", "S"], 1.0, CONDUCTANCE),
    si(&["farad", "F", "farads"], 1.0, CAPACITANCE),
    e(&["millifarad", "mF"], 0.001, CAPACITANCE),
    e(&["microfarad", "uF", "µF"], 1e-6, CAPACITANCE),
    e(&["nanofarad", "nF"], 1e-9, CAPACITANCE),
    e(&["picofarad", "pF"], 1e-12, CAPACITANCE),
    si(&["henry", "H", "henrys"], 1.0, INDUCTANCE),
    e(&["millihenry", "mH"], 0.001, INDUCTANCE),
    e(&["microhenry", "uH", "µH"], 1e-6, INDUCTANCE),
    e(&["nanohenry", "nH"], 1e-9, INDUCTANCE),
    si(&["tesla", "T", "teslas"], 1.0, MAGNETIC_FIELD),
    e(&["millitesla", "mT"], 0.001, MAGNETIC_FIELD),
    e(&["microtesla", "uT", "µT"], 1e-6, MAGNETIC_FIELD),
    e(&["nanotesla", "nT"], 1e-9, MAGNETIC_FIELD),
    e(&["gauss", "G"], 1e-4, MAGNETIC_FIELD),
    e(&["milligauss", "mG"], 1e-7, MAGNETIC_FIELD),
    si(&["weber", "Wb", "webers"], 1.0, MAGNETIC_FLUX),
    e(&["milliweber", "mWb"], 0.001, MAGNETIC_FLUX),
    e(&["maxwell", "Mx"], 1e-8, MAGNETIC_FLUX),

    // Photometry (the steradian is dimensionless)
    si(&["lumen", "lm", "lumens"], 1.0, LUMINOSITY),
    si(&["lux", "lx"], 1.0, ILLUMINANCE),
    e(&["foot_candle", "fc"], 10.763_910_4, ILLUMINANCE),
    e(&["phot", "ph"], 10_000.0, ILLUMINANCE),

    // Radioactivity and dose
    si(&["becquerel", "Bq", "becquerels"], 1.0, FREQUENCY),
    e(&["kilobecquerel", "kBq"], 1000.0, FREQUENCY),
    e(&["megabecquerel", "MBq"], 1e6, FREQUENCY),
    e(&["gigabecquerel", "GBq"], 1e9, FREQUENCY),
    e(&["curie", "Ci"], 3.7e10, FREQUENCY),
    e(&["millicurie", "mCi"], 3.7e7, FREQUENCY),
    e(&["microcurie", "uCi"], 3.7e4, FREQUENCY),
    e(&["rutherford", "Rd"], 1e6, FREQUENCY),
    si(&["gray", "Gy", "grays"], 1.0, DOSE),
    e(&["milligray", "mGy"], 0.001, DOSE),
    si(&["sievert", "Sv", "sieverts"], 1.0, DOSE),
    e(&["millisievert", "mSv"], 0.001, DOSE),
    e(&["microsievert", "uSv", "µSv"], 1e-6, DOSE),
    e(&["rem"], 0.01, DOSE),
    e(&["millirem", "mrem"], 1e-5, DOSE),

    // Catalytic activity
    si(&["katal", "kat"], 1.0, CATALYTIC),
    e(&["enzyme_unit", "unit", "U"], 1.0 / 60.0 * 1e-6, CATALYTIC),

    // Volume and area
    si(&["liter", "L", "liters", "litre", "litres"], 0.001, VOLUME),
    e(&["milliliter", "mL", "milliliters"], 1e-6, VOLUME),
    e(&["gallon", "gal", "gallons"], 0.003_785_411_784, VOLUME),
    e(&["quart", "qt"], 0.000_946_352_946, VOLUME),
    e(&["pint", "pt"], 0.000_473_176_473, VOLUME),
    e(&["cup", "cups"], 0.000_236_588_236_5, VOLUME),
    e(&["fluid_ounce", "fl_oz"], 2.957_352_956_25e-5, VOLUME),
    e(&["hectare", "ha"], 10_000.0, AREA),
    e(&["acre", "acres"], 4046.856_422_4, AREA),

    // Angles and ratios (dimensionless)
    e(&["radian", "rad", "radians"], 1.0, NONE),
    e(&["degree", "deg", "degrees"], std::f64::consts::PI / 180.0, NONE),
    e(&["arcminute", "arcmin"], std::f64::consts::PI / 10_800.0, NONE),
    e(&["arcsecond", "arcsec"], std::f64::consts::PI / 648_000.0, NONE),
    e(&["gradian", "grad"], std::f64::consts::PI / 200.0, NONE),
    e(&["steradian", "sr"], 1.0, NONE),
    e(&["percent", "%"], 0.01, NONE),
    e(&["ppm"], 1e-6, NONE),
    e(&["ppb"], 1e-9, NONE),
    e(&["ppt"], 1e-12, NONE),

    // Information (bits are the reference)
    Entry { symbols: &["bit", "b", "bits"], factor: 1.0, dim: NONE, prefixes: Prefixes::All },
    Entry { symbols: &["byte", "B", "bytes"], factor: 8.0, dim: NONE, prefixes: Prefixes::All },
    e(&["kilobyte", "kB"], 8e3, NONE),
    e(&["megabyte", "MB"], 8e6, NONE),
    e(&["gigabyte", "GB"], 8e9, NONE),
    e(&["terabyte", "TB"], 8e12, NONE),
    e(&["petabyte", "PB"], 8e15, NONE),
    e(&["kibibyte", "KiB"], 8192.0, NONE),
    e(&["mebibyte", "MiB"], 8_388_608.0, NONE),
    e(&["gibibyte", "GiB"], 8_589_934_592.0, NONE),
    e(&["tebibyte", "TiB"], 8_796_093_022_208.0, NONE),

    // Velocity and acceleration
    e(&["knot", "kt", "kn"], 1852.0 / 3600.0, VELOCITY),
    e(&["mach"], 343.0, VELOCITY),
    e(&["galileo", "Gal"], 0.01, ACCELERATION),
    e(&["standard_gravity", "g0"], 9.806_65, ACCELERATION),

    // Viscosity
    e(&["pascal_second", "Pa_s"], 1.0, DYNAMIC_VISCOSITY),
    e(&["poise", "P"], 0.1, DYNAMIC_VISCOSITY),
    e(&["centipoise", "cP"], 0.001, DYNAMIC_VISCOSITY),
    e(&["stokes", "St"], 1e-4, KINEMATIC_VISCOSITY),
    e(&["centistokes", "cSt"], 1e-6, KINEMATIC_VISCOSITY),

    // Thermal
    e(&["watt_per_meter_kelvin", "W_m_K"], 1.0, THERMAL_CONDUCTIVITY),
    e(&["joule_per_kelvin", "J_K"], 1.0, HEAT_CAPACITY),
    e(&["joule_per_kilogram_kelvin", "J_kg_K"], 1.0, SPECIFIC_HEAT),

    // Chemistry
    e(&["gram_per_mole", "g_mol"], 0.001, MOLAR_MASS),
    e(&["kilogram_per_mole", "kg_mol"], 1.0, MOLAR_MASS),
    e(&["molar", "M"], 1000.0, CONCENTRATION),
    e(&["millimolar", "mM"], 1.0, CONCENTRATION),
    e(&["micromolar", "uM", "µM"], 0.001, CONCENTRATION),
    e(&["nanomolar", "nM"], 1e-6, CONCENTRATION),

    // Density and flow
    e(&["kilogram_per_cubic_meter", "kg_m3"], 1.0, DENSITY),
    e(&["gram_per_cubic_centimeter", "g_cm3"], 1000.0, DENSITY),
    e(&["gram_per_liter", "g_L"], 1.0, DENSITY),
    e(&["cubic_meter_per_second", "m3_s"], 1.0, FLOW),
    e(&["liter_per_second", "L_s"], 0.001, FLOW),
    e(&["liter_per_minute", "L_min"], 0.001 / 60.0, FLOW),
    e(&["gallon_per_minute", "gpm"], 0.003_785_411_784 / 60.0, FLOW),

    // Fuel efficiency: distance per volume is an inverse area
    e(&["mile_per_gallon", "mpg"], 1609.344 / 0.003_785_411_784, INVERSE_AREA),
    e(&["kilometer_per_liter", "km_L"], 1e6, INVERSE_AREA),
    e(&["liter_per_100km", "L_100km"], 1e-8, AREA),
];

/// Additive offsets (in the unit's own degrees) for non-ratio temperature scales.
static OFFSETS: &[(&str, f64)] = &[
    ("celsius", 273.15),
    ("degC", 273.15),
    ("°C", 273.15),
    ("fahrenheit", 459.67),
    ("degF", 459.67),
    ("°F", 459.67),
];

struct Table {
    by_symbol: HashMap<&'static str, (usize, UnitDef)>,
}

static TABLE: LazyLock<Table> = LazyLock::new(|| {
    let mut by_symbol = HashMap::new();
    for (index, entry) in ENTRIES.iter().enumerate() {
        for symbol in entry.symbols {
            let offset = OFFSETS
                .iter()
                .find(|(s, _)| s == symbol)
                .map_or(0.0, |(_, o)| *o);
            let def = UnitDef {
                factor: entry.factor,
                dimension: Dimension::from_integers(entry.dim),
                offset,
            };
            by_symbol.insert(*symbol, (index, def));
        }
    }
    Table { by_symbol }
});

/// Look up an atomic symbol: exact table entry first, then prefix + prefixable entry.
pub fn lookup(symbol: &str) -> Option<UnitDef> {
    if let Some((_, def)) = TABLE.by_symbol.get(symbol) {
        return Some(*def);
    }
    lookup_prefixed(symbol)
}

fn lookup_prefixed(symbol: &str) -> Option<UnitDef> {
    prefix::split_prefix(symbol).find_map(|(p, rest)| {
        let (index, def) = TABLE.by_symbol.get(rest)?;
        if accepts(ENTRIES[*index].prefixes, p) {
            Some(UnitDef {
                factor: def.factor * p.factor(),
                ..*def
            })
        } else {
            None
        }
    })
}

fn accepts(prefixes: Prefixes, p: Prefix) -> bool {
    match prefixes {
        Prefixes::None => false,
        Prefixes::Metric => !p.is_binary(),
        Prefixes::All => true,
    }
}

/// True if the symbol resolves (directly or through a prefix).
pub fn is_known(symbol: &str) -> bool {
    lookup(symbol).is_some()
}

/// Every symbol in the table (no prefixed forms), for suggestions and listings.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().flat_map(|e| e.symbols.iter().copied())
}
