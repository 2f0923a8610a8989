//! Physical and mathematical constants as quantities (CODATA 2018 where
//! applicable). Each constant has a long name and zero or more short names;
//! all of them are accepted by [get_constant].

use crate::error::ConstantError;
use crate::quantity::Quantity;
use std::collections::BTreeMap;
use std::sync::LazyLock;

struct Constant {
    names: &'static [&'static str],
    value: f64,
    unit: &'static str,
}

const fn k(names: &'static [&'static str], value: f64, unit: &'static str) -> Constant {
    Constant { names, value, unit }
}

const DIMENSIONLESS: &str = "dimensionless";
const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

#[rustfmt::skip]
static CONSTANTS: &[Constant] = &[
    // Mathematical
    k(&["pi", "π"], std::f64::consts::PI, DIMENSIONLESS),
    k(&["e"], std::f64::consts::E, DIMENSIONLESS),
    k(&["golden_ratio"], GOLDEN_RATIO, DIMENSIONLESS),

    // Fundamental
    k(&["speed_of_light", "c"], 299_792_458.0, "meter / second"),
    k(&["planck", "h"], 6.626_070_15e-34, "joule * second"),
    k(&["hbar"], 1.054_571_817e-34, "joule * second"),
    k(&["gravitational_constant", "G"], 6.674_30e-11, "meter^3 / kilogram / second^2"),
    k(&["elementary_charge", "e_charge"], 1.602_176_634e-19, "coulomb"),
    k(&["electron_mass", "m_e"], 9.109_383_701_5e-31, "kilogram"),
    k(&["proton_mass", "m_p"], 1.672_621_923_69e-27, "kilogram"),
    k(&["neutron_mass", "m_n"], 1.674_927_498_04e-27, "kilogram"),
    k(&["avogadro", "N_A"], 6.022_140_76e23, "1 / mole"),
    k(&["boltzmann", "k_B"], 1.380_649e-23, "joule / kelvin"),
    k(&["gas_constant", "molar_gas_constant", "R"], 8.314_462_618, "joule / mole / kelvin"),
    k(&["stefan_boltzmann", "sigma"], 5.670_374_419e-8, "watt / meter^2 / kelvin^4"),
    k(&["electric_constant", "epsilon_0"], 8.854_187_812_8e-12, "farad / meter"),
    k(&["magnetic_constant", "mu_0"], 1.256_637_062_12e-6, "henry / meter"),
    k(&["standard_gravity", "g"], 9.806_65, "meter / second^2"),
    k(&["standard_atmosphere", "atm"], 101_325.0, "pascal"),
    k(&["absolute_zero"], 0.0, "kelvin"),

    // Astronomical
    k(&["astronomical_unit", "AU"], 1.495_978_707e11, "meter"),
    k(&["light_year", "ly"], 9.460_730_472_580_8e15, "meter"),
    k(&["parsec", "pc"], 3.085_677_581_491_367_3e16, "meter"),
    k(&["solar_mass", "M_sun"], 1.988_47e30, "kilogram"),
    k(&["earth_mass", "M_earth"], 5.972_17e24, "kilogram"),
    k(&["earth_radius", "R_earth"], 6.371e6, "meter"),
    k(&["solar_luminosity", "L_sun"], 3.828e26, "watt"),
    k(&["solar_radius", "R_sun"], 6.96e8, "meter"),
    k(&["jupiter_mass", "M_jupiter"], 1.898e27, "kilogram"),
    k(&["moon_mass", "M_moon"], 7.342e22, "kilogram"),
    k(&["hubble_constant", "H_0"], 2.3e-18, "1 / second"),
    k(&["cmb_temperature", "T_CMB"], 2.725, "kelvin"),
    k(&["universe_age"], 4.35e17, "second"),
    k(&["critical_density", "rho_c"], 9.47e-27, "kilogram / meter^3"),
    k(&["schwarzschild_earth"], 8.87e-3, "meter"),
    k(&["schwarzschild_sun"], 2.95e3, "meter"),

    // Atomic and nuclear
    k(&["bohr_radius", "a_0"], 5.291_772_109_03e-11, "meter"),
    k(&["rydberg", "R_inf"], 10_973_731.568_160, "1 / meter"),
    k(&["fine_structure", "alpha"], 7.297_352_569_3e-3, DIMENSIONLESS),
    k(&["atomic_mass_unit", "amu", "u"], 1.660_539_066_60e-27, "kilogram"),
    k(&["faraday", "F"], 96_485.332_12, "coulomb / mole"),
    k(&["compton_wavelength", "lambda_C"], 2.426_310_238_67e-12, "meter"),
    k(&["electron_radius", "r_e"], 2.817_940_326_2e-15, "meter"),
    k(&["thomson_cross_section", "sigma_T"], 6.652_458_732_1e-29, "meter^2"),
    k(&["muon_mass", "m_mu"], 1.883_531_627e-28, "kilogram"),
    k(&["tau_mass", "m_tau"], 3.167_54e-27, "kilogram"),
    k(&["electron_g_factor"], -2.002_319_304_362_56, DIMENSIONLESS),

    // Electromagnetic
    k(&["vacuum_impedance", "Z_0"], 376.730_313_668, "ohm"),
    k(&["conductance_quantum", "G_0"], 7.748_091_729e-5, "siemens"),
    k(&["josephson", "K_J"], 483_597.848_4e9, "hertz / volt"),
    k(&["von_klitzing", "R_K"], 25_812.807_45, "ohm"),
    k(&["flux_quantum", "Phi_0"], 2.067_833_848e-15, "weber"),
    k(&["bohr_magneton", "mu_B"], 9.274_010_078_3e-24, "joule / tesla"),
    k(&["nuclear_magneton", "mu_N"], 5.050_783_746_1e-27, "joule / tesla"),
    k(&["proton_magnetic_moment", "mu_p_mag"], 1.410_606_797_36e-26, "joule / tesla"),
    k(&["electron_magnetic_moment", "mu_e_mag"], -9.284_764_704_3e-24, "joule / tesla"),
    k(&["neutron_magnetic_moment", "mu_n_mag"], -9.662_365_1e-27, "joule / tesla"),
    k(&["proton_gyromagnetic", "gamma_p"], 2.675_221_874_4e8, "radian / (second * tesla)"),

    // Planck units
    k(&["planck_length", "l_P"], 1.616_255e-35, "meter"),
    k(&["planck_mass", "m_P"], 2.176_434e-8, "kilogram"),
    k(&["planck_time", "t_P"], 5.391_247e-44, "second"),
    k(&["planck_temperature", "T_P"], 1.416_784e32, "kelvin"),
    k(&["planck_energy", "E_P"], 1.9561e9, "joule"),

    // Radiation
    k(&["wien", "b_wien"], 2.897_771_955e-3, "meter * kelvin"),
    k(&["radiation_first", "c1"], 3.741_771_852e-16, "watt * meter^2"),
    k(&["radiation_second", "c2"], 1.438_776_877e-2, "meter * kelvin"),
];

static BY_NAME: LazyLock<BTreeMap<&'static str, Quantity>> = LazyLock::new(|| {
    CONSTANTS
        .iter()
        .flat_map(|c| {
            let q = Quantity::new(c.value, c.unit)
                .unwrap_or_else(|e| panic!("built-in constant unit {:?}: {e}", c.unit));
            c.names.iter().map(move |name| (*name, q.clone()))
        })
        .collect()
});

/// Look up a constant by long or short name (case-sensitive: `G` is the
/// gravitational constant, `g` standard gravity).
pub fn get_constant(name: &str) -> Result<Quantity, ConstantError> {
    BY_NAME
        .get(name)
        .cloned()
        .ok_or_else(|| ConstantError::NotFound {
            name: name.to_string(),
        })
}

/// All accepted names, sorted.
pub fn list_constants() -> Vec<&'static str> {
    BY_NAME.keys().copied().collect()
}
