//! Metric and binary prefixes for unit symbols (e.g. kilo, milli, kibi).
//! Used as a fallback when a symbol is not in the unit table: "Mm" → mega × m.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prefix {
    /// Metric (decimal): 10^n.
    Metric(i32),
    /// Binary: 2^n.
    Binary(i32),
}

impl Prefix {
    /// Conversion factor: 10^n or 2^n.
    pub fn factor(&self) -> f64 {
        match self {
            Prefix::Metric(exp) => 10.0f64.powi(*exp),
            Prefix::Binary(exp) => 2.0f64.powi(*exp),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Prefix::Binary(_))
    }
}

/// Short prefix symbols. "da" must be tried before "d", so callers sort by length.
const SHORT: [(&str, Prefix); 26] = [
    ("Y", Prefix::Metric(24)),
    ("Z", Prefix::Metric(21)),
    ("E", Prefix::Metric(18)),
    ("P", Prefix::Metric(15)),
    ("T", Prefix::Metric(12)),
    ("G", Prefix::Metric(9)),
    ("M", Prefix::Metric(6)),
    ("k", Prefix::Metric(3)),
    ("h", Prefix::Metric(2)),
    ("da", Prefix::Metric(1)),
    ("d", Prefix::Metric(-1)),
    ("c", Prefix::Metric(-2)),
    ("m", Prefix::Metric(-3)),
    ("µ", Prefix::Metric(-6)),
    ("u", Prefix::Metric(-6)),
    ("n", Prefix::Metric(-9)),
    ("p", Prefix::Metric(-12)),
    ("f", Prefix::Metric(-15)),
    ("a", Prefix::Metric(-18)),
    ("z", Prefix::Metric(-21)),
    ("y", Prefix::Metric(-24)),
    ("Ki", Prefix::Binary(10)),
    ("Mi", Prefix::Binary(20)),
    ("Gi", Prefix::Binary(30)),
    ("Ti", Prefix::Binary(40)),
    ("Pi", Prefix::Binary(50)),
];

const LONG: [(&str, Prefix); 26] = [
    ("yotta", Prefix::Metric(24)),
    ("zetta", Prefix::Metric(21)),
    ("exa", Prefix::Metric(18)),
    ("peta", Prefix::Metric(15)),
    ("tera", Prefix::Metric(12)),
    ("giga", Prefix::Metric(9)),
    ("mega", Prefix::Metric(6)),
    ("kilo", Prefix::Metric(3)),
    ("hecto", Prefix::Metric(2)),
    ("deca", Prefix::Metric(1)),
    ("deka", Prefix::Metric(1)),
    ("deci", Prefix::Metric(-1)),
    ("centi", Prefix::Metric(-2)),
    ("milli", Prefix::Metric(-3)),
    ("micro", Prefix::Metric(-6)),
    ("nano", Prefix::Metric(-9)),
    ("pico", Prefix::Metric(-12)),
    ("femto", Prefix::Metric(-15)),
    ("atto", Prefix::Metric(-18)),
    ("zepto", Prefix::Metric(-21)),
    ("yocto", Prefix::Metric(-24)),
    ("kibi", Prefix::Binary(10)),
    ("mebi", Prefix::Binary(20)),
    ("gibi", Prefix::Binary(30)),
    ("tebi", Prefix::Binary(40)),
    ("pebi", Prefix::Binary(50)),
];

/// All (symbol, prefix) pairs, longest symbol first so "da" wins over "d"
/// and "milli" over "m".
pub fn prefixes_longest_first() -> Vec<(&'static str, Prefix)> {
    let mut all: Vec<_> = SHORT.iter().chain(LONG.iter()).copied().collect();
    all.sort_by_key(|(s, _)| std::cmp::Reverse(s.chars().count()));
    all
}

/// Split `symbol` into every (prefix, remainder) pair with a non-empty remainder.
pub fn split_prefix(symbol: &str) -> impl Iterator<Item = (Prefix, &str)> + '_ {
    prefixes_longest_first()
        .into_iter()
        .filter_map(move |(p, prefix)| {
            symbol
                .strip_prefix(p)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (prefix, rest))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_kilo_factor() {
        assert!((Prefix::Metric(3).factor() - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn prefix_milli_factor() {
        assert!((Prefix::Metric(-3).factor() - 0.001).abs() < 1e-10);
    }

    #[test]
    fn prefix_kibi_factor() {
        assert_eq!(Prefix::Binary(10).factor(), 1024.0);
        assert!(Prefix::Binary(10).is_binary());
    }

    #[test]
    fn split_tries_longest_first() {
        let splits: Vec<_> = split_prefix("dam").collect();
        assert_eq!(splits[0], (Prefix::Metric(1), "m"));
        assert!(splits.contains(&(Prefix::Metric(-1), "am")));
    }

    #[test]
    fn split_long_names() {
        let splits: Vec<_> = split_prefix("millimole").collect();
        assert_eq!(splits[0], (Prefix::Metric(-3), "mole"));
    }

    #[test]
    fn split_requires_remainder() {
        assert_eq!(split_prefix("k").count(), 0);
    }
}
