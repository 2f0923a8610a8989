//! Parser: unit expression string → [Unit].
//!
//! Recursive descent over the [crate::lexer] tokens:
//!
//! ```text
//! expr     := product ('/' product)*
//! product  := factor (('*' | juxtaposition) factor)*
//! factor   := primary ('^' exponent)?
//! primary  := SYMBOL | ['-'] NUMBER | '(' expr ')'
//! exponent := ['+'|'-'] NUMBER | '(' ['-'] NUMBER ['/' NUMBER] ')'
//! ```
//!
//! Each `/` divides by the product that follows it, so `a/b/c` is a·b⁻¹·c⁻¹ and
//! the rendered form `a * b / c * d` reads back unchanged. Numbers scale the unit.

use crate::dimension::Exponent;
use crate::error::UnitError;
use crate::lexer::{Lexer, Tok};
use crate::unit::Unit;

/// Parse a unit expression without consulting the parse cache.
pub fn parse(input: &str) -> Result<Unit, UnitError> {
    let tokens = Lexer::new(input)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| UnitError::parse(input, e.to_string(), e.position()))?;
    if tokens.is_empty() {
        return Err(UnitError::parse(input, "empty unit expression", 0));
    }
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
    };
    let unit = parser.expr()?;
    match parser.peek() {
        None => parser.finish(unit),
        Some((start, Tok::RParen)) => Err(parser.error("unbalanced parenthesis", start)),
        Some((start, tok)) => Err(parser.error(format!("unexpected {}", describe(&tok)), start)),
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Tok, usize)>,
    pos: usize,
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Num(n) => format!("number {n}"),
        Tok::Symbol(s) => format!("symbol '{s}'"),
        Tok::LParen => "'('".to_string(),
        Tok::RParen => "')'".to_string(),
        Tok::Plus => "'+'".to_string(),
        Tok::Minus => "'-'".to_string(),
        Tok::Star => "'*'".to_string(),
        Tok::Slash => "'/'".to_string(),
        Tok::Caret => "'^'".to_string(),
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<(usize, Tok)> {
        self.tokens.get(self.pos).map(|(s, t, _)| (*s, t.clone()))
    }

    fn peek_tok(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(_, t, _)| t)
    }

    fn advance(&mut self) -> Option<(usize, Tok, usize)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_position(&self) -> usize {
        self.input.len()
    }

    fn error(&self, reason: impl Into<String>, position: usize) -> UnitError {
        UnitError::parse(self.input, reason, position)
    }

    fn starts_primary(&self) -> bool {
        match self.peek_tok() {
            Some(Tok::Symbol(_) | Tok::Num(_) | Tok::LParen) => true,
            Some(Tok::Minus) => matches!(
                self.tokens.get(self.pos + 1).map(|(_, t, _)| t),
                Some(Tok::Num(_))
            ),
            _ => false,
        }
    }

    /// Reject results whose scale or dimension cannot be represented.
    fn finish(&self, unit: Unit) -> Result<Unit, UnitError> {
        if unit.scale() == 0.0 || !unit.scale().is_finite() {
            return Err(self.error(
                format!("scale must be finite and non-zero, got {}", unit.scale()),
                0,
            ));
        }
        if unit.checked_dimensionality().is_none() {
            return Err(self.error("exponent out of range", 0));
        }
        Ok(unit)
    }

    fn overflow(&self, position: usize) -> UnitError {
        self.error("exponent out of range", position)
    }

    fn expr(&mut self) -> Result<Unit, UnitError> {
        let mut unit = self.product()?;
        while let Some((start, Tok::Slash)) = self.peek() {
            self.advance();
            let denominator = self.product()?;
            unit = unit
                .checked_div(&denominator)
                .ok_or_else(|| self.overflow(start))?;
        }
        Ok(unit)
    }

    fn product(&mut self) -> Result<Unit, UnitError> {
        let mut unit = self.factor()?;
        loop {
            let start = match self.peek() {
                Some((start, Tok::Star)) => {
                    self.advance();
                    start
                }
                Some((start, _)) if self.starts_primary() => start,
                _ => return Ok(unit),
            };
            let rhs = self.factor()?;
            unit = unit.checked_mul(&rhs).ok_or_else(|| self.overflow(start))?;
        }
    }

    fn factor(&mut self) -> Result<Unit, UnitError> {
        let base = self.primary()?;
        if let Some((caret, Tok::Caret)) = self.peek() {
            self.advance();
            let exponent = self.exponent()?;
            return base.checked_power(exponent).ok_or_else(|| self.overflow(caret));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Unit, UnitError> {
        match self.advance() {
            None => Err(self.error("expected a unit", self.end_position())),
            Some((_, Tok::Symbol(s), _)) => Ok(match s.as_str() {
                "dimensionless" => Unit::dimensionless(),
                _ => Unit::from_symbol(s),
            }),
            Some((start, Tok::Num(n), _)) => self.scale(n.0, start),
            Some((_, Tok::Minus, _)) => match self.advance() {
                Some((start, Tok::Num(n), _)) => self.scale(-n.0, start),
                Some((start, tok, _)) => Err(self.error(format!("unexpected {}", describe(&tok)), start)),
                None => Err(self.error("expected a number after '-'", self.end_position())),
            },
            Some((open, Tok::LParen, _)) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some((_, Tok::RParen, _)) => Ok(inner),
                    _ => Err(self.error("unbalanced parenthesis", open)),
                }
            }
            Some((start, tok, _)) => Err(self.error(
                format!("expected a unit, found {}", describe(&tok)),
                start,
            )),
        }
    }

    fn scale(&self, value: f64, position: usize) -> Result<Unit, UnitError> {
        if value == 0.0 || !value.is_finite() {
            return Err(self.error(format!("scale must be finite and non-zero, got {value}"), position));
        }
        Ok(Unit::from_scale(value))
    }

    fn exponent(&mut self) -> Result<Exponent, UnitError> {
        match self.peek() {
            Some((open, Tok::LParen)) => {
                self.advance();
                let numer = self.signed_number()?;
                let value = if let Some(Tok::Slash) = self.peek_tok() {
                    self.advance();
                    let (start, denom) = self.number()?;
                    let (numer, denom) = match (integer(numer), integer(denom)) {
                        (Some(n), Some(d)) if d != 0 => (n, d),
                        _ => return Err(self.error("malformed exponent: expected n/d with integer d != 0", start)),
                    };
                    Exponent::new(numer, denom)
                } else {
                    self.rational(numer, open)?
                };
                match self.advance() {
                    Some((_, Tok::RParen, _)) => Ok(value),
                    _ => Err(self.error("unbalanced parenthesis", open)),
                }
            }
            Some((start, _)) => {
                let n = self.signed_number()?;
                self.rational(n, start)
            }
            None => Err(self.error("malformed exponent: missing value after '^'", self.end_position())),
        }
    }

    fn signed_number(&mut self) -> Result<f64, UnitError> {
        let sign = match self.peek_tok() {
            Some(Tok::Minus) => {
                self.advance();
                -1.0
            }
            Some(Tok::Plus) => {
                self.advance();
                1.0
            }
            _ => 1.0,
        };
        let (_, n) = self.number()?;
        Ok(sign * n)
    }

    fn number(&mut self) -> Result<(usize, f64), UnitError> {
        match self.advance() {
            Some((start, Tok::Num(n), _)) => Ok((start, n.0)),
            Some((start, tok, _)) => Err(self.error(
                format!("malformed exponent: unexpected {}", describe(&tok)),
                start,
            )),
            None => Err(self.error("malformed exponent", self.end_position())),
        }
    }

    /// Decimal exponents ("0.5", "1.25") become exact rationals with a
    /// denominator of at most 10^6. Anything finer is an error, never rounded
    /// away.
    fn rational(&self, value: f64, position: usize) -> Result<Exponent, UnitError> {
        let mut denom: i64 = 1;
        for _ in 0..=6 {
            let scaled = value * denom as f64;
            let rounded = scaled.round();
            if (scaled - rounded).abs() <= 1e-9 * scaled.abs() && rounded.abs() < i64::MAX as f64 {
                return Ok(Exponent::new(rounded as i64, denom));
            }
            denom *= 10;
        }
        Err(self.error(format!("malformed exponent: {value}"), position))
    }
}

fn integer(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(u: &Unit, symbol: &str) -> Exponent {
        u.exponent(symbol)
    }

    fn int(n: i64) -> Exponent {
        Exponent::from_integer(n)
    }

    #[test]
    fn parse_single_symbol() {
        let u = parse("meter").unwrap();
        assert_eq!(exp(&u, "meter"), int(1));
        assert_eq!(u.components().count(), 1);
    }

    #[test]
    fn parse_quotient() {
        let u = parse("meter/second").unwrap();
        assert_eq!(exp(&u, "meter"), int(1));
        assert_eq!(exp(&u, "second"), int(-1));
    }

    #[test]
    fn parse_product_by_star_and_space() {
        let a = parse("kg * m").unwrap();
        let b = parse("kg m").unwrap();
        assert_eq!(a, b);
        assert_eq!(exp(&a, "kg"), int(1));
    }

    #[test]
    fn parse_caret_exponents() {
        let u = parse("kg * m^2 / s^2").unwrap();
        assert_eq!(exp(&u, "m"), int(2));
        assert_eq!(exp(&u, "s"), int(-2));
        let neg = parse("s^-1").unwrap();
        assert_eq!(exp(&neg, "s"), int(-1));
    }

    #[test]
    fn parse_fractional_exponents() {
        let u = parse("m^(1/2)").unwrap();
        assert_eq!(exp(&u, "m"), Exponent::new(1, 2));
        let d = parse("Hz^0.5").unwrap();
        assert_eq!(exp(&d, "Hz"), Exponent::new(1, 2));
        let n = parse("m^(-3/2)").unwrap();
        assert_eq!(exp(&n, "m"), Exponent::new(-3, 2));
    }

    #[test]
    fn each_slash_divides() {
        let u = parse("m/s/s").unwrap();
        assert_eq!(exp(&u, "s"), int(-2));
        let v = parse("J / kg * K").unwrap();
        assert_eq!(exp(&v, "kg"), int(-1));
        assert_eq!(exp(&v, "K"), int(-1));
    }

    #[test]
    fn parentheses_group() {
        let u = parse("rad/(s*T)").unwrap();
        assert_eq!(exp(&u, "s"), int(-1));
        assert_eq!(exp(&u, "T"), int(-1));
        let v = parse("(m/s)^2").unwrap();
        assert_eq!(exp(&v, "m"), int(2));
        assert_eq!(exp(&v, "s"), int(-2));
    }

    #[test]
    fn numbers_scale() {
        let u = parse("220 yard").unwrap();
        assert_eq!(u.scale(), 220.0);
        assert_eq!(exp(&u, "yard"), int(1));
        let r = parse("1 / second").unwrap();
        assert_eq!(r.scale(), 1.0);
        assert_eq!(exp(&r, "second"), int(-1));
    }

    #[test]
    fn dimensionless_keyword_is_empty() {
        assert!(parse("dimensionless").unwrap().is_empty());
        assert!(parse("1").unwrap().is_empty());
    }

    fn reason(input: &str) -> String {
        match parse(input) {
            Err(UnitError::Parse { reason, .. }) => reason,
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn exponent_overflow_is_an_error() {
        assert_eq!(
            reason("m^9000000000000000000 * m^9000000000000000000"),
            "exponent out of range"
        );
        assert_eq!(reason("(m^4294967296)^4294967296"), "exponent out of range");
        assert_eq!(reason("m^4611686018427387904 / m^-4611686018427387904"), "exponent out of range");
        // The dimension of kWh doubles the length exponent.
        assert_eq!(reason("kWh^4611686018427387904"), "exponent out of range");
        let big = parse("m^9000000000000000000").unwrap();
        assert_eq!(exp(&big, "m"), int(9_000_000_000_000_000_000));
    }

    #[test]
    fn tiny_decimal_exponents_are_not_rounded_to_zero() {
        assert!(reason("m^0.0000000001").starts_with("malformed exponent"));
        assert!(reason("m^-0.00000001").starts_with("malformed exponent"));
        assert_eq!(exp(&parse("m^0.000001").unwrap(), "m"), Exponent::new(1, 1_000_000));
        assert_eq!(exp(&parse("m^2.5").unwrap(), "m"), Exponent::new(5, 2));
        assert!(parse("m^0").unwrap().is_empty());
    }

    #[test]
    fn zero_and_non_finite_scales_are_rejected() {
        for input in ["0 m", "-0 m", "m * 0", "1e400 m", "(1e200)^2 m", "(1e-200)^2 m"] {
            assert!(
                reason(input).starts_with("scale must be finite and non-zero"),
                "{input}"
            );
        }
        assert_eq!(parse("-2 m").unwrap().scale(), -2.0);
    }

    #[test]
    fn errors_carry_positions() {
        let cases = [
            ("", 0),
            ("m/", 2),
            ("m*", 2),
            ("(m/s", 0),
            ("m/s)", 3),
            ("m^", 2),
            ("m^x", 2),
            ("m # s", 2),
            ("m^(1/0)", 5),
        ];
        for (input, position) in cases {
            match parse(input) {
                Err(UnitError::Parse { position: p, .. }) => {
                    assert_eq!(p, position, "position for {input:?}")
                }
                other => panic!("expected parse error for {input:?}, got {other:?}"),
            }
        }
    }
}
