//! Lexer for unit expressions: symbols, numbers and the operators `* / ^ ( )`.
//! Whitespace separates tokens; the parser reads adjacent factors as a product.

use ordered_float::OrderedFloat;
use std::str::FromStr;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(OrderedFloat<f64>),
    /// Atomic unit symbol, e.g. `km`, `°C`, `%`, `W_m_K`.
    Symbol(String),
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LexicalError {
    InvalidCharacter { ch: char, position: usize },
    InvalidNumber { text: String, position: usize },
}

impl LexicalError {
    pub fn position(&self) -> usize {
        match self {
            LexicalError::InvalidCharacter { position, .. }
            | LexicalError::InvalidNumber { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexicalError::InvalidCharacter { ch, .. } => write!(f, "invalid character '{ch}'"),
            LexicalError::InvalidNumber { text, .. } => write!(f, "invalid number: {text}"),
        }
    }
}

impl std::error::Error for LexicalError {}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '%' | '°')
}

fn is_symbol_continue(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '°')
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let skipped: usize = rest
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        self.pos += skipped;
    }

    fn take_symbol(&mut self) -> String {
        let rest = &self.input[self.pos..];
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let ok = if i == 0 {
                is_symbol_start(c)
            } else {
                // "%" is a symbol on its own
                !rest.starts_with('%') && is_symbol_continue(c)
            };
            if !ok {
                break;
            }
            end = i + c.len_utf8();
        }
        self.pos += end;
        rest[..end].to_string()
    }

    fn take_num(&mut self) -> Result<OrderedFloat<f64>, LexicalError> {
        let start = self.pos;
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();
        let n = bytes.len();
        let mut end = 0;
        // [0-9]+\.?[0-9]* or \.[0-9]+
        while end < n && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < n && bytes[end] == b'.' {
            end += 1;
            while end < n && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        // Optional exponent; "2eV" is the number 2 followed by the symbol eV
        if end < n && (bytes[end] == b'e' || bytes[end] == b'E') {
            let exp_start = end;
            end += 1;
            if end < n && (bytes[end] == b'+' || bytes[end] == b'-') {
                end += 1;
            }
            if end < n && bytes[end].is_ascii_digit() {
                while end < n && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            } else {
                end = exp_start;
            }
        }
        let s = &rest[..end];
        self.pos += end;
        f64::from_str(s)
            .map(OrderedFloat::from)
            .map_err(|_| LexicalError::InvalidNumber {
                text: s.to_string(),
                position: start,
            })
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Tok, usize, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.pos;
        let c = self.input[self.pos..].chars().next()?;

        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' | '·' => Tok::Star,
            '/' => Tok::Slash,
            '^' => Tok::Caret,
            '0'..='9' | '.' => {
                return Some(self.take_num().map(|n| (start, Tok::Num(n), self.pos)));
            }
            c if is_symbol_start(c) => {
                let s = self.take_symbol();
                return Some(Ok((start, Tok::Symbol(s), self.pos)));
            }
            ch => {
                return Some(Err(LexicalError::InvalidCharacter {
                    ch,
                    position: start,
                }));
            }
        };
        self.pos += c.len_utf8();
        Some(Ok((start, tok, self.pos)))
    }
}
