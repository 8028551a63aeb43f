//! Formula tokenizer
//!
//! Turns formula text into a flat token stream. The language is closed:
//! numbers, field references, `+ - * /` and parentheses. Anything else is an
//! error. References are looked up while lexing, so the token stream only
//! ever holds numbers, operators and parentheses.

use std::fmt;

use crate::dependency::{FieldRef, FIELD_REF};
use crate::error::{FormulaError, FormulaResult};

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Apply the operator with ordinary floating-point semantics
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        };
        write!(f, "{}", c)
    }
}

/// Formula tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal, unary minus already applied
    Number(f64),
    Op(Operator),
    LParen,
    RParen,
}

/// Tokenize an expression made of literals only
///
/// A `-` at the start of the expression, right after `(`, or right after
/// another operator is a sign and is folded into the following literal. A
/// literal takes at most one sign: `5--3` is `5 - (-3)`, `--3` is an error.
/// Field references are rejected; see [`tokenize_with`].
///
/// # Example
/// ```rust
/// use qualdoc_formula::lexer::{tokenize, Operator, Token};
///
/// let tokens = tokenize("-5+3").unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::Number(-5.0), Token::Op(Operator::Add), Token::Number(3.0)]
/// );
/// ```
pub fn tokenize(input: &str) -> FormulaResult<Vec<Token>> {
    Lexer::new(input, None).run()
}

/// Tokenize a formula, reading each field reference as one number
///
/// Every `{id}` or `{header.id}` becomes a single [`Token::Number`] holding
/// the value `resolve` returns, so a reference can never fuse with a
/// neighbouring literal or reference. A sign in front of a reference negates
/// its value, whatever that value's own sign. A reference without a finite
/// value stops tokenizing with [`FormulaError::MissingValue`].
///
/// # Example
/// ```rust
/// use qualdoc_formula::lexer::{tokenize_with, Operator, Token};
///
/// let tokens = tokenize_with("-{a}*2", |_| Some(-1.5)).unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::Number(1.5), Token::Op(Operator::Mul), Token::Number(2.0)]
/// );
/// ```
pub fn tokenize_with<F>(formula: &str, resolve: F) -> FormulaResult<Vec<Token>>
where
    F: Fn(&FieldRef) -> Option<f64>,
{
    Lexer::new(formula, Some(&resolve)).run()
}

type Resolve<'r> = &'r dyn Fn(&FieldRef) -> Option<f64>;

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    resolve: Option<Resolve<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, resolve: Option<Resolve<'a>>) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
            resolve,
        }
    }

    fn run(mut self) -> FormulaResult<Vec<Token>> {
        loop {
            self.skip_whitespace();
            let c = match self.peek_char() {
                Some(c) => c,
                None => break,
            };

            match c {
                '-' if self.sign_position() => {
                    self.advance();
                    self.skip_whitespace();
                    let operand = self.scan_operand()?;
                    self.tokens.push(Token::Number(-operand));
                }
                '+' => self.push_op(Operator::Add),
                '-' => self.push_op(Operator::Sub),
                '*' => self.push_op(Operator::Mul),
                '/' => self.push_op(Operator::Div),
                '(' => {
                    self.advance();
                    self.tokens.push(Token::LParen);
                }
                ')' => {
                    self.advance();
                    self.tokens.push(Token::RParen);
                }
                _ => {
                    let operand = self.scan_operand()?;
                    self.tokens.push(Token::Number(operand));
                }
            }
        }

        Ok(self.tokens)
    }

    /// Whether a `-` here is a sign rather than subtraction
    fn sign_position(&self) -> bool {
        matches!(self.tokens.last(), None | Some(Token::LParen) | Some(Token::Op(_)))
    }

    fn push_op(&mut self, op: Operator) {
        self.advance();
        self.tokens.push(Token::Op(op));
    }

    /// A literal or, when resolving, a field reference
    fn scan_operand(&mut self) -> FormulaResult<f64> {
        match self.peek_char() {
            Some('{') if self.resolve.is_some() => self.scan_reference(),
            _ if self.at_number_start() => self.scan_number(),
            Some(ch) => Err(self.unexpected(ch)),
            None => Err(FormulaError::Parse("Expected number after '-'".into())),
        }
    }

    fn scan_reference(&mut self) -> FormulaResult<f64> {
        let input = self.input;
        let rest = &input[self.pos..];
        let field_ref = match FIELD_REF.captures(rest) {
            Some(caps) if caps.get(0).map_or(false, |m| m.start() == 0) => {
                self.pos += caps[0].len();
                FieldRef::from_captures(&caps)
            }
            _ => return Err(self.unexpected('{')),
        };

        match self.resolve.and_then(|resolve| resolve(&field_ref)) {
            Some(value) if value.is_finite() => Ok(value),
            _ => Err(FormulaError::MissingValue(field_ref)),
        }
    }

    fn scan_number(&mut self) -> FormulaResult<f64> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part, must carry at least one digit
        if self.peek_char() == Some('.') {
            if !self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()) {
                return Err(self.unexpected('.'));
            }
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", text)))
    }

    fn at_number_start(&self) -> bool {
        match self.peek_char() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn unexpected(&self, ch: char) -> FormulaError {
        FormulaError::Tokenize {
            ch,
            position: self.input[..self.pos].chars().count(),
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }
}
