//! Formula parser
//!
//! A recursive descent parser over the token stream with standard arithmetic
//! precedence. The expression is evaluated while it is parsed; there is no
//! intermediate tree.
//!
//! ```text
//! expr   = term (('+' | '-') term)*
//! term   = factor (('*' | '/') factor)*
//! factor = NUMBER | '(' expr ')'
//! ```
//!
//! Unary minus never reaches the parser: the tokenizer folds it into the
//! literal.

use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{Operator, Token};

/// Deepest parenthesis nesting accepted
///
/// Keeps recursion bounded for any user-supplied formula.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse and evaluate a token stream
///
/// Returns `None` for any malformed expression: trailing tokens, an empty
/// factor, or unbalanced parentheses. The value itself may be non-finite;
/// callers decide what that means.
pub fn parse(tokens: &[Token]) -> Option<f64> {
    parse_tokens(tokens).ok()
}

/// Parse and evaluate a token stream, reporting why it is malformed
pub fn parse_tokens(tokens: &[Token]) -> FormulaResult<f64> {
    let mut parser = Parser::new(tokens);
    let value = parser.parse_expr()?;

    // Make sure we consumed all input
    if let Some(token) = parser.peek() {
        return Err(FormulaError::Parse(format!(
            "Unexpected token after expression: {:?}",
            token
        )));
    }

    Ok(value)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_term()?;

        while let Some(&Token::Op(op @ (Operator::Add | Operator::Sub))) = self.peek() {
            self.pos += 1;
            let right = self.parse_term()?;
            left = op.apply(left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_factor()?;

        while let Some(&Token::Op(op @ (Operator::Mul | Operator::Div))) = self.peek() {
            self.pos += 1;
            let right = self.parse_factor()?;
            left = op.apply(left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> FormulaResult<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(FormulaError::Parse(format!(
                        "Parentheses nested deeper than {}",
                        MAX_NESTING_DEPTH
                    )));
                }
                self.depth += 1;
                let value = self.parse_expr()?;
                self.depth -= 1;

                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(FormulaError::Parse(format!(
                        "Expected ')', got {:?}",
                        other
                    ))),
                    None => Err(FormulaError::Parse("Unclosed '('".into())),
                }
            }
            Some(other) => Err(FormulaError::Parse(format!(
                "Expected number or '(', got {:?}",
                other
            ))),
            None => Err(FormulaError::Parse("Unexpected end of formula".into())),
        }
    }
}
