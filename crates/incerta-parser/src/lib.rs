//! # incerta-parser
//!
//! Parses free-form infix algebra (`+ - * / ^`, parentheses, numeric
//! literals, variable identifiers) into an arena-allocated expression DAG.
//!
//! Parsing is a pure function of the input text: the same text always
//! produces a structurally identical tree, and a failed parse never leaks a
//! partial [`Formula`]. Decimal literals are converted to exact rationals,
//! so `0.1` is one tenth, not the nearest float; wider magnitudes such as
//! `6.022e23` keep their exact digits-times-power-of-ten form.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod token;

use std::fmt;

use incerta_core::{free_variables, render, ExprArena, ExprHandle, ExprNode, SmallRational};

use crate::token::{tokenize, SpannedToken, Token};

/// A successfully parsed expression.
///
/// Owns its arena, so independent formulas (and independent sessions) never
/// share expression nodes. The free-variable list is sorted lexicographically
/// ascending and de-duplicated.
#[derive(Debug)]
pub struct Formula {
    arena: ExprArena,
    root: ExprHandle,
    text: String,
    variables: Vec<String>,
}

impl Formula {
    /// The sorted, de-duplicated free-variable names of the expression.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The original source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The root of the expression DAG.
    #[must_use]
    pub fn root(&self) -> ExprHandle {
        self.root
    }

    /// The arena holding the expression nodes.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Mutable access to the arena, for interning derivative nodes.
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    /// Renders any handle from this formula's arena as parser-compatible
    /// infix text.
    #[must_use]
    pub fn render(&self, handle: ExprHandle) -> String {
        render(&self.arena, handle)
    }
}

/// A malformed-expression error.
///
/// Carries the byte position and, where available, the offending lexeme and
/// a hint at what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Byte offset into the input where the failure was detected.
    pub position: usize,
    /// The offending source text, if the failure is tied to a token.
    pub found: Option<String>,
    /// What the parser expected at this point, if known.
    pub expected: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at byte {}: {}", self.position, self.message)?;
        if let Some(found) = &self.found {
            write!(f, " (found '{found}')")?;
        }
        if let Some(expected) = &self.expected {
            write!(f, " (expected {expected})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Parses infix expression text into a [`Formula`].
///
/// # Errors
///
/// Returns [`ParseError`] on empty input, invalid tokens, mismatched
/// parentheses, dangling operators, trailing input, or a numeric literal
/// with more significant digits than can be stored exactly.
pub fn parse(input: &str) -> Result<Formula, ParseError> {
    let tokens = tokenize(input);

    if tokens.is_empty() {
        return Err(ParseError {
            message: "empty expression".to_string(),
            position: 0,
            found: None,
            expected: Some("an expression".to_string()),
        });
    }

    for t in &tokens {
        if t.token == Token::Error {
            return Err(ParseError {
                message: "invalid token".to_string(),
                position: t.start,
                found: Some(t.lexeme.clone()),
                expected: None,
            });
        }
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        arena: ExprArena::new(),
    };

    let root = parser.parse_expr()?;

    if let Some(extra) = parser.peek() {
        return Err(ParseError {
            message: "unexpected trailing input".to_string(),
            position: extra.start,
            found: Some(extra.lexeme.clone()),
            expected: None,
        });
    }

    let variables = free_variables(&parser.arena, root);
    Ok(Formula {
        arena: parser.arena,
        root,
        text: input.to_string(),
        variables,
    })
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Byte length of the input, used as the position of end-of-input errors.
    end: usize,
    arena: ExprArena,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self, token: Token) -> bool {
        if self.peek().map(|t| t.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error_here(&self, message: &str, expected: Option<&str>) -> ParseError {
        let (position, found) = match self.peek() {
            Some(t) => (t.start, Some(t.lexeme.clone())),
            None => (self.end, None),
        };
        ParseError {
            message: message.to_string(),
            position,
            found,
            expected: expected.map(str::to_string),
        }
    }

    /// expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<ExprHandle, ParseError> {
        let mut node = self.parse_term()?;
        loop {
            if self.consume(Token::Plus) {
                let rhs = self.parse_term()?;
                node = self.append_term(node, rhs);
            } else if self.consume(Token::Minus) {
                let rhs = self.parse_term()?;
                let rhs = self.negated(rhs);
                node = self.append_term(node, rhs);
            } else {
                break;
            }
        }
        Ok(node)
    }

    /// term := unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<ExprHandle, ParseError> {
        let mut node = self.parse_unary()?;
        loop {
            if self.consume(Token::Star) {
                let rhs = self.parse_unary()?;
                node = self.append_factor(node, rhs);
            } else if self.consume(Token::Slash) {
                let rhs = self.parse_unary()?;
                node = self.arena.div(node, rhs);
            } else {
                break;
            }
        }
        Ok(node)
    }

    /// unary := ('+' | '-')* power
    ///
    /// Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`.
    fn parse_unary(&mut self) -> Result<ExprHandle, ParseError> {
        let mut negate = false;
        loop {
            if self.consume(Token::Plus) {
                continue;
            }
            if self.consume(Token::Minus) {
                negate = !negate;
                continue;
            }
            break;
        }
        let operand = self.parse_power()?;
        if negate {
            Ok(self.negated(operand))
        } else {
            Ok(operand)
        }
    }

    /// power := atom ('^' unary)?   (right-associative)
    fn parse_power(&mut self) -> Result<ExprHandle, ParseError> {
        let base = self.parse_atom()?;
        if self.consume(Token::Caret) {
            let exp = self.parse_unary()?;
            return Ok(self.arena.pow(base, exp));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<ExprHandle, ParseError> {
        let Some(t) = self.peek() else {
            return Err(self.error_here(
                "unexpected end of expression",
                Some("a number, variable or '('"),
            ));
        };
        let (token, lexeme, position) = (t.token, t.lexeme.clone(), t.start);

        match token {
            Token::Integer | Token::Float => {
                self.pos += 1;
                match number_from_lexeme(&lexeme) {
                    Some(NumericLiteral::Small(value)) => Ok(self.arena.number(value)),
                    Some(NumericLiteral::Scientific { digits, exp }) => {
                        Ok(self.arena.scientific(digits, exp))
                    }
                    None => Err(ParseError {
                        message: "numeric literal out of range".to_string(),
                        position,
                        found: Some(lexeme),
                        expected: None,
                    }),
                }
            }
            Token::Ident => {
                self.pos += 1;
                Ok(self.arena.symbol(&lexeme))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                if self.consume(Token::RParen) {
                    Ok(inner)
                } else {
                    Err(self.error_here("mismatched parentheses", Some("')'")))
                }
            }
            Token::RParen => {
                Err(self.error_here("mismatched parentheses", Some("an expression")))
            }
            _ => Err(self.error_here(
                "expected a number, variable or '('",
                Some("a value"),
            )),
        }
    }

    /// Appends a term to a sum, flattening nested sums into one n-ary node.
    fn append_term(&mut self, node: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        let existing = match self.arena.get(node) {
            ExprNode::Add(args) => Some(args.clone()),
            _ => None,
        };
        match existing {
            Some(mut args) => {
                args.push(rhs);
                self.arena.intern(ExprNode::Add(args))
            }
            None => self.arena.add(smallvec::smallvec![node, rhs]),
        }
    }

    /// Appends a factor to a product, flattening nested products.
    fn append_factor(&mut self, node: ExprHandle, rhs: ExprHandle) -> ExprHandle {
        let existing = match self.arena.get(node) {
            ExprNode::Mul(args) => Some(args.clone()),
            _ => None,
        };
        match existing {
            Some(mut args) => {
                args.push(rhs);
                self.arena.intern(ExprNode::Mul(args))
            }
            None => self.arena.mul(smallvec::smallvec![node, rhs]),
        }
    }

    /// Negates an operand, folding numeric leaves into negative literals.
    fn negated(&mut self, operand: ExprHandle) -> ExprHandle {
        if let Some(folded) = self
            .arena
            .get(operand)
            .as_rational()
            .and_then(SmallRational::checked_neg)
        {
            return self.arena.number(folded);
        }
        self.arena.neg(operand)
    }
}

/// An exactly-representable numeric literal.
enum NumericLiteral {
    /// Fits a 64-bit rational.
    Small(SmallRational),
    /// Needs the scientific leaf: digits × 10^exp.
    Scientific { digits: i64, exp: i32 },
}

/// Converts a numeric lexeme to an exact literal.
///
/// Values whose reduced rational form fits 64 bits become
/// [`NumericLiteral::Small`]; wider magnitudes such as `6.022e23` keep
/// their exact digits-times-power-of-ten form. Returns `None` only when
/// the significant digits overflow 64 bits or the exponent overflows 32.
fn number_from_lexeme(lexeme: &str) -> Option<NumericLiteral> {
    let (mantissa, exp) = match lexeme.find(['e', 'E']) {
        Some(i) => (&lexeme[..i], lexeme[i + 1..].parse::<i32>().ok()?),
        None => (lexeme, 0i32),
    };

    let (digits, scale) = match mantissa.find('.') {
        Some(i) => {
            let mut d = String::with_capacity(mantissa.len() - 1);
            d.push_str(&mantissa[..i]);
            d.push_str(&mantissa[i + 1..]);
            (d, i32::try_from(mantissa.len() - i - 1).ok()?)
        }
        None => (mantissa.to_string(), 0i32),
    };

    let n = digits.parse::<i64>().ok()?;
    let shift = exp.checked_sub(scale)?;
    if let Some(ten_pow) = SmallRational::from_integer(10).checked_powi(shift) {
        if let Some(value) = SmallRational::from_integer(n).checked_mul(ten_pow) {
            return Some(NumericLiteral::Small(value));
        }
    }
    Some(NumericLiteral::Scientific { digits: n, exp: shift })
}
