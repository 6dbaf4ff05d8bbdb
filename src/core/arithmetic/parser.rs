//! Arithmetic parser
//!
//! Converts a sequence of tokens into an Abstract Syntax Tree (AST).
//! Uses recursive descent parsing with operator precedence.

use super::tokenizer::Token;

/// Deepest allowed nesting of parentheses and unary signs
pub const MAX_DEPTH: usize = 256;

/// Longest accepted expression, in tokens
pub const MAX_TOKENS: usize = 4096;

/// Abstract Syntax Tree node for arithmetic expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal
    Number(f64),
    /// Binary operation: left op right
    BinaryOp {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation: -expr or +expr
    UnaryOp { op: char, operand: Box<Expr> },
}

/// Error during parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Parser for arithmetic tokens
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse the tokens into an AST
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new("Empty expression", 0));
        }
        if self.tokens.len() > MAX_TOKENS {
            return Err(ParseError::new("Expression too long", MAX_TOKENS));
        }
        let expr = self.term()?;

        if !self.is_at_end() {
            return Err(ParseError::new(
                format!("Unexpected token after expression: {:?}", self.peek()),
                self.position,
            ));
        }

        Ok(expr)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&Token> {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.tokens.get(self.position - 1)
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is one of the given operators
    fn match_any_operator(&mut self, ops: &[char]) -> Option<char> {
        if let Some(Token::Operator(c)) = self.peek() {
            if ops.contains(c) {
                let op = *c;
                self.advance();
                return Some(op);
            }
        }
        None
    }

    /// Enter one nested sub-expression, failing past [`MAX_DEPTH`]
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(
                "Expression nested too deeply",
                self.position,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Term: factor (( "+" | "-" ) factor)*
    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.factor()?;

        while let Some(op) = self.match_any_operator(&['+', '-']) {
            let right = self.factor()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Factor: unary (( "*" | "/" | "%" ) unary)*
    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;

        while let Some(op) = self.match_any_operator(&['*', '/', '%']) {
            let right = self.unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Unary: ( "-" | "+" ) unary | primary
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.match_any_operator(&['-', '+']) {
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            })
        } else {
            self.primary()
        }
    }

    /// Primary: NUMBER | "(" term ")"
    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().cloned();

        match token {
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Some(Token::OpenParen) => {
                self.advance();
                self.descend()?;
                let expr = self.term()?;
                self.depth -= 1;
                if !self.match_token(&Token::CloseParen) {
                    return Err(ParseError::new(
                        "Expected ')' after expression",
                        self.position,
                    ));
                }
                Ok(expr)
            }
            Some(token) => Err(ParseError::new(
                format!("Unexpected token: {:?}", token),
                self.position,
            )),
            None => Err(ParseError::new(
                "Unexpected end of expression",
                self.position,
            )),
        }
    }
}

/// Convenience function to parse tokens into an AST
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}
