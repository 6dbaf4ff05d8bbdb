//! Arithmetic tokenizer
//!
//! Converts expression strings like "0.25 * (5 + 1)" into a sequence of tokens
//! that can be parsed into an AST. Only numeric literals, the operators
//! `+ - * / %` and parentheses are accepted; anything else is a tokenize error.

use std::iter::Peekable;
use std::str::Chars;

/// A token in an arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal (e.g., 123, 45.67, .5, 1.5e10)
    Number(f64),
    /// Binary/unary operators: + - * / %
    Operator(char),
    /// Opening parenthesis
    OpenParen,
    /// Closing parenthesis
    CloseParen,
}

/// Error during tokenization
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizeError {
    pub message: String,
    pub position: usize,
}

impl TokenizeError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tokenize error at position {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenizer for arithmetic expressions
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(expression: &'a str) -> Self {
        Self {
            chars: expression.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenize the entire expression into a vector of tokens
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Get the next token, or None if at end of input
    fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        self.skip_whitespace();

        match self.peek() {
            None => Ok(None),
            Some(c) => {
                let token = match c {
                    '(' => {
                        self.advance();
                        Token::OpenParen
                    }
                    ')' => {
                        self.advance();
                        Token::CloseParen
                    }
                    '+' | '-' | '*' | '/' | '%' => {
                        self.advance();
                        Token::Operator(c)
                    }
                    c if c.is_ascii_digit() || c == '.' => self.read_number()?,
                    c => {
                        return Err(TokenizeError::new(
                            format!("Unexpected character: '{}'", c),
                            self.position,
                        ));
                    }
                };
                Ok(Some(token))
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                into.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a number (integer, decimal, or scientific notation).
    ///
    /// Integer parts with a redundant leading zero ("05", "007") are rejected,
    /// so zero-padded dates and codes never evaluate as arithmetic.
    fn read_number(&mut self) -> Result<Token, TokenizeError> {
        let start_pos = self.position;
        let mut num_str = String::new();

        self.read_digits(&mut num_str);

        if num_str.len() > 1 && num_str.starts_with('0') {
            return Err(TokenizeError::new(
                format!("Leading zero in number: {}", num_str),
                start_pos,
            ));
        }

        if self.peek() == Some('.') {
            num_str.push('.');
            self.advance();
            self.read_digits(&mut num_str);
        }

        if num_str == "." {
            return Err(TokenizeError::new("Invalid number: .", start_pos));
        }

        if let Some(c) = self.peek() {
            if c == 'e' || c == 'E' {
                num_str.push(c);
                self.advance();
                if let Some(sign) = self.peek() {
                    if sign == '+' || sign == '-' {
                        num_str.push(sign);
                        self.advance();
                    }
                }
                self.read_digits(&mut num_str);
            }
        }

        num_str
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| TokenizeError::new(format!("Invalid number: {}", num_str), start_pos))
    }
}

/// Convenience function to tokenize an expression string
pub fn tokenize(expression: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(expression).tokenize()
}
