//! Constrained arithmetic evaluation
//!
//! Numeric literals, `+ - * / %`, unary signs and parentheses. There are no
//! identifiers or function calls, so substituted cell text can never reach
//! anything but arithmetic.

pub mod evaluator;
pub mod parser;
pub mod tokenizer;

pub use evaluator::EvalError;

/// Tokenize, parse and evaluate an arithmetic expression
pub fn evaluate_expression(text: &str) -> Result<f64, EvalError> {
    let tokens = tokenizer::tokenize(text).map_err(|e| EvalError::new(e.to_string()))?;
    let expr = parser::parse(tokens).map_err(|e| EvalError::new(e.to_string()))?;
    evaluator::evaluate(&expr)
}

/// Interpret text as a finite number, evaluating arithmetic if present.
///
/// A single signed decimal literal is accepted as written, leading zeros
/// included ("05" is 5). Anything else must be arithmetic over literals;
/// there a redundant leading zero is rejected, so "2024-01-05" stays text.
/// Returns `None` for non-numeric text and non-finite results.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_plain_literal(trimmed) {
        return trimmed.parse::<f64>().ok().filter(|n| n.is_finite());
    }
    evaluate_expression(trimmed)
        .ok()
        .filter(|n| n.is_finite())
}

/// `[+-]digits[.digits][e[+-]digits]`, with digits on at least one side of the point
fn is_plain_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
        None => (unsigned, None),
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    let mantissa_ok = !(integer.is_empty() && fraction.is_empty())
        && all_digits(integer)
        && all_digits(fraction);
    let exponent_ok = match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    };
    mantissa_ok && exponent_ok
}
