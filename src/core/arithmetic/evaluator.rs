//! Arithmetic evaluator
//!
//! Walks a parsed [`Expr`] and produces an `f64`. Division by zero follows IEEE
//! semantics (infinity or NaN); callers decide whether a non-finite result is
//! acceptable.

use super::parser::Expr;

/// Error during evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Eval error: {}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Evaluate an expression tree
pub fn evaluate(expr: &Expr) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(n) => Ok(*n),

        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left)?;
            let r = evaluate(right)?;
            match op {
                '+' => Ok(l + r),
                '-' => Ok(l - r),
                '*' => Ok(l * r),
                '/' => Ok(l / r),
                '%' => Ok(l % r),
                _ => Err(EvalError::new(format!("Unknown binary operator: {}", op))),
            }
        }

        Expr::UnaryOp { op, operand } => {
            let val = evaluate(operand)?;
            match op {
                '-' => Ok(-val),
                '+' => Ok(val),
                _ => Err(EvalError::new(format!("Unknown unary operator: {}", op))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_nested() {
        let expr = Expr::BinaryOp {
            op: '/',
            left: Box::new(Expr::Number(0.5)),
            right: Box::new(Expr::UnaryOp {
                op: '-',
                operand: Box::new(Expr::Number(2.0)),
            }),
        };
        assert_eq!(evaluate(&expr).unwrap(), -0.25);
    }

    #[test]
    fn test_evaluate_division_by_zero_is_infinite() {
        let expr = Expr::BinaryOp {
            op: '/',
            left: Box::new(Expr::Number(1.0)),
            right: Box::new(Expr::Number(0.0)),
        };
        assert!(evaluate(&expr).unwrap().is_infinite());
    }

    #[test]
    fn test_evaluate_unknown_operator() {
        let expr = Expr::UnaryOp {
            op: '!',
            operand: Box::new(Expr::Number(1.0)),
        };
        assert!(evaluate(&expr).is_err());
    }
}
