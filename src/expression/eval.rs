use log::debug;

use crate::expression::ast::{Expression, Operator, Sign};
use crate::expression::errors::EvalError;

impl Expression {
    /// Evaluate the tree bottom-up with IEEE-754 double arithmetic.
    ///
    /// Results that are undefined over the reals (e.g. `(-8) ** 0.5`) come back
    /// as NaN or infinity rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error when:
    /// - the right operand of `/` or `%` is exactly zero
    /// - a literal is not a finite number
    pub fn evaluate(&self) -> Result<f64, EvalError> {
        debug!("Evaluating expression: {}", self);

        let result = self.eval_node();

        match &result {
            Ok(value) => debug!("Expression evaluated to: {}", value),
            Err(e) => debug!("Expression evaluation failed: {}", e),
        }

        result
    }

    fn eval_node(&self) -> Result<f64, EvalError> {
        match self {
            Expression::Literal(n) => {
                if n.is_finite() {
                    Ok(*n)
                } else {
                    Err(EvalError::disallowed(format!("non-finite literal `{}`", n)))
                }
            }
            Expression::UnaryOp(sign, operand) => {
                let value = operand.eval_node()?;
                Ok(match sign {
                    Sign::Plus => value,
                    Sign::Minus => -value,
                })
            }
            Expression::BinaryOp(op, l, r) => {
                let left = l.eval_node()?;
                let right = r.eval_node()?;
                apply(*op, left, right)
            }
        }
    }
}

fn apply(op: Operator, left: f64, right: f64) -> Result<f64, EvalError> {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div | Operator::Mod if right == 0.0 => {
            debug!("Division by zero attempted: {} {} {}", left, op, right);
            Err(EvalError::DivisionByZero)
        }
        Operator::Div => Ok(left / right),
        // Remainder takes the sign of the dividend
        Operator::Mod => Ok(left % right),
        Operator::Pow => Ok(left.powf(right)),
    }
}
