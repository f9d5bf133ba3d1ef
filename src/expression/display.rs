use std::fmt;

use crate::expression::ast::Expression;

/// Binding level of unary signs, between `*` and `**`
const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn precedence(expr: &Expression) -> u8 {
            match expr {
                Expression::Literal(n) if n.is_sign_negative() => UNARY_PRECEDENCE,
                Expression::Literal(_) => ATOM_PRECEDENCE,
                Expression::UnaryOp(_, _) => UNARY_PRECEDENCE,
                Expression::BinaryOp(op, _, _) => op.precedence(),
            }
        }

        fn write_with_parens(
            f: &mut fmt::Formatter,
            expr: &Expression,
            need_parens: bool,
        ) -> fmt::Result {
            if need_parens {
                write!(f, "(")?;
                fmt_expression(f, expr)?;
                write!(f, ")")
            } else {
                fmt_expression(f, expr)
            }
        }

        fn fmt_expression(f: &mut fmt::Formatter, expr: &Expression) -> fmt::Result {
            match expr {
                Expression::Literal(n) if *n == 0.0 => write!(f, "0"),
                Expression::Literal(n) => write!(f, "{}", n),
                Expression::UnaryOp(sign, operand) => {
                    let need = precedence(operand) <= UNARY_PRECEDENCE;
                    write!(f, "{}", sign.symbol())?;
                    write_with_parens(f, operand, need)
                }
                Expression::BinaryOp(op, l, r) => {
                    let p = op.precedence();
                    let lp = precedence(l);
                    let rp = precedence(r);
                    let (need_l, need_r) = if op.is_right_associative() {
                        // the exponent is parsed as a unary expression
                        (lp <= p, rp < UNARY_PRECEDENCE)
                    } else {
                        (lp < p, rp <= p)
                    };
                    write_with_parens(f, l, need_l)?;
                    write!(f, " {} ", op)?;
                    write_with_parens(f, r, need_r)
                }
            }
        }

        fmt_expression(f, self)
    }
}
