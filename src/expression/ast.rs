use std::fmt;

/// Binary arithmetic operators accepted by the restricted grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Operator {
    /// Canonical symbol used in symbolic expressions
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "**",
        }
    }

    /// Binding strength; higher binds tighter
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div | Operator::Mod => 2,
            Operator::Pow => 4,
        }
    }

    pub(crate) fn is_right_associative(self) -> bool {
        matches!(self, Operator::Pow)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary sign applied to an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn symbol(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

/// Arithmetic expression tree built by the parser.
///
/// Only numeric literals, unary signs and the six binary operators exist, so a
/// tree can never name a variable or call anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(f64),
    UnaryOp(Sign, Box<Expression>),
    BinaryOp(Operator, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn literal(value: f64) -> Self {
        Expression::Literal(value)
    }

    pub fn unary(sign: Sign, operand: Expression) -> Self {
        Expression::UnaryOp(sign, Box::new(operand))
    }

    pub fn binary(op: Operator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp(op, Box::new(left), Box::new(right))
    }
}
