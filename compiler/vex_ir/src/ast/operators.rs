//! Operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Shift (operands truncated to 64-bit integers)
    Shl,
    Shr,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Equality
    Eq,
    NotEq,
    NearEq,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinaryOp {
    /// Source-level symbol, used in error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::NearEq => "~=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Whether the right operand may be skipped.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Prefix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `~x`
    Complement,
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Complement => "~",
            Self::Neg => "-",
            Self::Plus => "+",
            Self::PreIncrement => "++",
            Self::PreDecrement => "--",
        }
    }

    /// Whether the operand must be an assignable variable.
    pub const fn mutates(self) -> bool {
        matches!(self, Self::PreIncrement | Self::PreDecrement)
    }
}

/// Postfix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PostfixOp {
    /// `x!`
    Factorial,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl PostfixOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Factorial => "!",
            Self::PostIncrement => "++",
            Self::PostDecrement => "--",
        }
    }

    pub const fn mutates(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
    /// `^=`
    Pow,
}

impl AssignOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
            Self::Pow => "^=",
        }
    }

    /// The arithmetic operator a compound assignment applies, `None` for `=`.
    pub const fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
            Self::Mod => Some(BinaryOp::Mod),
            Self::Pow => Some(BinaryOp::Pow),
        }
    }
}
