//! The closed cell model: every grid position holds exactly one [`Cell`].
//!
//! Classification from text is total: [`Cell::from_token`] returns `None`
//! for anything outside the alphabet instead of panicking, and the
//! validator turns that into a diagnostic.

use std::fmt;

/// Direction a [`Cell::Mover`] pushes values in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `^`
    Up,
    /// `v`
    Down,
    /// `<`
    Left,
    /// `>`
    Right,
}

impl Direction {
    /// All four directions, in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(d_row, d_col)` unit offset for this direction.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The single-character token for a mover facing this way.
    pub fn symbol(self) -> char {
        match self {
            Self::Up => '^',
            Self::Down => 'v',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}

/// Rounding convention for `/` and `%` with negative operands.
///
/// Both operators always follow the same convention, so
/// `l == u * (l / u) + (l % u)` holds for every non-zero `u`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DivisionRounding {
    /// Quotient rounds toward negative infinity; remainder takes the
    /// divisor's sign. `-7 / 2 = -4`, `-7 % 2 = 1`.
    #[default]
    Floor,
    /// Quotient rounds toward zero; remainder takes the dividend's sign.
    /// `-7 / 2 = -3`, `-7 % 2 = -1`.
    Truncate,
}

/// Two-operand operators. Operands are read from the left and upper
/// neighbours; results go to the right and lower neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `=`, fires when both operands are equal.
    Eq,
    /// `#`, fires when the operands differ.
    Neq,
}

impl BinaryOp {
    /// Whether this operator is `=` or `#`.
    pub fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Neq)
    }

    /// Evaluate an arithmetic operator.
    ///
    /// Returns `None` for division or modulo by zero, on `i64` overflow,
    /// and for the comparison operators (use [`BinaryOp::fires`]).
    pub fn apply(self, left: i64, up: i64, rounding: DivisionRounding) -> Option<i64> {
        match self {
            Self::Add => left.checked_add(up),
            Self::Sub => left.checked_sub(up),
            Self::Mul => left.checked_mul(up),
            Self::Div => divide(left, up, rounding).map(|(q, _)| q),
            Self::Mod => divide(left, up, rounding).map(|(_, r)| r),
            Self::Eq | Self::Neq => None,
        }
    }

    /// Whether a comparison operator fires for the given operands.
    ///
    /// Always `false` for arithmetic operators.
    pub fn fires(self, left: i64, up: i64) -> bool {
        match self {
            Self::Eq => left == up,
            Self::Neq => left != up,
            _ => false,
        }
    }

    /// The single-character token for this operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Mod => '%',
            Self::Eq => '=',
            Self::Neq => '#',
        }
    }
}

/// Quotient and remainder under the given rounding.
fn divide(left: i64, up: i64, rounding: DivisionRounding) -> Option<(i64, i64)> {
    let q = left.checked_div(up)?;
    let r = left.checked_rem(up)?;
    match rounding {
        DivisionRounding::Truncate => Some((q, r)),
        DivisionRounding::Floor => {
            if r != 0 && ((r < 0) != (up < 0)) {
                Some((q.checked_sub(1)?, r.checked_add(up)?))
            } else {
                Some((q, r))
            }
        }
    }
}

/// Typed content of one grid position.
///
/// Forward steps only change `Empty` and `Number` cells. A warp may
/// overwrite any cell of the past snapshot it rewrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// `.`
    #[default]
    Empty,
    /// A signed integer literal or a computed value.
    Number(i64),
    /// `< > ^ v`
    Mover(Direction),
    /// `+ - * / % = #`
    BinaryOp(BinaryOp),
    /// `@`
    Warp,
    /// `S`
    Sink,
    /// `A`, replaced by the first parameter before the first step.
    InputA,
    /// `B`, replaced by the second parameter before the first step.
    InputB,
}

impl Cell {
    /// Classify one whitespace-delimited token.
    ///
    /// Numbers are an optional `-` followed by ASCII digits; `-` on its
    /// own is subtraction. Returns `None` for anything outside the
    /// alphabet, including integer literals that do not fit in `i64`.
    pub fn from_token(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('-').unwrap_or(token);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse().ok().map(Self::Number);
        }
        let mut chars = token.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::from_symbol(c)
    }

    /// Classify a single non-numeric character.
    pub fn from_symbol(c: char) -> Option<Self> {
        let cell = match c {
            '.' => Self::Empty,
            '^' => Self::Mover(Direction::Up),
            'v' => Self::Mover(Direction::Down),
            '<' => Self::Mover(Direction::Left),
            '>' => Self::Mover(Direction::Right),
            '+' => Self::BinaryOp(BinaryOp::Add),
            '-' => Self::BinaryOp(BinaryOp::Sub),
            '*' => Self::BinaryOp(BinaryOp::Mul),
            '/' => Self::BinaryOp(BinaryOp::Div),
            '%' => Self::BinaryOp(BinaryOp::Mod),
            '=' => Self::BinaryOp(BinaryOp::Eq),
            '#' => Self::BinaryOp(BinaryOp::Neq),
            '@' => Self::Warp,
            'S' => Self::Sink,
            'A' => Self::InputA,
            'B' => Self::InputB,
            _ => return None,
        };
        Some(cell)
    }

    /// The numeric value, if this is a `Number`.
    pub fn as_number(&self) -> Option<i64> {
        match *self {
            Self::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the cell is `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the cell is an operator (anything but `Empty`/`Number`).
    pub fn is_operator(&self) -> bool {
        !matches!(self, Self::Empty | Self::Number(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("."),
            Self::Number(v) => write!(f, "{v}"),
            Self::Mover(d) => write!(f, "{}", d.symbol()),
            Self::BinaryOp(op) => write!(f, "{}", op.symbol()),
            Self::Warp => f.write_str("@"),
            Self::Sink => f.write_str("S"),
            Self::InputA => f.write_str("A"),
            Self::InputB => f.write_str("B"),
        }
    }
}
