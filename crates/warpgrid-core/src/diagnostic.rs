//! Non-fatal diagnostics keyed by kind and location.
//!
//! Structural diagnostics come from validation and live as long as the
//! grid. Runtime diagnostics are produced by each step and replaced on
//! the next one. Both use the same [`Diagnostics`] collection; callers
//! keep them in separate fields.

use indexmap::IndexMap;
use std::fmt;

use crate::id::Pos;

/// Structured key identifying one diagnostic.
///
/// Positional kinds carry the cell they refer to; a second report for
/// the same key replaces the first message but keeps its order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKey {
    /// A token outside the alphabet. Structural.
    IllegalToken(Pos),
    /// A numeric literal outside `[-99, 99]` in the initial grid. Structural.
    LiteralOutOfRange(Pos),
    /// A row shorter than the widest row, padded with `Empty`. Structural.
    RaggedRow(usize),
    /// Two writes reached the same cell in one step. Runtime.
    WriteConflict(Pos),
    /// An arithmetic operator divided by zero or overflowed. Runtime.
    ArithmeticFault(Pos),
    /// A warp addressed a cell outside the grid. Runtime.
    WarpOutOfBounds(Pos),
    /// Simultaneous warps asked for different time deltas. Runtime.
    WarpTimeMismatch,
}

impl DiagnosticKey {
    /// Whether this key belongs to the structural (validation) lifetime.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::IllegalToken(_) | Self::LiteralOutOfRange(_) | Self::RaggedRow(_)
        )
    }

    /// The cell this diagnostic points at, if any.
    pub fn pos(&self) -> Option<Pos> {
        match *self {
            Self::IllegalToken(p)
            | Self::LiteralOutOfRange(p)
            | Self::WriteConflict(p)
            | Self::ArithmeticFault(p)
            | Self::WarpOutOfBounds(p) => Some(p),
            Self::RaggedRow(_) | Self::WarpTimeMismatch => None,
        }
    }
}

impl fmt::Display for DiagnosticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalToken(p) => write!(f, "illegal_token{p}"),
            Self::LiteralOutOfRange(p) => write!(f, "literal_out_of_range{p}"),
            Self::RaggedRow(r) => write!(f, "ragged_row({r})"),
            Self::WriteConflict(p) => write!(f, "write_conflict{p}"),
            Self::ArithmeticFault(p) => write!(f, "arithmetic_fault{p}"),
            Self::WarpOutOfBounds(p) => write!(f, "warp_out_of_bounds{p}"),
            Self::WarpTimeMismatch => f.write_str("warp_time_mismatch"),
        }
    }
}

/// Ordered map from [`DiagnosticKey`] to a human-readable message.
///
/// Iteration follows first-insertion order, so reports come out in the
/// order the validator or step engine discovered them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: IndexMap<DiagnosticKey, String>,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, replacing any earlier message for `key`.
    pub fn insert(&mut self, key: DiagnosticKey, message: impl Into<String>) {
        self.entries.insert(key, message.into());
    }

    /// The message for `key`, if recorded.
    pub fn get(&self, key: &DiagnosticKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` has been recorded.
    pub fn contains(&self, key: &DiagnosticKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &DiagnosticKey> + '_ {
        self.entries.keys()
    }

    /// `(key, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&DiagnosticKey, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    // ── Message builders ───────────────────────────────────────────

    /// Record an illegal token at `pos`.
    pub fn illegal_token(&mut self, pos: Pos, token: &str) {
        self.insert(
            DiagnosticKey::IllegalToken(pos),
            format!("invalid token {token:?} at {pos}"),
        );
    }

    /// Record an out-of-range initial literal at `pos`.
    pub fn literal_out_of_range(&mut self, pos: Pos, value: i64, min: i64, max: i64) {
        self.insert(
            DiagnosticKey::LiteralOutOfRange(pos),
            format!("number {value} at {pos} must be from {min} to {max}"),
        );
    }

    /// Record a short row that was padded.
    pub fn ragged_row(&mut self, row: usize, found: usize, expected: usize) {
        self.insert(
            DiagnosticKey::RaggedRow(row),
            format!("row {row} has {found} cells, padded to {expected}"),
        );
    }

    /// Record a rejected write at `pos`.
    pub fn write_conflict(&mut self, pos: Pos, attempted: i64, existing: impl fmt::Display) {
        self.insert(
            DiagnosticKey::WriteConflict(pos),
            format!("conflict at {pos}: inserted {attempted}, existing {existing}"),
        );
    }

    /// Record a division by zero or overflow at the operator `pos`.
    pub fn arithmetic_fault(&mut self, pos: Pos, left: i64, op: char, up: i64) {
        self.insert(
            DiagnosticKey::ArithmeticFault(pos),
            format!("operator at {pos} cannot evaluate {left} {op} {up}"),
        );
    }

    /// Record a warp at `pos` whose target falls outside the grid.
    pub fn warp_out_of_bounds(&mut self, pos: Pos, dx: i64, dy: i64) {
        self.insert(
            DiagnosticKey::WarpOutOfBounds(pos),
            format!("warp at {pos} targets offset dx={dx} dy={dy} outside the grid"),
        );
    }

    /// Record simultaneous warps with different time deltas.
    pub fn warp_time_mismatch(&mut self, dts: &[i64]) {
        self.insert(
            DiagnosticKey::WarpTimeMismatch,
            format!("multiple incompatible time destinations: dt in {dts:?}"),
        );
    }
}

impl Extend<(DiagnosticKey, String)> for Diagnostics {
    fn extend<T: IntoIterator<Item = (DiagnosticKey, String)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(DiagnosticKey, String)> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = (DiagnosticKey, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = (DiagnosticKey, String);
    type IntoIter = indexmap::map::IntoIter<DiagnosticKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for Diagnostics {
    /// One `key: message` line per diagnostic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, msg)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{key}: {msg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwriting_keeps_first_position() {
        let mut d = Diagnostics::new();
        d.write_conflict(Pos::new(0, 1), 3, 4);
        d.warp_time_mismatch(&[1, 2]);
        d.write_conflict(Pos::new(0, 1), 5, 4);
        assert_eq!(d.len(), 2);
        let keys: Vec<_> = d.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                DiagnosticKey::WriteConflict(Pos::new(0, 1)),
                DiagnosticKey::WarpTimeMismatch
            ]
        );
        assert!(d
            .get(&DiagnosticKey::WriteConflict(Pos::new(0, 1)))
            .unwrap()
            .contains("inserted 5"));
    }

    #[test]
    fn lifetimes_are_classified() {
        assert!(DiagnosticKey::IllegalToken(Pos::new(0, 0)).is_structural());
        assert!(DiagnosticKey::LiteralOutOfRange(Pos::new(0, 0)).is_structural());
        assert!(DiagnosticKey::RaggedRow(2).is_structural());
        assert!(!DiagnosticKey::WriteConflict(Pos::new(0, 0)).is_structural());
        assert!(!DiagnosticKey::WarpTimeMismatch.is_structural());
        assert_eq!(DiagnosticKey::WarpTimeMismatch.pos(), None);
        assert_eq!(
            DiagnosticKey::ArithmeticFault(Pos::new(1, 2)).pos(),
            Some(Pos::new(1, 2))
        );
    }

    #[test]
    fn extend_merges() {
        let mut a = Diagnostics::new();
        a.illegal_token(Pos::new(0, 0), "x");
        let mut b = Diagnostics::new();
        b.ragged_row(1, 2, 3);
        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(
            a.to_string(),
            "illegal_token(0, 0): invalid token \"x\" at (0, 0)\nragged_row(1): row 1 has 2 cells, padded to 3"
        );
    }
}
