//! The rectangular cell container.

use std::fmt;

use crate::cell::{Cell, Direction};
use crate::error::GridError;
use crate::id::Pos;

/// A `rows x cols` grid of [`Cell`]s stored row-major.
///
/// Pure data: bounds checks and neighbour lookup, nothing else. Reads
/// outside the grid return `None` rather than failing, so operators at
/// the border simply see absent operands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell `Empty`.
    ///
    /// Either dimension may be zero. Returns `Err(GridError::TooLarge)`
    /// if `rows * cols` overflows.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(GridError::TooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Build a grid from row vectors. Every row must have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpgrid_core::{Cell, Grid, Pos};
    ///
    /// let grid = Grid::from_rows(vec![
    ///     vec![Cell::Number(1), Cell::Empty],
    ///     vec![Cell::Empty, Cell::Sink],
    /// ])
    /// .unwrap();
    /// assert_eq!(grid.get(Pos::new(1, 1)), Some(&Cell::Sink));
    /// assert_eq!(grid.to_string(), "1 .\n. S");
    /// ```
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }
        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    /// The cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `pos`, or `None` outside the grid.
    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Overwrite the cell at `pos`.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), GridError> {
        let (rows, cols) = (self.rows, self.cols);
        let slot = self
            .get_mut(pos)
            .ok_or(GridError::OutOfBounds { pos, rows, cols })?;
        *slot = cell;
        Ok(())
    }

    /// The value at `pos` if it holds a `Number`.
    pub fn number_at(&self, pos: Pos) -> Option<i64> {
        self.get(pos).and_then(Cell::as_number)
    }

    /// Offset `pos` by `(d_row, d_col)`, returning `None` off-grid.
    pub fn offset(&self, pos: Pos, d_row: i64, d_col: i64) -> Option<Pos> {
        pos.checked_offset(d_row, d_col)
            .filter(|&p| self.contains(p))
    }

    /// The in-grid neighbour of `pos` in `dir`.
    pub fn neighbour(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let (dr, dc) = dir.offset();
        self.offset(pos, dr, dc)
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// All cells with their positions, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new(i / cols, i % cols), cell))
    }

    /// Positions of every cell matching `pred`, row-major.
    pub fn positions<'a>(
        &'a self,
        mut pred: impl FnMut(&Cell) -> bool + 'a,
    ) -> impl Iterator<Item = Pos> + 'a {
        self.iter()
            .filter_map(move |(pos, cell)| pred(cell).then_some(pos))
    }

    /// First position (row-major) matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&Cell) -> bool) -> Option<Pos> {
        self.iter().find(|(_, cell)| pred(cell)).map(|(pos, _)| pos)
    }

    /// Positions of all `S` cells.
    pub fn sinks(&self) -> Vec<Pos> {
        self.positions(|c| matches!(c, Cell::Sink)).collect()
    }

    /// Replace every `A` with `a` and every `B` with `b`.
    ///
    /// Returns a new grid; `self` is untouched. Substitution happens
    /// once, before the first step, and is never repeated.
    pub fn substitute_inputs(&self, a: i64, b: i64) -> Grid {
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell {
                Cell::InputA => Cell::Number(a),
                Cell::InputB => Cell::Number(b),
                other => *other,
            })
            .collect();
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }
}

impl fmt::Display for Grid {
    /// Tokens separated by single spaces, rows by `\n`, no trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                f.write_str("\n")?;
            }
            for (c, cell) in self.row(r).iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::BinaryOp;

    fn sample() -> Grid {
        Grid::from_rows(vec![
            vec![Cell::Empty, Cell::Number(3), Cell::Empty],
            vec![Cell::Number(5), Cell::BinaryOp(BinaryOp::Add), Cell::Sink],
        ])
        .unwrap()
    }

    #[test]
    fn new_grid_is_empty_cells() {
        let g = Grid::new(2, 3).unwrap();
        assert_eq!(g.len(), 6);
        assert!(g.iter().all(|(_, c)| c.is_empty()));
    }

    #[test]
    fn zero_sized_grids_are_allowed() {
        let g = Grid::new(0, 5).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.iter().count(), 0);
        assert_eq!(g.to_string(), "");
        let g = Grid::from_rows(vec![]).unwrap();
        assert_eq!((g.rows(), g.cols()), (0, 0));
    }

    #[test]
    fn too_large_is_rejected() {
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(GridError::TooLarge {
                rows: usize::MAX,
                cols: 2
            })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Grid::from_rows(vec![vec![Cell::Empty; 3], vec![Cell::Empty; 2]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn get_and_bounds() {
        let g = sample();
        assert_eq!(g.get(Pos::new(1, 0)), Some(&Cell::Number(5)));
        assert_eq!(g.get(Pos::new(2, 0)), None);
        assert_eq!(g.get(Pos::new(0, 3)), None);
        assert_eq!(g.number_at(Pos::new(0, 1)), Some(3));
        assert_eq!(g.number_at(Pos::new(1, 1)), None);
    }

    #[test]
    fn set_out_of_bounds_fails() {
        let mut g = sample();
        assert!(g.set(Pos::new(0, 0), Cell::Number(9)).is_ok());
        assert_eq!(g.number_at(Pos::new(0, 0)), Some(9));
        assert_eq!(
            g.set(Pos::new(5, 5), Cell::Empty),
            Err(GridError::OutOfBounds {
                pos: Pos::new(5, 5),
                rows: 2,
                cols: 3
            })
        );
    }

    #[test]
    fn neighbours_respect_borders() {
        let g = sample();
        let corner = Pos::new(0, 0);
        assert_eq!(g.neighbour(corner, Direction::Up), None);
        assert_eq!(g.neighbour(corner, Direction::Left), None);
        assert_eq!(g.neighbour(corner, Direction::Right), Some(Pos::new(0, 1)));
        assert_eq!(g.neighbour(corner, Direction::Down), Some(Pos::new(1, 0)));
        assert_eq!(g.neighbour(Pos::new(1, 2), Direction::Right), None);
        assert_eq!(g.neighbour(Pos::new(1, 2), Direction::Down), None);
    }

    #[test]
    fn iteration_is_row_major() {
        let g = sample();
        let order: Vec<Pos> = g.iter().map(|(p, _)| p).collect();
        assert_eq!(order[0], Pos::new(0, 0));
        assert_eq!(order[2], Pos::new(0, 2));
        assert_eq!(order[3], Pos::new(1, 0));
        assert_eq!(g.find(|c| c.as_number().is_some()), Some(Pos::new(0, 1)));
        assert_eq!(g.sinks(), vec![Pos::new(1, 2)]);
    }

    #[test]
    fn substitution_replaces_inputs_only() {
        let g = Grid::from_rows(vec![vec![Cell::InputA, Cell::InputB, Cell::Sink]]).unwrap();
        let s = g.substitute_inputs(-4, 99);
        assert_eq!(s.row(0), &[Cell::Number(-4), Cell::Number(99), Cell::Sink]);
        // Original untouched.
        assert_eq!(g.row(0)[0], Cell::InputA);
    }

    #[test]
    fn display_renders_tokens() {
        assert_eq!(sample().to_string(), ". 3 .\n5 + S");
    }
}
