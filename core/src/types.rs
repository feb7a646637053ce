use ndarray::Array2;

/// Single coordinate axis used for board size and positions.
pub type Coord = u8;

/// Count type used for cleared, refilled and total-cell counts.
pub type CellCount = u16;

/// Points, both per-action deltas and the running total.
pub type Score = u32;

/// Two-dimensional coordinates `(row, col)`, row 0 at the top.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether two cells share an edge.
pub const fn is_adjacent(a: Coord2, b: Coord2) -> bool {
    matches!((a.0.abs_diff(b.0), a.1.abs_diff(b.1)), (0, 1) | (1, 0))
}

pub trait CoordIterExt {
    fn iter_coords(&self) -> CoordIter;
}

impl<T> CoordIterExt for Array2<T> {
    fn iter_coords(&self) -> CoordIter {
        let dim = self.dim();
        CoordIter::new((dim.0.try_into().unwrap(), dim.1.try_into().unwrap()))
    }
}

/// Row-major walk over every coordinate of a grid.
#[derive(Debug, Clone)]
pub struct CoordIter {
    bounds: Coord2,
    next: Option<Coord2>,
}

impl CoordIter {
    pub fn new(bounds: Coord2) -> Self {
        let next = (bounds.0 > 0 && bounds.1 > 0).then_some((0, 0));
        Self { bounds, next }
    }
}

impl Iterator for CoordIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let (row, col) = current;
        self.next = if col + 1 < self.bounds.1 {
            Some((row, col + 1))
        } else if row + 1 < self.bounds.0 {
            Some((row + 1, 0))
        } else {
            None
        };
        Some(current)
    }
}

/// Cells of one full row followed by one full column, crossing at `center`.
/// The crossing cell is yielded once.
pub fn iter_cross(center: Coord2, size: Coord) -> impl Iterator<Item = Coord2> {
    let (row, col) = center;
    let row_cells = (0..size).map(move |c| (row, c));
    let col_cells = (0..size).filter(move |&r| r != row).map(move |r| (r, col));
    row_cells.chain(col_cells)
}
