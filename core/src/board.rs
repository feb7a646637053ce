use core::fmt;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MIN_BOARD_SIZE: Coord = 3;
pub const MAX_BOARD_SIZE: Coord = 32;
pub const DEFAULT_BOARD_SIZE: Coord = 7;

/// Square grid of pieces indexed `(row, col)`. Every cell holds a piece; a
/// cleared cell holds [`Piece::EMPTY`] until gravity refills it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Piece>", into = "Array2<Piece>")]
pub struct Board {
    cells: Array2<Piece>,
}

impl TryFrom<Array2<Piece>> for Board {
    type Error = GameError;

    fn try_from(cells: Array2<Piece>) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<Board> for Array2<Piece> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl Board {
    pub fn validate_size(size: Coord) -> Result<Coord> {
        if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            Ok(size)
        } else {
            Err(GameError::InvalidBoardSize)
        }
    }

    pub fn filled(size: Coord, piece: Piece) -> Result<Self> {
        let size = Self::validate_size(size)?;
        Ok(Self {
            cells: Array2::from_elem((size, size).to_nd_index(), piece),
        })
    }

    pub fn from_cells(cells: Array2<Piece>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows != cols {
            return Err(GameError::InvalidBoardShape);
        }
        let size: Coord = rows.try_into().map_err(|_| GameError::InvalidBoardSize)?;
        Self::validate_size(size)?;
        Ok(Self { cells })
    }

    /// Builds a board from rows of kinds, assigning ids 1, 2, ... in row-major
    /// order. Empty cells get [`PieceId::NONE`], obstacle kinds get their data.
    pub fn from_kinds<R: AsRef<[PieceKind]>>(rows: &[R]) -> Result<Self> {
        let size: Coord = rows.len().try_into().map_err(|_| GameError::InvalidBoardSize)?;
        let mut board = Self::filled(size, Piece::EMPTY)?;
        let mut next_id = 1;
        for (row, kinds) in rows.iter().enumerate() {
            let kinds = kinds.as_ref();
            if kinds.len() != rows.len() {
                return Err(GameError::InvalidBoardShape);
            }
            for (col, &kind) in kinds.iter().enumerate() {
                if kind.is_empty() {
                    continue;
                }
                board.cells[[row, col]] = Piece::with_obstacle_data(PieceId(next_id), kind);
                next_id += 1;
            }
        }
        Ok(board)
    }

    /// Parses the text form produced by `Display`: one line per row, one
    /// symbol per cell, whitespace ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: alloc::vec::Vec<alloc::vec::Vec<PieceKind>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| PieceKind::from_symbol(c).ok_or(GameError::InvalidBoardShape))
                    .collect::<Result<_>>()
            })
            .collect::<Result<_>>()?;
        Self::from_kinds(&rows)
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows().try_into().unwrap()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Piece> {
        self.validate_coords(coords).ok().map(|coords| &self[coords])
    }

    pub fn kind_at(&self, coords: Coord2) -> PieceKind {
        self[coords].kind
    }

    pub fn swap(&mut self, a: Coord2, b: Coord2) -> Result<()> {
        let a = self.validate_coords(a)?;
        let b = self.validate_coords(b)?;
        self.cells.swap(a.to_nd_index(), b.to_nd_index());
        Ok(())
    }

    /// Empties a cell, returning whether it held a piece.
    pub fn clear(&mut self, coords: Coord2) -> bool {
        let cell = &mut self[coords];
        let was_occupied = !cell.is_empty();
        *cell = Piece::EMPTY;
        was_occupied
    }

    pub fn iter_coords(&self) -> CoordIter {
        self.cells.iter_coords()
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Piece)> {
        self.iter_coords().zip(self.cells.iter())
    }

    pub fn count_kind(&self, kind: PieceKind) -> CellCount {
        self.cells
            .iter()
            .filter(|piece| piece.kind == kind)
            .count()
            .try_into()
            .unwrap()
    }

    pub fn count_empty(&self) -> CellCount {
        self.count_kind(PieceKind::Empty)
    }

    pub fn cells(&self) -> &Array2<Piece> {
        &self.cells
    }

    /// Drops pieces to the bottom of each column, keeping their order, then
    /// fills the vacated top cells from `source`. Obstacle-mode refills roll the
    /// obstacle chance per cell. Returns how many cells were refilled.
    pub fn apply_gravity(&mut self, source: &mut dyn PieceSource, mode: SpawnMode) -> CellCount {
        let mut refilled: CellCount = 0;
        for (col, mut column) in self.cells.columns_mut().into_iter().enumerate() {
            let len = column.len();
            let mut write = len;
            for row in (0..len).rev() {
                if column[row].is_empty() {
                    continue;
                }
                write -= 1;
                if write != row {
                    column[write] = column[row];
                    column[row] = Piece::EMPTY;
                }
            }

            // refill bottom-up, nearest to the settled pieces first
            for row in (0..write).rev() {
                column[row] = mode.spawn(source);
            }
            if write > 0 {
                log::trace!("Column {col}: refilled {write} cells");
            }
            refilled += write as CellCount;
        }
        refilled
    }
}

impl Index<Coord2> for Board {
    type Output = Piece;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for (col, piece) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", piece.kind.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
