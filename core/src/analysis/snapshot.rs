use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a presentation layer needs to draw a session, with the board
/// as plain rows for an easy wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub level: Level,
    pub board: Vec<Vec<Piece>>,
    pub score: Score,
    pub moves_remaining: u32,
    pub status: GameStatus,
    pub inventory: PowerUpInventory,
}

impl SessionSnapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let board = session
            .board()
            .cells()
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect();

        Self {
            level: session.current_level().clone(),
            board,
            score: session.score(),
            moves_remaining: session.moves_remaining(),
            status: session.status(),
            inventory: *session.inventory(),
        }
    }

    pub fn size(&self) -> usize {
        self.board.len()
    }

    pub fn validate(&self) -> Result<()> {
        let size = self.size();
        if self.board.iter().any(|row| row.len() != size) {
            return Err(GameError::InvalidBoardShape);
        }
        let size: Coord = size.try_into().map_err(|_| GameError::InvalidBoardSize)?;
        Board::validate_size(size)?;
        Ok(())
    }

    pub fn to_board(&self) -> Result<Board> {
        self.validate()?;
        let size = self.size();
        let cells: Vec<Piece> = self.board.iter().flatten().copied().collect();
        let cells = Array2::from_shape_vec((size, size), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Board::from_cells(cells)
    }
}
