use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;
pub use scripted::*;

mod random;
mod scripted;

/// Strategy that supplies fresh pieces and every bit of randomness the engine
/// uses. Sessions own exactly one, so swapping it makes play reproducible.
pub trait PieceSource: core::fmt::Debug {
    /// A uniformly chosen normal piece with a fresh id.
    fn spawn_normal(&mut self) -> Piece;

    /// One of the obstacle kinds, carrying its obstacle data and a fresh id.
    fn spawn_obstacle(&mut self) -> Piece;

    /// Rolls the per-cell obstacle chance.
    fn roll_obstacle(&mut self) -> bool;

    /// Permutes `pieces` in place.
    fn shuffle(&mut self, pieces: &mut [Piece]);
}

/// Which kinds a spawn may produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnMode {
    NormalOnly,
    WithObstacles,
}

impl SpawnMode {
    pub fn spawn(self, source: &mut dyn PieceSource) -> Piece {
        match self {
            SpawnMode::WithObstacles if source.roll_obstacle() => source.spawn_obstacle(),
            _ => source.spawn_normal(),
        }
    }
}

/// Fills a fresh `size` x `size` board. Runs already present on the result are
/// left in place.
pub fn generate_board(size: Coord, source: &mut dyn PieceSource, mode: SpawnMode) -> Result<Board> {
    let mut board = Board::filled(size, Piece::EMPTY)?;
    for coords in board.iter_coords() {
        board[coords] = mode.spawn(source);
    }
    log::debug!("Generated {size}x{size} board ({mode:?})");
    Ok(board)
}
