use alloc::vec::Vec;

use super::*;

/// First id a scripted source hands out. Fixture boards number their pieces
/// from 1 up to the largest cell count, so refills never collide with them.
const FIRST_SCRIPTED_ID: u32 = mult(MAX_BOARD_SIZE, MAX_BOARD_SIZE) as u32 + 1;

/// Deterministic source that cycles through a fixed list of kinds. Useful for
/// building fixtures whose refills are known in advance.
///
/// Shuffling rotates the slice left by one, obstacle rolls never succeed and
/// obstacle spawns cycle through the obstacle kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedPieceSource {
    kinds: Vec<PieceKind>,
    cursor: usize,
    obstacle_cursor: usize,
    next_id: u32,
}

impl ScriptedPieceSource {
    pub fn new(kinds: impl Into<Vec<PieceKind>>) -> Self {
        let mut kinds: Vec<PieceKind> = kinds.into();
        let before = kinds.len();
        kinds.retain(|kind| kind.is_normal());
        if kinds.len() != before {
            log::warn!("Dropped {} non-normal kinds from script", before - kinds.len());
        }
        if kinds.is_empty() {
            kinds = PieceKind::NORMAL.to_vec();
        }
        Self {
            kinds,
            cursor: 0,
            obstacle_cursor: 0,
            next_id: FIRST_SCRIPTED_ID,
        }
    }

    /// Number of normal pieces handed out so far.
    pub fn spawned(&self) -> usize {
        self.cursor
    }

    fn fresh_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.checked_add(1).unwrap_or(FIRST_SCRIPTED_ID);
        id
    }
}

impl PieceSource for ScriptedPieceSource {
    fn spawn_normal(&mut self) -> Piece {
        let kind = self.kinds[self.cursor % self.kinds.len()];
        self.cursor += 1;
        Piece::new(self.fresh_id(), kind)
    }

    fn spawn_obstacle(&mut self) -> Piece {
        let kind = PieceKind::OBSTACLES[self.obstacle_cursor % PieceKind::OBSTACLES.len()];
        self.obstacle_cursor += 1;
        Piece::with_obstacle_data(self.fresh_id(), kind)
    }

    fn roll_obstacle(&mut self) -> bool {
        false
    }

    fn shuffle(&mut self, pieces: &mut [Piece]) {
        if !pieces.is_empty() {
            pieces.rotate_left(1);
        }
    }
}
