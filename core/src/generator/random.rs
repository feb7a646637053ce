use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Piece source backed by a seeded `SmallRng`. The same seed replays the same
/// pieces, shuffles and obstacle rolls.
#[derive(Clone, Debug)]
pub struct RandomPieceSource {
    rng: SmallRng,
    next_id: u32,
}

impl RandomPieceSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn fresh_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        // 0 is reserved for empty cells
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }
}

impl PieceSource for RandomPieceSource {
    fn spawn_normal(&mut self) -> Piece {
        let kind = *PieceKind::NORMAL
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::Toast);
        Piece::new(self.fresh_id(), kind)
    }

    fn spawn_obstacle(&mut self) -> Piece {
        let kind = *PieceKind::OBSTACLES
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::BurntToast);
        Piece::with_obstacle_data(self.fresh_id(), kind)
    }

    fn roll_obstacle(&mut self) -> bool {
        self.rng.random_ratio(OBSTACLE_CHANCE_PERCENT, 100)
    }

    fn shuffle(&mut self, pieces: &mut [Piece]) {
        pieces.shuffle(&mut self.rng);
    }
}
