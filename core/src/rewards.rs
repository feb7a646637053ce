use serde::{Deserialize, Serialize};

use crate::*;

/// Coins awarded per star.
pub const COINS_PER_STAR: u32 = 10;
/// Score that earns one bonus coin.
pub const SCORE_PER_COIN: Score = 1000;

/// 3 stars at twice the target, 2 at one and a half times, 1 at the target.
pub const fn stars(score: Score, target_score: Score) -> u8 {
    let score = score as u64;
    let target = target_score as u64;
    if score >= 2 * target {
        3
    } else if 2 * score >= 3 * target {
        2
    } else if score >= target {
        1
    } else {
        0
    }
}

pub const fn coins(score: Score, target_score: Score) -> u32 {
    stars(score, target_score) as u32 * COINS_PER_STAR + score / SCORE_PER_COIN
}

/// What a finished attempt hands to whoever keeps player progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelResult {
    pub level_id: LevelId,
    pub won: bool,
    pub score: Score,
    pub stars: u8,
    pub coins: u32,
    /// Player level reached once this result is recorded.
    pub unlocks: LevelId,
}

impl LevelResult {
    /// `None` while the session is still being played.
    pub fn from_session(session: &GameSession) -> Option<Self> {
        let status = session.status();
        if !status.is_finished() {
            return None;
        }

        let level = session.current_level();
        let score = session.score();
        let won = status == GameStatus::Won;
        let (stars, coins) = if won {
            (stars(score, level.target_score), coins(score, level.target_score))
        } else {
            (0, 0)
        };

        Some(Self {
            level_id: level.id,
            won,
            score,
            stars,
            coins,
            unlocks: if won { level.id + 1 } else { level.id },
        })
    }
}
