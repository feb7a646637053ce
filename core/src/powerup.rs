use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

pub const HAMMER_POINTS: Score = 100;
pub const COLOR_BOMB_POINTS: Score = 50;
pub const BACON_BOMB_POINTS: Score = 75;
pub const MAPLE_SYRUP_POINTS: Score = 30;
pub const EXTRA_MOVES_BONUS: u32 = 5;
pub const COFFEE_BOOST_BONUS: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUp {
    /// Smashes one cell.
    Hammer,
    /// Permutes every piece on the board.
    Shuffle,
    ExtraMoves,
    /// Clears every piece of the target's kind.
    ColorBomb,
    /// Clears the target's row and column, chipping armoured obstacles.
    BaconBomb,
    /// Respawns every piece of the target's kind in place.
    MapleSyrup,
    CoffeeBoost,
}

impl PowerUp {
    pub const ALL: [PowerUp; 7] = [
        Self::Hammer,
        Self::Shuffle,
        Self::ExtraMoves,
        Self::ColorBomb,
        Self::BaconBomb,
        Self::MapleSyrup,
        Self::CoffeeBoost,
    ];

    pub const fn key(self) -> &'static str {
        use PowerUp::*;
        match self {
            Hammer => "hammer",
            Shuffle => "shuffle",
            ExtraMoves => "extraMoves",
            ColorBomb => "colorBomb",
            BaconBomb => "baconBomb",
            MapleSyrup => "mapleSyrup",
            CoffeeBoost => "coffeeBoost",
        }
    }

    pub const fn needs_target(self) -> bool {
        matches!(
            self,
            Self::Hammer | Self::ColorBomb | Self::BaconBomb | Self::MapleSyrup
        )
    }

    /// Moves granted by move power-ups, which never touch the board. Zero for
    /// the rest.
    pub const fn bonus_moves(self) -> u32 {
        match self {
            Self::ExtraMoves => EXTRA_MOVES_BONUS,
            Self::CoffeeBoost => COFFEE_BOOST_BONUS,
            _ => 0,
        }
    }
}

impl fmt::Display for PowerUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PowerUp {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|power_up| power_up.key().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownPowerUp)
    }
}

/// Charges held for each power-up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpInventory {
    #[serde(default)]
    pub hammer: u16,
    #[serde(default)]
    pub shuffle: u16,
    #[serde(default)]
    pub extra_moves: u16,
    #[serde(default)]
    pub color_bomb: u16,
    #[serde(default)]
    pub bacon_bomb: u16,
    #[serde(default)]
    pub maple_syrup: u16,
    #[serde(default)]
    pub coffee_boost: u16,
}

impl PowerUpInventory {
    pub const EMPTY: Self = Self {
        hammer: 0,
        shuffle: 0,
        extra_moves: 0,
        color_bomb: 0,
        bacon_bomb: 0,
        maple_syrup: 0,
        coffee_boost: 0,
    };

    /// Counts a new player starts with.
    pub const STARTER: Self = Self {
        hammer: 3,
        shuffle: 2,
        extra_moves: 1,
        color_bomb: 1,
        bacon_bomb: 2,
        maple_syrup: 1,
        coffee_boost: 1,
    };

    pub fn count(&self, power_up: PowerUp) -> u16 {
        *self.slot(power_up)
    }

    pub fn set(&mut self, power_up: PowerUp, count: u16) {
        *self.slot_mut(power_up) = count;
    }

    pub fn add(&mut self, power_up: PowerUp, count: u16) {
        let slot = self.slot_mut(power_up);
        *slot = slot.saturating_add(count);
    }

    /// Adds every count of `other` into `self`.
    pub fn merge(&mut self, other: &PowerUpInventory) {
        for power_up in PowerUp::ALL {
            self.add(power_up, other.count(power_up));
        }
    }

    /// Takes one charge, returning `false` when none is left.
    pub fn consume(&mut self, power_up: PowerUp) -> bool {
        let slot = self.slot_mut(power_up);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (PowerUp, u16)> + '_ {
        PowerUp::ALL
            .into_iter()
            .map(|power_up| (power_up, self.count(power_up)))
    }

    fn slot(&self, power_up: PowerUp) -> &u16 {
        use PowerUp::*;
        match power_up {
            Hammer => &self.hammer,
            Shuffle => &self.shuffle,
            ExtraMoves => &self.extra_moves,
            ColorBomb => &self.color_bomb,
            BaconBomb => &self.bacon_bomb,
            MapleSyrup => &self.maple_syrup,
            CoffeeBoost => &self.coffee_boost,
        }
    }

    fn slot_mut(&mut self, power_up: PowerUp) -> &mut u16 {
        use PowerUp::*;
        match power_up {
            Hammer => &mut self.hammer,
            Shuffle => &mut self.shuffle,
            ExtraMoves => &mut self.extra_moves,
            ColorBomb => &mut self.color_bomb,
            BaconBomb => &mut self.bacon_bomb,
            MapleSyrup => &mut self.maple_syrup,
            CoffeeBoost => &mut self.coffee_boost,
        }
    }
}

impl Default for PowerUpInventory {
    fn default() -> Self {
        Self::STARTER
    }
}

/// What an activation did.
#[derive(Clone, Debug, PartialEq)]
pub enum PowerUpEffect {
    /// The board changed and gravity has already run.
    Board {
        board: Board,
        score_delta: Score,
        /// Cells cleared, chipped, respawned or moved.
        affected: CellCount,
    },
    /// Moves to add, the board is untouched.
    Moves(u32),
}

/// Applies `power_up` to a copy of `board`. Inventory is the caller's job.
///
/// Board-changing power-ups run gravity and refill once afterwards, in
/// `refill` mode. No cascade follows, even if the refill lines up a run.
pub fn apply_power_up(
    board: &Board,
    power_up: PowerUp,
    target: Option<Coord2>,
    source: &mut dyn PieceSource,
    refill: SpawnMode,
) -> Result<PowerUpEffect> {
    use PowerUp::*;

    let locate = || board.validate_coords(target.ok_or(GameError::MissingTarget)?);

    let mut next = board.clone();
    let (score_delta, affected) = match power_up {
        ExtraMoves | CoffeeBoost => return Ok(PowerUpEffect::Moves(power_up.bonus_moves())),
        Shuffle => (0, shuffle_pieces(&mut next, source)),
        Hammer => {
            next.clear(locate()?);
            (HAMMER_POINTS, 1)
        }
        ColorBomb => {
            let kind = next.kind_at(locate()?);
            let cleared = clear_kind(&mut next, kind);
            (Score::from(cleared) * COLOR_BOMB_POINTS, cleared)
        }
        BaconBomb => bacon_bomb(&mut next, locate()?),
        MapleSyrup => {
            let kind = next.kind_at(locate()?);
            let respawned = respawn_kind(&mut next, kind, source);
            (Score::from(respawned) * MAPLE_SYRUP_POINTS, respawned)
        }
    };

    next.apply_gravity(source, refill);
    log::debug!("{power_up} at {target:?}: {affected} cells, +{score_delta}");

    Ok(PowerUpEffect::Board {
        board: next,
        score_delta,
        affected,
    })
}

/// Permutes the non-empty pieces among the non-empty cells, row-major.
fn shuffle_pieces(board: &mut Board, source: &mut dyn PieceSource) -> CellCount {
    let occupied: Vec<Coord2> = board
        .iter()
        .filter(|(_, piece)| !piece.is_empty())
        .map(|(coords, _)| coords)
        .collect();
    let mut pieces: Vec<Piece> = occupied.iter().map(|&coords| board[coords]).collect();

    source.shuffle(&mut pieces);

    for (&coords, piece) in occupied.iter().zip(pieces) {
        board[coords] = piece;
    }
    occupied.len().try_into().unwrap_or(CellCount::MAX)
}

fn clear_kind(board: &mut Board, kind: PieceKind) -> CellCount {
    if kind.is_empty() {
        return 0;
    }
    let mut cleared = 0;
    for coords in board.iter_coords() {
        if board.kind_at(coords) == kind && board.clear(coords) {
            cleared += 1;
        }
    }
    cleared
}

fn respawn_kind(board: &mut Board, kind: PieceKind, source: &mut dyn PieceSource) -> CellCount {
    if kind.is_empty() {
        return 0;
    }
    let mut respawned = 0;
    for coords in board.iter_coords() {
        if board.kind_at(coords) == kind {
            board[coords] = source.spawn_normal();
            respawned += 1;
        }
    }
    respawned
}

/// Hits every cell on the target's row and column once. Armoured cells lose
/// one health, everything else clears.
fn bacon_bomb(board: &mut Board, target: Coord2) -> (Score, CellCount) {
    let mut score = 0;
    let mut affected = 0;
    for coords in iter_cross(target, board.size()) {
        let piece = &mut board[coords];
        if piece.is_empty() {
            continue;
        }
        affected += 1;
        if piece.remaining_health() > 1 {
            piece.health = Some(piece.remaining_health() - 1);
        } else {
            *piece = Piece::EMPTY;
            score += BACON_BOMB_POINTS;
        }
    }
    (score, affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PieceKind::*;

    fn mixed_board() -> Board {
        Board::parse(
            "T P H B W
             P H B W S
             H B W S T
             B W S T P
             W S T P H",
        )
        .unwrap()
    }

    fn apply(
        board: &Board,
        power_up: PowerUp,
        target: Option<Coord2>,
        source: &mut ScriptedPieceSource,
    ) -> Result<PowerUpEffect> {
        apply_power_up(board, power_up, target, source, SpawnMode::NormalOnly)
    }

    fn board_of(effect: PowerUpEffect) -> (Board, Score, CellCount) {
        match effect {
            PowerUpEffect::Board {
                board,
                score_delta,
                affected,
            } => (board, score_delta, affected),
            PowerUpEffect::Moves(_) => panic!("expected a board effect"),
        }
    }

    #[test]
    fn keys_parse_and_print() {
        for power_up in PowerUp::ALL {
            assert_eq!(power_up.key().parse::<PowerUp>(), Ok(power_up));
        }
        assert_eq!("colorbomb".parse::<PowerUp>(), Ok(PowerUp::ColorBomb));
        assert_eq!("laser".parse::<PowerUp>(), Err(GameError::UnknownPowerUp));
    }

    #[test]
    fn inventory_consume_stops_at_zero() {
        let mut inventory = PowerUpInventory::EMPTY;
        inventory.set(PowerUp::Hammer, 1);

        assert!(inventory.consume(PowerUp::Hammer));
        assert!(!inventory.consume(PowerUp::Hammer));
        assert_eq!(inventory.count(PowerUp::Hammer), 0);
    }

    #[test]
    fn hammer_clears_one_cell_for_100() {
        let board = mixed_board();
        let mut source = ScriptedPieceSource::new([Syrup]);

        let effect = apply(&board, PowerUp::Hammer, Some((2, 2)), &mut source).unwrap();
        let (next, score, affected) = board_of(effect);

        assert_eq!(score, HAMMER_POINTS);
        assert_eq!(affected, 1);
        assert_eq!(source.spawned(), 1);
        // column 2 shifts down above the smashed cell
        assert_eq!(next.kind_at((0, 2)), Syrup);
        assert_eq!(next.kind_at((1, 2)), Honey);
        assert_eq!(next.kind_at((2, 2)), Butter);
        assert_eq!(next.kind_at((3, 2)), Syrup);
    }

    #[test]
    fn targeted_power_up_without_target_is_rejected() {
        let board = mixed_board();
        let mut source = ScriptedPieceSource::new([Syrup]);

        let targeted = [
            PowerUp::Hammer,
            PowerUp::ColorBomb,
            PowerUp::BaconBomb,
            PowerUp::MapleSyrup,
        ];
        for power_up in targeted {
            assert_eq!(
                apply(&board, power_up, None, &mut source),
                Err(GameError::MissingTarget)
            );
        }
        assert_eq!(
            apply(&board, PowerUp::Hammer, Some((5, 0)), &mut source),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn color_bomb_clears_every_cell_of_kind() {
        let board = mixed_board();
        let toasts = board.count_kind(Toast);
        let mut source = ScriptedPieceSource::new([Waffle]);

        let effect = apply(&board, PowerUp::ColorBomb, Some((0, 0)), &mut source).unwrap();
        let (next, score, affected) = board_of(effect);

        assert_eq!(toasts, 4);
        assert_eq!(affected, toasts);
        assert_eq!(score, 50 * Score::from(toasts));
        assert_eq!(next.count_kind(Toast), 0);
        assert_eq!(next.count_empty(), 0);
    }

    #[test]
    fn bacon_bomb_clears_cross_and_chips_armour() {
        let board = Board::parse(
            "T P H B
             P x B W
             H B W S
             B W S T",
        )
        .unwrap();
        let mut source = ScriptedPieceSource::new([Syrup]);

        let effect = apply(&board, PowerUp::BaconBomb, Some((1, 2)), &mut source).unwrap();
        let (next, score, affected) = board_of(effect);

        // row 1 has 4 cells, column 2 adds 3; the burnt toast at (1,1) survives
        assert_eq!(affected, 7);
        assert_eq!(score, 6 * BACON_BOMB_POINTS);
        let burnt: Vec<_> = next.iter().filter(|(_, p)| p.kind == BurntToast).collect();
        assert_eq!(burnt.len(), 1);
        assert_eq!(burnt[0].1.health, Some(1));
    }

    #[test]
    fn maple_syrup_respawns_in_place() {
        let board = mixed_board();
        let honeys: Vec<Coord2> = board
            .iter()
            .filter(|(_, p)| p.kind == Honey)
            .map(|(c, _)| c)
            .collect();
        let mut source = ScriptedPieceSource::new([Syrup]);

        let effect = apply(&board, PowerUp::MapleSyrup, Some((0, 2)), &mut source).unwrap();
        let (next, score, affected) = board_of(effect);

        assert_eq!(affected as usize, honeys.len());
        assert_eq!(score, MAPLE_SYRUP_POINTS * honeys.len() as Score);
        for coords in honeys {
            assert_eq!(next.kind_at(coords), Syrup);
            assert_ne!(next[coords].id, board[coords].id);
        }
    }

    #[test]
    fn shuffle_keeps_the_multiset() {
        let board = mixed_board();
        let mut source = ScriptedPieceSource::new([Syrup]);

        let effect = apply(&board, PowerUp::Shuffle, None, &mut source).unwrap();
        let (next, score, _) = board_of(effect);

        assert_eq!(score, 0);
        assert_ne!(next, board);
        for kind in PieceKind::NORMAL {
            assert_eq!(next.count_kind(kind), board.count_kind(kind));
        }
    }

    #[test]
    fn move_power_ups_leave_board_alone() {
        let board = mixed_board();
        let mut source = ScriptedPieceSource::new([Syrup]);

        assert_eq!(
            apply(&board, PowerUp::ExtraMoves, None, &mut source),
            Ok(PowerUpEffect::Moves(5))
        );
        assert_eq!(
            apply(&board, PowerUp::CoffeeBoost, Some((0, 0)), &mut source),
            Ok(PowerUpEffect::Moves(3))
        );
        assert_eq!(source.spawned(), 0);
        assert_eq!(PowerUp::Hammer.bonus_moves(), 0);
    }

    #[test]
    fn missing_inventory_keys_hold_no_charges() {
        let inventory: PowerUpInventory =
            serde_json::from_str(r#"{"hammer": 2, "colorBomb": 1}"#).unwrap();

        assert_eq!(inventory.count(PowerUp::Hammer), 2);
        assert_eq!(inventory.count(PowerUp::ColorBomb), 1);
        assert_eq!(inventory.count(PowerUp::Shuffle), 0);
        assert_eq!(inventory.count(PowerUp::ExtraMoves), 0);
        assert_eq!(inventory.count(PowerUp::CoffeeBoost), 0);
    }
}
