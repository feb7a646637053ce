use serde::{Deserialize, Serialize};

/// Chance, in percent, that a generated cell becomes an obstacle.
pub const OBSTACLE_CHANCE_PERCENT: u32 = 10;

/// Hits a burnt toast takes before it clears.
pub const BURNT_TOAST_HEALTH: u8 = 2;

/// Countdown carried by melting butter.
pub const MELTING_BUTTER_TIMER: u8 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PieceKind {
    Toast,
    Pancake,
    Honey,
    Butter,
    Waffle,
    Syrup,
    /// Cleared cell waiting for gravity.
    Empty,
    BurntToast,
    MeltingButter,
    StickyHoney,
}

impl PieceKind {
    pub const NORMAL: [PieceKind; 6] = [
        Self::Toast,
        Self::Pancake,
        Self::Honey,
        Self::Butter,
        Self::Waffle,
        Self::Syrup,
    ];

    pub const OBSTACLES: [PieceKind; 3] =
        [Self::BurntToast, Self::MeltingButter, Self::StickyHoney];

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_normal(self) -> bool {
        matches!(
            self,
            Self::Toast | Self::Pancake | Self::Honey | Self::Butter | Self::Waffle | Self::Syrup
        )
    }

    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::BurntToast | Self::MeltingButter | Self::StickyHoney)
    }

    /// One-character form used by the text board.
    pub const fn symbol(self) -> char {
        use PieceKind::*;
        match self {
            Toast => 'T',
            Pancake => 'P',
            Honey => 'H',
            Butter => 'B',
            Waffle => 'W',
            Syrup => 'S',
            Empty => '.',
            BurntToast => 'x',
            MeltingButter => 'm',
            StickyHoney => 'h',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        use PieceKind::*;
        Some(match symbol {
            'T' => Toast,
            'P' => Pancake,
            'H' => Honey,
            'B' => Butter,
            'W' => Waffle,
            'S' => Syrup,
            '.' => Empty,
            'x' => BurntToast,
            'm' => MeltingButter,
            'h' => StickyHoney,
            _ => return None,
        })
    }
}

impl Default for PieceKind {
    fn default() -> Self {
        Self::Empty
    }
}

/// Tag shown on special pieces. Stored and rendered only, it changes neither
/// matching nor scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialKind {
    None,
    #[serde(rename = "striped-h")]
    StripedHorizontal,
    #[serde(rename = "striped-v")]
    StripedVertical,
    Wrapped,
    ColorBomb,
}

impl Default for SpecialKind {
    fn default() -> Self {
        Self::None
    }
}

/// Per-spawn identity, only meaningful for UI list diffing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl PieceId {
    pub const NONE: Self = Self(0);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    #[serde(default)]
    pub special: SpecialKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u8>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sticky: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Piece {
    pub const EMPTY: Self = Self::new(PieceId::NONE, PieceKind::Empty);

    pub const fn new(id: PieceId, kind: PieceKind) -> Self {
        Self {
            id,
            kind,
            special: SpecialKind::None,
            health: None,
            timer: None,
            sticky: false,
        }
    }

    /// Builds a piece with the obstacle data its kind carries.
    pub const fn with_obstacle_data(id: PieceId, kind: PieceKind) -> Self {
        let mut piece = Self::new(id, kind);
        match kind {
            PieceKind::BurntToast => piece.health = Some(BURNT_TOAST_HEALTH),
            PieceKind::MeltingButter => {
                piece.health = Some(1);
                piece.timer = Some(MELTING_BUTTER_TIMER);
            }
            PieceKind::StickyHoney => {
                piece.health = Some(1);
                piece.sticky = true;
            }
            _ => {}
        }
        piece
    }

    pub const fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Hits left before the piece clears. Pieces without health clear on one hit.
    pub fn remaining_health(&self) -> u8 {
        self.health.unwrap_or(1)
    }
}

impl Default for Piece {
    fn default() -> Self {
        Self::EMPTY
    }
}
