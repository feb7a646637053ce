use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub type LevelId = u32;

/// One playable level. Immutable once defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Display text only, play is judged on `target_score`.
    pub objective: String,
    pub target_score: Score,
    pub moves: u32,
    pub obstacles: Vec<String>,
}

impl Level {
    pub fn new(
        id: LevelId,
        name: &str,
        objective: &str,
        target_score: Score,
        moves: u32,
        obstacles: &[&str],
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            objective: objective.to_string(),
            target_score,
            moves,
            obstacles: obstacles.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Supplies levels by id.
pub trait LevelCatalog {
    fn level(&self, id: LevelId) -> Option<Level>;

    fn next_level(&self, id: LevelId) -> Option<Level> {
        self.level(id.checked_add(1)?)
    }
}

/// The fixed tutorial run of five levels.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticLevelCatalog {
    levels: Vec<Level>,
}

impl StaticLevelCatalog {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

impl Default for StaticLevelCatalog {
    fn default() -> Self {
        Self::new(alloc::vec![
            Level::new(1, "Toast Town Basics", "Score 1000 points", 1000, 20, &[]),
            Level::new(2, "Pancake Plains", "Score 2000 points", 2000, 18, &["jelly"]),
            Level::new(3, "Butter Boulevard", "Collect 10 butter pieces", 1500, 15, &["chocolate"]),
            Level::new(4, "Honey Hills", "Score 3000 points", 3000, 16, &["jelly", "chocolate"]),
            Level::new(
                5,
                "Waffle Woods",
                "Clear all obstacles",
                2500,
                14,
                &["licorice", "chocolate", "jelly"],
            ),
        ])
    }
}

impl LevelCatalog for StaticLevelCatalog {
    fn level(&self, id: LevelId) -> Option<Level> {
        self.levels.iter().find(|level| level.id == id).cloned()
    }
}

pub const LEVELS_PER_WORLD: LevelId = 50;
pub const MAX_LEVEL: LevelId = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct World {
    pub id: u8,
    pub name: &'static str,
    pub theme: &'static str,
    /// Player level needed before the world opens.
    pub unlock_level: LevelId,
}

impl World {
    pub const fn first_level(&self) -> LevelId {
        (self.id as LevelId - 1) * LEVELS_PER_WORLD + 1
    }

    pub const fn last_level(&self) -> LevelId {
        self.id as LevelId * LEVELS_PER_WORLD
    }

    pub const fn contains(&self, level: LevelId) -> bool {
        level >= self.first_level() && level <= self.last_level()
    }

    /// First word of the name, lowercased, as used in objective text.
    pub fn staple(&self) -> String {
        self.name
            .split(' ')
            .next()
            .unwrap_or(self.name)
            .to_lowercase()
    }
}

const fn world(id: u8, name: &'static str, theme: &'static str) -> World {
    let unlock_level = if id == 1 {
        1
    } else {
        (id as LevelId - 1) * LEVELS_PER_WORLD - 5
    };
    World {
        id,
        name,
        theme,
        unlock_level,
    }
}

pub const WORLDS: [World; 20] = [
    world(1, "Toast Town", "breakfast-basics"),
    world(2, "Pancake Plains", "fluffy-fields"),
    world(3, "Butter Boulevard", "creamy-streets"),
    world(4, "Honey Hills", "sweet-mountains"),
    world(5, "Waffle Woods", "crispy-forest"),
    world(6, "Syrup Swamps", "sticky-wetlands"),
    world(7, "Cereal City", "crunchy-metropolis"),
    world(8, "Bacon Beach", "sizzling-shores"),
    world(9, "Egg Empire", "golden-kingdom"),
    world(10, "Muffin Mountains", "baked-peaks"),
    world(11, "Croissant Caves", "flaky-caverns"),
    world(12, "Bagel Bridge", "circular-crossing"),
    world(13, "Donut Dimension", "glazed-portal"),
    world(14, "Coffee Cosmos", "caffeinated-space"),
    world(15, "Fruit Fortress", "vitamin-stronghold"),
    world(16, "Yogurt Yards", "creamy-gardens"),
    world(17, "Granola Galaxy", "crunchy-cosmos"),
    world(18, "Smoothie Station", "blended-base"),
    world(19, "Oatmeal Ocean", "hearty-seas"),
    world(20, "Breakfast Olympus", "divine-summit"),
];

pub fn world_of(level: LevelId) -> Option<&'static World> {
    WORLDS.iter().find(|world| world.contains(level))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Legendary,
}

impl Difficulty {
    pub const fn for_level(level: LevelId) -> Self {
        match level {
            ..=200 => Self::Easy,
            201..=400 => Self::Medium,
            401..=600 => Self::Hard,
            601..=800 => Self::Expert,
            _ => Self::Legendary,
        }
    }

    pub const fn obstacle_count(self) -> usize {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Expert => 4,
            Self::Legendary => 5,
        }
    }
}

/// Obstacle names, introduced in this order as difficulty rises.
pub const OBSTACLE_NAMES: [&str; 8] = [
    "jelly",
    "chocolate",
    "licorice",
    "ice",
    "stone",
    "honey-trap",
    "burnt-toast",
    "sticky-syrup",
];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReward {
    pub coins: u32,
    pub gems: Option<u32>,
    pub power_ups: Option<PowerUpInventory>,
}

/// A generated level with its place in the world map.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDetails {
    pub level: Level,
    pub world_id: u8,
    pub difficulty: Difficulty,
    pub special_features: Vec<&'static str>,
    pub reward: LevelReward,
    /// Level that must be completed first.
    pub unlock_after: Option<LevelId>,
}

/// Generates levels 1 to [`MAX_LEVEL`] from a seed. The same seed and id
/// always give the same level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProceduralCatalog {
    seed: u64,
}

impl ProceduralCatalog {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn details(&self, id: LevelId) -> Option<LevelDetails> {
        if !(1..=MAX_LEVEL).contains(&id) {
            return None;
        }
        let world = world_of(id)?;
        let mut rng =
            SmallRng::seed_from_u64(self.seed ^ u64::from(id).wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let difficulty = Difficulty::for_level(id);
        let stage = id - world.first_level() + 1;
        let target_score = id * 150 + rng.random_range(0..300);
        let moves = 25u32.saturating_sub(id / 100).max(10) + rng.random_range(0..5);
        let objective = objective_text(id, world, &mut rng);
        let obstacles = OBSTACLE_NAMES[..difficulty.obstacle_count()]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Some(LevelDetails {
            level: Level {
                id,
                name: format!("{} - Stage {stage}", world.name),
                objective,
                target_score,
                moves,
                obstacles,
            },
            world_id: world.id,
            difficulty,
            special_features: special_features(id),
            reward: LevelReward {
                coins: id * 5 / 2 + 50,
                gems: (id % 10 == 0).then_some(id / 10 + 5),
                power_ups: (id % 25 == 0).then_some(PowerUpInventory {
                    hammer: 2,
                    shuffle: 1,
                    extra_moves: 1,
                    ..PowerUpInventory::EMPTY
                }),
            },
            unlock_after: (id > 1).then(|| id - 1),
        })
    }

    pub fn world_levels(&self, world_id: u8) -> Vec<LevelDetails> {
        let Some(world) = WORLDS.iter().find(|world| world.id == world_id) else {
            return Vec::new();
        };
        (world.first_level()..=world.last_level())
            .filter_map(|id| self.details(id))
            .collect()
    }

    /// Whether a player whose highest completed level is `player_level` may
    /// start `id`.
    pub fn is_unlocked(&self, id: LevelId, player_level: LevelId) -> bool {
        match self.details(id).and_then(|details| details.unlock_after) {
            Some(required) => player_level >= required,
            None => true,
        }
    }
}

impl LevelCatalog for ProceduralCatalog {
    fn level(&self, id: LevelId) -> Option<Level> {
        self.details(id).map(|details| details.level)
    }
}

fn objective_text(id: LevelId, world: &World, rng: &mut SmallRng) -> String {
    match id % 6 {
        0 => format!("Score {} points", id * 100 + rng.random_range(0..500)),
        1 => format!("Collect {} {} pieces", id / 10 + 5, world.staple()),
        2 => format!("Clear all obstacles in {} moves", id / 20 + 15),
        3 => format!("Create {} special combos", id / 50 + 2),
        4 => "Reach the bottom of the board".to_string(),
        _ => format!("Collect ingredients for the perfect {}", world.staple()),
    }
}

fn special_features(id: LevelId) -> Vec<&'static str> {
    let mut features = Vec::new();
    if id % 10 == 0 {
        features.push("boss-level");
    }
    if id % 25 == 0 {
        features.push("mega-rewards");
    }
    if id % 50 == 0 {
        features.push("world-finale");
    }
    if id % 100 == 0 {
        features.push("epic-challenge");
    }
    if id > 500 {
        features.push("legendary-difficulty");
    }
    if id > 800 {
        features.push("cosmic-powers");
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_matches_tutorial_run() {
        let catalog = StaticLevelCatalog::default();

        let first = catalog.level(1).unwrap();
        assert_eq!(first.target_score, 1000);
        assert_eq!(first.moves, 20);
        assert!(first.obstacles.is_empty());

        assert_eq!(catalog.next_level(4).unwrap().name, "Waffle Woods");
        assert_eq!(catalog.next_level(5), None);
        assert_eq!(catalog.level(0), None);
    }

    #[test]
    fn worlds_tile_the_level_range() {
        assert_eq!(WORLDS[0].first_level(), 1);
        assert_eq!(WORLDS[0].unlock_level, 1);
        assert_eq!(WORLDS[1].first_level(), 51);
        assert_eq!(WORLDS[1].unlock_level, 45);
        assert_eq!(WORLDS[19].last_level(), MAX_LEVEL);
        assert_eq!(world_of(150).unwrap().name, "Butter Boulevard");
        assert!(world_of(1001).is_none());
    }

    #[test]
    fn procedural_levels_follow_progression_rules() {
        let catalog = ProceduralCatalog::new(9);

        let details = catalog.details(250).unwrap();
        assert_eq!(details.level.name, "Waffle Woods - Stage 50");
        assert_eq!(details.difficulty, Difficulty::Medium);
        assert_eq!(details.level.obstacles, ["jelly", "chocolate"]);
        assert!((250 * 150..250 * 150 + 300).contains(&details.level.target_score));
        assert!((23..28).contains(&details.level.moves));
        assert_eq!(
            details.special_features,
            ["boss-level", "mega-rewards", "world-finale"]
        );
        assert_eq!(details.reward.coins, 675);
        assert_eq!(details.reward.gems, Some(30));
        assert_eq!(details.reward.power_ups.unwrap().hammer, 2);
        assert_eq!(details.unlock_after, Some(249));

        let late = catalog.details(990).unwrap();
        assert!((16..21).contains(&late.level.moves));
        assert_eq!(late.difficulty, Difficulty::Legendary);
        assert_eq!(late.level.obstacles.len(), 5);
    }

    #[test]
    fn procedural_levels_are_reproducible() {
        let a = ProceduralCatalog::new(1);
        let b = ProceduralCatalog::new(1);

        assert_eq!(a.level(77), b.level(77));
        assert_eq!(a.level(0), None);
        assert_eq!(a.level(MAX_LEVEL + 1), None);
        assert_eq!(a.next_level(MAX_LEVEL), None);
    }

    #[test]
    fn objectives_rotate_by_id() {
        let catalog = ProceduralCatalog::new(0);

        assert_eq!(catalog.level(1).unwrap().objective, "Collect 5 toast pieces");
        assert_eq!(catalog.level(4).unwrap().objective, "Reach the bottom of the board");
        assert_eq!(
            catalog.level(5).unwrap().objective,
            "Collect ingredients for the perfect toast"
        );
    }

    #[test]
    fn unlocks_need_the_previous_level() {
        let catalog = ProceduralCatalog::new(0);

        assert!(catalog.is_unlocked(1, 0));
        assert!(!catalog.is_unlocked(10, 8));
        assert!(catalog.is_unlocked(10, 9));
        assert_eq!(catalog.world_levels(2).len(), 50);
        assert!(catalog.world_levels(21).is_empty());
    }
}
