use alloc::boxed::Box;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Paused -> Playing
/// - Playing -> Won
/// - Playing -> Lost
///
/// Won and Lost only leave through re-initialization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Terminal check after a committed move. Reaching the target wins even when
/// the same move spends the last one.
pub const fn evaluate_status(
    score: Score,
    target_score: Score,
    moves_remaining: u32,
) -> GameStatus {
    if score >= target_score {
        GameStatus::Won
    } else if moves_remaining == 0 {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub board_size: Coord,
    /// Reject swaps between cells that do not share an edge.
    pub require_adjacent: bool,
    /// Spawn obstacles even on levels that list none.
    pub obstacles: bool,
    /// Check for a win after a power-up adds score.
    pub evaluate_after_power_up: bool,
    pub starting_inventory: PowerUpInventory,
}

impl SessionConfig {
    pub fn new(board_size: Coord) -> Self {
        let clamped = board_size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        if clamped != board_size {
            log::warn!("Board size {board_size} out of range, using {clamped}");
        }
        Self {
            board_size: clamped,
            ..Default::default()
        }
    }

    /// How boards for `level` are generated and refilled. Obstacles spawn
    /// when the level lists any, or always when forced.
    pub fn spawn_mode(&self, level: &Level) -> SpawnMode {
        if self.obstacles || !level.obstacles.is_empty() {
            SpawnMode::WithObstacles
        } else {
            SpawnMode::NormalOnly
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            require_adjacent: true,
            obstacles: false,
            evaluate_after_power_up: true,
            starting_inventory: PowerUpInventory::STARTER,
        }
    }
}

/// Outcome of [`GameSession::make_move`]. Everything but `Resolved` leaves the
/// session untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NotPlaying,
    NoMovesLeft,
    NoMatch,
    Resolved {
        score_delta: Score,
        passes: u32,
        cleared: CellCount,
        status: GameStatus,
    },
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Outcome of [`GameSession::use_power_up`]. Everything but `Applied` leaves
/// the session untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerUpOutcome {
    NotPlaying,
    Unavailable,
    Applied {
        power_up: PowerUp,
        score_delta: Score,
        bonus_moves: u32,
        status: GameStatus,
    },
}

impl PowerUpOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// One level attempt: the board, score, move budget and power-up charges.
///
/// Every mutating call takes `&mut self` and commits all fields together or
/// nothing at all.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    level: Level,
    board: Board,
    score: Score,
    moves_remaining: u32,
    status: GameStatus,
    inventory: PowerUpInventory,
    source: Box<dyn PieceSource>,
}

impl GameSession {
    pub fn new(
        level: Level,
        config: SessionConfig,
        mut source: Box<dyn PieceSource>,
    ) -> Result<Self> {
        let mode = config.spawn_mode(&level);
        let board = generate_board(config.board_size, source.as_mut(), mode)?;
        Ok(Self::assemble(level, config, board, source))
    }

    /// Seeded session with the default rules.
    pub fn with_seed(level: Level, seed: u64) -> Result<Self> {
        let source = RandomPieceSource::new(seed);
        Self::new(level, SessionConfig::default(), Box::new(source))
    }

    /// Starts `level` on a prepared board. The board size overrides the
    /// configured one.
    pub fn with_board(
        level: Level,
        mut config: SessionConfig,
        board: Board,
        source: Box<dyn PieceSource>,
    ) -> Result<Self> {
        config.board_size = Board::validate_size(board.size())?;
        Ok(Self::assemble(level, config, board, source))
    }

    /// Resumes a level attempt from a snapshot.
    pub fn restore(
        snapshot: &SessionSnapshot,
        mut config: SessionConfig,
        source: Box<dyn PieceSource>,
    ) -> Result<Self> {
        let board = snapshot.to_board()?;
        config.board_size = board.size();
        Ok(Self {
            level: snapshot.level.clone(),
            board,
            score: snapshot.score,
            moves_remaining: snapshot.moves_remaining,
            status: snapshot.status,
            inventory: snapshot.inventory,
            config,
            source,
        })
    }

    fn assemble(
        level: Level,
        config: SessionConfig,
        board: Board,
        source: Box<dyn PieceSource>,
    ) -> Self {
        log::debug!("Starting level {} ({}), {} moves", level.id, level.name, level.moves);
        Self {
            moves_remaining: level.moves,
            inventory: config.starting_inventory,
            level,
            board,
            score: 0,
            status: GameStatus::Playing,
            config,
            source,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_level(&self) -> &Level {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn inventory(&self) -> &PowerUpInventory {
        &self.inventory
    }

    /// Grants charges from outside play, e.g. level rewards or purchases.
    pub fn grant_power_ups(&mut self, extra: &PowerUpInventory) {
        self.inventory.merge(extra);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(self)
    }

    /// Fresh board, zero score and the level's move budget. Power-up charges
    /// carry over. Obstacles follow the new level.
    pub fn initialize_level(&mut self, level: Level) -> Result<()> {
        let mode = self.config.spawn_mode(&level);
        let board = generate_board(self.config.board_size, self.source.as_mut(), mode)?;
        log::debug!("Starting level {} ({}), {} moves", level.id, level.name, level.moves);
        self.board = board;
        self.score = 0;
        self.moves_remaining = level.moves;
        self.status = GameStatus::Playing;
        self.level = level;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        self.initialize_level(self.level.clone())
    }

    /// Returns whether the status changed.
    pub fn pause(&mut self) -> bool {
        self.transition(GameStatus::Playing, GameStatus::Paused)
    }

    /// Returns whether the status changed.
    pub fn resume(&mut self) -> bool {
        self.transition(GameStatus::Paused, GameStatus::Playing)
    }

    fn transition(&mut self, from: GameStatus, to: GameStatus) -> bool {
        if self.status != from {
            return false;
        }
        self.status = to;
        log::debug!("{from:?} -> {to:?}");
        true
    }

    /// Swaps two cells and resolves every cascade. A swap that matches
    /// nothing is discarded and costs no move.
    pub fn make_move(&mut self, from: Coord2, to: Coord2) -> Result<MoveOutcome> {
        let from = self.board.validate_coords(from)?;
        let to = self.board.validate_coords(to)?;
        if self.config.require_adjacent && !is_adjacent(from, to) {
            return Err(GameError::NotAdjacent);
        }

        if !self.status.is_playing() {
            return Ok(MoveOutcome::NotPlaying);
        }
        if self.moves_remaining == 0 {
            return Ok(MoveOutcome::NoMovesLeft);
        }

        let refill = self.config.spawn_mode(&self.level);
        let resolution = resolve_swap(&self.board, from, to, self.source.as_mut(), refill)?;
        let Some(resolution) = resolution else {
            return Ok(MoveOutcome::NoMatch);
        };

        let score = self.score.saturating_add(resolution.score_delta);
        let moves_remaining = self.moves_remaining - 1;
        let status = evaluate_status(score, self.level.target_score, moves_remaining);

        self.board = resolution.board;
        self.score = score;
        self.moves_remaining = moves_remaining;
        self.status = status;
        log::debug!(
            "Move {from:?} <-> {to:?}: +{} in {} passes, score {score}, {status:?}",
            resolution.score_delta,
            resolution.passes
        );

        Ok(MoveOutcome::Resolved {
            score_delta: resolution.score_delta,
            passes: resolution.passes,
            cleared: resolution.cleared,
            status,
        })
    }

    /// Spends one charge of `power_up`. `target` is required for the
    /// cell-targeted power-ups and ignored by the others.
    pub fn use_power_up(
        &mut self,
        power_up: PowerUp,
        target: Option<Coord2>,
    ) -> Result<PowerUpOutcome> {
        if !self.status.is_playing() {
            return Ok(PowerUpOutcome::NotPlaying);
        }
        if self.inventory.count(power_up) == 0 {
            return Ok(PowerUpOutcome::Unavailable);
        }

        let refill = self.config.spawn_mode(&self.level);
        let effect = apply_power_up(
            &self.board,
            power_up,
            target,
            self.source.as_mut(),
            refill,
        )?;
        self.inventory.consume(power_up);

        let (score_delta, bonus_moves) = match effect {
            PowerUpEffect::Moves(moves) => {
                self.moves_remaining = self.moves_remaining.saturating_add(moves);
                (0, moves)
            }
            PowerUpEffect::Board {
                board, score_delta, ..
            } => {
                self.board = board;
                self.score = self.score.saturating_add(score_delta);
                (score_delta, 0)
            }
        };

        if self.config.evaluate_after_power_up && self.score >= self.level.target_score {
            self.status = GameStatus::Won;
        }

        Ok(PowerUpOutcome::Applied {
            power_up,
            score_delta,
            bonus_moves,
            status: self.status,
        })
    }
}
