//! Board model and rules engine for Breakfast Blitz, a match-3 puzzle.
//!
//! [`GameSession`] is the entry point: it owns the board, score, move budget
//! and power-up charges of one level attempt. Moves and power-ups resolve
//! through [`resolve_swap`] and [`apply_power_up`], which never touch the
//! board they are given.

#![no_std]

extern crate alloc;

pub use analysis::*;
pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use level::*;
pub use piece::*;
pub use powerup::*;
pub use rewards::*;
pub use session::*;
pub use types::*;

mod analysis;
mod board;
mod engine;
mod error;
mod generator;
mod level;
mod piece;
mod powerup;
mod rewards;
mod session;
mod types;
