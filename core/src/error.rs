use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cells are not adjacent")]
    NotAdjacent,
    #[error("Power-up needs a target cell")]
    MissingTarget,
    #[error("Board size must be between 3 and 32")]
    InvalidBoardSize,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Unknown power-up")]
    UnknownPowerUp,
}

pub type Result<T> = core::result::Result<T, GameError>;
