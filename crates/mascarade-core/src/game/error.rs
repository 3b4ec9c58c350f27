use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{count} players cannot be seated; expected between {min} and {max}")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("player '{name}' is already registered")]
    DuplicatePlayer { name: String },
    #[error("player '{name}' is not registered")]
    UnknownPlayer { name: String },
    #[error("seat {seat} does not exist")]
    UnknownSeat { seat: usize },
    #[error("seat {seat} holds a center card and cannot take part")]
    TableSeat { seat: usize },
    #[error("seat {seat} cannot swap with itself")]
    SelfSwap { seat: usize },
    #[error("expected seat {expected} to act but got seat {actual}")]
    NotYourTurn { expected: usize, actual: usize },
    #[error("action '{action}' is not allowed in mode '{mode}'")]
    ActionNotAllowed { action: String, mode: String },
    #[error("{character} is not in play this game")]
    CharacterNotInPlay { character: String },
    #[error("seat {seat} cannot challenge this announcement")]
    InvalidChallenger { seat: usize },
    #[error("game is already over")]
    GameOver,
    #[error("snapshot is inconsistent: {message}")]
    InvalidSnapshot { message: String },
}
