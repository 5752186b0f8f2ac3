use thiserror::Error;

use crate::board::{Color, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionParseError {
    #[error("position code must be two digits, got {0:?}")]
    Length(String),
    #[error("position digit out of range 0-7: {0:?}")]
    Digit(char),
}

/// Why the rules layer refused to commit a move.
///
/// The game session never surfaces these to its caller; a refused move is a no-op there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptyCell(Position),
    #[error("{from} -> {to} is not a legal move")]
    NotLegal { from: Position, to: Position },
    #[error("{from} -> {to} reaches the last row and needs a promotion choice")]
    PromotionRequired { from: Position, to: Position },
    #[error("{from} -> {to} is not a promotion")]
    UnexpectedPromotion { from: Position, to: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has {width} cells, expected 8")]
    RowWidth { row: u8, width: usize },
    #[error("unknown piece symbol {0:?}")]
    Symbol(char),
    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveCodeError {
    #[error("move code must be 4 digits plus an optional promotion letter, got {0:?}")]
    Length(String),
    #[error(transparent)]
    Position(#[from] PositionParseError),
    #[error("invalid promotion piece {0:?}")]
    Promotion(char),
}
