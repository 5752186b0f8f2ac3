use serde::{Deserialize, Serialize};

use crate::attacks::is_king_checked;
use crate::board::{Board, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|(_, piece)| !piece.legal.is_empty())
}

/// Status of the side about to move on a fully regenerated board.
pub fn evaluate(board: &Board, to_move: Color) -> GameStatus {
    let checked = is_king_checked(board, to_move);
    match (checked, has_any_legal_move(board, to_move)) {
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Normal,
    }
}
