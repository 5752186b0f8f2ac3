// Storico dei turni: snapshot immutabili + cursore per la navigazione

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Position};
use crate::piece::Piece;
use crate::status::GameStatus;

/// Captured pieces, partitioned by the color of the piece that was lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostPieces {
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

impl LostPieces {
    pub fn push(&mut self, piece: Piece) {
        match piece.color {
            Color::White => self.white.push(piece),
            Color::Black => self.black.push(piece),
        }
    }

    pub fn of(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// What the presentation layer should signal for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    None,
    Move,
    Capture,
    Castle,
    Check,
    GameOver,
}

impl Effect {
    // GameOver > Check > Castle > Capture > Move
    pub fn for_move(captured: bool, castled: bool, status: GameStatus) -> Effect {
        if status.is_terminal() {
            Effect::GameOver
        } else if status == GameStatus::Check {
            Effect::Check
        } else if castled {
            Effect::Castle
        } else if captured {
            Effect::Capture
        } else {
            Effect::Move
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub board: Board,
    pub active: Color,
    pub checked: bool,
    pub status: GameStatus,
    pub lost: LostPieces,
    pub effect: Effect,
}

impl Turn {
    /// Standard starting position, White to move.
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            active: Color::White,
            checked: false,
            status: GameStatus::Normal,
            lost: LostPieces::default(),
            effect: Effect::None,
        }
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.board.en_passant
    }
}

/// Ordered turns plus the cursor of the one on display.
///
/// The cursor always indexes an existing turn; committing while it sits behind
/// the end drops every later turn first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    turns: Vec<Turn>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Turn::initial())
    }
}

impl History {
    pub fn new(initial: Turn) -> Self {
        Self {
            turns: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Turn {
        &self.turns[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: a history holds at least its initial turn.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// True while the cursor sits behind the newest turn.
    pub fn is_browsing(&self) -> bool {
        self.cursor + 1 < self.turns.len()
    }

    pub fn back(&mut self) -> Option<&Turn> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.turns[self.cursor])
    }

    pub fn forward(&mut self) -> Option<&Turn> {
        if self.cursor + 1 >= self.turns.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.turns[self.cursor])
    }

    pub fn commit(&mut self, turn: Turn) {
        self.turns.truncate(self.cursor + 1);
        self.turns.push(turn);
        self.cursor = self.turns.len() - 1;
    }

    pub fn reset(&mut self, initial: Turn) {
        self.turns.clear();
        self.turns.push(initial);
        self.cursor = 0;
    }
}
