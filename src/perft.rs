// Perft: conteggio dei nodi foglia sulle mosse legali, per verificare le regole

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::board::{Board, Color, Position};
use crate::error::{MoveCodeError, MoveError};
use crate::piece::PromotionChoice;
use crate::promotion::is_promotion;

/// A move written as "RCRC" plus an optional promotion letter, e.g. "1434" or "6070q".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveCode {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PromotionChoice>,
}

impl fmt::Display for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(choice) = self.promotion {
            let letter = match choice {
                PromotionChoice::Queen => 'q',
                PromotionChoice::Rook => 'r',
                PromotionChoice::Bishop => 'b',
                PromotionChoice::Knight => 'n',
            };
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

impl FromStr for MoveCode {
    type Err = MoveCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveCodeError::Length(s.to_string()));
        }
        let from = s[0..2].parse()?;
        let to = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            Some(ch) => Some(PromotionChoice::from_char(ch).ok_or(MoveCodeError::Promotion(ch))?),
            None => None,
        };
        Ok(MoveCode {
            from,
            to,
            promotion,
        })
    }
}

pub fn parse_move_code(code: &str) -> Result<MoveCode, MoveCodeError> {
    code.parse()
}

/// Every legal move of `side`, one entry per promotion choice.
pub fn legal_moves(board: &Board, side: Color) -> Vec<MoveCode> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces_of(side) {
        for to in piece.legal {
            if is_promotion(piece, to) {
                moves.extend(PromotionChoice::ALL.iter().map(|&choice| MoveCode {
                    from,
                    to,
                    promotion: Some(choice),
                }));
            } else {
                moves.push(MoveCode {
                    from,
                    to,
                    promotion: None,
                });
            }
        }
    }
    moves
}

/// Plays `code` on `board`; the move must be in its piece's legal set.
pub fn apply(board: &mut Board, code: MoveCode) -> Result<(), MoveError> {
    board.make_move(code.from, code.to, code.promotion).map(|_| ())
}

/// Leaf nodes of the legal move tree of depth `depth` with `side` to move.
pub fn perft(board: &Board, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board, side);
    // Bulk counting
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for code in moves {
        let mut child = board.clone();
        if apply(&mut child, code).is_ok() {
            nodes += perft(&child, side.opposite(), depth - 1);
        }
    }
    nodes
}

/// Per-root-move node counts, in generation order.
pub fn divide(board: &Board, side: Color, depth: u32) -> Vec<(MoveCode, u64)> {
    let mut out = Vec::new();
    if depth == 0 {
        return out;
    }
    for code in legal_moves(board, side) {
        let mut child = board.clone();
        if let Err(err) = apply(&mut child, code) {
            debug!("divide skipped {code}: {err}");
            continue;
        }
        out.push((code, perft(&child, side.opposite(), depth - 1)));
    }
    out
}
