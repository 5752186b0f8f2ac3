use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, PieceKind, Position};
use crate::piece::Piece;

/// A pawn move to the last row waiting for its replacement piece.
///
/// Holding one never changes the board; the move is committed only when a
/// choice is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRequest {
    pub from: Position,
    pub to: Position,
    pub color: Color,
}

pub fn is_promotion(piece: &Piece, to: Position) -> bool {
    piece.kind() == PieceKind::Pawn && piece.color.last_row_mask().contains(to)
}

/// The request a legal pawn move `from -> to` opens, if it lands on the last row.
pub fn request_for(board: &Board, from: Position, to: Position) -> Option<PromotionRequest> {
    let piece = board.piece_at(from)?;
    if !piece.legal.contains(to) || !is_promotion(piece, to) {
        return None;
    }
    Some(PromotionRequest {
        from,
        to,
        color: piece.color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::piece::PromotionChoice;

    fn p(code: &str) -> Position {
        code.parse().unwrap()
    }

    fn board() -> Board {
        "\
        . r . . k . . .
        P . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . p
        . . . . K . . ."
            .parse()
            .unwrap()
    }

    #[test]
    fn last_row_moves_open_a_request() {
        let board = board();
        assert_eq!(
            request_for(&board, p("60"), p("70")),
            Some(PromotionRequest {
                from: p("60"),
                to: p("70"),
                color: Color::White
            })
        );
        assert!(request_for(&board, p("60"), p("71")).is_some());
        assert_eq!(request_for(&board, p("17"), p("07")).map(|r| r.color), Some(Color::Black));
        assert!(request_for(&board, p("04"), p("14")).is_none());
        assert!(request_for(&board, p("60"), p("61")).is_none());
    }

    #[test]
    fn promotion_needs_a_choice() {
        let mut board = board();
        let before = board.clone();
        assert_eq!(
            board.make_move(p("60"), p("70"), None),
            Err(MoveError::PromotionRequired { from: p("60"), to: p("70") })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn capture_promotion_replaces_the_pawn() {
        let mut board = board();
        let record = board
            .make_move(p("60"), p("71"), Some(PromotionChoice::Knight))
            .unwrap();
        assert_eq!(record.captured.map(|c| c.kind()), Some(PieceKind::Rook));
        let knight = board.piece_at(p("71")).unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert_eq!(knight.color, Color::White);
        assert!(board.piece_at(p("60")).is_none());
    }

    #[test]
    fn black_promotes_on_row_zero() {
        let mut board = board();
        board.make_move(p("60"), p("70"), Some(PromotionChoice::Queen)).unwrap();
        board.make_move(p("17"), p("07"), Some(PromotionChoice::Rook)).unwrap();
        let rook = board.piece_at(p("07")).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert_eq!(rook.color, Color::Black);
        assert!(rook.has_moved());
    }
}
