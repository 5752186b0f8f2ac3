// Insieme delle caselle attaccate dall'avversario e rilevamento dello scacco

use crate::board::{Board, Color};
use crate::utils::SquareSet;

/// Squares `defending`'s king may not stand on: the union of every opposing
/// piece's pseudo-legal set plus the sliders' x-ray squares.
///
/// Reads the cached pseudo-legal sets, so the board must have been refreshed
/// since its last mutation.
pub fn attacked_cells(board: &Board, defending: Color) -> SquareSet {
    board
        .pieces_of(defending.opposite())
        .fold(SquareSet::EMPTY, |acc, (_, piece)| acc | piece.attacks())
}

pub fn is_king_checked(board: &Board, color: Color) -> bool {
    attacked_cells(board, color).contains(board.king_position(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    fn p(code: &str) -> Position {
        code.parse().unwrap()
    }

    #[test]
    fn initial_attack_picture() {
        let board = Board::initial();
        let attacked = attacked_cells(&board, Color::White);
        // Black pawns cover the whole of row 5, knights add nothing new there
        for col in 0..8 {
            assert!(attacked.contains(Position::new(5, col)));
        }
        assert!(!attacked.contains(p("44")));
        assert!(!is_king_checked(&board, Color::White));
        assert!(!is_king_checked(&board, Color::Black));
    }

    #[test]
    fn pawn_forward_squares_are_not_attacked() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . p . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . ."
            .parse()
            .unwrap();
        let attacked = attacked_cells(&board, Color::White);
        assert!(attacked.contains(p("43")));
        assert!(attacked.contains(p("45")));
        assert!(!attacked.contains(p("44")));
    }

    #[test]
    fn check_from_slider_and_xray_square() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            r . . . K . . ."
            .parse()
            .unwrap();
        assert!(is_king_checked(&board, Color::White));
        assert!(!is_king_checked(&board, Color::Black));
        let attacked = attacked_cells(&board, Color::White);
        // Behind the king along the rook's row
        assert!(attacked.contains(p("05")));
        assert!(attacked.contains(p("07")));
    }
}
