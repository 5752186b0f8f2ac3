// Arrocco: validazione delle destinazioni del re e spostamento della torre

use crate::attacks::{attacked_cells, is_king_checked};
use crate::board::{Board, PieceKind, Position};
use crate::utils::SquareSet;

struct Wing {
    rook_col: u8,
    king_to_col: u8,
    rook_to_col: u8,
    // Strictly between king and rook
    empty: &'static [u8],
    // Squares the king crosses or lands on
    transit: &'static [u8],
}

const KINGSIDE: Wing = Wing {
    rook_col: 7,
    king_to_col: 6,
    rook_to_col: 5,
    empty: &[5, 6],
    transit: &[5, 6],
};

const QUEENSIDE: Wing = Wing {
    rook_col: 0,
    king_to_col: 2,
    rook_to_col: 3,
    empty: &[1, 2, 3],
    transit: &[3, 2],
};

const KING_COL: u8 = 4;

/// Castle destinations currently open to the king on `king_pos`.
///
/// Requires an unmoved king on its original square, not in check, an unmoved
/// rook of the same color on the wing's corner, empty squares between them and
/// no attacked square on the king's path.
pub fn castle_destinations(board: &Board, king_pos: Position) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    let Some(king) = board.piece_at(king_pos) else {
        return out;
    };
    if king.kind() != PieceKind::King || king.has_moved() {
        return out;
    }
    let color = king.color;
    let row = color.back_row();
    if king_pos != Position::new(row, KING_COL) || is_king_checked(board, color) {
        return out;
    }

    let attacked = attacked_cells(board, color);
    for wing in [KINGSIDE, QUEENSIDE] {
        let rook_ready = matches!(
            board.piece_at(Position::new(row, wing.rook_col)),
            Some(rook) if rook.kind() == PieceKind::Rook && rook.color == color && !rook.has_moved()
        );
        let path_clear = wing
            .empty
            .iter()
            .all(|&col| !board.is_occupied(Position::new(row, col)));
        let path_safe = wing
            .transit
            .iter()
            .all(|&col| !attacked.contains(Position::new(row, col)));
        if rook_ready && path_clear && path_safe {
            out.insert(Position::new(row, wing.king_to_col));
        }
    }
    out
}

/// Rook relocation `(from, to)` for a king move of two columns along its row.
pub fn rook_squares(king_from: Position, king_to: Position) -> Option<(Position, Position)> {
    if king_from.row() != king_to.row() || king_from.col().abs_diff(king_to.col()) != 2 {
        return None;
    }
    let row = king_from.row();
    let wing = if king_to.col() > king_from.col() {
        KINGSIDE
    } else {
        QUEENSIDE
    };
    Some((
        Position::new(row, wing.rook_col),
        Position::new(row, wing.rook_to_col),
    ))
}
