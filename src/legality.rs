// Filtro di legalità: simulazione su copia per i pezzi, insieme attaccato per il re

use log::trace;

use crate::attacks::{attacked_cells, is_king_checked};
use crate::board::{Board, Color, PieceKind, Position};
use crate::piece::Piece;
use crate::utils::SquareSet;

/// Destinations the piece on `from` may actually play.
///
/// The board's pseudo-legal sets must be fresh (see `Board::refresh_pseudo`).
pub fn generate_legal(board: &Board, from: Position) -> SquareSet {
    let Some(piece) = board.piece_at(from) else {
        return SquareSet::EMPTY;
    };
    match piece.kind() {
        PieceKind::King => king_legal(board, from, piece),
        _ => simulated_legal(board, from, piece),
    }
}

// Destinations worth simulating: captures or empty squares, never own pieces.
fn candidates(board: &Board, piece: &Piece) -> SquareSet {
    let own = board.occupied_by(piece.color);
    if piece.kind() != PieceKind::Pawn {
        return piece.moves.difference(own);
    }

    // Diagonali solo per catturare (o en passant)
    let mut out = piece.forward();
    for to in piece.moves {
        let enemy_there = matches!(board.piece_at(to), Some(other) if other.color != piece.color);
        if enemy_there || board.en_passant_victim(to, piece.color).is_some() {
            out.insert(to);
        }
    }
    out
}

fn simulated_legal(board: &Board, from: Position, piece: &Piece) -> SquareSet {
    let mut legal = SquareSet::EMPTY;
    for to in candidates(board, piece) {
        // Il re non si cattura: scacco matto chiude la partita prima
        if matches!(board.piece_at(to), Some(target) if target.kind() == PieceKind::King) {
            continue;
        }
        if leaves_king_safe(board, from, to, piece.color) {
            legal.insert(to);
        }
    }
    legal
}

/// Plays `from -> to` on a scratch copy and tells whether `color`'s king is
/// safe afterwards. The real board is never touched.
pub fn leaves_king_safe(board: &Board, from: Position, to: Position, color: Color) -> bool {
    let mut scratch = board.clone();
    scratch.displace(from, to);
    scratch.refresh_pseudo();
    let safe = !is_king_checked(&scratch, color);
    trace!("simulated {from} -> {to} for {color}: king safe = {safe}");
    safe
}

fn king_legal(board: &Board, from: Position, king: &Piece) -> SquareSet {
    let attacked = attacked_cells(board, king.color);
    let enemy_king = board.king_position(king.color.opposite());
    let mut legal = king
        .moves
        .difference(board.occupied_by(king.color))
        .difference(attacked);
    legal.remove(enemy_king);
    legal | crate::castling::castle_destinations(board, from)
}
