// Generazione delle mosse pseudo-legali e rigenerazione ordinata di tutti gli insiemi

use crate::board::{Board, Color, PieceKind, Position};
use crate::piece::{Piece, Variant};
use crate::utils::{king_steps, knight_steps, SquareSet, DIAGONAL, ORTHOGONAL};

/// Pseudo-legal sets of a single piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pseudo {
    pub moves: SquareSet,
    pub forward: SquareSet,
    pub xray: SquareSet,
}

/// Geometric moves of the piece on `from`, ignoring the safety of its own king.
pub fn generate(board: &Board, from: Position) -> Pseudo {
    let Some(piece) = board.piece_at(from) else {
        return Pseudo::default();
    };
    let color = piece.color;
    match piece.variant {
        Variant::Pawn { first_move, .. } => pawn_pseudos(board, from, color, first_move),
        Variant::Knight => Pseudo {
            moves: knight_steps(from),
            ..Pseudo::default()
        },
        Variant::King { .. } => Pseudo {
            moves: king_steps(from),
            ..Pseudo::default()
        },
        Variant::Bishop { .. } => slide(board, from, color, &DIAGONAL),
        Variant::Rook { .. } => slide(board, from, color, &ORTHOGONAL),
        Variant::Queen { .. } => {
            let straight = slide(board, from, color, &ORTHOGONAL);
            let diagonal = slide(board, from, color, &DIAGONAL);
            Pseudo {
                moves: straight.moves | diagonal.moves,
                forward: SquareSet::EMPTY,
                xray: straight.xray | diagonal.xray,
            }
        }
    }
}

// Raggi fino al primo pezzo (incluso, di qualsiasi colore) o al bordo
fn slide(board: &Board, from: Position, color: Color, dirs: &[(i8, i8)]) -> Pseudo {
    let mut out = Pseudo::default();
    for &(dr, dc) in dirs {
        let mut next = from.offset(dr, dc);
        while let Some(to) = next {
            out.moves.insert(to);
            if let Some(blocker) = board.piece_at(to) {
                if blocker.color != color && blocker.kind() == PieceKind::King {
                    out.xray |= xray_behind(board, to, dr, dc);
                }
                break;
            }
            next = to.offset(dr, dc);
        }
    }
    out
}

// Continues a ray past the enemy king: empty squares plus the first occupied one.
fn xray_behind(board: &Board, king: Position, dr: i8, dc: i8) -> SquareSet {
    let mut xray = SquareSet::EMPTY;
    let mut next = king.offset(dr, dc);
    while let Some(sq) = next {
        xray.insert(sq);
        if board.is_occupied(sq) {
            break;
        }
        next = sq.offset(dr, dc);
    }
    xray
}

fn pawn_pseudos(board: &Board, from: Position, color: Color, first_move: bool) -> Pseudo {
    let mut out = Pseudo::default();
    let dir = color.forward();

    // Diagonals are always attacked, occupied or not
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            out.moves.insert(to);
        }
    }

    let length = if first_move { 2 } else { 1 };
    let mut cur = from;
    for _ in 0..length {
        match cur.offset(dir, 0) {
            Some(to) if !board.is_occupied(to) => {
                out.forward.insert(to);
                cur = to;
            }
            _ => break,
        }
    }
    out
}

fn store_pseudo(piece: &mut Piece, pseudo: Pseudo) {
    piece.moves = pseudo.moves;
    match &mut piece.variant {
        Variant::Pawn { forward, .. } => *forward = pseudo.forward,
        Variant::Bishop { xray } | Variant::Rook { xray, .. } | Variant::Queen { xray } => {
            *xray = pseudo.xray
        }
        _ => {}
    }
}

impl Board {
    /// Recomputes the pseudo-legal sets of every piece, kings included.
    ///
    /// Legal sets are left as they were; this is what the legality filter runs
    /// on its scratch copies.
    pub fn refresh_pseudo(&mut self) {
        let occupied: SquareSet = self.pieces().map(|(pos, _)| pos).collect();
        for pos in occupied {
            let pseudo = generate(self, pos);
            if let Some(piece) = self.piece_at_mut(pos) {
                store_pseudo(piece, pseudo);
            }
        }
    }

    /// Full regeneration after a committed move by `active`.
    ///
    /// Order matters: every pseudo-legal set first (the attack picture), then
    /// the legal sets of all non-king pieces of both colors, then castle
    /// destinations and legal sets of the kings, `active`'s king first.
    pub fn regenerate(&mut self, active: Color) {
        self.refresh_pseudo();

        let others: SquareSet = self
            .pieces()
            .filter(|(_, piece)| piece.kind() != PieceKind::King)
            .map(|(pos, _)| pos)
            .collect();
        for pos in others {
            let legal = crate::legality::generate_legal(self, pos);
            if let Some(piece) = self.piece_at_mut(pos) {
                piece.legal = legal;
            }
        }

        for color in [active, active.opposite()] {
            let king = self.king_position(color);
            let castles = crate::castling::castle_destinations(self, king);
            let legal = crate::legality::generate_legal(self, king);
            if let Some(piece) = self.piece_at_mut(king) {
                if let Variant::King { castles: stored, .. } = &mut piece.variant {
                    *stored = castles;
                }
                piece.legal = legal;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(code: &str) -> Position {
        code.parse().unwrap()
    }

    fn set(codes: &[&str]) -> SquareSet {
        codes.iter().map(|c| p(c)).collect()
    }

    #[test]
    fn initial_pseudo_sets() {
        let board = Board::initial();
        // Knight on "01" reaches "20", "22" and defends "13"
        assert_eq!(generate(&board, p("01")).moves, set(&["13", "20", "22"]));
        // Rook on "00" only touches its neighbours
        assert_eq!(generate(&board, p("00")).moves, set(&["01", "10"]));
        let pawn = generate(&board, p("14"));
        assert_eq!(pawn.moves, set(&["23", "25"]));
        assert_eq!(pawn.forward, set(&["24", "34"]));
        assert!(generate(&board, p("44")).moves.is_empty());
    }

    #[test]
    fn pawn_forward_stops_at_blocker() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . n . . . .
            . . . P . . . P
            . . . . K . . ."
            .parse()
            .unwrap();
        assert!(generate(&board, p("13")).forward.is_empty());
        assert_eq!(generate(&board, p("17")).forward, set(&["27", "37"]));
        assert_eq!(generate(&board, p("17")).moves, set(&["26"]));
    }

    #[test]
    fn moved_pawn_steps_once() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . P . . .
            . . . . . . . .
            . . . . K . . ."
            .parse()
            .unwrap();
        assert_eq!(generate(&board, p("24")).forward, set(&["34"]));
    }

    #[test]
    fn rook_xray_through_enemy_king() {
        let board: Board = "\
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            k . . . . . . .
            . . . . . . . .
            . . . . . . . .
            R . . . K . . n"
            .parse()
            .unwrap();
        let rook = generate(&board, p("00"));
        assert!(rook.moves.contains(p("30")));
        assert!(!rook.moves.contains(p("40")));
        assert_eq!(rook.xray, set(&["40", "50", "60", "70"]));
        // The ray along row 0 stops at the own king with no x-ray
        assert!(rook.moves.contains(p("04")));
        assert!(!rook.moves.contains(p("05")));
    }

    #[test]
    fn xray_includes_first_blocker_behind_king() {
        let board: Board = "\
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . n . .
            . . . . . . . .
            . . . k . . . .
            . . . . . . . .
            . B . . K . . ."
            .parse()
            .unwrap();
        let bishop = generate(&board, p("01"));
        assert!(bishop.moves.contains(p("23")));
        assert_eq!(bishop.xray, set(&["34", "45"]));
    }

    #[test]
    fn queen_combines_both_ray_sets() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . Q . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . K . . ."
            .parse()
            .unwrap();
        assert_eq!(generate(&board, p("33")).moves.len(), 27);
    }

    #[test]
    fn regenerate_fills_legal_sets_for_both_colors() {
        let board = Board::initial();
        let white: usize = board.pieces_of(Color::White).map(|(_, pc)| pc.legal.len()).sum();
        let black: usize = board.pieces_of(Color::Black).map(|(_, pc)| pc.legal.len()).sum();
        assert_eq!(white, 20);
        assert_eq!(black, 20);
    }
}
