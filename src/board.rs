// Mapping delle caselle: "00" = riga 0 colonna 0 (lato del Bianco), ..., "77"
// Indice interno = row * 8 + col, coerente con SquareSet

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, MoveError, PositionParseError};
use crate::piece::{Piece, PromotionChoice};
use crate::utils::{SquareSet, ROW_0, ROW_1, ROW_6, ROW_7};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step for this color.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn back_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_row_mask(self) -> SquareSet {
        match self {
            Color::White => SquareSet::from_bits(ROW_1),
            Color::Black => SquareSet::from_bits(ROW_6),
        }
    }

    pub fn last_row_mask(self) -> SquareSet {
        match self {
            Color::White => SquareSet::from_bits(ROW_7),
            Color::Black => SquareSet::from_bits(ROW_0),
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;
    fn not(self) -> Color {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

/// A board square, written and parsed as the two-digit "RC" code (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Position(u8);

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Position(row * 8 + col)
    }

    #[inline]
    pub fn from_index(sq: usize) -> Self {
        debug_assert!(sq < 64);
        Position(sq as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 8
    }

    /// The square `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.col())
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(PositionParseError::Length(s.to_string()));
        }
        let digit = |b: u8| -> Result<u8, PositionParseError> {
            match b {
                b'0'..=b'7' => Ok(b - b'0'),
                _ => Err(PositionParseError::Digit(b as char)),
            }
        };
        Ok(Position::new(digit(bytes[0])?, digit(bytes[1])?))
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> String {
        pos.to_string()
    }
}

impl TryFrom<String> for Position {
    type Error = PositionParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub piece: Option<Piece>,
}

/// Outcome of a committed move on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub captured: Option<Piece>,
    pub castled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Cell; 8]; 8],
    // Casella "saltata" dall'ultimo doppio passo di pedone; None dopo qualsiasi altra mossa
    pub en_passant: Option<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    // Board vuota, da popolare con put()
    pub fn empty() -> Self {
        Self {
            grid: std::array::from_fn(|row| {
                std::array::from_fn(|col| Cell {
                    position: Position::new(row as u8, col as u8),
                    piece: None,
                })
            }),
            en_passant: None,
        }
    }

    /// Standard starting placement, move sets not yet generated.
    pub fn standard() -> Self {
        use PieceKind::*;
        const BACK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_row();
            let pawns = (back as i8 + color.forward()) as u8;
            for (col, kind) in BACK.iter().enumerate() {
                board.put(Position::new(back, col as u8), Piece::new(*kind, color));
                board.put(Position::new(pawns, col as u8), Piece::new(Pawn, color));
            }
        }
        board
    }

    /// Standard starting position with every piece's move sets populated.
    pub fn initial() -> Self {
        let mut board = Self::standard();
        board.regenerate(Color::White);
        board
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.grid[pos.row() as usize][pos.col() as usize]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flat_map(|row| row.iter())
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.cell(pos).piece.as_ref()
    }

    pub fn piece_at_mut(&mut self, pos: Position) -> Option<&mut Piece> {
        self.grid[pos.row() as usize][pos.col() as usize]
            .piece
            .as_mut()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cell(pos).piece.is_some()
    }

    // Posiziona un pezzo, sostituendo l'eventuale occupante
    pub fn put(&mut self, pos: Position, piece: Piece) {
        self.grid[pos.row() as usize][pos.col() as usize].piece = Some(piece);
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        self.grid[pos.row() as usize][pos.col() as usize].piece.take()
    }

    /// Occupied squares and their pieces, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, &Piece)> {
        self.cells()
            .filter_map(|cell| cell.piece.as_ref().map(|piece| (cell.position, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, &Piece)> {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn occupied_by(&self, color: Color) -> SquareSet {
        self.pieces_of(color).map(|(pos, _)| pos).collect()
    }

    // King square per side. A board without a king is corrupted beyond recovery.
    pub fn king_position(&self, color: Color) -> Position {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(pos, _)| pos)
            .unwrap_or_else(|| panic!("no {color} king on the board"))
    }

    /// The pawn an en-passant capture onto `to` by `color` would remove, if that
    /// capture is available right now.
    pub fn en_passant_victim(&self, to: Position, color: Color) -> Option<Position> {
        if self.en_passant != Some(to) || self.is_occupied(to) {
            return None;
        }
        let victim = to.offset(-color.forward(), 0)?;
        match self.piece_at(victim) {
            Some(piece) if piece.color != color && piece.kind() == PieceKind::Pawn => Some(victim),
            _ => None,
        }
    }

    // Spostamento "finto" per la simulazione di legalità: nessun flag, nessuna rigenerazione
    pub(crate) fn displace(&mut self, from: Position, to: Position) {
        let Some(piece) = self.take(from) else {
            return;
        };
        if piece.kind() == PieceKind::Pawn {
            if let Some(victim) = self.en_passant_victim(to, piece.color) {
                self.take(victim);
            }
        }
        self.put(to, piece);
    }

    /// Commits a move from the piece's legal set and regenerates every move set.
    ///
    /// A pawn landing on its last row needs `promotion`; any other move must not
    /// carry one. On error the board is left untouched.
    pub fn make_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PromotionChoice>,
    ) -> Result<MoveRecord, MoveError> {
        let piece = *self.piece_at(from).ok_or(MoveError::EmptyCell(from))?;
        if !piece.legal.contains(to) {
            return Err(MoveError::NotLegal { from, to });
        }
        let promotes = crate::promotion::is_promotion(&piece, to);
        if promotes && promotion.is_none() {
            return Err(MoveError::PromotionRequired { from, to });
        }
        if !promotes && promotion.is_some() {
            return Err(MoveError::UnexpectedPromotion { from, to });
        }
        let color = piece.color;

        let mut captured = None;
        if piece.kind() == PieceKind::Pawn {
            if let Some(victim) = self.en_passant_victim(to, color) {
                captured = self.take(victim);
            }
        }
        if let Some(lost) = self.take(to) {
            captured = Some(lost);
        }
        self.take(from);

        let mut moved = match promotion {
            Some(choice) => choice.into_piece(color),
            None => piece,
        };
        moved.mark_moved();
        self.put(to, moved);

        let mut castled = false;
        if piece.kind() == PieceKind::King {
            if let Some((rook_from, rook_to)) = crate::castling::rook_squares(from, to) {
                if let Some(mut rook) = self.take(rook_from) {
                    rook.mark_moved();
                    self.put(rook_to, rook);
                    castled = true;
                }
            }
        }

        // Il marcatore vive una sola mossa
        self.en_passant = if piece.kind() == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2 {
            from.offset(color.forward(), 0)
        } else {
            None
        };

        self.regenerate(color);
        Ok(MoveRecord { captured, castled })
    }
}

fn piece_symbol(piece: &Piece) -> char {
    let ch = match piece.kind() {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match piece.color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}

fn piece_from_symbol(ch: char) -> Option<(PieceKind, Color)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((kind, color))
}

// Whether a piece standing on `pos` can still be on its starting square.
fn on_starting_square(kind: PieceKind, color: Color, pos: Position) -> bool {
    match kind {
        PieceKind::Pawn => color.pawn_row_mask().contains(pos),
        PieceKind::King => pos == Position::new(color.back_row(), 4),
        PieceKind::Rook => {
            pos == Position::new(color.back_row(), 0) || pos == Position::new(color.back_row(), 7)
        }
        _ => false,
    }
}

// Simple diagram display: row 7 on top, '.' for empty cells
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            let symbols: Vec<String> = (0..8)
                .map(|col| match self.piece_at(Position::new(row, col)) {
                    Some(piece) => piece_symbol(piece).to_string(),
                    None => ".".to_string(),
                })
                .collect();
            writeln!(f, "{}", symbols.join(" "))?;
        }
        Ok(())
    }
}

/// Parses the diagram written by `Display`. Whitespace inside a row is ignored.
///
/// Pieces on their starting squares count as unmoved; the parsed board has no
/// en-passant marker and is regenerated with White to move.
impl FromStr for Board {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if rows.len() != 8 {
            return Err(DiagramError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (i, line) in rows.iter().enumerate() {
            let row = 7 - i as u8;
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != 8 {
                return Err(DiagramError::RowWidth { row, width: symbols.len() });
            }
            for (col, ch) in symbols.into_iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let (kind, color) = piece_from_symbol(ch).ok_or(DiagramError::Symbol(ch))?;
                let pos = Position::new(row, col as u8);
                let mut piece = Piece::new(kind, color);
                if !on_starting_square(kind, color, pos) {
                    piece.mark_moved();
                }
                board.put(pos, piece);
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind() == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(DiagramError::KingCount { color, count: kings });
            }
        }

        board.regenerate(Color::White);
        Ok(board)
    }
}

// Helper: diagramma della posizione iniziale
pub const START_DIAGRAM: &str = "\
r n b q k b n r
p p p p p p p p
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
P P P P P P P P
R N B Q K B N R
";

#[cfg(test)]
mod tests {
    use super::*;

    fn p(code: &str) -> Position {
        code.parse().unwrap()
    }

    #[test]
    fn position_codes_round_trip() {
        for pos in Position::all() {
            assert_eq!(pos.to_string().parse::<Position>().unwrap(), pos);
        }
        assert_eq!(p("34").row(), 3);
        assert_eq!(p("34").col(), 4);
    }

    #[test]
    fn malformed_position_codes_are_rejected() {
        assert!(matches!("8".parse::<Position>(), Err(PositionParseError::Length(_))));
        assert!(matches!("08".parse::<Position>(), Err(PositionParseError::Digit('8'))));
        assert!(matches!("a1".parse::<Position>(), Err(PositionParseError::Digit('a'))));
        assert!("123".parse::<Position>().is_err());
    }

    #[test]
    fn standard_placement() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.king_position(Color::White), p("04"));
        assert_eq!(board.king_position(Color::Black), p("74"));
        assert_eq!(board.piece_at(p("03")).map(|q| q.kind()), Some(PieceKind::Queen));
        assert_eq!(board.piece_at(p("65")).map(|q| q.color), Some(Color::Black));
        assert!(board.en_passant.is_none());
        for cell in board.cells() {
            assert_eq!(board.cell(cell.position).position, cell.position);
        }
    }

    #[test]
    fn diagram_matches_display() {
        let board = Board::initial();
        assert_eq!(board.to_string(), START_DIAGRAM);
        let parsed: Board = START_DIAGRAM.parse().unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn display_rows_have_no_trailing_space() {
        let text = Board::initial().to_string();
        assert_eq!(text.lines().count(), 8);
        for line in text.lines() {
            assert_eq!(line, line.trim_end());
            assert_eq!(line.len(), 15);
        }
        assert!(text.starts_with("r n b q k b n r\n"));
    }

    #[test]
    fn diagram_flags_displaced_pieces_as_moved() {
        let board: Board = "\
            . . . . k . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . P . . .
            . . . . . . . .
            . . . . . . . .
            R . . K . . . R"
            .parse()
            .unwrap();
        assert!(board.piece_at(p("34")).unwrap().has_moved());
        assert!(board.piece_at(p("03")).unwrap().has_moved());
        assert!(!board.piece_at(p("00")).unwrap().has_moved());
        assert!(!board.piece_at(p("07")).unwrap().has_moved());
        assert!(!board.piece_at(p("74")).unwrap().has_moved());
    }

    #[test]
    fn diagram_errors() {
        assert!(matches!("k . .".parse::<Board>(), Err(DiagramError::RowCount(1))));
        let no_black_king = START_DIAGRAM.replace('k', ".");
        assert!(matches!(
            no_black_king.parse::<Board>(),
            Err(DiagramError::KingCount { color: Color::Black, count: 0 })
        ));
        let bad = START_DIAGRAM.replace('q', "x");
        assert!(matches!(bad.parse::<Board>(), Err(DiagramError::Symbol('x'))));
    }

    #[test]
    #[should_panic(expected = "no white king")]
    fn missing_king_is_fatal() {
        Board::empty().king_position(Color::White);
    }

    #[test]
    fn make_move_rejects_without_mutation() {
        let mut board = Board::initial();
        let before = board.clone();
        assert_eq!(
            board.make_move(p("10"), p("40"), None),
            Err(MoveError::NotLegal { from: p("10"), to: p("40") })
        );
        assert_eq!(board.make_move(p("33"), p("43"), None), Err(MoveError::EmptyCell(p("33"))));
        assert_eq!(
            board.make_move(p("10"), p("20"), Some(PromotionChoice::Queen)),
            Err(MoveError::UnexpectedPromotion { from: p("10"), to: p("20") })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn double_step_sets_marker_and_next_move_clears_it() {
        let mut board = Board::initial();
        board.make_move(p("10"), p("30"), None).unwrap();
        assert_eq!(board.en_passant, Some(p("20")));
        board.make_move(p("67"), p("57"), None).unwrap();
        assert_eq!(board.en_passant, None);
    }
}
