use serde::{Deserialize, Serialize};

use crate::board::{Color, PieceKind};
use crate::utils::SquareSet;

/// Per-kind state carried next to the fields every piece shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Variant {
    Pawn {
        first_move: bool,
        // Forward steps; never part of the attack picture
        forward: SquareSet,
    },
    Knight,
    Bishop {
        xray: SquareSet,
    },
    Rook {
        first_move: bool,
        xray: SquareSet,
    },
    Queen {
        xray: SquareSet,
    },
    King {
        first_move: bool,
        castles: SquareSet,
    },
}

/// A piece on the board.
///
/// `moves` is the pseudo-legal set: for pawns only the two diagonals, for every
/// other kind each square the piece reaches or defends, own-occupied squares
/// included. `legal` is the subset the owner may actually play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub variant: Variant,
    pub moves: SquareSet,
    pub legal: SquareSet,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        let variant = match kind {
            PieceKind::Pawn => Variant::Pawn {
                first_move: true,
                forward: SquareSet::EMPTY,
            },
            PieceKind::Knight => Variant::Knight,
            PieceKind::Bishop => Variant::Bishop {
                xray: SquareSet::EMPTY,
            },
            PieceKind::Rook => Variant::Rook {
                first_move: true,
                xray: SquareSet::EMPTY,
            },
            PieceKind::Queen => Variant::Queen {
                xray: SquareSet::EMPTY,
            },
            PieceKind::King => Variant::King {
                first_move: true,
                castles: SquareSet::EMPTY,
            },
        };
        Self {
            color,
            variant,
            moves: SquareSet::EMPTY,
            legal: SquareSet::EMPTY,
        }
    }

    pub fn kind(&self) -> PieceKind {
        match self.variant {
            Variant::Pawn { .. } => PieceKind::Pawn,
            Variant::Knight => PieceKind::Knight,
            Variant::Bishop { .. } => PieceKind::Bishop,
            Variant::Rook { .. } => PieceKind::Rook,
            Variant::Queen { .. } => PieceKind::Queen,
            Variant::King { .. } => PieceKind::King,
        }
    }

    /// Whether a pawn, rook or king has left its first square. Other kinds never track it.
    pub fn has_moved(&self) -> bool {
        match self.variant {
            Variant::Pawn { first_move, .. }
            | Variant::Rook { first_move, .. }
            | Variant::King { first_move, .. } => !first_move,
            _ => false,
        }
    }

    pub fn mark_moved(&mut self) {
        match &mut self.variant {
            Variant::Pawn { first_move, .. }
            | Variant::Rook { first_move, .. }
            | Variant::King { first_move, .. } => *first_move = false,
            _ => {}
        }
    }

    pub fn forward(&self) -> SquareSet {
        match self.variant {
            Variant::Pawn { forward, .. } => forward,
            _ => SquareSet::EMPTY,
        }
    }

    /// Squares a slider threatens behind the enemy king it is checking.
    pub fn xray(&self) -> SquareSet {
        match self.variant {
            Variant::Bishop { xray } | Variant::Rook { xray, .. } | Variant::Queen { xray } => xray,
            _ => SquareSet::EMPTY,
        }
    }

    pub fn castles(&self) -> SquareSet {
        match self.variant {
            Variant::King { castles, .. } => castles,
            _ => SquareSet::EMPTY,
        }
    }

    /// Squares this piece makes unsafe for the enemy king.
    pub fn attacks(&self) -> SquareSet {
        self.moves | self.xray()
    }
}

/// The pieces a pawn may turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionChoice {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionChoice {
    pub const ALL: [PromotionChoice; 4] = [
        PromotionChoice::Queen,
        PromotionChoice::Rook,
        PromotionChoice::Bishop,
        PromotionChoice::Knight,
    ];

    pub fn kind(self) -> PieceKind {
        match self {
            PromotionChoice::Queen => PieceKind::Queen,
            PromotionChoice::Rook => PieceKind::Rook,
            PromotionChoice::Bishop => PieceKind::Bishop,
            PromotionChoice::Knight => PieceKind::Knight,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'q' => Some(PromotionChoice::Queen),
            'r' => Some(PromotionChoice::Rook),
            'b' => Some(PromotionChoice::Bishop),
            'n' => Some(PromotionChoice::Knight),
            _ => None,
        }
    }

    /// Builds the replacement piece. A promoted rook never counts as unmoved.
    pub fn into_piece(self, color: Color) -> Piece {
        let mut piece = Piece::new(self.kind(), color);
        piece.mark_moved();
        piece
    }
}
