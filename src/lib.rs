pub mod attacks;
pub mod board;
pub mod castling;
pub mod error;
pub mod game;
pub mod history;
pub mod legality;
pub mod movegen;
pub mod perft;
pub mod piece;
pub mod promotion;
pub mod status;
pub mod utils;

pub use board::{Board, Color, PieceKind, Position};
pub use game::{Game, MoveOutcome};
pub use piece::{Piece, PromotionChoice};
pub use status::GameStatus;

/// Builds the precomputed step tables. Lookups build them lazily as well, so
/// calling this is optional; it only moves the cost out of the first move.
pub fn init() {
    utils::init_step_tables();
}
