// Sessione di gioco: selezione, mosse, promozione in sospeso, storico

use log::{debug, info};

use crate::attacks::is_king_checked;
use crate::board::{Board, Color, Position};
use crate::history::{Effect, History, LostPieces, Turn};
use crate::piece::{Piece, PromotionChoice};
use crate::promotion::{request_for, PromotionRequest};
use crate::status::{evaluate, GameStatus};
use crate::utils::SquareSet;

/// Result of asking the session to play a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed: no selection, illegal destination, pending promotion or game over.
    Rejected,
    Committed {
        captured: Option<Piece>,
        castled: bool,
        status: GameStatus,
        effect: Effect,
    },
    /// The pawn reached its last row; call `finalize_promotion` or `cancel_promotion`.
    PromotionPending(PromotionRequest),
}

impl MoveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MoveOutcome::Committed { .. })
    }
}

/// A single game between two local players.
///
/// Everything the presentation layer needs goes through here: the displayed
/// board, the selected piece, the pending promotion and the turn history.
#[derive(Debug, Clone)]
pub struct Game {
    history: History,
    selected: Option<Position>,
    pending: Option<PromotionRequest>,
    // Esito finale: resta valido anche navigando nello storico
    outcome: Option<GameStatus>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        crate::init();
        Self::with_turn(Turn::initial())
    }

    /// Starts a session from an arbitrary position with `active` to move.
    pub fn from_position(mut board: Board, active: Color) -> Self {
        crate::init();
        board.regenerate(active);
        let status = evaluate(&board, active);
        let checked = is_king_checked(&board, active);
        Self::with_turn(Turn {
            board,
            active,
            checked,
            status,
            lost: LostPieces::default(),
            effect: Effect::None,
        })
    }

    fn with_turn(turn: Turn) -> Self {
        let outcome = turn.status.is_terminal().then_some(turn.status);
        Self {
            history: History::new(turn),
            selected: None,
            pending: None,
            outcome,
        }
    }

    pub fn board(&self) -> &Board {
        &self.history.current().board
    }

    pub fn active(&self) -> Color {
        self.history.current().active
    }

    pub fn lost_pieces(&self) -> &LostPieces {
        &self.history.current().lost
    }

    pub fn current_turn(&self) -> &Turn {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_browsing(&self) -> bool {
        self.history.is_browsing()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn pending_promotion(&self) -> Option<&PromotionRequest> {
        self.pending.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Selects the piece on `from` and returns its legal destinations.
    ///
    /// Empty (and nothing selected) when the cell is empty, the piece is not
    /// the active color's, a promotion is pending or the game is over.
    pub fn select(&mut self, from: Position) -> SquareSet {
        self.selected = None;
        if self.pending.is_some() || self.is_over() {
            return SquareSet::EMPTY;
        }
        let active = self.active();
        let legal = match self.board().piece_at(from) {
            Some(piece) if piece.color == active => piece.legal,
            _ => return SquareSet::EMPTY,
        };
        self.selected = Some(from);
        legal
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Moves the selected piece to `to`.
    pub fn attempt_move(&mut self, to: Position) -> MoveOutcome {
        if self.pending.is_some() || self.is_over() {
            return MoveOutcome::Rejected;
        }
        let Some(from) = self.selected else {
            debug!("move to {to} rejected: nothing selected");
            return MoveOutcome::Rejected;
        };
        let Some(piece) = self.board().piece_at(from) else {
            return MoveOutcome::Rejected;
        };
        if !piece.legal.contains(to) {
            debug!("move {from} -> {to} rejected: not a legal destination");
            return MoveOutcome::Rejected;
        }

        if let Some(request) = request_for(self.board(), from, to) {
            debug!("promotion pending on {to} for {}", request.color);
            self.selected = None;
            self.pending = Some(request);
            return MoveOutcome::PromotionPending(request);
        }
        self.commit(from, to, None)
    }

    /// `select(from)` followed by `attempt_move(to)`.
    pub fn play(&mut self, from: Position, to: Position) -> MoveOutcome {
        if self.select(from).is_empty() {
            return MoveOutcome::Rejected;
        }
        self.attempt_move(to)
    }

    pub fn finalize_promotion(&mut self, choice: PromotionChoice) -> MoveOutcome {
        let Some(request) = self.pending.take() else {
            return MoveOutcome::Rejected;
        };
        debug!("promotion on {} finalized as {:?}", request.to, choice.kind());
        self.commit(request.from, request.to, Some(choice))
    }

    /// Drops the pending promotion; the pawn is selected again.
    pub fn cancel_promotion(&mut self) -> Option<PromotionRequest> {
        let request = self.pending.take()?;
        debug!("promotion on {} canceled", request.to);
        self.selected = Some(request.from);
        Some(request)
    }

    fn commit(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PromotionChoice>,
    ) -> MoveOutcome {
        let current = self.history.current();
        let mover = current.active;
        let mut board = current.board.clone();
        let record = match board.make_move(from, to, promotion) {
            Ok(record) => record,
            Err(err) => {
                debug!("move {from} -> {to} rejected: {err}");
                return MoveOutcome::Rejected;
            }
        };

        let mut lost = current.lost.clone();
        if let Some(piece) = record.captured {
            lost.push(piece);
        }
        let active = mover.opposite();
        let status = evaluate(&board, active);
        let effect = Effect::for_move(record.captured.is_some(), record.castled, status);
        let checked = is_king_checked(&board, active);

        debug!("{mover} played {from} -> {to} ({effect:?})");
        if status.is_terminal() {
            info!("game over: {status:?}, {mover} made the last move");
            self.outcome = Some(status);
        }

        self.history.commit(Turn {
            board,
            active,
            checked,
            status,
            lost,
            effect,
        });
        self.selected = None;
        MoveOutcome::Committed {
            captured: record.captured,
            castled: record.castled,
            status,
            effect,
        }
    }

    pub fn is_checked(&self, color: Color) -> bool {
        is_king_checked(self.board(), color)
    }

    /// Status of the game: the final outcome once reached, otherwise the
    /// status of the displayed turn.
    pub fn status(&self) -> GameStatus {
        self.outcome.unwrap_or(self.history.current().status)
    }

    fn reset_interaction(&mut self) {
        self.selected = None;
        self.pending = None;
    }

    /// Steps one turn back; the board is unchanged at the first turn.
    pub fn history_back(&mut self) -> &Board {
        self.reset_interaction();
        if self.history.back().is_some() {
            debug!("history back to turn {}", self.history.cursor());
        }
        self.board()
    }

    pub fn history_forward(&mut self) -> &Board {
        self.reset_interaction();
        if self.history.forward().is_some() {
            debug!("history forward to turn {}", self.history.cursor());
        }
        self.board()
    }

    /// Throws the whole history away and starts over from the initial position.
    pub fn restart(&mut self) -> &Board {
        info!("restarting game after {} turns", self.history.len());
        self.reset_interaction();
        self.outcome = None;
        self.history.reset(Turn::initial());
        self.board()
    }
}
