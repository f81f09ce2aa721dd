use crate::board::{Board, Side, Square};
use crate::moves::{search_moves, MoveMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Full rules state for one game. The surrounding UI owns exactly one of
/// these and drives it through [`GameState::select`]; everything else on the
/// type is a read-only query.
///
/// Invariants maintained by the command surface:
/// - `valid_moves` is empty whenever `selected` is `None` and is rebuilt
///   from scratch whenever the selection changes;
/// - the remaining/king counters always match the grid;
/// - `turn` flips exactly once per applied move and never otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Side,
    /// Square of the piece a move is currently being chosen for.
    #[serde(skip)]
    pub selected: Option<Square>,
    /// Destinations offered for the selected piece, with the pieces each
    /// one would capture.
    #[serde(skip)]
    pub valid_moves: MoveMap,
    pub red_remaining: u8,
    pub black_remaining: u8,
    pub red_kings: u8,
    pub black_kings: u8,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Side::Red)
    }
}

impl GameState {
    /// Fresh game with the standard opening layout. `first_to_move` is the
    /// only configuration the engine takes.
    pub fn new(first_to_move: Side) -> Self {
        let mut state = Self::empty(first_to_move);
        state.board = Board::standard();
        state.recompute_counts();
        state
    }

    /// Bare board for hand-built positions (tests, analysis tools). Place
    /// pieces through `board` and call [`GameState::recompute_counts`].
    pub fn empty(first_to_move: Side) -> Self {
        GameState {
            board: Board::new(),
            turn: first_to_move,
            selected: None,
            valid_moves: MoveMap::default(),
            red_remaining: 0,
            black_remaining: 0,
            red_kings: 0,
            black_kings: 0,
        }
    }

    /// Rebuild the per-side piece and king counters from the grid.
    pub fn recompute_counts(&mut self) {
        self.red_remaining = 0;
        self.black_remaining = 0;
        self.red_kings = 0;
        self.black_kings = 0;
        for piece in self.board.iter() {
            match piece.side() {
                Side::Red => {
                    self.red_remaining += 1;
                    if piece.is_king() {
                        self.red_kings += 1;
                    }
                }
                Side::Black => {
                    self.black_remaining += 1;
                    if piece.is_king() {
                        self.black_kings += 1;
                    }
                }
            }
        }
    }

    #[inline]
    pub fn remaining(&self, side: Side) -> u8 {
        match side {
            Side::Red => self.red_remaining,
            Side::Black => self.black_remaining,
        }
    }

    #[inline]
    pub fn kings(&self, side: Side) -> u8 {
        match side {
            Side::Red => self.red_kings,
            Side::Black => self.black_kings,
        }
    }

    /// The sole mutating entry point. With no selection pending, picks up
    /// the piece at `square` if it belongs to the side to move and offers
    /// its legal destinations. With a selection pending, first tries to play
    /// the pending piece to `square`; a failed attempt cancels the selection
    /// and is reinterpreted as a fresh pick at `square`, so a single click
    /// can both drop an old selection and start a new one.
    ///
    /// Returns whether a selection or a move happened.
    pub fn select(&mut self, square: Square) -> bool {
        if self.selected.is_some() {
            if self.apply_move(square) {
                return true;
            }
            self.clear_selection();
        }

        match self.board.piece_at(square) {
            Some(piece) if piece.side() == self.turn => {
                self.valid_moves = search_moves(&self.board, piece);
                self.selected = Some(square);
                trace!(
                    row = square.row(),
                    col = square.col(),
                    destinations = self.valid_moves.len(),
                    "piece selected"
                );
                true
            }
            _ => false,
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    /// Play the selected piece to `dest` if that is one of the offered
    /// destinations and the cell is free. On success the captured pieces
    /// leave the grid, the counters update, and the turn flips.
    fn apply_move(&mut self, dest: Square) -> bool {
        let Some(origin) = self.selected else {
            return false;
        };
        if !self.board.cell(dest).is_empty() {
            return false;
        }
        let Some(captured) = self.valid_moves.get(&dest).cloned() else {
            return false;
        };
        let Some(mut piece) = self.board.remove(origin) else {
            return false;
        };

        let was_king = piece.is_king();
        piece.relocate(dest);
        if piece.is_king() && !was_king {
            match piece.side() {
                Side::Red => self.red_kings += 1,
                Side::Black => self.black_kings += 1,
            }
            debug!(row = dest.row(), col = dest.col(), "piece crowned");
        }
        self.board.set(piece);

        for victim in &captured {
            self.board.remove(victim.square());
            match victim.side() {
                Side::Red => {
                    self.red_remaining -= 1;
                    if victim.is_king() {
                        self.red_kings -= 1;
                    }
                }
                Side::Black => {
                    self.black_remaining -= 1;
                    if victim.is_king() {
                        self.black_kings -= 1;
                    }
                }
            }
        }

        debug!(
            from_row = origin.row(),
            from_col = origin.col(),
            to_row = dest.row(),
            to_col = dest.col(),
            captures = captured.len(),
            "move applied"
        );

        self.clear_selection();
        self.turn = self.turn.opponent();
        if let Some(side) = self.winner() {
            debug!(winner = side.to_str(), "game over");
        }
        true
    }

    /// The side that has captured every opposing piece, once the game has
    /// ended. A side with pieces but no legal move is not detected here.
    pub fn winner(&self) -> Option<Side> {
        if self.black_remaining == 0 {
            Some(Side::Red)
        } else if self.red_remaining == 0 {
            Some(Side::Black)
        } else {
            None
        }
    }

    /// Every live piece with its position, side and crown, for redraws.
    pub fn pieces(&self) -> impl Iterator<Item = &crate::board::Piece> {
        self.board.iter()
    }

    /// Static material balance, positive in Red's favour.
    pub fn evaluate(&self) -> f32 {
        crate::evaluation::evaluate(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(row: i16, col: i16) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_new_game_counts() {
        let game = GameState::new(Side::Red);
        assert_eq!(game.red_remaining, 12);
        assert_eq!(game.black_remaining, 12);
        assert_eq!(game.red_kings, 0);
        assert_eq!(game.black_kings, 0);
        assert_eq!(game.turn, Side::Red);
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_first_to_move_is_configurable() {
        let game = GameState::new(Side::Black);
        assert_eq!(game.turn, Side::Black);
    }

    #[test]
    fn test_counts_match_grid() {
        let game = GameState::new(Side::Red);
        assert_eq!(game.red_remaining, game.board.count(Side::Red));
        assert_eq!(game.black_remaining, game.board.count(Side::Black));
    }

    #[test]
    fn test_select_empty_cell_fails() {
        let mut game = GameState::new(Side::Red);
        assert!(!game.select(sq(4, 3)));
        assert!(game.selected.is_none());
        assert!(game.valid_moves.is_empty());
        assert_eq!(game.turn, Side::Red);
    }

    #[test]
    fn test_select_opponent_piece_fails() {
        let mut game = GameState::new(Side::Red);
        assert!(!game.select(sq(5, 0)));
        assert!(game.selected.is_none());
        assert_eq!(game.turn, Side::Red);
    }

    #[test]
    fn test_select_own_piece_offers_moves() {
        let mut game = GameState::new(Side::Red);
        assert!(game.select(sq(2, 1)));
        assert_eq!(game.selected, Some(sq(2, 1)));
        assert_eq!(game.valid_moves.len(), 2);
    }

    #[test]
    fn test_selection_is_recomputed_on_reselect() {
        let mut game = GameState::new(Side::Red);
        assert!(game.select(sq(2, 1)));
        // clicking another own piece drops the old selection and takes over
        assert!(game.select(sq(2, 3)));
        assert_eq!(game.selected, Some(sq(2, 3)));
        assert!(game.valid_moves.contains_key(&sq(3, 2)));
        assert!(game.valid_moves.contains_key(&sq(3, 4)));
    }

    #[test]
    fn test_illegal_destination_clears_selection() {
        let mut game = GameState::new(Side::Red);
        assert!(game.select(sq(2, 1)));
        // (4,3) is empty but not an offered destination
        assert!(!game.select(sq(4, 3)));
        assert!(game.selected.is_none());
        assert!(game.valid_moves.is_empty());
        assert_eq!(game.turn, Side::Red);
    }

    #[test]
    fn test_step_flips_turn_once() {
        let mut game = GameState::new(Side::Red);
        assert!(game.select(sq(2, 1)));
        assert!(game.select(sq(3, 2)));
        assert_eq!(game.turn, Side::Black);
        assert!(game.selected.is_none());
        assert!(game.valid_moves.is_empty());
        assert!(game.board.cell(sq(2, 1)).is_empty());
        assert_eq!(game.board.piece_at(sq(3, 2)).map(|p| p.side()), Some(Side::Red));
    }

    #[test]
    fn test_capture_updates_counts() {
        let mut game = GameState::empty(Side::Red);
        game.board.set(Piece::new(sq(2, 3), Side::Red));
        game.board.set(Piece::new(sq(3, 4), Side::Black));
        game.board.set(Piece::new(sq(5, 0), Side::Black));
        game.recompute_counts();

        assert!(game.select(sq(2, 3)));
        assert!(game.select(sq(4, 5)));

        assert!(game.board.cell(sq(3, 4)).is_empty());
        assert_eq!(game.black_remaining, 1);
        assert_eq!(game.red_remaining, 1);
        assert_eq!(game.turn, Side::Black);
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_captured_king_decrements_king_count() {
        let mut game = GameState::empty(Side::Red);
        game.board.set(Piece::new(sq(2, 3), Side::Red));
        let mut enemy_king = Piece::new(sq(3, 4), Side::Black);
        enemy_king.promote();
        game.board.set(enemy_king);
        game.board.set(Piece::new(sq(7, 0), Side::Black));
        game.recompute_counts();
        assert_eq!(game.black_kings, 1);

        assert!(game.select(sq(2, 3)));
        assert!(game.select(sq(4, 5)));
        assert_eq!(game.black_kings, 0);
        assert_eq!(game.black_remaining, 1);
    }

    #[test]
    fn test_promotion_increments_king_count() {
        let mut game = GameState::empty(Side::Red);
        game.board.set(Piece::new(sq(6, 1), Side::Red));
        game.board.set(Piece::new(sq(0, 1), Side::Black));
        game.recompute_counts();

        assert!(game.select(sq(6, 1)));
        assert!(game.select(sq(7, 2)));

        let piece = game.board.piece_at(sq(7, 2)).unwrap();
        assert!(piece.is_king());
        assert_eq!(game.red_kings, 1);
        assert_eq!(game.red_remaining, 1);
    }

    #[test]
    fn test_winner_after_last_capture() {
        let mut game = GameState::empty(Side::Red);
        game.board.set(Piece::new(sq(2, 3), Side::Red));
        game.board.set(Piece::new(sq(3, 4), Side::Black));
        game.recompute_counts();

        assert!(game.select(sq(2, 3)));
        assert!(game.select(sq(4, 5)));

        assert_eq!(game.winner(), Some(Side::Red));
        // the verdict is stable under repeated queries
        assert_eq!(game.winner(), Some(Side::Red));
    }

    #[test]
    fn test_recompute_counts_after_manual_setup() {
        let mut game = GameState::empty(Side::Red);
        game.board.set(Piece::new(sq(0, 1), Side::Red));
        let mut king = Piece::new(sq(4, 3), Side::Black);
        king.promote();
        game.board.set(king);
        game.recompute_counts();

        assert_eq!(game.red_remaining, 1);
        assert_eq!(game.black_remaining, 1);
        assert_eq!(game.red_kings, 0);
        assert_eq!(game.black_kings, 1);
    }
}
