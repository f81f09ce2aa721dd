//! hydrodraughts - an 8x8 checkers rules engine.
//!
//! The crate tracks board state, enforces legal moves (multi-capture chains,
//! king promotion), detects the win condition and offers a static material
//! evaluation. It is the rules core only: rendering, window handling and
//! pixel-to-cell mapping belong to the caller, which owns one
//! [`game::GameState`], drives it through [`game::GameState::select`] and
//! reads positions back through the query methods every redraw.

pub mod board;
pub mod evaluation;
pub mod game;
pub mod moves;

pub use board::{Board, BoardError, Cell, Piece, Side, Square};
pub use game::GameState;
pub use moves::{CaptureList, MoveMap};
