use crate::board::{Board, Cell, Piece, Side, Square, COLS, ROWS};
use arrayvec::ArrayVec;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Pieces jumped along one capture chain, in jump order. A side fields
/// twelve men, so a chain can never exceed twelve captures.
pub type CaptureList = ArrayVec<Piece, 12>;

/// Legal destinations for one piece: landing square -> pieces captured en
/// route. An empty list is a plain, non-capturing step.
pub type MoveMap = FxHashMap<Square, CaptureList>;

/// Compute every destination the given piece may move to, mapped to the
/// pieces captured on the way there. Plain steps and capture chains land in
/// the same map: taking an available capture is not mandatory.
///
/// Men scan only their forward row direction; kings scan both. A chain keeps
/// the row direction it started with.
pub fn search_moves(board: &Board, piece: &Piece) -> MoveMap {
    let row = piece.square().row() as i8;
    let col = piece.square().col() as i8;
    let side = piece.side();
    let forward = side.forward();
    let none = CaptureList::new();

    let mut moves = MoveMap::default();
    for step in [forward, -forward] {
        if step != forward && !piece.is_king() {
            continue;
        }
        let end = row_bound(row, step);
        merge(
            &mut moves,
            scan_diagonal(board, side, row + step, end, step, col - 1, -1, &none),
        );
        merge(
            &mut moves,
            scan_diagonal(board, side, row + step, end, step, col + 1, 1, &none),
        );
    }
    moves
}

/// Exclusive row bound for one scan: at most the adjacent row and the
/// landing row beyond it, clamped to the grid edge.
#[inline]
fn row_bound(row: i8, step: i8) -> i8 {
    if step < 0 {
        (row - 3).max(-1)
    } else {
        (row + 3).min(ROWS as i8)
    }
}

/// Walk one diagonal of the move search. Rows run from `start` toward the
/// exclusive bound `end` in increments of `step`; `col` advances by
/// `col_step` alongside. `carried` is the capture chain accumulated so far,
/// cloned (never aliased) into every recursive branch.
///
/// Outcomes per cell, mirroring the jump rules:
/// - empty, nothing jumped, no carried chain: plain step, scan ends;
/// - empty, nothing jumped, chain carried: dead end (a chain cannot
///   continue with a plain step);
/// - empty right after a jumped enemy: capture recorded, then the search
///   recurses from the landing square in both column directions with the
///   same row direction and the extended chain;
/// - friendly piece: blocked;
/// - enemy piece: remembered as the jump candidate, scan continues to the
///   landing cell behind it.
#[allow(clippy::too_many_arguments)]
fn scan_diagonal(
    board: &Board,
    side: Side,
    start: i8,
    end: i8,
    step: i8,
    col: i8,
    col_step: i8,
    carried: &CaptureList,
) -> MoveMap {
    let mut moves = MoveMap::default();
    let mut jumped: Option<Piece> = None;
    let mut row = start;
    let mut col = col;

    while row != end {
        if col < 0 || col >= COLS as i8 {
            break;
        }
        // Rows inside the loop are on-grid: `end` is clamped by row_bound.
        let square = Square::from_grid(row as u8, col as u8);

        match board.cell(square) {
            Cell::Empty => {
                if carried.is_empty() || jumped.is_some() {
                    let mut captured = carried.clone();
                    if let Some(victim) = jumped {
                        captured.push(victim);
                    }
                    record(&mut moves, square, captured.clone());
                    if jumped.is_some() {
                        let next_end = row_bound(row, step);
                        merge(
                            &mut moves,
                            scan_diagonal(
                                board,
                                side,
                                row + step,
                                next_end,
                                step,
                                col - 1,
                                -1,
                                &captured,
                            ),
                        );
                        merge(
                            &mut moves,
                            scan_diagonal(
                                board,
                                side,
                                row + step,
                                next_end,
                                step,
                                col + 1,
                                1,
                                &captured,
                            ),
                        );
                    }
                }
                break;
            }
            Cell::Occupied(piece) if piece.side() == side => break,
            Cell::Occupied(piece) => jumped = Some(*piece),
        }

        row += step;
        col += col_step;
    }
    moves
}

/// Record a destination, preferring the longer capture chain when two paths
/// reach the same landing square. Between equal-length chains the first one
/// discovered stays, so the result is independent of map iteration order.
fn record(moves: &mut MoveMap, landing: Square, captured: CaptureList) {
    match moves.entry(landing) {
        Entry::Occupied(mut slot) => {
            if captured.len() > slot.get().len() {
                slot.insert(captured);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(captured);
        }
    }
}

fn merge(into: &mut MoveMap, from: MoveMap) {
    for (landing, captured) in from {
        record(into, landing, captured);
    }
}

// ============================================================================
// Tests
// ============================================================================
