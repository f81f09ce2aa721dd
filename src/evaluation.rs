use crate::board::Side;
use crate::game::GameState;

// ==================== Piece Values ====================

/// Weight of one man still on the board.
pub const MAN_VALUE: f32 = 1.0;
/// Extra weight a crowned piece carries on top of [`MAN_VALUE`].
pub const KING_BONUS: f32 = 0.5;

// ==================== Static Evaluation ====================

/// Material balance of the position from Red's point of view: every man
/// counts one point, every king half a point more. Pure function of the
/// piece counters, no lookahead; meant for an external consumer such as a
/// search layer, the rules core itself never reads it.
pub fn evaluate(state: &GameState) -> f32 {
    let men = state.remaining(Side::Red) as i32 - state.remaining(Side::Black) as i32;
    let kings = state.kings(Side::Red) as i32 - state.kings(Side::Black) as i32;
    men as f32 * MAN_VALUE + kings as f32 * KING_BONUS
}

// ============================================================================
// Tests
// ============================================================================
