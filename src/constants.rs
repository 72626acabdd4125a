//! Constants for board dimensions, search parameters, and heuristic weights.
//!
//! Board dimensions are chosen at runtime, so everything here is a default or
//! a fixed weight of the evaluation function.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default number of rows for a standard game.
pub const DEFAULT_ROWS: usize = 8;

/// Default number of columns for a standard game.
pub const DEFAULT_COLS: usize = 8;

/// Rows left empty between the two starting bands.
pub const NEUTRAL_ROWS: usize = 2;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default depth limit (plies below the root) for tree construction.
pub const DEFAULT_DEPTH_LIMIT: usize = 6;

/// Depth limits above this use the explicit-stack traversal under `Traversal::Auto`.
pub const RECURSION_LIMIT: usize = 32;

/// Default number of signatures kept when the memo is retained between turns.
pub const DEFAULT_MEMO_CAPACITY: usize = 1 << 16;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Material weight of an ordinary piece.
pub const MATERIAL_MAN: i32 = 1;

/// Material weight of a king.
pub const MATERIAL_KING: i32 = 2;

/// Radius subtracted from a king's distance to the centre of the opponent zone.
/// The absolute value of the result is added, so a king on the centre scores this much.
pub const KING_CENTRALITY_RADIUS: i32 = 10;

/// Rows from the opponent zone within which the advancement bonus applies.
pub const ADVANCEMENT_WINDOW: i32 = 1;

// =============================================================================
// Signature Markers
// =============================================================================

/// Empty cell.
pub const MARK_EMPTY: char = 'E';

/// Cell holding a piece of the top player.
pub const MARK_TOP: char = 'T';

/// Cell holding a piece of the bottom player.
pub const MARK_BOTTOM: char = 'B';
