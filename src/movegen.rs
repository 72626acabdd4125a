//! Legal move generation.
//!
//! Ordinary pieces step and jump diagonally forward only; kings use both
//! directions. Pieces are never promoted. Captures are reported alongside
//! simple moves rather than forced, see [`forced_captures`] for the subset.

use std::fmt;

use crate::board::{Board, Player};

/// A single diagonal step or jump.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
    /// Coordinates of the jumped piece, always the midpoint of a capture.
    pub captured: Option<(i32, i32)>,
}

impl Move {
    pub fn simple(from: (i32, i32), to: (i32, i32)) -> Self {
        Self {
            from_x: from.0,
            from_y: from.1,
            to_x: to.0,
            to_y: to.1,
            captured: None,
        }
    }

    /// A jump from `from` to `to`; the captured square is their midpoint.
    pub fn capture(from: (i32, i32), to: (i32, i32)) -> Self {
        Self {
            captured: Some(((from.0 + to.0) / 2, (from.1 + to.1) / 2)),
            ..Self::simple(from, to)
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn from(&self) -> (i32, i32) {
        (self.from_x, self.from_y)
    }

    #[inline]
    pub fn to(&self) -> (i32, i32) {
        (self.to_x, self.to_y)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From ({}, {}) TO ({}, {})",
            self.from_x, self.from_y, self.to_x, self.to_y
        )
    }
}

const SIDEWAYS: [i32; 2] = [1, -1];

/// Generate every legal move for `player`.
///
/// Order is deterministic: pieces row-major, then for each row direction
/// (forward, and backward for kings) the simple moves right and left followed
/// by the captures right and left.
pub fn generate_moves(board: &Board, player: Player) -> Vec<Move> {
    let mut moves = Vec::new();
    for piece in board.pieces_of(player) {
        let forward = player.forward();
        let steps = [forward, -forward];
        let steps = if piece.king { &steps[..] } else { &steps[..1] };
        let (x, y) = (piece.x, piece.y);

        for &dy in steps {
            for dx in SIDEWAYS {
                let (tx, ty) = (x + dx, y + dy);
                if board.cell(tx, ty).is_some_and(|c| c.is_empty()) {
                    moves.push(Move::simple((x, y), (tx, ty)));
                }
            }
            for dx in SIDEWAYS {
                let (mx, my) = (x + dx, y + dy);
                let (tx, ty) = (x + 2 * dx, y + 2 * dy);
                let landing_free = board.cell(tx, ty).is_some_and(|c| c.is_empty());
                let jumps_opponent = board
                    .piece_at(mx, my)
                    .is_some_and(|p| p.owner == player.opponent());
                if landing_free && jumps_opponent {
                    moves.push(Move::capture((x, y), (tx, ty)));
                }
            }
        }
    }
    moves
}

/// Only the capturing moves available to `player`.
pub fn forced_captures(board: &Board, player: Player) -> Vec<Move> {
    generate_moves(board, player)
        .into_iter()
        .filter(Move::is_capture)
        .collect()
}
