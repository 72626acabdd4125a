//! Static evaluation of a game state.
//!
//! The score is always from the point of view of the side to move and is the
//! sum of six independent terms:
//!
//! | term          | sign | meaning                                              |
//! |---------------|------|------------------------------------------------------|
//! | mobility      | +    | moves currently generated for the state              |
//! | vulnerability | -    | attack lines along which an own piece can be jumped  |
//! | safety        | +    | attack lines that are blocked, plus orthogonal contacts |
//! | forced jumps  | +    | own pieces with at least one open attack line        |
//! | board control | +    | own piece count minus opposing piece count           |
//! | positional    | +    | per-piece material, centrality and advancement       |
//!
//! Mobility reads the move list attached by [`GameState::generate_moves`], so a
//! state whose moves were never generated (a depth-limited leaf, a freshly
//! produced successor) scores 0 for it. Everything is integer arithmetic; the
//! evaluator never mutates the state.

use crate::board::{Board, Piece};
use crate::constants::{
    ADVANCEMENT_WINDOW, KING_CENTRALITY_RADIUS, MATERIAL_KING, MATERIAL_MAN, NEUTRAL_ROWS,
};
use crate::state::GameState;

/// The individual terms of an evaluation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeuristicBreakdown {
    pub mobility: i32,
    pub vulnerability: i32,
    pub safety: i32,
    pub forced_jumps: i32,
    pub board_control: i32,
    pub positional: i32,
}

impl HeuristicBreakdown {
    /// Combined score. Vulnerability is the only subtracted term.
    pub fn total(&self) -> i32 {
        self.mobility - self.vulnerability
            + self.safety
            + self.forced_jumps
            + self.board_control
            + self.positional
    }
}

/// Score `state` for the side to move.
pub fn evaluate(state: &GameState) -> i32 {
    breakdown(state).total()
}

/// Compute every term of the evaluation separately.
pub fn breakdown(state: &GameState) -> HeuristicBreakdown {
    let board = state.board();
    let me = state.turn();

    let mut terms = HeuristicBreakdown {
        mobility: state.moves().len() as i32,
        board_control: board.count(me) as i32 - board.count(me.opponent()) as i32,
        ..Default::default()
    };

    for piece in board.pieces_of(me) {
        let exposure = exposure(board, piece);
        terms.vulnerability += exposure.threats;
        terms.safety += exposure.covered + orthogonal_contacts(board, piece);
        if exposure.threats > 0 {
            terms.forced_jumps += 1;
        }
        terms.positional += piece_value(board, piece);
    }
    terms
}

/// Number of attack lines along which `piece` could be captured next ply.
pub fn vulnerable_points(board: &Board, piece: &Piece) -> i32 {
    exposure(board, piece).threats
}

/// Blocked attack lines plus orthogonally adjacent opposing pieces.
pub fn safe_points(board: &Board, piece: &Piece) -> i32 {
    exposure(board, piece).covered + orthogonal_contacts(board, piece)
}

#[derive(Default)]
struct Exposure {
    threats: i32,
    covered: i32,
}

enum Line {
    NotApplicable,
    Open,
    Blocked,
}

/// Walk the four diagonal attack lines through `piece`.
///
/// An attacker sits on one diagonal neighbour and would land on the opposite
/// one. The two neighbours on the piece's forward side face the opponent's
/// ordinary pieces; the two behind it only matter when the attacker is a king.
fn exposure(board: &Board, piece: &Piece) -> Exposure {
    let f = piece.owner.forward();
    let mut out = Exposure::default();
    for (dy, needs_king) in [(f, false), (-f, true)] {
        for dx in [-1, 1] {
            let attacker = (piece.x + dx, piece.y + dy);
            let landing = (piece.x - dx, piece.y - dy);
            match attack_line(board, piece, attacker, landing, needs_king) {
                Line::Open => out.threats += 1,
                Line::Blocked => out.covered += 1,
                Line::NotApplicable => {}
            }
        }
    }
    out
}

fn attack_line(
    board: &Board,
    piece: &Piece,
    attacker: (i32, i32),
    landing: (i32, i32),
    needs_king: bool,
) -> Line {
    let Some(enemy) = board.piece_at(attacker.0, attacker.1) else {
        return Line::NotApplicable;
    };
    if enemy.owner == piece.owner || (needs_king && !enemy.king) {
        return Line::NotApplicable;
    }
    match board.cell(landing.0, landing.1) {
        None => Line::NotApplicable,
        Some(cell) if cell.is_empty() => Line::Open,
        Some(_) => Line::Blocked,
    }
}

fn orthogonal_contacts(board: &Board, piece: &Piece) -> i32 {
    [(0, -1), (0, 1), (1, 0), (-1, 0)]
        .into_iter()
        .filter(|(dx, dy)| {
            board
                .piece_at(piece.x + dx, piece.y + dy)
                .is_some_and(|p| p.owner != piece.owner)
        })
        .count() as i32
}

/// Rows `(first, last)` of the zone `piece` is advancing towards.
///
/// The zone is as deep as a starting band, and at least one row.
fn opponent_zone(board: &Board, piece: &Piece) -> (i32, i32) {
    let rows = board.rows() as i32;
    let band = (board.rows().saturating_sub(NEUTRAL_ROWS) / 2).max(1) as i32;
    if piece.owner.forward() > 0 {
        (rows - band, rows - 1)
    } else {
        (0, band - 1)
    }
}

/// Positional value of a single piece.
pub fn piece_value(board: &Board, piece: &Piece) -> i32 {
    let rows = board.rows() as i32;
    let cols = board.cols() as i32;
    let (zone_start, zone_end) = opponent_zone(board, piece);
    let in_zone = (zone_start..=zone_end).contains(&piece.y);
    let rows_to_zone = if piece.owner.forward() > 0 {
        (zone_start - piece.y).max(0)
    } else {
        (piece.y - zone_end).max(0)
    };
    let advanced = if piece.owner.forward() > 0 {
        piece.y
    } else {
        rows - 1 - piece.y
    };

    let mut value = if piece.king { MATERIAL_KING } else { MATERIAL_MAN };

    if piece.king && in_zone {
        let zone_mid = (zone_start + zone_end) / 2;
        let col_mid = (cols - 1) / 2;
        let dist = (piece.x - col_mid).abs() + (piece.y - zone_mid).abs();
        value += (dist - KING_CENTRALITY_RADIUS).abs();
    }

    value += (piece.y - rows / 2).abs() + (piece.x - cols / 2).abs();

    if !piece.king && !in_zone {
        value += rows_to_zone;
    }

    if rows_to_zone <= ADVANCEMENT_WINDOW {
        value += advanced;
    }

    value
}
