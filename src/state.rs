//! Game state snapshots and move application.
//!
//! A [`GameState`] owns its board outright. Successor states are produced by
//! [`GameState::process_move`], which deep-copies the board, applies one move,
//! flips the turn and bumps the depth counter.

use crate::board::{Board, Player};
use crate::error::{Error, Result};
use crate::movegen::{Move, generate_moves};

/// A snapshot of the game.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    turn: Player,
    depth: usize,
    /// Legal moves as last generated for this state. Empty until generated.
    moves: Vec<Move>,
    applied_move: Option<Move>,
}

impl GameState {
    /// Wrap an existing board. The turn is always given explicitly.
    pub fn new(board: Board, turn: Player) -> Self {
        Self {
            board,
            turn,
            depth: 0,
            moves: Vec::new(),
            applied_move: None,
        }
    }

    /// A fresh game on a populated `rows x cols` board.
    pub fn standard(rows: usize, cols: usize, turn: Player) -> Result<Self> {
        Ok(Self::new(Board::standard(rows, cols)?, turn))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Moves attached by the last call to [`GameState::generate_moves`].
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The move that produced this state, if any.
    pub fn applied_move(&self) -> Option<&Move> {
        self.applied_move.as_ref()
    }

    /// Textual form of the applied move, empty for a root state.
    pub fn applied_move_str(&self) -> String {
        self.applied_move
            .map(|m| m.to_string())
            .unwrap_or_default()
    }

    /// Generate the legal moves for the side to move and attach them to the state.
    pub fn generate_moves(&mut self) -> &[Move] {
        self.moves = generate_moves(&self.board, self.turn);
        &self.moves
    }

    /// Canonical board signature, see [`Board::signature`].
    pub fn signature(&self) -> String {
        self.board.signature()
    }

    /// True iff exactly one player still has pieces. An empty board is not a win.
    pub fn is_goal(&self) -> bool {
        self.board.owner_count() == 1
    }

    /// The player left on the board when [`GameState::is_goal`] holds.
    pub fn winner(&self) -> Option<Player> {
        if !self.is_goal() {
            return None;
        }
        self.board.pieces().next().map(|p| p.owner)
    }

    /// Apply `mv` to a copy of this state.
    ///
    /// The copy's generated moves are cleared, its turn is flipped and its depth
    /// is one more than this state's.
    ///
    /// # Errors
    /// Contract violations: coordinates off the board, a non-diagonal or
    /// mis-sized step, an empty origin, an occupied destination, or a capture
    /// whose midpoint holds no opposing piece.
    pub fn process_move(&self, mv: &Move) -> Result<GameState> {
        self.check_move(mv)?;

        let mut board = self.board.clone();
        if let Some((cx, cy)) = mv.captured {
            board.remove(cx, cy);
        }
        let piece = board.remove(mv.from_x, mv.from_y).ok_or(Error::EmptyOrigin {
            x: mv.from_x,
            y: mv.from_y,
        })?;
        board.place(piece, mv.to_x, mv.to_y)?;

        Ok(GameState {
            board,
            turn: self.turn.opponent(),
            depth: self.depth + 1,
            moves: Vec::new(),
            applied_move: Some(*mv),
        })
    }

    /// Apply every generated move, in order.
    pub fn process_moves(&self) -> Result<Vec<GameState>> {
        self.moves.iter().map(|m| self.process_move(m)).collect()
    }

    fn check_move(&self, mv: &Move) -> Result<()> {
        let malformed = |reason| Error::MalformedMove {
            from_x: mv.from_x,
            from_y: mv.from_y,
            to_x: mv.to_x,
            to_y: mv.to_y,
            reason,
        };
        for (x, y) in [mv.from(), mv.to()] {
            if !self.board.in_bounds(x, y) {
                return Err(Error::OutOfBounds { x, y });
            }
        }

        let dx = mv.to_x - mv.from_x;
        let dy = mv.to_y - mv.from_y;
        if dx.abs() != dy.abs() {
            return Err(malformed("not a diagonal"));
        }
        match (dx.abs(), mv.captured) {
            (1, None) => {}
            (2, Some((cx, cy))) => {
                if (cx, cy) != (mv.from_x + dx / 2, mv.from_y + dy / 2) {
                    return Err(malformed("captured square is not the midpoint"));
                }
            }
            (1, Some(_)) => return Err(malformed("capture must jump two squares")),
            (2, None) => return Err(malformed("two-square step must capture")),
            _ => return Err(malformed("step must be one or two squares")),
        }

        let mover = self
            .board
            .piece_at(mv.from_x, mv.from_y)
            .ok_or(Error::EmptyOrigin {
                x: mv.from_x,
                y: mv.from_y,
            })?;
        if self.board.piece_at(mv.to_x, mv.to_y).is_some() {
            return Err(Error::OccupiedDestination {
                x: mv.to_x,
                y: mv.to_y,
            });
        }
        if let Some((cx, cy)) = mv.captured {
            let jumped = self.board.piece_at(cx, cy);
            if !jumped.is_some_and(|p| p.owner != mover.owner) {
                return Err(Error::MissingCapturedPiece { x: cx, y: cy });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn corner_capture() -> GameState {
        let mut board = Board::new(4, 4).unwrap();
        board.place(Piece::new(Player::Bottom), 0, 3).unwrap();
        board.place(Piece::new(Player::Top), 1, 2).unwrap();
        GameState::new(board, Player::Bottom)
    }

    #[test]
    fn test_process_capture() {
        let mut state = corner_capture();
        let moves = state.generate_moves().to_vec();
        assert_eq!(moves.len(), 1);

        let next = state.process_move(&moves[0]).unwrap();
        assert_eq!(next.depth(), 1);
        assert_eq!(next.turn(), Player::Top);
        assert!(next.board().piece_at(1, 2).is_none());
        assert!(next.board().piece_at(0, 3).is_none());
        let moved = next.board().piece_at(2, 1).unwrap();
        assert_eq!((moved.owner, moved.x, moved.y), (Player::Bottom, 2, 1));
        assert_eq!(next.applied_move_str(), "From (0, 3) TO (2, 1)");
        assert!(next.moves().is_empty());

        // Parent untouched
        assert!(state.board().piece_at(1, 2).is_some());
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_goal_detection() {
        let state = corner_capture();
        assert!(!state.is_goal());
        let next = state
            .process_move(&Move::capture((0, 3), (2, 1)))
            .unwrap();
        assert!(next.is_goal());
        assert_eq!(next.winner(), Some(Player::Bottom));

        let empty = GameState::new(Board::new(4, 4).unwrap(), Player::Top);
        assert!(!empty.is_goal());
        assert_eq!(empty.winner(), None);
    }

    #[test]
    fn test_contract_errors() {
        let state = corner_capture();
        assert_eq!(
            state.process_move(&Move::simple((3, 3), (2, 2))).unwrap_err(),
            Error::EmptyOrigin { x: 3, y: 3 }
        );
        assert_eq!(
            state.process_move(&Move::simple((0, 3), (1, 2))).unwrap_err(),
            Error::OccupiedDestination { x: 1, y: 2 }
        );
        assert_eq!(
            state.process_move(&Move::simple((0, 3), (-1, 2))).unwrap_err(),
            Error::OutOfBounds { x: -1, y: 2 }
        );
        assert!(matches!(
            state.process_move(&Move::simple((0, 3), (0, 2))),
            Err(Error::MalformedMove { .. })
        ));
        assert!(matches!(
            state.process_move(&Move::simple((0, 3), (2, 1))),
            Err(Error::MalformedMove { .. })
        ));
        assert_eq!(
            state.process_move(&Move::capture((1, 2), (3, 0))).unwrap_err(),
            Error::MissingCapturedPiece { x: 2, y: 1 }
        );
    }

    #[test]
    fn test_process_moves_preserves_order() {
        let mut state = GameState::standard(8, 8, Player::Top).unwrap();
        state.generate_moves();
        let next = state.process_moves().unwrap();
        assert_eq!(next.len(), 7);
        for (child, mv) in next.iter().zip(state.moves()) {
            assert_eq!(child.applied_move(), Some(mv));
            assert_eq!(child.depth(), 1);
            assert_eq!(child.turn(), Player::Bottom);
        }
    }
}
