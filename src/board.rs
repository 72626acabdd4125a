//! Board model: players, pieces, cells and the rectangular grid that owns them.
//!
//! Row `0` is the top player's back row and row `rows - 1` the bottom player's.
//! Coordinates are signed so that neighbour arithmetic can step off the board
//! and be rejected by [`Board::in_bounds`] instead of wrapping.

use crate::constants::{MARK_BOTTOM, MARK_EMPTY, MARK_TOP, NEUTRAL_ROWS};
use crate::error::{Error, Result};

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Top,
    Bottom,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    /// Row delta of a forward step, towards the opponent's back row.
    #[inline]
    pub fn forward(self) -> i32 {
        match self {
            Player::Top => 1,
            Player::Bottom => -1,
        }
    }

    /// Signature marker for a cell holding this player's piece.
    pub fn marker(self) -> char {
        match self {
            Player::Top => MARK_TOP,
            Player::Bottom => MARK_BOTTOM,
        }
    }

    /// Pick a side uniformly at random.
    ///
    /// Random turn assignment is always explicit; nothing in the crate calls this
    /// on the caller's behalf.
    pub fn random(rng: &mut fastrand::Rng) -> Player {
        if rng.bool() { Player::Top } else { Player::Bottom }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Top => write!(f, "top"),
            Player::Bottom => write!(f, "bottom"),
        }
    }
}

/// A piece on the board. Its position always mirrors the cell holding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub owner: Player,
    pub x: i32,
    pub y: i32,
    pub king: bool,
}

impl Piece {
    /// An ordinary piece. The position is overwritten on placement.
    pub fn new(owner: Player) -> Self {
        Self {
            owner,
            x: 0,
            y: 0,
            king: false,
        }
    }

    pub fn king(owner: Player) -> Self {
        Self {
            king: true,
            ..Self::new(owner)
        }
    }
}

/// A square of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub piece: Option<Piece>,
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

/// Fixed-size grid of cells, stored row-major.
///
/// `Clone` is a deep copy: every cell and piece is duplicated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `rows x cols` board.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || i32::try_from(rows.max(cols)).is_err() {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let cells = (0..rows)
            .flat_map(|y| {
                (0..cols).map(move |x| Cell {
                    x: x as i32,
                    y: y as i32,
                    piece: None,
                })
            })
            .collect();
        Ok(Self { rows, cols, cells })
    }

    /// Create a board with both starting bands populated.
    ///
    /// Each band is `(rows - 2) / 2` rows deep. Pieces sit on alternating columns,
    /// the top band starting at column 1 on its back row and the bottom band at
    /// column 0 on its back row, so both sides share one square colour.
    pub fn standard(rows: usize, cols: usize) -> Result<Self> {
        let mut board = Self::new(rows, cols)?;
        let band = rows.saturating_sub(NEUTRAL_ROWS) / 2;
        for i in 0..band {
            let start = if i % 2 == 0 { 1 } else { 0 };
            for x in (start..cols).step_by(2) {
                board.place(Piece::new(Player::Top), x as i32, i as i32)?;
            }
        }
        for i in 0..band {
            let y = rows - 1 - i;
            let start = if i % 2 == 0 { 0 } else { 1 };
            for x in (start..cols).step_by(2) {
                board.place(Piece::new(Player::Bottom), x as i32, y as i32)?;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        y as usize * self.cols + x as usize
    }

    /// The cell at `(x, y)`, or `None` outside the board.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(&self.cells[self.idx(x, y)])
    }

    /// The piece at `(x, y)`, or `None` if the cell is empty or off the board.
    pub fn piece_at(&self, x: i32, y: i32) -> Option<&Piece> {
        self.cell(x, y).and_then(|c| c.piece.as_ref())
    }

    /// Put a piece into an empty cell, rewriting its stored position.
    pub fn place(&mut self, mut piece: Piece, x: i32, y: i32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Error::OutOfBounds { x, y });
        }
        let i = self.idx(x, y);
        if self.cells[i].piece.is_some() {
            return Err(Error::OccupiedDestination { x, y });
        }
        piece.x = x;
        piece.y = y;
        self.cells[i].piece = Some(piece);
        Ok(())
    }

    /// Take the piece out of a cell.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<Piece> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.idx(x, y);
        self.cells[i].piece.take()
    }

    /// All pieces, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().filter_map(|c| c.piece.as_ref())
    }

    /// Pieces belonging to `player`, row-major.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.owner == player)
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces_of(player).count()
    }

    pub fn total_pieces(&self) -> usize {
        self.pieces().count()
    }

    /// Number of distinct players that still have pieces on the board (0, 1 or 2).
    pub fn owner_count(&self) -> usize {
        let mut top = false;
        let mut bottom = false;
        for p in self.pieces() {
            match p.owner {
                Player::Top => top = true,
                Player::Bottom => bottom = true,
            }
            if top && bottom {
                break;
            }
        }
        top as usize + bottom as usize
    }

    /// Canonical row-major signature, one marker per cell and no separators.
    ///
    /// Kings are not distinguished and the side to move is not encoded.
    pub fn signature(&self) -> String {
        self.cells
            .iter()
            .map(|c| match &c.piece {
                Some(p) => p.owner.marker(),
                None => MARK_EMPTY,
            })
            .collect()
    }
}
