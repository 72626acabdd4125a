//! Turn-by-turn driver over the search core.
//!
//! The [`Engine`] holds the real game state. Every turn it builds a fresh
//! tree from that state, scores each root child once, and applies the chosen
//! move to the real state rather than to the tree's copy.
//!
//! ## Example
//!
//! ```
//! use draughts_search::board::Player;
//! use draughts_search::config::SearchConfig;
//! use draughts_search::engine::{Engine, Outcome};
//! use draughts_search::state::GameState;
//!
//! let state = GameState::standard(8, 8, Player::Bottom).unwrap();
//! let mut engine = Engine::new(state, SearchConfig::default().with_depth_limit(2)).unwrap();
//! let played = engine.play_best().unwrap();
//! assert!(played.is_some());
//! assert_eq!(engine.outcome(), Outcome::Ongoing);
//! ```

use log::{debug, info};

use crate::board::Player;
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::movegen::Move;
use crate::search::{ScoredChild, best_child, score_children};
use crate::state::GameState;
use crate::tree::{GameTree, NodeKind, TreeBuilder, VisitedStates};

/// Status of the real game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    /// Only this player has pieces left.
    Winner(Player),
    /// The side to move has pieces but no legal move.
    Stalled(Player),
    /// No pieces are left at all.
    Empty,
}

/// A candidate move for the side to move, as listed to a caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Recommendation {
    /// Position in the list, the index a caller passes back to [`Engine::play_index`]
    pub index: usize,
    pub mv: Move,
    pub score: i32,
    pub winning_move: bool,
}

impl From<(usize, ScoredChild)> for Recommendation {
    fn from((index, child): (usize, ScoredChild)) -> Self {
        Self {
            index,
            mv: child.mv,
            score: child.score,
            winning_move: child.winning_move,
        }
    }
}

/// Game driver owning the real state.
pub struct Engine {
    state: GameState,
    builder: TreeBuilder,
    memo: VisitedStates,
    history: Vec<Move>,
}

impl Engine {
    /// # Errors
    /// [`Error::InvalidDepthLimit`] if the configuration is invalid.
    pub fn new(state: GameState, config: SearchConfig) -> Result<Self> {
        let memo = match config.memo_retention {
            Some(cap) => VisitedStates::with_capacity_limit(cap),
            None => VisitedStates::new(),
        };
        Ok(Self {
            state,
            builder: TreeBuilder::new(config)?,
            memo,
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SearchConfig {
        self.builder.config()
    }

    /// Moves applied so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Signatures currently held in the memo.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub fn outcome(&self) -> Outcome {
        let board = self.state.board();
        match board.owner_count() {
            0 => Outcome::Empty,
            1 => self.state.winner().map_or(Outcome::Empty, Outcome::Winner),
            _ if crate::movegen::generate_moves(board, self.state.turn()).is_empty() => {
                Outcome::Stalled(self.state.turn())
            }
            _ => Outcome::Ongoing,
        }
    }

    /// Build a fresh tree from the real state with a MAX root.
    ///
    /// The memo is cleared first unless the configuration retains it.
    pub fn search(&mut self) -> Result<GameTree> {
        if self.config().memo_retention.is_none() {
            self.memo.clear();
        }
        self.builder
            .build(self.state.clone(), NodeKind::Max, &mut self.memo)
    }

    /// Score every legal move of the side to move, in tree order.
    pub fn recommend(&mut self) -> Result<Vec<Recommendation>> {
        let tree = self.search()?;
        let iterative = self.config().iterative();
        let recs: Vec<Recommendation> = score_children(&tree, iterative)
            .into_iter()
            .enumerate()
            .map(Recommendation::from)
            .collect();
        for r in &recs {
            debug!("candidate {}: {} [score {}]", r.index, r.mv, r.score);
        }
        Ok(recs)
    }

    /// The highest-scoring move, earliest on ties. `None` when the game is over.
    pub fn best_move(&mut self) -> Result<Option<Recommendation>> {
        let tree = self.search()?;
        let scored = score_children(&tree, self.config().iterative());
        let best = best_child(&scored).and_then(|b| {
            scored
                .iter()
                .position(|c| c.id == b.id)
                .map(|i| Recommendation::from((i, b)))
        });
        Ok(best)
    }

    /// Apply `mv` to the real state.
    ///
    /// # Errors
    /// Any contract error from [`GameState::process_move`]; the state is left
    /// unchanged.
    pub fn play(&mut self, mv: &Move) -> Result<()> {
        let next = self.state.process_move(mv)?;
        info!("{} plays {}", self.state.turn(), mv);
        self.state = next;
        self.history.push(*mv);
        Ok(())
    }

    /// Apply the move at `index` of a list returned by [`Engine::recommend`].
    ///
    /// # Errors
    /// [`Error::NoSuchMove`] for an index outside the list.
    pub fn play_index(&mut self, recommendations: &[Recommendation], index: usize) -> Result<Move> {
        let rec = recommendations.get(index).ok_or(Error::NoSuchMove {
            index,
            available: recommendations.len(),
        })?;
        self.play(&rec.mv)?;
        Ok(rec.mv)
    }

    /// Search and play the best move. Returns `None` once the game is over.
    pub fn play_best(&mut self) -> Result<Option<Recommendation>> {
        if self.outcome() != Outcome::Ongoing {
            return Ok(None);
        }
        let Some(best) = self.best_move()? else {
            return Ok(None);
        };
        info!("score {} for {}", best.score, best.mv);
        self.play(&best.mv)?;
        Ok(Some(best))
    }
}
