//! Draughts-Search: depth-limited minimax search for a checkers variant.
//!
//! The crate recommends moves by expanding a bounded game tree, scoring its
//! leaves with a positional heuristic, and folding the scores back up with
//! alpha-beta minimax or expectimax.
//!
//! ## Modules
//!
//! - [`board`] - Players, pieces and the grid
//! - [`movegen`] - Legal simple and capture moves
//! - [`state`] - Game snapshots and move application
//! - [`heuristic`] - Static evaluation
//! - [`tree`] - Tree arena, visited-state memo and the tree builder
//! - [`search`] - Alpha-beta, minimax and expectimax evaluation
//! - [`engine`] - Turn-by-turn driver over the real game state
//! - [`config`] - Search configuration
//! - [`constants`] - Defaults and heuristic weights
//!
//! ## Example
//!
//! ```
//! use draughts_search::board::Player;
//! use draughts_search::config::SearchConfig;
//! use draughts_search::search::{alphabeta, best_child, score_children};
//! use draughts_search::state::GameState;
//! use draughts_search::tree::{NodeKind, TreeBuilder, VisitedStates};
//!
//! let state = GameState::standard(8, 8, Player::Top).unwrap();
//! let builder = TreeBuilder::new(SearchConfig::default().with_depth_limit(3)).unwrap();
//! let tree = builder
//!     .build(state.clone(), NodeKind::Max, &mut VisitedStates::new())
//!     .unwrap();
//!
//! let scored = score_children(&tree, false);
//! let best = best_child(&scored).unwrap();
//! assert_eq!(best.score, alphabeta(&tree, best.id));
//!
//! let next = state.process_move(&best.mv).unwrap();
//! assert_eq!(next.turn(), Player::Bottom);
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod movegen;
pub mod search;
pub mod state;
pub mod tree;

pub use error::{Error, Result};
