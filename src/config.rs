//! Search configuration.

use crate::constants::{DEFAULT_DEPTH_LIMIT, DEFAULT_MEMO_CAPACITY, RECURSION_LIMIT};
use crate::error::{Error, Result};
use crate::tree::NodeKind;

/// How the opponent's plies are combined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OpponentModel {
    /// Classic minimax: MAX and MIN alternate. An EXPECTIMAX node keeps
    /// producing EXPECTIMAX children.
    #[default]
    Adversarial,
    /// The opponent is modelled as a chance node: MAX and EXPECTIMAX alternate.
    Chance,
}

impl OpponentModel {
    /// Kind of the children of a node of kind `parent`.
    pub fn child_kind(self, parent: NodeKind) -> NodeKind {
        match (self, parent) {
            (_, NodeKind::Terminal) => NodeKind::Terminal,
            (OpponentModel::Adversarial, NodeKind::Max) => NodeKind::Min,
            (OpponentModel::Adversarial, NodeKind::Min) => NodeKind::Max,
            (OpponentModel::Adversarial, NodeKind::Expectimax) => NodeKind::Expectimax,
            (OpponentModel::Chance, NodeKind::Max) => NodeKind::Expectimax,
            (OpponentModel::Chance, NodeKind::Expectimax | NodeKind::Min) => NodeKind::Max,
        }
    }
}

/// Whether tree construction and evaluation recurse or use an explicit stack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    Recursive,
    Iterative,
    /// Recursive up to [`RECURSION_LIMIT`] plies, iterative beyond.
    #[default]
    Auto,
}

/// Parameters for building and evaluating a search tree.
///
/// # Examples
///
/// ```
/// use draughts_search::config::{OpponentModel, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_depth_limit(4)
///     .with_opponent(OpponentModel::Chance);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies below the root at which expansion stops
    pub depth_limit: usize,
    pub opponent: OpponentModel,
    pub traversal: Traversal,
    /// Keep the visited-state memo between turns, bounded to this many entries.
    /// `None` clears it before every search.
    pub memo_retention: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            opponent: OpponentModel::default(),
            traversal: Traversal::default(),
            memo_retention: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_opponent(mut self, opponent: OpponentModel) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Retain the memo across turns, evicting the oldest entries past `capacity`.
    pub fn with_memo_retention(mut self, capacity: Option<usize>) -> Self {
        self.memo_retention = capacity;
        self
    }

    /// Retain the memo with the default capacity.
    pub fn retaining_memo(self) -> Self {
        self.with_memo_retention(Some(DEFAULT_MEMO_CAPACITY))
    }

    /// Reject a zero depth limit, which would leave every root unexpanded.
    pub fn validate(&self) -> Result<()> {
        if self.depth_limit == 0 {
            return Err(Error::InvalidDepthLimit);
        }
        Ok(())
    }

    /// True when the explicit-stack traversal should be used.
    pub fn iterative(&self) -> bool {
        match self.traversal {
            Traversal::Recursive => false,
            Traversal::Iterative => true,
            Traversal::Auto => self.depth_limit > RECURSION_LIMIT,
        }
    }
}
