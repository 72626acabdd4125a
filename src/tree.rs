//! Depth-limited game tree construction.
//!
//! Nodes live in a flat arena ([`GameTree`]) and refer to each other by
//! [`NodeId`]. Children are owned by the arena in creation order; the parent
//! link is a plain id, so copying a subtree never drags its ancestors along.
//!
//! The builder expands depth-first. Whether a node stops expansion is decided
//! once, when the node is created, against the memo as it stands at that
//! moment: earlier siblings' subtrees have already been built and stored.

use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::heuristic::evaluate;
use crate::state::GameState;

/// Role of a node in the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Max,
    Min,
    Expectimax,
    Terminal,
}

/// Index of a node within its [`GameTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the search tree.
#[derive(Clone, Debug)]
pub struct SearchNode {
    state: GameState,
    kind: NodeKind,
    /// Static value; only meaningful for terminal nodes
    value: i32,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    winning_move: bool,
}

impl SearchNode {
    /// An interior node of the given kind.
    pub fn new(state: GameState, kind: NodeKind) -> Self {
        Self {
            state,
            kind,
            value: 0,
            children: Vec::new(),
            parent: None,
            winning_move: false,
        }
    }

    /// A leaf carrying its evaluated value.
    pub fn terminal(state: GameState, value: i32, winning_move: bool) -> Self {
        Self {
            value,
            winning_move,
            ..Self::new(state, NodeKind::Terminal)
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Set when expansion stopped because only one player had pieces left.
    #[inline]
    pub fn is_winning_move(&self) -> bool {
        self.winning_move
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind == NodeKind::Terminal
    }
}

/// Arena holding one search tree. The root is always the first node.
#[derive(Clone, Debug)]
pub struct GameTree {
    nodes: Vec<SearchNode>,
}

impl GameTree {
    /// A tree consisting of `root` alone.
    pub fn new(mut root: SearchNode) -> Self {
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// # Panics
    /// If `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of nodes, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Every node with its id, in creation (depth-first) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn terminals(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes.iter().filter(|n| n.is_terminal())
    }

    /// Attach `child` under `parent` and return its id.
    ///
    /// # Panics
    /// If `parent` is a terminal node.
    pub fn add_child(&mut self, parent: NodeId, mut child: SearchNode) -> NodeId {
        assert!(
            !self.nodes[parent.0].is_terminal(),
            "terminal nodes cannot have children"
        );
        let id = NodeId(self.nodes.len());
        child.parent = Some(parent);
        child.children.clear();
        self.nodes.push(child);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Copy the subtree rooted at `id` into a new tree.
    ///
    /// Ancestors are not copied; the new root has no parent.
    pub fn subtree(&self, id: NodeId) -> GameTree {
        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut stack = vec![(id, None::<NodeId>)];
        while let Some((old, parent)) = stack.pop() {
            let src = &self.nodes[old.0];
            let new_id = NodeId(nodes.len());
            nodes.push(SearchNode {
                children: Vec::new(),
                parent,
                ..src.clone()
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(new_id);
            }
            for &c in src.children.iter().rev() {
                stack.push((c, Some(new_id)));
            }
        }
        GameTree { nodes }
    }
}

/// Memo of evaluated signatures, shared by every node of one build.
///
/// Unbounded by default. With a capacity, the oldest signatures are evicted
/// first, which keeps a memo retained across turns from growing without limit.
#[derive(Clone, Debug, Default)]
pub struct VisitedStates {
    values: HashMap<String, i32>,
    order: VecDeque<String>,
    capacity: Option<usize>,
    hits: usize,
}

impl VisitedStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Look up a signature, counting the hit.
    pub fn lookup(&mut self, signature: &str) -> Option<i32> {
        let value = self.values.get(signature).copied();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.values.contains_key(signature)
    }

    /// Record a value. An existing entry is left as is.
    pub fn insert(&mut self, signature: String, value: i32) {
        if self.values.contains_key(&signature) {
            return;
        }
        if let Some(cap) = self.capacity {
            if cap == 0 {
                return;
            }
            while self.values.len() >= cap {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.values.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        self.order.push_back(signature.clone());
        self.values.insert(signature, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lookups that found a value since the last clear.
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.order.clear();
        self.hits = 0;
    }
}

/// Builds depth-limited trees according to a [`SearchConfig`].
#[derive(Clone, Debug)]
pub struct TreeBuilder {
    config: SearchConfig,
}

impl TreeBuilder {
    /// # Errors
    /// [`crate::Error::InvalidDepthLimit`] for a zero depth limit.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Expand `root` into a tree whose root has kind `kind`.
    ///
    /// The depth limit counts plies below the root, so a fresh game (depth 0)
    /// stops exactly at `depth == depth_limit`.
    pub fn build(
        &self,
        root: GameState,
        kind: NodeKind,
        visited: &mut VisitedStates,
    ) -> Result<GameTree> {
        let root_depth = root.depth();
        let hits_before = visited.hits();
        let (node, successors) = self.create(root, kind, root_depth, visited)?;
        let mut tree = GameTree::new(node);
        let root_id = tree.root();

        if !successors.is_empty() {
            if self.config.iterative() {
                self.expand_iterative(&mut tree, root_id, successors, root_depth, visited)?;
            } else {
                self.expand_recursive(&mut tree, root_id, successors, root_depth, visited)?;
            }
        }

        debug!(
            "built tree: {} nodes, {} terminal, {} memo hits, {} signatures",
            tree.len(),
            tree.terminals().count(),
            visited.hits() - hits_before,
            visited.len()
        );
        Ok(tree)
    }

    /// Create a node for `state`, deciding whether it stops expansion.
    ///
    /// Returns the node and, for interior nodes, its successor states ordered
    /// by ascending heuristic value.
    fn create(
        &self,
        mut state: GameState,
        kind: NodeKind,
        root_depth: usize,
        visited: &mut VisitedStates,
    ) -> Result<(SearchNode, Vec<GameState>)> {
        let signature = state.signature();
        // The root is the real position and is always expanded, even when an
        // earlier search left its signature in the memo.
        let cached = if state.depth() == root_depth {
            None
        } else {
            visited.lookup(&signature)
        };
        let goal = state.is_goal();
        let at_limit = state.depth() - root_depth >= self.config.depth_limit;

        if cached.is_none() && !at_limit && !goal {
            state.generate_moves();
            if !state.moves().is_empty() {
                let mut successors = state.process_moves()?;
                successors.sort_by_cached_key(evaluate);
                trace!(
                    "expanding {} at depth {} with {} moves",
                    signature,
                    state.depth(),
                    successors.len()
                );
                return Ok((SearchNode::new(state, kind), successors));
            }
        }

        let value = match cached {
            Some(v) => v,
            None => {
                let v = evaluate(&state);
                visited.insert(signature, v);
                v
            }
        };
        Ok((SearchNode::terminal(state, value, goal), Vec::new()))
    }

    fn expand_recursive(
        &self,
        tree: &mut GameTree,
        parent: NodeId,
        successors: Vec<GameState>,
        root_depth: usize,
        visited: &mut VisitedStates,
    ) -> Result<()> {
        let kind = self.config.opponent.child_kind(tree.node(parent).kind());
        for state in successors {
            let (node, next) = self.create(state, kind, root_depth, visited)?;
            let id = tree.add_child(parent, node);
            if !next.is_empty() {
                self.expand_recursive(tree, id, next, root_depth, visited)?;
            }
        }
        Ok(())
    }

    /// Same expansion order as [`TreeBuilder::expand_recursive`], driven by an
    /// explicit stack of pending successor lists.
    fn expand_iterative(
        &self,
        tree: &mut GameTree,
        root: NodeId,
        successors: Vec<GameState>,
        root_depth: usize,
        visited: &mut VisitedStates,
    ) -> Result<()> {
        struct Frame {
            node: NodeId,
            child_kind: NodeKind,
            pending: std::vec::IntoIter<GameState>,
        }

        let opponent = self.config.opponent;
        let mut stack = vec![Frame {
            node: root,
            child_kind: opponent.child_kind(tree.node(root).kind()),
            pending: successors.into_iter(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(state) = frame.pending.next() else {
                stack.pop();
                continue;
            };
            let (parent, kind) = (frame.node, frame.child_kind);
            let (node, next) = self.create(state, kind, root_depth, visited)?;
            let id = tree.add_child(parent, node);
            if !next.is_empty() {
                stack.push(Frame {
                    node: id,
                    child_kind: opponent.child_kind(kind),
                    pending: next.into_iter(),
                });
            }
        }
        Ok(())
    }
}
