//! Bottom-up evaluation of a built [`GameTree`].
//!
//! [`alphabeta`] is the fail-soft variant used for move selection. It prunes
//! only when the running value is *strictly* outside the window, so ties are
//! always explored. [`minimax`] and [`evaluate_iterative`] walk every node and
//! serve as reference implementations; all three agree on any tree.

use crate::movegen::Move;
use crate::tree::{GameTree, NodeId, NodeKind};

/// Floor of the arithmetic mean. `None` for an empty input.
pub fn mean_floor(values: impl IntoIterator<Item = i32>) -> Option<i32> {
    let (sum, n) = values
        .into_iter()
        .fold((0i64, 0i64), |(s, n), v| (s + v as i64, n + 1));
    if n == 0 {
        return None;
    }
    Some(sum.div_euclid(n) as i32)
}

/// Alpha-beta value of `id` with a full window.
pub fn alphabeta(tree: &GameTree, id: NodeId) -> i32 {
    alphabeta_window(tree, id, i32::MIN, i32::MAX)
}

/// Alpha-beta value of `id` within `(alpha, beta)`.
///
/// Expectimax nodes cannot be pruned; their children are searched with a full
/// window. A non-terminal node without children evaluates to its stored value.
pub fn alphabeta_window(tree: &GameTree, id: NodeId, mut alpha: i32, mut beta: i32) -> i32 {
    let node = tree.node(id);
    if node.children().is_empty() {
        return node.value();
    }
    match node.kind() {
        NodeKind::Terminal => node.value(),
        NodeKind::Max => {
            let mut best = i32::MIN;
            for &child in node.children() {
                best = best.max(alphabeta_window(tree, child, alpha, beta));
                if best > beta {
                    break;
                }
                alpha = alpha.max(best);
            }
            best
        }
        NodeKind::Min => {
            let mut best = i32::MAX;
            for &child in node.children() {
                best = best.min(alphabeta_window(tree, child, alpha, beta));
                if best < alpha {
                    break;
                }
                beta = beta.min(best);
            }
            best
        }
        NodeKind::Expectimax => {
            mean_floor(node.children().iter().map(|&c| alphabeta(tree, c))).unwrap_or(node.value())
        }
    }
}

/// Unpruned minimax/expectimax value of `id`.
pub fn minimax(tree: &GameTree, id: NodeId) -> i32 {
    let node = tree.node(id);
    let values = node.children().iter().map(|&c| minimax(tree, c));
    combine(node.kind(), values).unwrap_or(node.value())
}

/// Unpruned value of `id` computed with an explicit stack instead of recursion.
pub fn evaluate_iterative(tree: &GameTree, id: NodeId) -> i32 {
    let mut values = vec![0i32; tree.len()];
    let mut stack = vec![(id, false)];
    while let Some((n, children_done)) = stack.pop() {
        let node = tree.node(n);
        if node.children().is_empty() {
            values[n.index()] = node.value();
        } else if !children_done {
            stack.push((n, true));
            stack.extend(node.children().iter().map(|&c| (c, false)));
        } else {
            let child_values = node.children().iter().map(|c| values[c.index()]);
            values[n.index()] = combine(node.kind(), child_values).unwrap_or(node.value());
        }
    }
    values[id.index()]
}

fn combine(kind: NodeKind, values: impl Iterator<Item = i32>) -> Option<i32> {
    match kind {
        NodeKind::Terminal => None,
        NodeKind::Max => values.max(),
        NodeKind::Min => values.min(),
        NodeKind::Expectimax => mean_floor(values),
    }
}

/// A root child together with the move leading to it and its searched value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScoredChild {
    pub id: NodeId,
    pub mv: Move,
    pub score: i32,
    pub winning_move: bool,
}

/// Evaluate every child of the root once, in tree order.
///
/// `iterative` selects [`evaluate_iterative`] over [`alphabeta`]; both return
/// the same values.
pub fn score_children(tree: &GameTree, iterative: bool) -> Vec<ScoredChild> {
    tree.children(tree.root())
        .iter()
        .filter_map(|&id| {
            let node = tree.node(id);
            let mv = *node.state().applied_move()?;
            let score = if iterative {
                evaluate_iterative(tree, id)
            } else {
                alphabeta(tree, id)
            };
            Some(ScoredChild {
                id,
                mv,
                score,
                winning_move: node.is_winning_move(),
            })
        })
        .collect()
}

/// The first child with the highest score.
pub fn best_child(scored: &[ScoredChild]) -> Option<ScoredChild> {
    let mut best: Option<ScoredChild> = None;
    for child in scored {
        if best.is_none_or(|b| child.score > b.score) {
            best = Some(*child);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::state::GameState;
    use crate::tree::SearchNode;

    fn dummy() -> GameState {
        GameState::standard(4, 4, Player::Top).unwrap()
    }

    /// A root of `kind` with terminal children holding `values`.
    fn flat(kind: NodeKind, values: &[i32]) -> GameTree {
        let mut tree = GameTree::new(SearchNode::new(dummy(), kind));
        let root = tree.root();
        for &v in values {
            tree.add_child(root, SearchNode::terminal(dummy(), v, false));
        }
        tree
    }

    #[test]
    fn test_expectimax_floors_mean() {
        let tree = flat(NodeKind::Expectimax, &[2, 3, 4, 5]);
        assert_eq!(alphabeta(&tree, tree.root()), 3);
        assert_eq!(minimax(&tree, tree.root()), 3);
        assert_eq!(evaluate_iterative(&tree, tree.root()), 3);
    }

    #[test]
    fn test_mean_floor_negative() {
        assert_eq!(mean_floor([-1, -2]), Some(-2));
        assert_eq!(mean_floor([]), None);
    }

    #[test]
    fn test_max_and_min() {
        let tree = flat(NodeKind::Max, &[4, -1, 9, 2]);
        assert_eq!(alphabeta(&tree, tree.root()), 9);
        let tree = flat(NodeKind::Min, &[4, -1, 9, 2]);
        assert_eq!(alphabeta(&tree, tree.root()), -1);
    }

    #[test]
    fn test_terminal_root() {
        let tree = GameTree::new(SearchNode::terminal(dummy(), 17, true));
        assert_eq!(alphabeta(&tree, tree.root()), 17);
        assert_eq!(evaluate_iterative(&tree, tree.root()), 17);
    }

    /// MAX root over two MIN nodes: [3, 5] and [2, 8].
    /// After the first MIN returns 3, the second MIN sees 2 < alpha = 3 and
    /// stops before reaching 8.
    #[test]
    fn test_pruning_keeps_value() {
        let mut tree = GameTree::new(SearchNode::new(dummy(), NodeKind::Max));
        let root = tree.root();
        let a = tree.add_child(root, SearchNode::new(dummy(), NodeKind::Min));
        let b = tree.add_child(root, SearchNode::new(dummy(), NodeKind::Min));
        for v in [3, 5] {
            tree.add_child(a, SearchNode::terminal(dummy(), v, false));
        }
        for v in [2, 8] {
            tree.add_child(b, SearchNode::terminal(dummy(), v, false));
        }
        assert_eq!(alphabeta(&tree, root), 3);
        assert_eq!(minimax(&tree, root), 3);
        assert_eq!(alphabeta_window(&tree, b, 3, i32::MAX), 2);
    }

    #[test]
    fn test_equal_value_is_not_pruned() {
        let mut tree = GameTree::new(SearchNode::new(dummy(), NodeKind::Min));
        let root = tree.root();
        tree.add_child(root, SearchNode::terminal(dummy(), 3, false));
        tree.add_child(root, SearchNode::terminal(dummy(), 1, false));
        // best == alpha after the first child, so the second is still searched.
        assert_eq!(alphabeta_window(&tree, root, 3, i32::MAX), 1);
    }

    #[test]
    fn test_best_child_prefers_first() {
        let mv = crate::movegen::Move::simple((0, 0), (1, 1));
        let tree = flat(NodeKind::Max, &[1, 1]);
        let kids = tree.children(tree.root());
        let scored = [
            ScoredChild { id: kids[0], mv, score: 5, winning_move: false },
            ScoredChild { id: kids[1], mv, score: 5, winning_move: false },
        ];
        assert_eq!(best_child(&scored).map(|c| c.id), Some(kids[0]));
        assert_eq!(best_child(&[]), None);
    }
}
