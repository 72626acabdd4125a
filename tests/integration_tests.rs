//! Integration tests for draughts-search
//!
//! Properties of move generation, move application, evaluation and search,
//! checked through the public API on standard openings and on seeded random
//! positions.

use draughts_search::board::{Board, Piece, Player};
use draughts_search::config::{OpponentModel, SearchConfig, Traversal};
use draughts_search::heuristic::evaluate;
use draughts_search::movegen::{Move, generate_moves};
use draughts_search::search::{alphabeta, evaluate_iterative, minimax};
use draughts_search::state::GameState;
use draughts_search::tree::{GameTree, NodeKind, TreeBuilder, VisitedStates};

// =============================================================================
// Helper functions
// =============================================================================

/// Scatter up to `count` pieces over a `rows` x `cols` board, some of them kings.
fn random_board(rng: &mut fastrand::Rng, rows: usize, cols: usize, count: usize) -> Board {
    let mut board = Board::new(rows, cols).unwrap();
    for _ in 0..count {
        let x = rng.i32(0..cols as i32);
        let y = rng.i32(0..rows as i32);
        let owner = Player::random(rng);
        let piece = if rng.u8(0..4) == 0 {
            Piece::king(owner)
        } else {
            Piece::new(owner)
        };
        // Occupied squares are skipped.
        let _ = board.place(piece, x, y);
    }
    board
}

fn build(state: GameState, config: SearchConfig) -> GameTree {
    TreeBuilder::new(config)
        .unwrap()
        .build(state, NodeKind::Max, &mut VisitedStates::new())
        .unwrap()
}

/// Check a single move against the board it was generated on.
fn check_move(board: &Board, player: Player, mv: &Move) {
    let (tx, ty) = mv.to();
    assert!(
        tx >= 0 && (tx as usize) < board.cols() && ty >= 0 && (ty as usize) < board.rows(),
        "{mv} leaves the board"
    );
    assert!(board.piece_at(tx, ty).is_none(), "{mv} lands on a piece");
    assert_eq!(board.piece_at(mv.from_x, mv.from_y).map(|p| p.owner), Some(player));

    if let Some((cx, cy)) = mv.captured {
        assert_eq!((cx * 2, cy * 2), (mv.from_x + tx, mv.from_y + ty));
        assert_eq!(
            board.piece_at(cx, cy).map(|p| p.owner),
            Some(player.opponent()),
            "{mv} jumps a non-opponent square"
        );
    }
}

// =============================================================================
// Move generation and application
// =============================================================================

#[test]
fn test_random_playouts_keep_invariants() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..200 {
        let rows = rng.usize(3..=10);
        let cols = rng.usize(3..=10);
        let count = rng.usize(2..=rows * cols / 2);
        let board = random_board(&mut rng, rows, cols, count);
        let mut state = GameState::new(board, Player::random(&mut rng));

        for ply in 0..30 {
            let player = state.turn();
            let moves = generate_moves(state.board(), player);
            if moves.is_empty() {
                break;
            }
            for mv in &moves {
                check_move(state.board(), player, mv);
            }

            let mv = moves[rng.usize(..moves.len())];
            let next = state.process_move(&mv).unwrap();

            let own_before = state.board().count(player);
            let opp_before = state.board().count(player.opponent());
            assert_eq!(next.board().count(player), own_before);
            let lost = if mv.is_capture() { 1 } else { 0 };
            assert_eq!(next.board().count(player.opponent()), opp_before - lost);
            assert_eq!(next.depth(), ply + 1);
            assert_eq!(next.turn(), player.opponent());
            assert_eq!(next.applied_move(), Some(&mv));

            state = next;
        }
    }
}

#[test]
fn test_four_by_four_capture() {
    let mut board = Board::new(4, 4).unwrap();
    board.place(Piece::new(Player::Bottom), 0, 3).unwrap();
    board.place(Piece::new(Player::Top), 1, 2).unwrap();
    let state = GameState::new(board, Player::Bottom);

    let moves = generate_moves(state.board(), Player::Bottom);
    assert_eq!(moves, vec![Move::capture((0, 3), (2, 1))]);
    assert_eq!(moves[0].captured, Some((1, 2)));

    let next = state.process_move(&moves[0]).unwrap();
    assert!(next.board().piece_at(1, 2).is_none());
    assert!(next.board().piece_at(0, 3).is_none());
    assert_eq!(next.board().piece_at(2, 1).map(|p| p.owner), Some(Player::Bottom));
    assert_eq!(next.depth(), 1);
    assert_eq!(next.turn(), Player::Top);
    assert!(next.is_goal());
    assert_eq!(next.winner(), Some(Player::Bottom));
}

#[test]
fn test_moves_never_applied_to_source() {
    let state = GameState::standard(8, 8, Player::Top).unwrap();
    let before = state.signature();
    let children = state.process_moves().unwrap();
    assert_eq!(children.len(), 7);
    assert_eq!(state.signature(), before);
    assert!(children.iter().all(|c| c.signature() != before));
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn test_evaluation_is_deterministic() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..100 {
        let board = random_board(&mut rng, 8, 8, 16);
        let state = GameState::new(board, Player::random(&mut rng));
        let before = state.signature();
        assert_eq!(evaluate(&state), evaluate(&state));
        assert_eq!(state.signature(), before);
        assert_eq!(state.depth(), 0);
    }
}

#[test]
fn test_goal_detection() {
    let empty = GameState::new(Board::new(8, 8).unwrap(), Player::Top);
    assert!(!empty.is_goal());
    assert_eq!(empty.winner(), None);

    let mut lone = Board::new(8, 8).unwrap();
    lone.place(Piece::new(Player::Top), 1, 0).unwrap();
    lone.place(Piece::king(Player::Top), 3, 4).unwrap();
    let lone = GameState::new(lone, Player::Bottom);
    assert!(lone.is_goal());
    assert_eq!(lone.winner(), Some(Player::Top));

    assert!(!GameState::standard(8, 8, Player::Top).unwrap().is_goal());
}

// =============================================================================
// Tree building and search
// =============================================================================

#[test]
fn test_depth_one_children_are_evaluated_leaves() {
    let state = GameState::standard(8, 8, Player::Top).unwrap();
    let tree = build(state, SearchConfig::default().with_depth_limit(1));
    let root = tree.root();
    assert_eq!(tree.children(root).len(), 7);
    for &id in tree.children(root) {
        let node = tree.node(id);
        assert_eq!(node.kind(), NodeKind::Terminal);
        assert!(node.children().is_empty());
        assert_eq!(node.value(), evaluate(node.state()));
    }
}

#[test]
fn test_terminal_depth_within_limit() {
    for limit in 1..=4 {
        for traversal in [Traversal::Recursive, Traversal::Iterative] {
            let state = GameState::standard(6, 6, Player::Bottom).unwrap();
            let config = SearchConfig::default()
                .with_depth_limit(limit)
                .with_traversal(traversal);
            let tree = build(state, config);
            assert!(tree.terminals().all(|n| n.state().depth() <= limit));
            assert!(tree.iter().all(|(_, n)| n.state().depth() <= limit));
        }
    }
}

#[test]
fn test_traversals_build_identical_trees() {
    let state = GameState::standard(6, 6, Player::Top).unwrap();
    let config = SearchConfig::default().with_depth_limit(4);
    let recursive = build(state.clone(), config.clone().with_traversal(Traversal::Recursive));
    let iterative = build(state, config.with_traversal(Traversal::Iterative));

    assert_eq!(recursive.len(), iterative.len());
    for ((_, a), (_, b)) in recursive.iter().zip(iterative.iter()) {
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.value(), b.value());
        assert_eq!(a.state().signature(), b.state().signature());
    }
}

#[test]
fn test_evaluators_agree() {
    let mut rng = fastrand::Rng::with_seed(7);
    for opponent in [OpponentModel::Adversarial, OpponentModel::Chance] {
        for _ in 0..25 {
            let board = random_board(&mut rng, 6, 6, 10);
            let state = GameState::new(board, Player::random(&mut rng));
            let config = SearchConfig::default()
                .with_depth_limit(3)
                .with_opponent(opponent);
            let tree = build(state, config);
            for (id, _) in tree.iter() {
                let expected = minimax(&tree, id);
                assert_eq!(alphabeta(&tree, id), expected);
                assert_eq!(evaluate_iterative(&tree, id), expected);
            }
        }
    }
}

#[test]
fn test_max_root_is_max_of_children() {
    let state = GameState::standard(8, 8, Player::Bottom).unwrap();
    let tree = build(state, SearchConfig::default().with_depth_limit(3));
    let root = tree.root();
    let best = tree
        .children(root)
        .iter()
        .map(|&c| alphabeta(&tree, c))
        .max()
        .unwrap();
    assert_eq!(alphabeta(&tree, root), best);
}

#[test]
fn test_chance_model_alternates_max_and_expectimax() {
    let state = GameState::standard(6, 6, Player::Top).unwrap();
    let config = SearchConfig::default()
        .with_depth_limit(3)
        .with_opponent(OpponentModel::Chance);
    let tree = build(state, config);
    for (id, node) in tree.iter() {
        let Some(parent) = tree.parent(id) else {
            continue;
        };
        if node.kind() == NodeKind::Terminal {
            continue;
        }
        let expected = match tree.node(parent).kind() {
            NodeKind::Max => NodeKind::Expectimax,
            _ => NodeKind::Max,
        };
        assert_eq!(node.kind(), expected);
    }
}

#[test]
fn test_subtree_drops_ancestors() {
    let state = GameState::standard(6, 6, Player::Top).unwrap();
    let tree = build(state, SearchConfig::default().with_depth_limit(3));
    let child = tree.children(tree.root())[0];
    let sub = tree.subtree(child);
    assert_eq!(sub.parent(sub.root()), None);
    assert_eq!(
        sub.node(sub.root()).state().signature(),
        tree.node(child).state().signature()
    );
    assert_eq!(alphabeta(&sub, sub.root()), alphabeta(&tree, child));
    assert!(sub.len() < tree.len());
}
