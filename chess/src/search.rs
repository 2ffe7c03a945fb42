//! Alpha-beta game tree search.
//!
//! The search is a plain depth-bounded negamax with alpha-beta pruning. It
//! can be cancelled from another thread through [`SearchControl`], in which
//! case it returns the best move found so far.

use crate::eval::{Evaluate, Score};
use crate::movegen;
use crate::moves::{self, Move};
use crate::position::Position;
use crate::types::Color;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to limit and cancel a running search.
///
/// The handle is cheap to clone, and all clones share the same stop flag, so
/// one can be kept on another thread to cancel the search.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stop: Arc<AtomicBool>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// Creates a control which never stops the search on its own.
    pub fn new() -> Self {
        SearchControl::default()
    }

    /// Creates a control which stops the search after roughly `limit` nodes.
    ///
    /// The limit may be overshot by up to one path to the leaves, as it is
    /// only checked between sibling moves.
    pub fn with_node_limit(limit: u64) -> Self {
        SearchControl {
            stop: Arc::new(AtomicBool::new(false)),
            node_limit: Some(limit),
        }
    }

    /// Cancels the search.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if [`SearchControl::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Result of a finished or cancelled search.
///
/// The score is given from the point of view of the side to move. Mate
/// scores count plies from the searched position, so [`Score::mate_in`]`(3)`
/// means the side to move mates on its second move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best move found, or `None` if the position has no legal moves.
    pub best: Option<Move>,
    /// Score of the best move.
    pub score: Score,
    /// Number of visited nodes.
    pub nodes: u64,
}

struct Searcher<'a, E> {
    eval: &'a E,
    ctl: &'a SearchControl,
    nodes: u64,
    stopped: bool,
}

impl<E: Evaluate> Searcher<'_, E> {
    fn check_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.ctl.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return true;
        }
        if let Some(limit) = self.ctl.node_limit {
            if self.nodes >= limit {
                self.stopped = true;
                return true;
            }
        }
        false
    }

    fn leaf(&self, pos: &Position) -> Score {
        let white = self.eval.evaluate(pos);
        match pos.side() {
            Color::White => white,
            Color::Black => -white,
        }
    }

    fn search(
        &mut self,
        pos: &mut Position,
        depth: u32,
        ply: u32,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes += 1;
        let moves = movegen::legal::gen_all(pos);
        if moves.is_empty() {
            return match pos.is_check() {
                true => Score::mated_in(ply),
                false => Score::ZERO,
            };
        }
        if pos.halfmove_clock() >= 100 || pos.is_insufficient_material() {
            return Score::ZERO;
        }
        if depth == 0 {
            return self.leaf(pos);
        }
        let mut best = -Score::MATE;
        for mv in &moves {
            let undo = moves::make_move_unchecked(pos, *mv);
            let score = -self.search(pos, depth - 1, ply + 1, -beta, -alpha);
            moves::unmake_move_unchecked(pos, *mv, undo);
            // When stopped, the last child is incomplete and its score is
            // discarded.
            if self.check_stop() {
                break;
            }
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

/// Searches `pos` to the given depth in plies.
///
/// `depth` is clamped to at least 1. The position is assumed to be ongoing;
/// if it has no legal moves, the result carries no best move and the mate or
/// stalemate score.
pub fn search<E: Evaluate>(
    pos: &Position,
    depth: u32,
    eval: &E,
    ctl: &SearchControl,
) -> SearchOutcome {
    let depth = depth.max(1);
    let mut searcher = Searcher {
        eval,
        ctl,
        nodes: 1,
        stopped: false,
    };
    let mut pos = pos.clone();
    let moves = movegen::legal::gen_all(&pos);
    if moves.is_empty() {
        let score = match pos.is_check() {
            true => Score::mated_in(0),
            false => Score::ZERO,
        };
        return SearchOutcome {
            best: None,
            score,
            nodes: searcher.nodes,
        };
    }

    let mut best_move = moves[0];
    let mut best_score = None;
    let mut alpha = -Score::MATE;
    for mv in &moves {
        let undo = moves::make_move_unchecked(&mut pos, *mv);
        let score = -searcher.search(&mut pos, depth - 1, 1, -Score::MATE, -alpha);
        moves::unmake_move_unchecked(&mut pos, *mv, undo);
        if searcher.check_stop() {
            // Fall back to the first move if nothing was searched to
            // completion; a cancelled search still returns a legal move.
            if best_score.is_none() {
                best_score = Some(score);
                best_move = *mv;
            }
            break;
        }
        if best_score.map_or(true, |prev| score > prev) {
            best_score = Some(score);
            best_move = *mv;
        }
        alpha = alpha.max(score);
    }

    SearchOutcome {
        best: Some(best_move),
        score: best_score.unwrap_or(Score::ZERO),
        nodes: searcher.nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEval;

    fn run(fen: &str, depth: u32) -> SearchOutcome {
        let pos = Position::from_fen(fen).unwrap();
        search(&pos, depth, &MaterialEval, &SearchControl::new())
    }

    #[test]
    fn test_mate_in_one() {
        let outcome = run("7k/R7/8/8/8/8/8/1R4K1 w - - 0 1", 2);
        assert_eq!(outcome.score, Score::mate_in(1));
        assert_eq!(outcome.best.map(|mv| mv.to_string()), Some("b1b8".into()));

        // A deeper search still prefers the quickest mate.
        let outcome = run("7k/R7/8/8/8/8/8/1R4K1 w - - 0 1", 4);
        assert_eq!(outcome.score, Score::mate_in(1));
        assert_eq!(outcome.best.map(|mv| mv.to_string()), Some("b1b8".into()));
    }

    #[test]
    fn test_mate_in_two() {
        let outcome = run("k7/8/2K5/8/8/8/8/6Q1 w - - 0 1", 3);
        assert_eq!(outcome.score, Score::mate_in(3));
        assert!(outcome.best.is_some());

        let outcome = run("k7/8/2K5/8/8/8/8/6Q1 w - - 0 1", 5);
        assert_eq!(outcome.score, Score::mate_in(3));
    }

    #[test]
    fn test_terminal_positions() {
        // Checkmated side has no moves and the worst score.
        let outcome = run(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            3,
        );
        assert_eq!(outcome.best, None);
        assert_eq!(outcome.score, Score::mated_in(0));

        // Stalemate scores zero.
        let outcome = run("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1", 3);
        assert_eq!(outcome.best, None);
        assert_eq!(outcome.score, Score::ZERO);
    }

    #[test]
    fn test_wins_material() {
        let outcome = run("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 2);
        assert_eq!(outcome.best.map(|mv| mv.to_string()), Some("e4d5".into()));
        assert!(outcome.score > Score::new(500));
    }

    #[test]
    fn test_stop_flag() {
        let pos = Position::initial();
        let ctl = SearchControl::new();
        ctl.stop();
        assert!(ctl.is_stopped());
        let outcome = search(&pos, 6, &MaterialEval, &ctl);
        let best = outcome.best.unwrap();
        assert!(pos.legal_moves().contains(&best));
        // The search unwinds after a single path once stopped.
        assert!(outcome.nodes < 64, "nodes = {}", outcome.nodes);
    }

    #[test]
    fn test_node_limit() {
        let pos = Position::initial();
        let ctl = SearchControl::with_node_limit(5000);
        let outcome = search(&pos, 12, &MaterialEval, &ctl);
        assert!(outcome.best.is_some());
        assert!(outcome.nodes < 5100, "nodes = {}", outcome.nodes);
    }
}
