//! Ready-made move pickers.

use crate::eval::{Evaluate, TableEval};
use crate::movegen;
use crate::moves::Move;
use crate::position::Position;
use crate::search::{self, SearchControl};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Trait for anything which can pick a move to play.
pub trait Bot {
    /// Picks a move for the side to move, or `None` if there is no legal
    /// move.
    fn choose_move(&mut self, pos: &Position) -> Option<Move>;
}

/// Bot playing uniformly random legal moves.
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new() -> Self {
        RandomBot {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a bot with a fixed seed, for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        RandomBot {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for RandomBot {
    fn choose_move(&mut self, pos: &Position) -> Option<Move> {
        movegen::legal::gen_all(pos).choose(&mut self.rng).copied()
    }
}

/// Bot picking moves with the alpha-beta search.
pub struct SearchBot<E> {
    depth: u32,
    node_limit: Option<u64>,
    eval: E,
}

impl SearchBot<TableEval> {
    /// Creates a bot searching to `depth` plies with the default evaluator.
    pub fn new(depth: u32) -> Self {
        Self::with_eval(depth, TableEval)
    }
}

impl<E: Evaluate> SearchBot<E> {
    /// Creates a bot searching to `depth` plies with the given evaluator.
    pub fn with_eval(depth: u32, eval: E) -> Self {
        SearchBot {
            depth,
            node_limit: None,
            eval,
        }
    }

    /// Caps the number of nodes searched per move.
    pub fn node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    fn control(&self) -> SearchControl {
        match self.node_limit {
            Some(limit) => SearchControl::with_node_limit(limit),
            None => SearchControl::new(),
        }
    }
}

impl<E: Evaluate> Bot for SearchBot<E> {
    fn choose_move(&mut self, pos: &Position) -> Option<Move> {
        search::search(pos, self.depth, &self.eval, &self.control()).best
    }
}
