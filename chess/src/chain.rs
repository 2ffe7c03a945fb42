//! Game recording with repetition tracking.
//!
//! [`MoveChain`] owns a position together with the moves which led to it, so
//! it can undo moves, detect repetition draws and assign a game outcome.

use crate::moves::{self, uci, MakeMoveError, Move, RawUndo};
use crate::position::{FenParseError, Position, RawPosition};
use crate::types::{DrawReason, Outcome, OutcomeFilter};

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Error parsing a whitespace-separated list of UCI moves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot parse UCI move #{}: {}", .pos + 1, .source)]
pub struct UciParseError {
    /// Index of the offending move in the list.
    pub pos: usize,
    /// Reason why it was rejected.
    pub source: uci::ParseError,
}

/// Trait for counters of position repetitions.
///
/// The chain pushes each position it passes through, including the starting
/// one, and pops them on undo.
pub trait Repeat: Default {
    fn push(&mut self, pos: &Position);
    fn pop(&mut self, pos: &Position);
    fn repeat_count(&self, pos: &Position) -> usize;
}

/// Repetition counter backed by a hash table.
///
/// Positions are compared with the move counters ignored, as the
/// repetition rules require.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct HashRepeat(HashMap<RawPosition, usize>);

impl HashRepeat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repeat for HashRepeat {
    fn push(&mut self, pos: &Position) {
        self.0
            .entry(pos.raw().repetition_key())
            .and_modify(|x| *x += 1)
            .or_insert(1);
    }

    fn pop(&mut self, pos: &Position) {
        let key = pos.raw().repetition_key();
        if let Some(count) = self.0.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.0.remove(&key);
            }
        }
    }

    fn repeat_count(&self, pos: &Position) -> usize {
        *self.0.get(&pos.raw().repetition_key()).unwrap_or(&0)
    }
}

/// Move chain with the default repetition counter.
pub type MoveChain = BaseMoveChain<HashRepeat>;

/// Position plus the history of moves which produced it.
#[derive(Debug, Clone)]
pub struct BaseMoveChain<R: Repeat> {
    pos: Position,
    repeat: R,
    stack: Vec<(Move, RawUndo)>,
    outcome: Option<Outcome>,
}

impl<R: Repeat> BaseMoveChain<R> {
    /// Creates a chain starting from `pos`.
    pub fn new(pos: Position) -> Self {
        let mut res = BaseMoveChain {
            pos,
            repeat: R::default(),
            stack: Vec::new(),
            outcome: None,
        };
        res.repeat.push(&res.pos);
        res
    }

    /// Creates a chain starting from the initial position.
    pub fn new_initial() -> Self {
        Self::new(Position::initial())
    }

    /// Creates a chain starting from `pos` and plays `uci_list` on it.
    pub fn from_uci_list(pos: Position, uci_list: &str) -> Result<Self, UciParseError> {
        let mut res = BaseMoveChain::new(pos);
        res.push_uci_list(uci_list)?;
        Ok(res)
    }

    /// Creates a chain starting from the position given in FEN.
    pub fn from_fen(s: &str) -> Result<Self, FenParseError> {
        Ok(Self::new(Position::from_fen(s)?))
    }

    /// Returns the current position.
    pub fn last(&self) -> &Position {
        &self.pos
    }

    /// Returns the number of played moves.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if no moves were played yet.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterates over the played moves, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.stack.iter().map(|(m, _)| *m)
    }

    /// Returns the `idx`-th played move.
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.stack.get(idx).map(|(m, _)| *m)
    }

    /// Returns the outcome assigned to the game, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns `true` if the game was assigned an outcome.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Removes the assigned outcome, reopening the game.
    pub fn clear_outcome(&mut self) {
        self.outcome = None;
    }

    /// Assigns an outcome to the game.
    ///
    /// # Panics
    ///
    /// Panics if the game is already finished.
    pub fn set_outcome(&mut self, outcome: Outcome) {
        assert!(!self.is_finished());
        self.outcome = Some(outcome);
    }

    /// Computes the outcome of the current position, if the game has one.
    ///
    /// Unlike [`Position::outcome`], this also accounts for repetitions.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        let rep = self.repeat.repeat_count(&self.pos);
        if rep >= 5 {
            return Some(Outcome::Draw(DrawReason::Repeat5));
        }
        if rep >= 3 {
            return Some(Outcome::Draw(DrawReason::Repeat3));
        }
        self.pos.outcome()
    }

    /// Finishes the game if [`BaseMoveChain::calc_outcome`] yields an
    /// outcome passing `filter` and returns the assigned outcome, if any.
    ///
    /// # Panics
    ///
    /// Panics if the game is already finished.
    pub fn set_auto_outcome(&mut self, filter: OutcomeFilter) -> Option<Outcome> {
        assert!(!self.is_finished());
        if let Some(outcome) = self.calc_outcome() {
            if outcome.passes(filter) {
                self.set_outcome(outcome);
            }
        }
        self.outcome
    }

    fn do_finish_push(&mut self, mv: Move, undo: RawUndo) {
        self.repeat.push(&self.pos);
        self.stack.push((mv, undo));
    }

    /// Plays a legal move on the chain.
    ///
    /// # Panics
    ///
    /// Panics if the game is already finished.
    pub fn push(&mut self, mv: Move) -> Result<(), MakeMoveError> {
        assert!(!self.is_finished());
        mv.semi_validate(&self.pos)?;
        let undo = moves::try_make_move_unchecked(&mut self.pos, mv)?;
        self.do_finish_push(mv, undo);
        Ok(())
    }

    /// Parses a move in UCI notation and plays it on the chain.
    pub fn push_uci(&mut self, s: &str) -> Result<(), uci::ParseError> {
        let mv = Move::from_uci_semilegal(s, &self.pos)?;
        let undo = moves::try_make_move_unchecked(&mut self.pos, mv)
            .map_err(uci::ParseError::Validate)?;
        self.do_finish_push(mv, undo);
        Ok(())
    }

    /// Plays a whitespace-separated list of UCI moves on the chain.
    pub fn push_uci_list(&mut self, uci_list: &str) -> Result<(), UciParseError> {
        for (pos, token) in uci_list.split_ascii_whitespace().enumerate() {
            self.push_uci(token)
                .map_err(|source| UciParseError { pos, source })?;
        }
        Ok(())
    }

    /// Undoes the last played move and clears the outcome.
    pub fn pop(&mut self) -> Option<Move> {
        let (mv, undo) = self.stack.pop()?;
        self.repeat.pop(&self.pos);
        moves::unmake_move_unchecked(&mut self.pos, mv, undo);
        self.outcome = None;
        Some(mv)
    }

    /// Returns a wrapper displaying the moves as a UCI list.
    pub fn uci_list(&self) -> UciList<'_, R> {
        UciList(self)
    }
}

impl<R: Repeat + Eq> PartialEq<Self> for BaseMoveChain<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.pos != other.pos
            || self.repeat != other.repeat
            || self.stack.len() != other.stack.len()
        {
            return false;
        }
        self.stack
            .iter()
            .zip(other.stack.iter())
            .all(|((m1, _), (m2, _))| m1 == m2)
    }
}

impl<R: Repeat + Eq> Eq for BaseMoveChain<R> {}

/// Displays the moves of a chain as a space-separated UCI list.
pub struct UciList<'a, R: Repeat>(&'a BaseMoveChain<R>);

impl<'a, R: Repeat> fmt::Display for UciList<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, m) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}
