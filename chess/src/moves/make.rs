//! Ways to apply a move to a position.
//!
//! Anything implementing [`Make`] can be fed to
//! [`Position::make_move`](crate::Position::make_move). A [`Move`] is
//! validated and applied, while [`Uci`] parses its string first.

use super::base::{self, MakeMoveError, Move, RawUndo};
use super::uci;
use crate::position::Position;

/// Trait for everything which can be applied to a position as a move.
pub trait Make {
    /// Error returned when the move cannot be applied.
    type Err;

    /// Applies the move to `pos` in place, returning the played move and the
    /// data needed to undo it.
    fn make_raw(&self, pos: &mut Position) -> Result<(Move, RawUndo), Self::Err>;

    /// Applies the move to `pos`, returning the resulting position.
    fn make(&self, pos: &Position) -> Result<Position, Self::Err> {
        let mut cloned = pos.clone();
        let _ = self.make_raw(&mut cloned)?;
        Ok(cloned)
    }
}

impl Make for Move {
    type Err = MakeMoveError;

    fn make_raw(&self, pos: &mut Position) -> Result<(Move, RawUndo), Self::Err> {
        self.semi_validate(pos)?;
        let undo = base::try_make_move_unchecked(pos, *self)?;
        Ok((*self, undo))
    }
}

/// Move in UCI notation, parsed and validated against the position it is
/// applied to.
///
/// ```
/// # use skua::{moves::Uci, Position};
/// let pos = Position::initial().make_move(Uci("e2e4")).unwrap();
/// assert_eq!(
///     pos.as_fen(),
///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
/// );
/// ```
pub struct Uci<S: AsRef<str>>(pub S);

impl<S: AsRef<str>> Make for Uci<S> {
    type Err = uci::ParseError;

    fn make_raw(&self, pos: &mut Position) -> Result<(Move, RawUndo), Self::Err> {
        let mv = Move::from_uci_semilegal(self.0.as_ref(), pos)?;
        let undo = base::try_make_move_unchecked(pos, mv).map_err(uci::ParseError::Validate)?;
        Ok((mv, undo))
    }
}
