//! Moves and everything related to making them.

mod base;
mod make;

pub mod uci;

pub use base::{
    is_move_semilegal, make_move_unchecked, try_make_move_unchecked, unmake_move_unchecked,
    CreateError, MakeMoveError, Move, MoveKind, RawUndo,
};
pub use make::{Make, Uci};
pub use uci::UciMove;
