//! # skua
//!
//! A compact chess kernel built on a plain mailbox board: strictly legal
//! move generation, FEN parsing with full validation, game chains with
//! repetition tracking, and a small alpha-beta search with pluggable
//! evaluation.
//!
//! The crate is split in two: `skua_base` holds the board-independent model
//! types, and this crate builds the position logic on top of them.
//!
//! ```
//! use skua::{moves::Uci, MoveChain, OutcomeFilter, Position};
//!
//! let pos = Position::initial().make_move(Uci("e2e4")).unwrap();
//! assert_eq!(
//!     pos.as_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
//! );
//!
//! let mut chain = MoveChain::new_initial();
//! chain.push_uci_list("f2f3 e7e5 g2g4 d8h4").unwrap();
//! assert!(chain.set_auto_outcome(OutcomeFilter::Force).is_some());
//! ```

pub mod bot;
pub mod chain;
pub mod eval;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod search;
pub mod types;

pub use skua_base::geometry;

pub use chain::MoveChain;
pub use movegen::{MoveList, MovePush};
pub use moves::{Make, Move, MoveKind};
pub use position::{Position, RawPosition};
pub use types::{
    CastlingRights, CastlingSide, Color, DrawReason, File, Outcome, OutcomeFilter, Piece,
    PieceKind, Rank, Square, WinReason,
};
