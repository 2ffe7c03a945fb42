//! Utilities to work with moves in UCI format.

use super::base::{CreateError, MakeMoveError, Move, MoveKind};
use crate::geometry;
use crate::position::Position;
use crate::types::{CastlingSide, Piece, PieceKind, Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error creating a parsed UCI representation from string.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length.
    #[error("bad string length")]
    BadLength,
    /// Bad source square.
    #[error("bad source: {0}")]
    BadSrc(#[source] SquareParseError),
    /// Bad destination square.
    #[error("bad destination: {0}")]
    BadDst(#[source] SquareParseError),
    /// Bad promote character.
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Error parsing UCI into a well-formed [`Move`].
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BasicParseError {
    /// Error parsing move.
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Error converting the parsed move into a well-formed move.
    #[error("cannot create move: {0}")]
    Create(#[from] CreateError),
}

/// Error parsing UCI into a semilegal or legal [`Move`].
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move.
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Error converting the parsed move into a well-formed move.
    #[error("cannot create move: {0}")]
    Create(#[from] CreateError),
    /// Move is not semilegal or legal.
    #[error("invalid move: {0}")]
    Validate(#[from] MakeMoveError),
}

/// Parsed move in UCI format.
///
/// Such move is completely detached from a position, so it can be parsed and
/// printed on its own. To play it, bind it to a position first with
/// [`UciMove::into_move`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UciMove {
    /// Source square.
    pub src: Square,
    /// Destination square.
    pub dst: Square,
    /// Piece to promote into, if any.
    pub promote: Option<PieceKind>,
}

impl UciMove {
    /// Converts the parsed move into a well-formed [`Move`] for `pos`.
    ///
    /// The kind of the move is inferred from the position. The result is not
    /// validated beyond well-formedness; see [`Move::from_uci_legal`] for a
    /// checked variant.
    pub fn into_move(self, pos: &Position) -> Result<Move, CreateError> {
        let side = pos.side();
        let kind = if let Some(piece) = self.promote {
            MoveKind::Promote(piece)
        } else if pos.get(self.src) == Some(Piece::new(side, PieceKind::Pawn)) {
            if self.src.rank() == geometry::pawn_home_rank(side)
                && self.dst.rank() == geometry::double_dst_rank(side)
            {
                MoveKind::PawnDouble
            } else if self.src.file() != self.dst.file() && pos.get(self.dst).is_none() {
                MoveKind::EnPassant
            } else {
                MoveKind::PawnSingle
            }
        } else if pos.get(self.src) == Some(Piece::new(side, PieceKind::King))
            && self.src == geometry::king_home(side)
        {
            if self.dst == geometry::castle_king_dst(side, CastlingSide::King) {
                MoveKind::CastleKing
            } else if self.dst == geometry::castle_king_dst(side, CastlingSide::Queen) {
                MoveKind::CastleQueen
            } else {
                MoveKind::Simple
            }
        } else {
            MoveKind::Simple
        };
        Move::new(kind, self.src, self.dst, side)
    }
}

impl From<Move> for UciMove {
    fn from(mv: Move) -> UciMove {
        UciMove {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv.promote(),
        }
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(piece) = self.promote {
            write!(f, "{}", piece.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for UciMove {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !matches!(s.len(), 4 | 5) {
            return Err(RawParseError::BadLength);
        }
        let src = s
            .get(0..2)
            .ok_or(RawParseError::BadLength)?
            .parse()
            .map_err(RawParseError::BadSrc)?;
        let dst = s
            .get(2..4)
            .ok_or(RawParseError::BadLength)?
            .parse()
            .map_err(RawParseError::BadDst)?;
        let promote = match s.get(4..).and_then(|rest| rest.chars().next()) {
            Some('n') => Some(PieceKind::Knight),
            Some('b') => Some(PieceKind::Bishop),
            Some('r') => Some(PieceKind::Rook),
            Some('q') => Some(PieceKind::Queen),
            Some(c) => return Err(RawParseError::BadPromote(c)),
            None => None,
        };
        Ok(UciMove { src, dst, promote })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_parse() {
        let mv: UciMove = "e2e4".parse().unwrap();
        assert_eq!(mv.src, Square::from_parts(File::E, Rank::R2));
        assert_eq!(mv.dst, Square::from_parts(File::E, Rank::R4));
        assert_eq!(mv.promote, None);
        assert_eq!(mv.to_string(), "e2e4");

        let mv: UciMove = "c7b8n".parse().unwrap();
        assert_eq!(mv.promote, Some(PieceKind::Knight));
        assert_eq!(mv.to_string(), "c7b8n");

        assert_eq!(
            "e2".parse::<UciMove>(),
            Err(RawParseError::BadLength),
        );
        assert!(matches!(
            "z2e4".parse::<UciMove>(),
            Err(RawParseError::BadSrc(_)),
        ));
        assert!(matches!(
            "e2e9".parse::<UciMove>(),
            Err(RawParseError::BadDst(_)),
        ));
        assert_eq!(
            "e7e8x".parse::<UciMove>(),
            Err(RawParseError::BadPromote('x')),
        );
    }
}
