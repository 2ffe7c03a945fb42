use crate::geometry;
use crate::movegen;
use crate::position::Position;
use crate::types::{CastlingRights, CastlingSide, Color, Piece, PieceKind, Square};

use super::uci;

use std::fmt;

use thiserror::Error;

/// Kind of the move.
///
/// Every move knows its own kind, so applying a move never needs to re-derive
/// whether it is a castling, a promotion or an en passant capture from the
/// board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Move of a knight, bishop, rook, queen or king, with or without a
    /// capture.
    Simple,
    /// Single pawn push or an ordinary pawn capture.
    PawnSingle,
    /// Double pawn push from the home rank.
    PawnDouble,
    /// En passant capture.
    EnPassant,
    /// Pawn move onto the last rank, promoting to the given piece.
    Promote(PieceKind),
    /// Kingside castling.
    CastleKing,
    /// Queenside castling.
    CastleQueen,
}

/// Error creating a move from its parts.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum CreateError {
    /// The parts do not form a well-formed move.
    #[error("move is not well-formed")]
    NotWellFormed,
}

/// Error validating a move against a position.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum MakeMoveError {
    /// The move does not obey the movement rules in this position.
    #[error("move is not semilegal")]
    NotSemiLegal,
    /// The move obeys the movement rules but leaves the own king under
    /// attack.
    #[error("move leaves the king under attack")]
    NotLegal,
}

/// Chess move.
///
/// A move makes sense only for the position it was created for. Applying it
/// to an unrelated position is caught by validation, as the move will not be
/// semilegal there.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub(crate) kind: MoveKind,
    pub(crate) src: Square,
    pub(crate) dst: Square,
}

impl Move {
    /// Creates a move from its parts without any checks.
    ///
    /// The caller must ensure that the move is well-formed for the side
    /// which is going to play it.
    #[inline]
    pub const fn new_unchecked(kind: MoveKind, src: Square, dst: Square) -> Move {
        Move { kind, src, dst }
    }

    /// Creates a move from its parts, ensuring that it is well-formed for
    /// `side`.
    pub fn new(kind: MoveKind, src: Square, dst: Square, side: Color) -> Result<Move, CreateError> {
        let mv = Move::new_unchecked(kind, src, dst);
        match mv.is_well_formed(side) {
            true => Ok(mv),
            false => Err(CreateError::NotWellFormed),
        }
    }

    /// Parses a UCI move and binds it to `pos`, without validation.
    pub fn from_uci(s: &str, pos: &Position) -> Result<Move, uci::BasicParseError> {
        Ok(s.parse::<uci::UciMove>()?.into_move(pos)?)
    }

    /// Parses a UCI move and checks that it is semilegal in `pos`.
    pub fn from_uci_semilegal(s: &str, pos: &Position) -> Result<Move, uci::ParseError> {
        let mv = s.parse::<uci::UciMove>()?.into_move(pos)?;
        mv.semi_validate(pos)?;
        Ok(mv)
    }

    /// Parses a UCI move and checks that it is legal in `pos`.
    pub fn from_uci_legal(s: &str, pos: &Position) -> Result<Move, uci::ParseError> {
        let mv = s.parse::<uci::UciMove>()?.into_move(pos)?;
        mv.validate(pos)?;
        Ok(mv)
    }

    /// Returns `true` if the move is geometrically consistent for `side`.
    ///
    /// Well-formedness does not depend on a position. It guarantees that
    /// applying the move cannot place pieces onto nonsense squares, but not
    /// that the move is playable; see [`Move::is_semilegal`] for that.
    pub fn is_well_formed(&self, side: Color) -> bool {
        let df = self.dst.file().index() as isize - self.src.file().index() as isize;
        let dr = self.dst.rank().index() as isize - self.src.rank().index() as isize;
        let forward = geometry::pawn_forward(side);
        match self.kind {
            MoveKind::Simple => self.src != self.dst,
            MoveKind::PawnSingle => {
                dr == forward
                    && df.abs() <= 1
                    && self.src.rank() != geometry::promote_src_rank(side)
            }
            MoveKind::PawnDouble => {
                df == 0 && dr == 2 * forward && self.src.rank() == geometry::pawn_home_rank(side)
            }
            MoveKind::EnPassant => {
                df.abs() == 1
                    && dr == forward
                    && self.src.rank() == geometry::enpassant_src_rank(side)
            }
            MoveKind::Promote(piece) => {
                df.abs() <= 1
                    && dr == forward
                    && self.src.rank() == geometry::promote_src_rank(side)
                    && !matches!(piece, PieceKind::Pawn | PieceKind::King)
            }
            MoveKind::CastleKing => {
                self.src == geometry::king_home(side)
                    && self.dst == geometry::castle_king_dst(side, CastlingSide::King)
            }
            MoveKind::CastleQueen => {
                self.src == geometry::king_home(side)
                    && self.dst == geometry::castle_king_dst(side, CastlingSide::Queen)
            }
        }
    }

    /// Returns the kind of the move.
    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the source square.
    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    /// Returns the destination square.
    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }

    /// Returns the promotion piece, if the move is a promotion.
    #[inline]
    pub const fn promote(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promote(piece) => Some(piece),
            _ => None,
        }
    }

    /// Returns the move in UCI notation.
    pub fn uci(&self) -> uci::UciMove {
        (*self).into()
    }

    /// Returns `true` if the move is semilegal in `pos`.
    pub fn is_semilegal(&self, pos: &Position) -> bool {
        is_move_semilegal(pos, *self)
    }

    /// Checks that the move is semilegal in `pos`.
    pub fn semi_validate(&self, pos: &Position) -> Result<(), MakeMoveError> {
        match is_move_semilegal(pos, *self) {
            true => Ok(()),
            false => Err(MakeMoveError::NotSemiLegal),
        }
    }

    /// Checks that the move is legal in `pos`.
    pub fn validate(&self, pos: &Position) -> Result<(), MakeMoveError> {
        self.semi_validate(pos)?;
        let mut probe = pos.clone();
        make_move_unchecked(&mut probe, *self);
        match probe.is_opponent_king_attacked() {
            true => Err(MakeMoveError::NotLegal),
            false => Ok(()),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uci())
    }
}

/// Data needed to undo a move applied with [`make_move_unchecked`].
#[derive(Debug, Copy, Clone)]
pub struct RawUndo {
    captured: Option<Piece>,
    castling: CastlingRights,
    ep_target: Option<Square>,
    halfmove_clock: u16,
}

fn update_castling(pos: &mut Position, src: Square, dst: Square) {
    if pos.r.castling == CastlingRights::EMPTY {
        return;
    }
    for color in [Color::White, Color::Black] {
        if src == geometry::king_home(color) {
            pos.r.castling.unset_color(color);
        }
        for side in [CastlingSide::Queen, CastlingSide::King] {
            let rook = geometry::rook_home(color, side);
            if src == rook || dst == rook {
                pos.r.castling.unset(color, side);
            }
        }
    }
}

fn do_castle(pos: &mut Position, side: Color, castle: CastlingSide) {
    let king_dst = geometry::castle_king_dst(side, castle);
    pos.r.put(geometry::king_home(side), None);
    pos.r.put(geometry::rook_home(side, castle), None);
    pos.r.put(king_dst, Some(Piece::new(side, PieceKind::King)));
    pos.r.put(
        geometry::castle_rook_dst(side, castle),
        Some(Piece::new(side, PieceKind::Rook)),
    );
    pos.r.castling.unset_color(side);
    pos.kings[side.index()] = king_dst;
}

fn undo_castle(pos: &mut Position, side: Color, castle: CastlingSide) {
    let king_home = geometry::king_home(side);
    pos.r.put(geometry::castle_king_dst(side, castle), None);
    pos.r.put(geometry::castle_rook_dst(side, castle), None);
    pos.r.put(king_home, Some(Piece::new(side, PieceKind::King)));
    pos.r.put(
        geometry::rook_home(side, castle),
        Some(Piece::new(side, PieceKind::Rook)),
    );
    pos.kings[side.index()] = king_home;
}

/// Applies `mv` to `pos` without validation, returning the data needed to
/// undo it.
///
/// `mv` must be semilegal in `pos`. Applying a move which is not leaves the
/// position in an unspecified (but memory-safe) state.
pub fn make_move_unchecked(pos: &mut Position, mv: Move) -> RawUndo {
    let side = pos.r.side;
    let src_piece = pos.r.get(mv.src);
    let undo = RawUndo {
        captured: pos.r.get(mv.dst),
        castling: pos.r.castling,
        ep_target: pos.r.ep_target,
        halfmove_clock: pos.r.halfmove_clock,
    };

    let is_pawn_move = matches!(
        mv.kind,
        MoveKind::PawnSingle | MoveKind::PawnDouble | MoveKind::EnPassant | MoveKind::Promote(_)
    );
    pos.r.halfmove_clock = match undo.captured.is_some() || is_pawn_move {
        true => 0,
        false => pos.r.halfmove_clock + 1,
    };
    pos.r.ep_target = None;

    match mv.kind {
        MoveKind::Simple => {
            pos.r.put(mv.dst, src_piece);
            pos.r.put(mv.src, None);
            update_castling(pos, mv.src, mv.dst);
            if src_piece == Some(Piece::new(side, PieceKind::King)) {
                pos.kings[side.index()] = mv.dst;
            }
        }
        MoveKind::PawnSingle => {
            pos.r.put(mv.dst, src_piece);
            pos.r.put(mv.src, None);
        }
        MoveKind::PawnDouble => {
            pos.r.put(mv.dst, src_piece);
            pos.r.put(mv.src, None);
            pos.r.ep_target = Some(Square::from_parts(
                mv.src.file(),
                geometry::enpassant_skip_rank(side),
            ));
        }
        MoveKind::EnPassant => {
            let victim = Square::from_parts(mv.dst.file(), mv.src.rank());
            pos.r.put(mv.dst, src_piece);
            pos.r.put(mv.src, None);
            pos.r.put(victim, None);
        }
        MoveKind::Promote(piece) => {
            pos.r.put(mv.dst, Some(Piece::new(side, piece)));
            pos.r.put(mv.src, None);
            update_castling(pos, mv.src, mv.dst);
        }
        MoveKind::CastleKing => do_castle(pos, side, CastlingSide::King),
        MoveKind::CastleQueen => do_castle(pos, side, CastlingSide::Queen),
    }

    if side == Color::Black {
        pos.r.fullmove_number += 1;
    }
    pos.r.side = side.inv();
    undo
}

/// Reverts a move applied with [`make_move_unchecked`].
///
/// `mv` and `undo` must come from the matching call on the same position.
pub fn unmake_move_unchecked(pos: &mut Position, mv: Move, undo: RawUndo) {
    let side = pos.r.side.inv();
    pos.r.castling = undo.castling;
    pos.r.ep_target = undo.ep_target;
    pos.r.halfmove_clock = undo.halfmove_clock;
    if side == Color::Black {
        pos.r.fullmove_number -= 1;
    }
    pos.r.side = side;

    match mv.kind {
        MoveKind::Simple => {
            let piece = pos.r.get(mv.dst);
            pos.r.put(mv.src, piece);
            pos.r.put(mv.dst, undo.captured);
            if piece == Some(Piece::new(side, PieceKind::King)) {
                pos.kings[side.index()] = mv.src;
            }
        }
        MoveKind::PawnSingle | MoveKind::PawnDouble => {
            let piece = pos.r.get(mv.dst);
            pos.r.put(mv.src, piece);
            pos.r.put(mv.dst, undo.captured);
        }
        MoveKind::EnPassant => {
            let victim = Square::from_parts(mv.dst.file(), mv.src.rank());
            let piece = pos.r.get(mv.dst);
            pos.r.put(mv.src, piece);
            pos.r.put(mv.dst, None);
            pos.r.put(victim, Some(Piece::new(side.inv(), PieceKind::Pawn)));
        }
        MoveKind::Promote(_) => {
            pos.r.put(mv.src, Some(Piece::new(side, PieceKind::Pawn)));
            pos.r.put(mv.dst, undo.captured);
        }
        MoveKind::CastleKing => undo_castle(pos, side, CastlingSide::King),
        MoveKind::CastleQueen => undo_castle(pos, side, CastlingSide::Queen),
    }
}

/// Applies `mv` if it does not leave the own king under attack.
///
/// Semilegality of `mv` is still not checked, so the same contract as for
/// [`make_move_unchecked`] applies.
pub fn try_make_move_unchecked(pos: &mut Position, mv: Move) -> Result<RawUndo, MakeMoveError> {
    let undo = make_move_unchecked(pos, mv);
    if pos.is_opponent_king_attacked() {
        unmake_move_unchecked(pos, mv, undo);
        return Err(MakeMoveError::NotLegal);
    }
    Ok(undo)
}

fn pawn_dst_ok(pos: &Position, side: Color, src: Square, dst: Square) -> bool {
    match src.file() == dst.file() {
        true => pos.r.get(dst).is_none(),
        false => pos.r.get(dst).map_or(false, |piece| piece.color != side),
    }
}

/// Returns `true` if `mv` obeys the movement rules in `pos`, ignoring
/// whether the own king is left under attack.
pub fn is_move_semilegal(pos: &Position, mv: Move) -> bool {
    let side = pos.r.side;
    if !mv.is_well_formed(side) {
        return false;
    }
    let src_piece = match pos.r.get(mv.src) {
        Some(piece) if piece.color == side => piece,
        _ => return false,
    };
    match mv.kind {
        MoveKind::Simple => {
            src_piece.kind != PieceKind::Pawn
                && !pos.r.get(mv.dst).map_or(false, |piece| piece.color == side)
                && movegen::piece_reaches(pos, src_piece.kind, mv.src, mv.dst)
        }
        MoveKind::PawnSingle | MoveKind::Promote(_) => {
            src_piece.kind == PieceKind::Pawn && pawn_dst_ok(pos, side, mv.src, mv.dst)
        }
        MoveKind::PawnDouble => {
            let skip = Square::from_parts(mv.src.file(), geometry::enpassant_skip_rank(side));
            src_piece.kind == PieceKind::Pawn
                && pos.r.get(skip).is_none()
                && pos.r.get(mv.dst).is_none()
        }
        MoveKind::EnPassant => {
            src_piece.kind == PieceKind::Pawn && pos.r.ep_target == Some(mv.dst)
        }
        MoveKind::CastleKing => movegen::can_castle(pos, side, CastlingSide::King),
        MoveKind::CastleQueen => movegen::can_castle(pos, side, CastlingSide::Queen),
    }
}
