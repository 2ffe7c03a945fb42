//! Position representation, FEN codec and game outcome detection.
//!
//! The types here come in two layers. [`RawPosition`] is a plain container:
//! an 8x8 piece grid plus side to move, castling rights, en passant target
//! and move counters, with no consistency guarantees at all. [`Position`] is
//! a validated wrapper which is known to hold exactly one king per side, no
//! pawns on back ranks, castling rights backed by pieces on their home
//! squares and a sound en passant target. All move generation and move
//! application works on [`Position`] only.

use crate::geometry;
use crate::movegen::{self, MoveList};
use crate::moves::Make;
use crate::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Color, ColorParseError, DrawReason,
    File, Outcome, Piece, PieceKind, Rank, Square, SquareParseError, WinReason,
};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error indicating that the position is not consistent.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// There is no king of color `{0:?}`.
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// There is more than one king of color `{0:?}`.
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// A pawn stands on its own or the opponent's back rank.
    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),
    /// A castling flag is set, but the corresponding king or rook has moved
    /// away from its home square.
    #[error("{0:?} cannot castle {1:?}side anymore")]
    InvalidCastling(Color, CastlingSide),
    /// The en passant target square is not consistent with the rest of the
    /// position.
    #[error("invalid en passant target {0}")]
    InvalidEnpassant(Square),
    /// The king of the side which just moved can be captured.
    #[error("opponent king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the board field of a FEN string.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    /// Met an unexpected character `{0}`.
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// Rank `{0}` describes more than eight files.
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank `{0}` describes fewer than eight files.
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// The board has more than eight ranks.
    #[error("too many ranks")]
    TooManyRanks,
    /// The board has fewer than eight ranks.
    #[error("not enough ranks")]
    TooFewRanks,
}

/// Error parsing [`RawPosition`] from FEN.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RawFenParseError {
    /// FEN contains non-ASCII data.
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// Board is missing.
    #[error("board not specified")]
    NoBoard,
    /// Error parsing the board.
    #[error("cannot parse board: {0}")]
    Board(#[from] BoardParseError),
    /// Side to move is missing.
    #[error("side to move not specified")]
    NoSide,
    /// Error parsing the side to move.
    #[error("cannot parse side to move: {0}")]
    Side(#[from] ColorParseError),
    /// Castling rights are missing.
    #[error("castling rights not specified")]
    NoCastling,
    /// Error parsing the castling rights.
    #[error("cannot parse castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    /// En passant target is missing.
    #[error("en passant target not specified")]
    NoEnpassant,
    /// Error parsing the en passant target.
    #[error("cannot parse en passant target: {0}")]
    Enpassant(#[from] SquareParseError),
    /// En passant target is on rank `{0}`, which cannot follow a double
    /// pawn push.
    #[error("invalid en passant rank {0}")]
    EnpassantRank(Rank),
    /// Error parsing the halfmove clock.
    #[error("cannot parse halfmove clock: {0}")]
    HalfmoveClock(ParseIntError),
    /// Error parsing the fullmove number.
    #[error("cannot parse fullmove number: {0}")]
    FullmoveNumber(ParseIntError),
    /// FEN contains data after the last field.
    #[error("extra data in FEN")]
    ExtraData,
}

/// Error parsing [`Position`] from FEN.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenParseError {
    /// Cannot parse the FEN string.
    #[error("cannot parse FEN: {0}")]
    Fen(#[from] RawFenParseError),
    /// The parsed position is not consistent.
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Unvalidated position.
///
/// All the fields are public, and there are no consistency guarantees. Use
/// this type to assemble arbitrary positions by hand, then convert it into
/// [`Position`] via [`TryFrom`] to do anything meaningful with it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawPosition {
    /// Piece grid, indexed by [`Square::index`].
    pub board: [Option<Piece>; 64],
    /// Side to move.
    pub side: Color,
    /// Castling rights.
    pub castling: CastlingRights,
    /// En passant target square, i.e. the square skipped by the last double
    /// pawn push, if any.
    pub ep_target: Option<Square>,
    /// Number of halfmoves since the last capture or pawn move.
    pub halfmove_clock: u16,
    /// Number of the current full move, starting from 1.
    pub fullmove_number: u16,
}

impl RawPosition {
    /// Creates an empty board with White to move.
    pub const fn empty() -> RawPosition {
        RawPosition {
            board: [None; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the initial position.
    pub fn initial() -> RawPosition {
        let mut r = RawPosition::empty();
        for (file, kind) in File::iter().zip(BACK_RANK) {
            r.put2(file, Rank::R1, Some(Piece::new(Color::White, kind)));
            r.put2(file, Rank::R2, Some(Piece::new(Color::White, PieceKind::Pawn)));
            r.put2(file, Rank::R7, Some(Piece::new(Color::Black, PieceKind::Pawn)));
            r.put2(file, Rank::R8, Some(Piece::new(Color::Black, kind)));
        }
        r.castling = CastlingRights::FULL;
        r
    }

    /// Returns the contents of the square `sq`.
    #[inline]
    pub const fn get(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Puts `piece` onto the square `sq`.
    #[inline]
    pub fn put(&mut self, sq: Square, piece: Option<Piece>) {
        self.board[sq.index()] = piece;
    }

    /// Returns the contents of the square at `file` and `rank`.
    #[inline]
    pub const fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Square::from_parts(file, rank))
    }

    /// Puts `piece` onto the square at `file` and `rank`.
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Option<Piece>) {
        self.put(Square::from_parts(file, rank), piece);
    }

    /// Returns a copy with the move counters reset to their lowest values.
    ///
    /// Positions which differ only in move counters repeat each other, so
    /// this copy serves as a repetition table key.
    pub fn repetition_key(&self) -> RawPosition {
        RawPosition {
            halfmove_clock: 0,
            fullmove_number: 1,
            ..*self
        }
    }

    /// Parses a FEN string into [`RawPosition`], without validation.
    pub fn from_fen(s: &str) -> Result<RawPosition, RawFenParseError> {
        s.parse()
    }

    /// Returns the FEN representation of the position.
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    /// Returns a pretty-printer for the position.
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { r: self, style }
    }
}

impl Default for RawPosition {
    fn default() -> RawPosition {
        RawPosition::empty()
    }
}

fn rank_of_row(row: usize) -> Rank {
    Rank::from_index(7 - row)
}

fn parse_board(s: &str) -> Result<[Option<Piece>; 64], BoardParseError> {
    let mut board = [None; 64];
    let mut row = 0_usize;
    let mut file = 0_usize;
    for ch in s.chars() {
        match ch {
            '/' => {
                if file < 8 {
                    return Err(BoardParseError::RankUnderflow(rank_of_row(row)));
                }
                row += 1;
                file = 0;
                if row >= 8 {
                    return Err(BoardParseError::TooManyRanks);
                }
            }
            '1'..='8' => {
                let skip = ch as usize - '0' as usize;
                if file + skip > 8 {
                    return Err(BoardParseError::RankOverflow(rank_of_row(row)));
                }
                file += skip;
            }
            _ => {
                let piece =
                    Piece::from_char(ch).ok_or(BoardParseError::UnexpectedChar(ch))?;
                if file >= 8 {
                    return Err(BoardParseError::RankOverflow(rank_of_row(row)));
                }
                board[(7 - row) * 8 + file] = Some(piece);
                file += 1;
            }
        }
    }
    if file < 8 {
        return Err(BoardParseError::RankUnderflow(rank_of_row(row)));
    }
    if row != 7 {
        return Err(BoardParseError::TooFewRanks);
    }
    Ok(board)
}

fn parse_ep_target(s: &str, side: Color) -> Result<Option<Square>, RawFenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let sq = Square::from_str(s)?;
    // The skipped square belongs to the side which just made the double push.
    if sq.rank() != geometry::enpassant_skip_rank(side.inv()) {
        return Err(RawFenParseError::EnpassantRank(sq.rank()));
    }
    Ok(Some(sq))
}

impl FromStr for RawPosition {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawPosition, Self::Err> {
        if !s.is_ascii() {
            return Err(RawFenParseError::NonAscii);
        }
        let mut iter = s.split(' ').fuse();

        let board = parse_board(iter.next().ok_or(RawFenParseError::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(RawFenParseError::NoSide)?)?;
        let castling =
            CastlingRights::from_str(iter.next().ok_or(RawFenParseError::NoCastling)?)?;
        let ep_target = parse_ep_target(iter.next().ok_or(RawFenParseError::NoEnpassant)?, side)?;
        let halfmove_clock = match iter.next() {
            Some(tok) => tok.parse().map_err(RawFenParseError::HalfmoveClock)?,
            None => 0,
        };
        let fullmove_number = match iter.next() {
            Some(tok) => tok.parse().map_err(RawFenParseError::FullmoveNumber)?,
            None => 1,
        };
        if iter.next().is_some() {
            return Err(RawFenParseError::ExtraData);
        }

        Ok(RawPosition {
            board,
            side,
            castling,
            ep_target,
            halfmove_clock,
            fullmove_number,
        })
    }
}

impl fmt::Display for RawPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            if rank != Rank::R8 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                match self.get2(file, rank) {
                    Some(piece) => {
                        if empty != 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece)?;
                    }
                    None => empty += 1,
                }
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        write!(f, " {} {}", self.side, self.castling)?;
        match self.ep_target {
            Some(sq) => write!(f, " {}", sq)?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

/// Validated position.
///
/// The wrapped [`RawPosition`] is guaranteed to be consistent, so the move
/// generator and move application cannot panic on it. The contents can only
/// be inspected, not modified; to modify a position, apply moves to it or
/// edit a [`RawPosition`] and re-validate.
#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) r: RawPosition,
    pub(crate) kings: [Square; 2],
}

impl Position {
    /// Creates the initial position.
    pub fn initial() -> Position {
        Position {
            r: RawPosition::initial(),
            kings: [geometry::king_home(Color::White), geometry::king_home(Color::Black)],
        }
    }

    /// Parses and validates a FEN string.
    pub fn from_fen(s: &str) -> Result<Position, FenParseError> {
        s.parse()
    }

    /// Returns the underlying [`RawPosition`].
    #[inline]
    pub fn raw(&self) -> &RawPosition {
        &self.r
    }

    /// Returns the contents of the square `sq`.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.r.get(sq)
    }

    /// Returns the contents of the square at `file` and `rank`.
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.r.get2(file, rank)
    }

    /// Returns the side to move.
    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    /// Returns the castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    /// Returns the en passant target square, if any.
    #[inline]
    pub fn ep_target(&self) -> Option<Square> {
        self.r.ep_target
    }

    /// Returns the number of halfmoves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.r.halfmove_clock
    }

    /// Returns the number of the current full move.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.r.fullmove_number
    }

    /// Returns the square of the king of color `c`.
    #[inline]
    pub fn king_square(&self, c: Color) -> Square {
        self.kings[c.index()]
    }

    /// Applies `m` to the position, returning the resulting position.
    pub fn make_move<M: Make>(&self, m: M) -> Result<Position, M::Err> {
        m.make(self)
    }

    /// Returns `true` if the king of the side to move is attacked.
    pub fn is_check(&self) -> bool {
        let side = self.r.side;
        movegen::is_square_attacked(self, self.king_square(side), side.inv())
    }

    /// Returns `true` if the king of the side which just moved is attacked.
    ///
    /// Such a position cannot arise in a real game. It appears as an
    /// intermediate state when the move generator filters semilegal moves.
    pub fn is_opponent_king_attacked(&self) -> bool {
        let side = self.r.side;
        movegen::is_square_attacked(self, self.king_square(side.inv()), side)
    }

    /// Returns `true` if the side to move has at least one legal move.
    pub fn has_legal_moves(&self) -> bool {
        movegen::has_legal_moves(self)
    }

    /// Generates all legal moves.
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal::gen_all(self)
    }

    /// Returns `true` if neither side has enough material to checkmate.
    ///
    /// This covers bare kings, a single knight, and any number of bishops
    /// which all stand on squares of the same color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut knights = 0_usize;
        let mut bishops = [0_usize; 2];
        for sq in Square::iter() {
            let piece = match self.r.get(sq) {
                Some(piece) => piece,
                None => continue,
            };
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight => knights += 1,
                PieceKind::Bishop => {
                    bishops[(sq.file().index() + sq.rank().index()) & 1] += 1;
                }
                _ => return false,
            }
        }
        match (knights, bishops[0] + bishops[1]) {
            (0, 0) | (1, 0) => true,
            (0, _) => bishops[0] == 0 || bishops[1] == 0,
            _ => false,
        }
    }

    /// Calculates the outcome in the current position, if any.
    ///
    /// Checkmate and stalemate take precedence over the draws by
    /// insufficient material and by the halfmove clock. Draws by repetition
    /// cannot be detected here, as they need the game history; see
    /// [`MoveChain`](crate::chain::MoveChain) for those.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.has_legal_moves() {
            return Some(match self.is_check() {
                true => Outcome::Win {
                    side: self.r.side.inv(),
                    reason: WinReason::Checkmate,
                },
                false => Outcome::Draw(DrawReason::Stalemate),
            });
        }
        if self.is_insufficient_material() {
            return Some(Outcome::Draw(DrawReason::InsufficientMaterial));
        }
        if self.r.halfmove_clock >= 150 {
            return Some(Outcome::Draw(DrawReason::Moves75));
        }
        if self.r.halfmove_clock >= 100 {
            return Some(Outcome::Draw(DrawReason::Moves50));
        }
        None
    }

    /// Returns the position with colors swapped and ranks flipped.
    ///
    /// The mirrored position is valid by construction, and mirroring twice
    /// returns the original position.
    pub fn mirror(&self) -> Position {
        let mut r = RawPosition::empty();
        for sq in Square::iter() {
            if let Some(piece) = self.r.get(sq) {
                r.put(
                    sq.mirror_rank(),
                    Some(Piece::new(piece.color.inv(), piece.kind)),
                );
            }
        }
        r.side = self.r.side.inv();
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::Queen, CastlingSide::King] {
                if self.r.castling.has(color, side) {
                    r.castling.set(color.inv(), side);
                }
            }
        }
        r.ep_target = self.r.ep_target.map(Square::mirror_rank);
        r.halfmove_clock = self.r.halfmove_clock;
        r.fullmove_number = self.r.fullmove_number;
        let kings = [
            self.kings[Color::Black.index()].mirror_rank(),
            self.kings[Color::White.index()].mirror_rank(),
        ];
        Position { r, kings }
    }

    /// Returns the FEN representation of the position.
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    /// Returns a pretty-printer for the position.
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.r.pretty(style)
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = ValidateError;

    fn try_from(r: RawPosition) -> Result<Position, ValidateError> {
        let mut kings = [None::<Square>; 2];
        for sq in Square::iter() {
            let piece = match r.get(sq) {
                Some(piece) => piece,
                None => continue,
            };
            match piece.kind {
                PieceKind::King => {
                    let slot = &mut kings[piece.color.index()];
                    if slot.is_some() {
                        return Err(ValidateError::TooManyKings(piece.color));
                    }
                    *slot = Some(sq);
                }
                PieceKind::Pawn => {
                    if sq.rank() == Rank::R1 || sq.rank() == Rank::R8 {
                        return Err(ValidateError::PawnOnBackRank(sq));
                    }
                }
                _ => {}
            }
        }
        let kings = [
            kings[Color::White.index()].ok_or(ValidateError::NoKing(Color::White))?,
            kings[Color::Black.index()].ok_or(ValidateError::NoKing(Color::Black))?,
        ];

        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::Queen, CastlingSide::King] {
                if !r.castling.has(color, side) {
                    continue;
                }
                let king_home = r.get(geometry::king_home(color))
                    == Some(Piece::new(color, PieceKind::King));
                let rook_home = r.get(geometry::rook_home(color, side))
                    == Some(Piece::new(color, PieceKind::Rook));
                if !king_home || !rook_home {
                    return Err(ValidateError::InvalidCastling(color, side));
                }
            }
        }

        if let Some(target) = r.ep_target {
            let pusher = r.side.inv();
            if target.rank() != geometry::enpassant_skip_rank(pusher) {
                return Err(ValidateError::InvalidEnpassant(target));
            }
            let pawn = Square::from_parts(target.file(), geometry::enpassant_src_rank(r.side));
            let home = Square::from_parts(target.file(), geometry::pawn_home_rank(pusher));
            if r.get(target).is_some()
                || r.get(home).is_some()
                || r.get(pawn) != Some(Piece::new(pusher, PieceKind::Pawn))
            {
                return Err(ValidateError::InvalidEnpassant(target));
            }
        }

        let pos = Position { r, kings };
        if pos.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }
        Ok(pos)
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Position, Self::Err> {
        let raw = RawPosition::from_str(s)?;
        let pos = raw.try_into()?;
        Ok(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.r, f)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.r == other.r
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.hash(state);
    }
}

/// Pretty-printing style.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrettyStyle {
    /// Plain ASCII.
    Ascii,
    /// Unicode box drawing and chess glyphs.
    Utf8,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const CROSS_FRAME: char;
    const INDICATORS: [char; 2];

    fn cell(piece: Option<Piece>) -> char;

    fn fmt(r: &RawPosition, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{}{}", rank.as_char(), Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(r.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::CROSS_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::INDICATORS[r.side.index()], Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file.as_char())?;
        }
        writeln!(f)
    }
}

struct AsciiStyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const CROSS_FRAME: char = '+';
    const INDICATORS: [char; 2] = ['W', 'B'];

    fn cell(piece: Option<Piece>) -> char {
        match piece {
            Some(piece) => piece.as_char(),
            None => '.',
        }
    }
}

struct Utf8StyleTable;

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const CROSS_FRAME: char = '┼';
    const INDICATORS: [char; 2] = ['○', '●'];

    fn cell(piece: Option<Piece>) -> char {
        match piece {
            Some(piece) => piece.as_utf8_char(),
            None => '·',
        }
    }
}

/// Wrapper to pretty-print a position.
///
/// Created by [`RawPosition::pretty`] and [`Position::pretty`].
pub struct Pretty<'a> {
    r: &'a RawPosition,
    style: PrettyStyle,
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.r, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.r, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial() {
        let pos = Position::initial();
        assert_eq!(pos.as_fen(), INITIAL_FEN);
        assert_eq!(pos, Position::from_fen(INITIAL_FEN).unwrap());
        assert_eq!(pos.side(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::FULL);
        assert_eq!(pos.ep_target(), None);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(
            pos.get2(File::E, Rank::R1),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            pos.get2(File::D, Rank::R8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(pos.get2(File::E, Rank::R4), None);
        assert_eq!(pos.king_square(Color::White), Square::from_parts(File::E, Rank::R1));
        assert_eq!(pos.king_square(Color::Black), Square::from_parts(File::E, Rank::R8));
    }

    #[test]
    fn test_midgame() {
        let fen = "1rb1kb1r/pp1pnppp/2n2q2/2p1p1B1/3PP3/2P2N2/PP3PPP/RN1QKB1R w KQk - 1 8";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.as_fen(), fen);
        assert_eq!(pos.side(), Color::White);
        assert_eq!(
            pos.castling(),
            CastlingRights::EMPTY
                .with(Color::White, CastlingSide::Queen)
                .with(Color::White, CastlingSide::King)
                .with(Color::Black, CastlingSide::King)
        );
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 8);
        assert_eq!(
            pos.get2(File::G, Rank::R5),
            Some(Piece::new(Color::White, PieceKind::Bishop))
        );
        assert_eq!(
            pos.get2(File::F, Rank::R6),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::RankUnderflow(
                Rank::R7
            ))),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::UnexpectedChar(
                '9'
            ))),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/45/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::RankOverflow(
                Rank::R6
            ))),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::TooManyRanks)),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::TooFewRanks)),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(RawFenParseError::Board(BoardParseError::UnexpectedChar(
                'x'
            ))),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(RawFenParseError::Side(ColorParseError::UnexpectedChar('x'))),
        );
        assert!(matches!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - abc 1"),
            Err(RawFenParseError::HalfmoveClock(_)),
        ));
        assert!(matches!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 x"),
            Err(RawFenParseError::FullmoveNumber(_)),
        ));
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 z"),
            Err(RawFenParseError::ExtraData),
        );
    }

    #[test]
    fn test_incomplete() {
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(pos, Position::initial());
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);

        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 10").unwrap();
        assert_eq!(pos.halfmove_clock(), 10);
        assert_eq!(pos.fullmove_number(), 1);

        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(FenParseError::Fen(RawFenParseError::NoEnpassant)),
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::NoKing(Color::White))),
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::NoKing(Color::White))),
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/2K1K3 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::TooManyKings(
                Color::White
            ))),
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/P3K3 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::PawnOnBackRank(
                Square::from_parts(File::A, Rank::R1)
            ))),
        );
        assert_eq!(
            Position::from_fen("4k2p/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::PawnOnBackRank(
                Square::from_parts(File::H, Rank::R8)
            ))),
        );
        // Castling flags require the king and the rook on their home squares.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w KQ - 0 1"),
            Err(FenParseError::Valid(ValidateError::InvalidCastling(
                Color::White,
                CastlingSide::King
            ))),
        );
        assert!(Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").is_ok());
        assert_eq!(
            Position::from_fen("rnbq1bnr/ppppkppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::Valid(ValidateError::InvalidCastling(
                Color::Black,
                CastlingSide::Queen
            ))),
        );
        // The king of the side which just moved must not be attacked.
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::OpponentKingAttacked)),
        );
        assert!(Position::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").is_ok());
    }

    #[test]
    fn test_ep_parse() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.ep_target(), Some(Square::from_parts(File::D, Rank::R6)));
        assert_eq!(pos.as_fen(), fen);

        // The target rank must match the side which just moved.
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/ppp1pppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d5 0 2"),
            Err(RawFenParseError::EnpassantRank(Rank::R5)),
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1"),
            Err(RawFenParseError::EnpassantRank(Rank::R4)),
        );

        // The pushed pawn must be present, and the skipped squares empty.
        assert_eq!(
            Position::from_fen("rnbqkbnr/ppp1pppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2"),
            Err(FenParseError::Valid(ValidateError::InvalidEnpassant(
                Square::from_parts(File::D, Rank::R6)
            ))),
        );
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2"),
            Err(FenParseError::Valid(ValidateError::InvalidEnpassant(
                Square::from_parts(File::D, Rank::R6)
            ))),
        );
    }

    #[test]
    fn test_outcome() {
        let pos = Position::initial();
        assert_eq!(pos.outcome(), None);

        let pos =
            Position::from_fen("rn1q1bnr/ppp1kB1p/3p2p1/3NN3/4P3/8/PPPP1PPP/R1BbK2R b KQ - 2 7")
                .unwrap();
        assert_eq!(
            pos.outcome(),
            Some(Outcome::Win {
                side: Color::White,
                reason: WinReason::Checkmate,
            }),
        );
        assert!(pos.is_check());

        let pos = Position::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert_eq!(pos.outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));
        assert!(!pos.is_check());

        for fen in [
            "7K/8/5n2/8/8/8/7k/8 w - - 0 1",
            "7K/8/5b2/8/8/8/7k/8 w - - 0 1",
            "2K4k/8/8/8/B1B5/1B1B4/B1B5/1B1B4 w - - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(
                pos.outcome(),
                Some(Outcome::Draw(DrawReason::InsufficientMaterial)),
                "{}",
                fen,
            );
        }
        for fen in ["BBK4k/8/8/8/8/8/8/8 w - - 0 1", "NNK4k/8/8/8/8/8/8/8 w - - 0 1"] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.outcome(), None, "{}", fen);
        }

        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 100 60")
                .unwrap();
        assert_eq!(pos.outcome(), Some(Outcome::Draw(DrawReason::Moves50)));
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 150 80")
                .unwrap();
        assert_eq!(pos.outcome(), Some(Outcome::Draw(DrawReason::Moves75)));
    }

    #[test]
    fn test_mirror() {
        let pos = Position::initial();
        assert_eq!(pos.mirror().as_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");

        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2")
                .unwrap();
        let mirrored = pos.mirror();
        assert_eq!(
            mirrored.as_fen(),
            "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 2",
        );
        assert_eq!(mirrored.mirror(), pos);

        let pos = Position::from_fen("1rb1kb1r/pp1pnppp/2n2q2/2p1p1B1/3PP3/2P2N2/PP3PPP/RN1QKB1R w KQk - 1 8").unwrap();
        assert_eq!(pos.mirror().mirror(), pos);
        assert_eq!(pos.mirror().king_square(Color::White), pos.king_square(Color::Black).mirror_rank());
    }

    #[test]
    fn test_pretty() {
        let pos = Position::from_fen("r3k3/ppp5/8/8/8/8/5PPP/4K2R b Kq - 12 23").unwrap();
        assert_eq!(
            pos.pretty(PrettyStyle::Ascii).to_string(),
            concat!(
                "8|r...k...\n",
                "7|ppp.....\n",
                "6|........\n",
                "5|........\n",
                "4|........\n",
                "3|........\n",
                "2|.....PPP\n",
                "1|....K..R\n",
                "-+--------\n",
                "B|abcdefgh\n",
            ),
        );
        assert_eq!(
            pos.pretty(PrettyStyle::Utf8).to_string(),
            concat!(
                "8│♜···♚···\n",
                "7│♟♟♟·····\n",
                "6│········\n",
                "5│········\n",
                "4│········\n",
                "3│········\n",
                "2│·····♙♙♙\n",
                "1│····♔··♖\n",
                "─┼────────\n",
                "●│abcdefgh\n",
            ),
        );
    }
}
